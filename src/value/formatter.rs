use super::Value;
use crate::error::EvaluationError;
use crate::lexer::LineBreaks;
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::path::Path;

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

pub trait ValueFormatter {
    fn format(&self, value: &Value) -> String;
    fn format_error(&self, error: &EvaluationError) -> String;
}

pub struct DebugFormatter;

impl ValueFormatter for DebugFormatter {
    fn format(&self, value: &Value) -> String {
        format!("{value:?}")
    }

    fn format_error(&self, error: &EvaluationError) -> String {
        format!("{error:?}")
    }
}

pub struct BasicFormatter {
    line_breaks: LineBreaks,
}

impl BasicFormatter {
    pub fn new(text: &str) -> Self {
        let line_breaks = LineBreaks::new(text);
        Self { line_breaks }
    }
}

impl ValueFormatter for BasicFormatter {
    fn format(&self, value: &Value) -> String {
        format!("{value}")
    }

    fn format_error(&self, error: &EvaluationError) -> String {
        let line = self.line_breaks.get_line_from_span(error.span());
        format!("[line {line}] Error {}: {error}", error.code())
    }
}

/// Renders errors as annotated source snippets.
pub struct PrettyFormatter<'src> {
    text: &'src str,
    path: &'src Path,
}

impl<'src> PrettyFormatter<'src> {
    pub fn new(text: &'src str, path: &'src Path) -> Self {
        Self { text, path }
    }
}

impl PrettyFormatter<'_> {
    fn title(error: &EvaluationError) -> &'static str {
        match error {
            EvaluationError::Lexical(_) => "Could not tokenize the expression",
            EvaluationError::Syntax(_) => "Malformed expression",
            EvaluationError::Type(_) => "Operator applied to operands of the wrong type",
            EvaluationError::Name(_) => "Reference to a name that is not bound",
        }
    }

    fn label(error: &EvaluationError) -> String {
        match error {
            EvaluationError::Name(e) => format!(
                "`{}` is not bound by any enclosing `let` or by the environment",
                e.name.as_str().fg(Color::BrightYellow)
            ),
            e => format!("{e}"),
        }
    }
}

impl ValueFormatter for PrettyFormatter<'_> {
    fn format(&self, value: &Value) -> String {
        format!("{value}")
    }

    fn format_error(&self, error: &EvaluationError) -> String {
        let path = self.path.to_string_lossy();
        let path: &str = &path;
        let span = error.span();
        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, span.range()))
            .with_code(error.code())
            .with_message(Self::title(error))
            .with_label(
                Label::new((path, span.range()))
                    .with_message(Self::label(error))
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write((path, Source::from(self.text)), &mut output)
            .expect(ARIADNE_WRITE_MSG);
        String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
    }
}
