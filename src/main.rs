use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{eyre, Context, Result};
use exprel::{Environment, Evaluator, IdentifierMode, Value};
use std::path::{Path, PathBuf};
use std::{fs::read_to_string, process::ExitCode};

#[derive(Debug, Parser)]
#[clap(name = "exprel", version)]
pub struct CLArgs {
    #[clap(subcommand)]
    pub routine: ExprelCommand,
}

#[derive(Debug, Subcommand)]
pub enum ExprelCommand {
    /// Print the tokens of an expression, one per line.
    Tokenize {
        #[clap(flatten)]
        source: SourceArgs,
        #[clap(long = "format", value_enum, default_value = "basic")]
        format: TokenFormat,
    },
    /// Evaluate an expression and print its value.
    Evaluate {
        #[clap(flatten)]
        source: SourceArgs,
        /// Bind NAME to VALUE before evaluating; VALUE is a boolean, a number or else a string.
        #[clap(long = "define", short = 'D', value_name = "NAME=VALUE", value_parser = parse_binding)]
        define: Vec<(String, Value)>,
        #[clap(long = "format", value_enum, default_value = "pretty")]
        format: ValueFormat,
    },
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// File holding the expression.
    #[clap(required_unless_present = "expr", conflicts_with = "expr")]
    path: Option<PathBuf>,
    /// The expression itself.
    #[clap(long = "expr", short = 'e')]
    expr: Option<String>,
    /// Treat bare words as self-quoting strings instead of variables.
    #[clap(long = "words")]
    words: bool,
}

impl SourceArgs {
    fn read(&self) -> Result<(String, PathBuf)> {
        match (&self.expr, &self.path) {
            (Some(expr), _) => Ok((expr.clone(), PathBuf::from("<expr>"))),
            (None, Some(path)) => {
                let src = read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                Ok((src, path.clone()))
            }
            (None, None) => Err(eyre!("Either a path or --expr is required")),
        }
    }

    fn identifier_mode(&self) -> IdentifierMode {
        if self.words {
            IdentifierMode::Words
        } else {
            IdentifierMode::Variables
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum TokenFormat {
    Debug,
    Basic,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ValueFormat {
    Debug,
    Basic,
    Pretty,
}

fn parse_binding(text: &str) -> Result<(String, Value), String> {
    let Some((name, raw)) = text.split_once('=') else {
        return Err(format!("expected NAME=VALUE but got `{text}`"));
    };
    let value = match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        raw => match raw.parse::<f64>() {
            Ok(number) => Value::Number(number),
            Err(_) => Value::from(raw),
        },
    };
    Ok((name.to_string(), value))
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = CLArgs::parse();
    let succeeded = match args.routine {
        ExprelCommand::Tokenize { source, format } => {
            let (src, path) = source.read()?;
            eprintln!("Tokenizing {:?}...", path);
            tokenize(&src, source.identifier_mode(), &format)
        }
        ExprelCommand::Evaluate {
            source,
            define,
            format,
        } => {
            let (src, path) = source.read()?;
            eprintln!("Evaluating {:?}...", path);
            let environment: Environment = define.into_iter().collect();
            let evaluator = Evaluator::new()
                .with_environment(environment)
                .with_identifier_mode(source.identifier_mode());
            evaluate(&evaluator, &src, &path, &format)
        }
    };

    if succeeded {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(65))
    }
}

fn tokenize(src: &str, mode: IdentifierMode, format: &TokenFormat) -> bool {
    use exprel::lexer::formatter::{BasicFormatter, DebugFormatter, ToFormatter, TokenFormatter};
    use exprel::lexer::{Lexer, TokenKind};

    let mut scanner = Lexer::with_mode(src, mode);
    let formatter: Box<dyn TokenFormatter + '_> = match format {
        TokenFormat::Debug => Box::new(ToFormatter::<DebugFormatter>::create_formatter(&scanner)),
        TokenFormat::Basic => Box::new(ToFormatter::<BasicFormatter>::create_formatter(&scanner)),
    };
    let mut succeeded = true;
    loop {
        match scanner.next_token() {
            Ok(token) => {
                println!("{}", formatter.format(&token));
                if matches!(token.kind, TokenKind::Eof) {
                    return succeeded;
                }
            }
            Err(error) => {
                eprintln!("{}", formatter.format_lexical_error(&error));
                succeeded = false;
            }
        };
    }
}

fn evaluate(evaluator: &Evaluator, src: &str, path: &Path, format: &ValueFormat) -> bool {
    use exprel::value::formatter::{
        BasicFormatter, DebugFormatter, PrettyFormatter, ValueFormatter,
    };

    let formatter: Box<dyn ValueFormatter + '_> = match format {
        ValueFormat::Debug => Box::new(DebugFormatter),
        ValueFormat::Basic => Box::new(BasicFormatter::new(src)),
        ValueFormat::Pretty => Box::new(PrettyFormatter::new(src, path)),
    };
    match evaluator.evaluate(src) {
        Ok(value) => {
            println!("{}", formatter.format(&value));
            true
        }
        Err(error) => {
            eprintln!("{}", formatter.format_error(&error));
            false
        }
    }
}
