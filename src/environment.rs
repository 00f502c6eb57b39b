use crate::value::Value;
use compact_str::CompactString;
use std::{collections::HashMap, sync::Arc};

/// An immutable scope chain. Binding a name creates a new child scope and
/// leaves the parent untouched, so environments can be shared freely between
/// evaluations and threads.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    head: Option<Arc<Scope>>,
}

#[derive(Debug)]
struct Scope {
    bindings: Bindings,
    parent: Option<Arc<Scope>>,
}

#[derive(Debug)]
enum Bindings {
    /// Initial bindings handed in by the caller.
    Root(HashMap<CompactString, Value>),
    /// The single name introduced by a `let`.
    Single(CompactString, Value),
}

impl Bindings {
    fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Bindings::Root(values) => values.get(name),
            Bindings::Single(bound, value) => (bound.as_str() == name).then_some(value),
        }
    }
}

impl Environment {
    pub fn new() -> Self {
        Self { head: None }
    }

    /// Returns a child environment in which `name` is bound to `value`.
    pub fn bind(&self, name: impl Into<CompactString>, value: Value) -> Self {
        Self {
            head: Some(Arc::new(Scope {
                bindings: Bindings::Single(name.into(), value),
                parent: self.head.clone(),
            })),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        let mut scope = self.head.as_deref();
        while let Some(current) = scope {
            if let Some(value) = current.bindings.get(name) {
                return Some(value);
            }
            scope = current.parent.as_deref();
        }
        None
    }

    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut scope = self.head.as_deref();
        while let Some(current) = scope {
            depth += 1;
            scope = current.parent.as_deref();
        }
        depth
    }
}

impl From<HashMap<CompactString, Value>> for Environment {
    fn from(values: HashMap<CompactString, Value>) -> Self {
        Self {
            head: Some(Arc::new(Scope {
                bindings: Bindings::Root(values),
                parent: None,
            })),
        }
    }
}

impl<K: Into<CompactString>> FromIterator<(K, Value)> for Environment {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(name, value)| (name.into(), value))
            .collect::<HashMap<_, _>>()
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth() {
        let root = Environment::new();
        assert_eq!(root.depth(), 0);

        let outer = root.bind("x", Value::from(1.0));
        assert_eq!(root.depth(), 0);
        assert_eq!(outer.depth(), 1);

        let inner = outer.bind("y", Value::from(2.0));
        assert_eq!(outer.depth(), 1);
        assert_eq!(inner.depth(), 2);
    }

    #[test]
    fn inner_binding_shadows_outer() {
        let outer = Environment::from_iter([("x", Value::from(1.0)), ("y", Value::from("y"))]);
        let inner = outer.bind("x", Value::from(2.0));

        assert_eq!(inner.lookup("x"), Some(&Value::from(2.0)));
        assert_eq!(inner.lookup("y"), Some(&Value::from("y")));
        assert_eq!(outer.lookup("x"), Some(&Value::from(1.0)));
        assert_eq!(inner.lookup("z"), None);
    }

    #[test]
    fn shared_between_threads() {
        let environment = Environment::new().bind("x", Value::from(4.0));
        std::thread::scope(|s| {
            for _ in 0..2 {
                s.spawn(|| assert_eq!(environment.lookup("x"), Some(&Value::from(4.0))));
            }
        });
    }
}
