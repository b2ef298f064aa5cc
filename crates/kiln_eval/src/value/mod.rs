mod string;

pub use string::*;

use std::collections::BTreeMap;
use std::sync::Arc;

pub type Attrs = BTreeMap<String, Value>;

/// A fully evaluated value. The surrounding evaluation machinery forces
/// thunks before a primitive ever sees its arguments, so there is no
/// thunk variant here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(KilnString),
    List(Arc<[Value]>),
    Attrs(Arc<Attrs>),
}

impl Value {
    /// the name used for this kind of value in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "a boolean",
            Value::Int(_) => "an integer",
            Value::Str(_) => "a string",
            Value::List(_) => "a list",
            Value::Attrs(_) => "an attribute set",
        }
    }

    pub fn attrs(attrs: Attrs) -> Self {
        Value::Attrs(Arc::new(attrs))
    }

    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Value::List(items.into_iter().collect())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<KilnString> for Value {
    fn from(s: KilnString) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items.into())
    }
}

impl From<Attrs> for Value {
    fn from(attrs: Attrs) -> Self {
        Value::attrs(attrs)
    }
}
