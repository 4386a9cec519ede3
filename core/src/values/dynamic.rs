use crate::values::{
    coerce::format_number,
    function::{Function, FunctionError},
    regexp::RegExp,
};

use std::collections::BTreeMap;
use std::fmt;

/// Associative container used for object values, `vars` and `state`.
///
/// Keys iterate in sorted order, so rendering and set operations are
/// deterministic.
pub type Map = BTreeMap<String, Value>;

/// A dynamically-typed AEL runtime value.
///
/// Arrays and maps are owned containers. Operators never mutate them in
/// place: merging and filtering always build a new container.
///
/// Equality is structural. Numbers follow IEEE semantics (`NaN != NaN`),
/// functions compare by identity of the shared callable.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    Null,
    #[default]
    Undefined,
    Boolean(bool),
    Number(f64),
    String(String),
    RegExp(RegExp),
    Array(Vec<Value>),
    Map(Map),
    Function(Function),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Wraps a host closure as a function value.
    pub fn function<F>(name: &str, func: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, FunctionError> + Send + Sync + 'static,
    {
        Value::Function(Function::new(name, func))
    }

    /// Builds a map value from `(key, value)` pairs.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(func) => Some(func),
            _ => None,
        }
    }

    /// Name of the value's runtime type, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Undefined => "undefined",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::RegExp(_) => "regexp",
            Value::Array(_) => "array",
            Value::Map(_) => "object",
            Value::Function(_) => "function",
        }
    }

    /// Looks up a property by its string key.
    ///
    /// Maps index by key, arrays by decimal index or `length`. Missing
    /// keys and non-container values yield `None`.
    pub fn property(&self, key: &str) -> Option<Value> {
        match self {
            Value::Map(map) => map.get(key).cloned(),
            Value::Array(items) if key == "length" => Some(Value::from(items.len())),
            Value::Array(items) => key
                .parse::<usize>()
                .ok()
                .filter(|_| !key.starts_with('+'))
                .and_then(|index| items.get(index).cloned()),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions from host values
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_integer!(i32, i64, u32, u64, usize);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<RegExp> for Value {
    fn from(re: RegExp) -> Self {
        Value::RegExp(re)
    }
}

impl From<Function> for Value {
    fn from(func: Function) -> Self {
        Value::Function(func)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}

// ============================================================================
// Display
// ============================================================================

/// Literal-like rendering: strings are quoted, containers use JSON-style
/// brackets. Used for trace summaries and debugging output; the
/// language-level string conversion lives in [`crate::values::coerce`].
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Undefined => f.write_str("undefined"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => write_quoted(f, s),
            Value::RegExp(re) => write!(f, "{re}"),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write_quoted(f, key)?;
                    write!(f, ":{value}")?;
                }
                f.write_str("}")
            }
            Value::Function(func) => write!(f, "[Function: {}]", func.name()),
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quoted = serde_json::to_string(s).map_err(|_| fmt::Error)?;
    f.write_str(&quoted)
}
