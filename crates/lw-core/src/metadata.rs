use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Key-value data that dice formulas can reference with `@path.to.value`.
pub type FormulaContext = HashMap<String, MetadataValue>;

/// A flexible metadata value that supports common types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// A boolean value.
    Boolean(bool),
    /// A 64-bit signed integer value.
    Integer(i64),
    /// A 64-bit floating-point value.
    Float(f64),
    /// A text value.
    String(String),
    /// An ordered list of metadata values.
    List(Vec<MetadataValue>),
    /// A string-keyed map of metadata values.
    Map(HashMap<String, MetadataValue>),
}

impl MetadataValue {
    /// Numeric view of this value, if it has one.
    ///
    /// Strings are parsed as numbers; booleans map to 0 and 1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            Self::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::String(s) => s.trim().parse().ok(),
            Self::List(_) | Self::Map(_) => None,
        }
    }

    /// Text view of this value, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Self::Map(_) => write!(f, "{{...}}"),
        }
    }
}

/// Resolve a dotted path such as `abilities.str.value` against a context.
///
/// A flat key containing the full dotted path wins over nested lookup, so
/// both `{"level": 3}` and `{"details": {"level": 3}}` style data work.
pub fn lookup_path<'a>(context: &'a FormulaContext, path: &str) -> Option<&'a MetadataValue> {
    if let Some(value) = context.get(path) {
        return Some(value);
    }

    let mut segments = path.split('.');
    let mut current = context.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            MetadataValue::Map(map) => map.get(segment)?,
            MetadataValue::List(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}
