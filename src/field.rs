//! Tagged field values for the write side.

use std::borrow::Cow;
use std::fmt;

/// One parsed record: fields in the order they appeared.
pub type Record = Vec<String>;

/// A value handed to the [`Writer`](crate::Writer).
///
/// The writer needs the original type of a value, not just its text, to decide
/// quoting under [`Quoting::NonNumeric`](crate::Quoting::NonNumeric).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Field {
    /// Missing value, written as empty text.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Field {
    /// Returns true for integer and floating point values.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Field::Int(_) | Field::Float(_))
    }

    /// Text form used when writing the value.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Field::Null => Cow::Borrowed(""),
            Field::Bool(true) => Cow::Borrowed("True"),
            Field::Bool(false) => Cow::Borrowed("False"),
            Field::Int(n) => Cow::Owned(n.to_string()),
            Field::Float(x) => Cow::Owned(float_text(*x)),
            Field::Text(s) => Cow::Borrowed(s),
        }
    }
}

/// Shortest round-trip text that still reads as a float (`2.0`, not `2`).
fn float_text(x: f64) -> String {
    if x.is_nan() {
        "NaN".to_string()
    } else if x == f64::INFINITY {
        "inf".to_string()
    } else if x == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{x:?}")
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Field::Text(s.to_string())
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        Field::Text(s)
    }
}

impl From<&String> for Field {
    fn from(s: &String) -> Self {
        Field::Text(s.clone())
    }
}

impl From<bool> for Field {
    fn from(b: bool) -> Self {
        Field::Bool(b)
    }
}

impl From<i64> for Field {
    fn from(n: i64) -> Self {
        Field::Int(n)
    }
}

impl From<i32> for Field {
    fn from(n: i32) -> Self {
        Field::Int(i64::from(n))
    }
}

impl From<u32> for Field {
    fn from(n: u32) -> Self {
        Field::Int(i64::from(n))
    }
}

impl From<f64> for Field {
    fn from(x: f64) -> Self {
        Field::Float(x)
    }
}

impl From<f32> for Field {
    fn from(x: f32) -> Self {
        Field::Float(f64::from(x))
    }
}

impl<T: Into<Field>> From<Option<T>> for Field {
    fn from(value: Option<T>) -> Self {
        value.map_or(Field::Null, Into::into)
    }
}
