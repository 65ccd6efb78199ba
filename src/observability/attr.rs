//! Key/value attributes attached to events.

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

/// Attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Str(String),
    Duration(Duration),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Int(i) => write!(f, "{}", i),
            AttrValue::Uint(u) => write!(f, "{}", u),
            AttrValue::Str(s) => f.write_str(s),
            AttrValue::Duration(d) => write!(f, "{:?}", d),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<u64> for AttrValue {
    fn from(v: u64) -> Self {
        AttrValue::Uint(v)
    }
}

impl From<usize> for AttrValue {
    fn from(v: usize) -> Self {
        AttrValue::Uint(v as u64)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Str(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Str(v)
    }
}

impl From<Duration> for AttrValue {
    fn from(v: Duration) -> Self {
        AttrValue::Duration(v)
    }
}

/// A single key/value pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: Cow<'static, str>,
    pub value: AttrValue,
}

impl Attr {
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<AttrValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            AttrValue::Str(s) if s.is_empty() || s.contains([' ', '=', '"']) => {
                write!(f, "{}={:?}", self.key, s)
            }
            value => write!(f, "{}={}", self.key, value),
        }
    }
}

/// Render attributes as space-separated `key=value` pairs.
pub(crate) fn render(attrs: &[Attr]) -> String {
    let parts: Vec<String> = attrs.iter().map(|a| a.to_string()).collect();
    parts.join(" ")
}
