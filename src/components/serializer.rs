// Additional registration parameters and their `<additionalParameters>` wire form

use serde::{Deserialize, Serialize};
use serde_json::Value;

const OPEN_TAG: &str = "<additionalParameters>";
const CLOSE_TAG: &str = "</additionalParameters>";

/// A single additional parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    String(String),
    Integer(i64),
    Unsigned(u64),
    /// Rendered as its numeric value
    Byte(i8),
    /// Rendered as its code point
    Char(char),
    Float(f32),
    Double(f64),
    Bool(bool),
    /// Any other value, rendered through its string form
    Other(String),
}

impl ParamValue {
    /// String form written into the `value` attribute
    ///
    /// Floats use Rust's `Debug` form, so integral values keep a trailing `.0`. It switches
    /// to exponent notation at different magnitudes than Java's `String.valueOf`: `1e10`
    /// renders as `10000000000.0`, not `1.0E10`.
    pub fn render(&self) -> String {
        match self {
            ParamValue::String(s) | ParamValue::Other(s) => s.clone(),
            ParamValue::Integer(i) => i.to_string(),
            ParamValue::Unsigned(u) => u.to_string(),
            ParamValue::Byte(b) => b.to_string(),
            ParamValue::Char(c) => u32::from(*c).to_string(),
            ParamValue::Float(f) => format!("{:?}", f),
            ParamValue::Double(d) => format!("{:?}", d),
            ParamValue::Bool(b) => b.to_string(),
        }
    }

    /// Convert from event JSON; `null` has no parameter value
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(ParamValue::Bool(*b)),
            Value::String(s) => Some(ParamValue::String(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(ParamValue::Integer(i))
                } else if let Some(u) = n.as_u64() {
                    Some(ParamValue::Unsigned(u))
                } else {
                    n.as_f64().map(ParamValue::Double)
                }
            },
            other => Some(ParamValue::Other(other.to_string())),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ParamValue::String(s) | ParamValue::Other(s) => Value::String(s.clone()),
            ParamValue::Integer(i) => Value::from(*i),
            ParamValue::Unsigned(u) => Value::from(*u),
            ParamValue::Byte(b) => Value::from(*b),
            ParamValue::Char(c) => Value::from(u32::from(*c)),
            ParamValue::Float(f) => Value::from(f64::from(*f)),
            ParamValue::Double(d) => Value::from(*d),
            ParamValue::Bool(b) => Value::Bool(*b),
        }
    }
}

macro_rules! param_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    ParamValue::$variant(value.into())
                }
            }
        )*
    };
}

param_from! {
    String => String,
    &str => String,
    i16 => Integer,
    i32 => Integer,
    i64 => Integer,
    u8 => Integer,
    u16 => Integer,
    u32 => Integer,
    u64 => Unsigned,
    i8 => Byte,
    char => Char,
    f32 => Float,
    f64 => Double,
    bool => Bool,
}

/// Ordered parameter map; a `None` value is kept but never serialized
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdditionalParameters {
    entries: Vec<(String, Option<ParamValue>)>,
}

impl AdditionalParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace, keeping the position of an existing key
    pub fn insert(&mut self, key: impl Into<String>, value: Option<ParamValue>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, Some(value.into()));
        self
    }

    pub fn with_null(mut self, key: impl Into<String>) -> Self {
        self.insert(key, None);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ParamValue>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn from_json(map: &serde_json::Map<String, Value>) -> Self {
        let mut params = Self::new();
        for (key, value) in map {
            params.insert(key.clone(), ParamValue::from_json(value));
        }
        params
    }

    pub fn to_json(&self) -> serde_json::Map<String, Value> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.as_ref().map_or(Value::Null, ParamValue::to_json)))
            .collect()
    }
}

/// Serialize parameters as `<additionalParameters><param name="K" value="V"/>...</additionalParameters>`
pub fn serialize_map(params: Option<&AdditionalParameters>) -> String {
    let mut out = String::from(OPEN_TAG);
    if let Some(params) = params {
        for (key, value) in params.iter() {
            let Some(value) = value else { continue };
            out.push_str("<param name=\"");
            out.push_str(&escape(key));
            out.push_str("\" value=\"");
            out.push_str(&escape(&value.render()));
            out.push_str("\"/>");
        }
    }
    out.push_str(CLOSE_TAG);
    out
}

/// Escape an attribute value; CR and LF are dropped rather than escaped
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\r' | '\n' => {},
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
