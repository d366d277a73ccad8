use serde::{Deserialize, Serialize};

/// One stored entry of a state document.
///
/// Serialized untagged, so the text form is plain JSON: a number, a string,
/// an array of numbers or an array of strings. Any other JSON shape fails to
/// deserialize. An empty array carries no element type and always reads back
/// as an empty `NumberArray`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    String(String),
    NumberArray(Vec<f64>),
    StringArray(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Number,
    String,
    NumberArray,
    StringArray,
}

impl ValueKind {
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::NumberArray => "number array",
            ValueKind::StringArray => "string array",
        }
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::NumberArray(_) => ValueKind::NumberArray,
            Value::StringArray(_) => ValueKind::StringArray,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_numbers(&self) -> Option<&[f64]> {
        match self {
            Value::NumberArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            Value::StringArray(v) => Some(v),
            _ => None,
        }
    }

    /// True when every number in the value has a textual encoding.
    pub fn is_finite(&self) -> bool {
        match self {
            Value::Number(v) => v.is_finite(),
            Value::NumberArray(v) => v.iter().all(|x| x.is_finite()),
            Value::String(_) | Value::StringArray(_) => true,
        }
    }

    /// Collapse an empty string array to the form it reads back as.
    pub fn normalized(self) -> Self {
        match self {
            Value::StringArray(v) if v.is_empty() => Value::NumberArray(Vec::new()),
            other => other,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

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

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::NumberArray(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::StringArray(v)
    }
}
