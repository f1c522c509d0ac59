//! Raw provider payload → typed view model.
//!
//! Each provider module owns its native field names. The helpers here give
//! them field-by-field degradation: a missing or mistyped field falls back to
//! the model default, and only a payload that is not a JSON object at all is
//! rejected.

pub mod dex;
pub mod history;
pub mod risk;
pub mod signals;

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizationError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

pub fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Read-only view over one JSON object, tolerant of camelCase/snake_case
/// spelling and of stringly-typed numbers.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn from_payload(raw: &'a Value) -> Result<Self, NormalizationError> {
        match raw {
            Value::Object(map) => Ok(Self { map }),
            other => Err(NormalizationError::MalformedPayload(format!(
                "expected a JSON object, got {}",
                json_type(other)
            ))),
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        let found = self
            .map
            .get(key)
            .or_else(|| self.map.get(&snake_case(key)))
            .or_else(|| self.map.get(&camel_case(key)))?;
        (!found.is_null()).then_some(found)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
            Value::String(s) => leading_number(s),
            _ => None,
        }
    }

    pub fn percent(&self, key: &str) -> Option<f64> {
        self.number(key).map(clamp_percent)
    }

    /// Non-negative whole count. Negative values read as zero.
    pub fn count(&self, key: &str) -> Option<u64> {
        self.number(key).map(|v| v.max(0.0).trunc() as u64)
    }

    /// Text field. Blank strings count as missing.
    pub fn text(&self, key: &str) -> Option<String> {
        let text = match self.get(key)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        (!text.is_empty()).then_some(text)
    }

    /// Object elements of an array field; anything else is skipped.
    pub fn rows(&self, key: &str) -> Vec<Fields<'a>> {
        match self.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_object().map(|map| Fields { map }))
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parses the numeric prefix of strings like `"85"`, `"6.5/10"`, `"-3.5%"`
/// or `"1,234"`.
fn leading_number(raw: &str) -> Option<f64> {
    let mut digits = String::new();
    for (i, c) in raw.trim().chars().enumerate() {
        match c {
            '0'..='9' | '.' => digits.push(c),
            '-' | '+' if i == 0 => digits.push(c),
            ',' => continue,
            _ => break,
        }
    }
    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
