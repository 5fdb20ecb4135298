//! Runtime values.
//!
//! Values follow the loose semantics of the JavaScript the transpiler
//! emits: numbers are `f64`, `+` concatenates when either side is a string,
//! and truthiness and `==` coerce the way a browser would.

use std::collections::BTreeMap;
use std::fmt;

/// A binding the host provides rather than the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Context,
    RoverApi,
    Lib,
    Memory,
    Rover,
    Json,
    Output,
}

impl Capability {
    pub fn name(self) -> &'static str {
        match self {
            Capability::Context => "context",
            Capability::RoverApi => "roverApi",
            Capability::Lib => "lib",
            Capability::Memory => "memory",
            Capability::Rover => "rover",
            Capability::Json => "json",
            Capability::Output => "output",
        }
    }

    /// Global names visible to every program.
    pub fn global(name: &str) -> Option<Capability> {
        match name {
            "context" => Some(Capability::Context),
            "roverApi" => Some(Capability::RoverApi),
            "lib" => Some(Capability::Lib),
            "memory" => Some(Capability::Memory),
            "rover" => Some(Capability::Rover),
            "json" => Some(Capability::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JavaScript `undefined`.
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Record(BTreeMap<String, Value>),
    Capability(Capability),
    /// A capability method read without calling it.
    Function { owner: Capability, name: String },
}

impl Value {
    pub fn str(s: impl Into<String>) -> Value {
        Value::String(s.into())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Record(_) => "record",
            Value::Capability(_) => "object",
            Value::Function { .. } => "function",
        }
    }

    /// JavaScript truthiness.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::List(_) | Value::Record(_) | Value::Capability(_) | Value::Function { .. } => {
                true
            }
        }
    }

    /// JavaScript `ToNumber`.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse().unwrap_or(f64::NAN)
                }
            }
            Value::List(items) if items.is_empty() => 0.0,
            Value::List(items) if items.len() == 1 => items[0].to_number(),
            _ => f64::NAN,
        }
    }

    /// Loose equality (`==`).
    ///
    /// Lists and records compare structurally.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Nil, _) | (_, Value::Nil) => false,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(_), Value::String(_) | Value::Bool(_))
            | (Value::String(_) | Value::Bool(_), Value::Number(_))
            | (Value::String(_), Value::Bool(_))
            | (Value::Bool(_), Value::String(_)) => self.to_number() == other.to_number(),
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            (Value::Record(a), Value::Record(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| b.get(k).is_some_and(|w| v.loose_eq(w)))
            }
            (Value::Capability(a), Value::Capability(b)) => a == b,
            (
                Value::Function { owner: oa, name: na },
                Value::Function { owner: ob, name: nb },
            ) => oa == ob && na == nb,
            _ => false,
        }
    }

    // ── JSON ──────────────────────────────────────────────────────────────

    /// Convert to JSON. Capabilities, functions and non-finite numbers
    /// become `null`; integral numbers are written without a fraction.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as J;
        match self {
            Value::Nil | Value::Capability(_) | Value::Function { .. } => J::Null,
            Value::Bool(b) => J::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => J::String(s.clone()),
            Value::List(items) => J::Array(items.iter().map(Value::to_json).collect()),
            Value::Record(fields) => J::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    pub fn from_json(json: &serde_json::Value) -> Value {
        use serde_json::Value as J;
        match json {
            J::Null => Value::Nil,
            J::Bool(b) => Value::Bool(*b),
            J::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            J::String(s) => Value::String(s.clone()),
            J::Array(items) => Value::List(items.iter().map(Value::from_json).collect()),
            J::Object(fields) => Value::Record(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

/// Format a number the way JavaScript's `String(n)` does for the values
/// scripts produce.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Display string used by `Write` and string concatenation.
///
/// Records render as JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("undefined"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => f.write_str(s),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if *item != Value::Nil {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Value::Record(_) => f.write_str(&self.to_json().to_string()),
            Value::Capability(_) => f.write_str("[object Object]"),
            Value::Function { name, .. } => write!(f, "function {name}() {{ [native code] }}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(!Value::str("").is_truthy());
        assert!(Value::str("0").is_truthy());
        assert!(Value::Record(BTreeMap::new()).is_truthy());
    }

    #[test]
    fn numeric_string_equals_number() {
        assert!(Value::str("5").loose_eq(&Value::Number(5.0)));
        assert!(Value::Number(0.0).loose_eq(&Value::str("")));
        assert!(!Value::str("abc").loose_eq(&Value::Number(0.0)));
        assert!(!Value::Nil.loose_eq(&Value::Number(0.0)));
    }

    #[test]
    fn number_display() {
        assert_eq!(Value::Number(3.0).to_string(), "3");
        assert_eq!(Value::Number(-2.5).to_string(), "-2.5");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::Number(f64::INFINITY).to_string(), "Infinity");
    }

    #[test]
    fn record_displays_as_json() {
        let mut fields = BTreeMap::new();
        fields.insert("x".to_string(), Value::Number(1.0));
        fields.insert("tag".to_string(), Value::str("a"));
        assert_eq!(Value::Record(fields).to_string(), r#"{"tag":"a","x":1}"#);
    }

    #[test]
    fn json_round_trip_keeps_integers() {
        let json: serde_json::Value = serde_json::from_str(r#"{"n":2,"f":1.5,"l":[true,null]}"#).unwrap();
        let value = Value::from_json(&json);
        assert_eq!(value.to_json(), json);
    }
}
