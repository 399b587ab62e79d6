//! Lenient numeric fields
//!
//! Bodies are written by hand, by older app versions and by shortcuts, so
//! numbers show up as JSON numbers, numeric strings or `null`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A number that may have been stored as text (`"8,412"`, `"7.5"`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberLike {
    Number(f64),
    Text(String),
}

impl NumberLike {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumberLike::Number(n) => Some(*n),
            NumberLike::Text(s) => parse_text(s),
        }
    }
}

impl From<f64> for NumberLike {
    fn from(value: f64) -> Self {
        NumberLike::Number(value)
    }
}

impl std::fmt::Display for NumberLike {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberLike::Number(n) => write!(f, "{}", n),
            NumberLike::Text(s) => write!(f, "{}", s),
        }
    }
}

fn parse_text(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Numeric value of a JSON value, if it has one
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_text(s),
        _ => None,
    }
}

pub fn option_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_f64))
}

pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(option_f64(deserializer)?.unwrap_or(0.0))
}

pub fn option_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(value_as_f64)
        .filter(|n| *n >= 0.0 && n.fract() == 0.0)
        .map(|n| n as u64))
}

/// Drops `NumberLike` values that are `null` on input
pub fn option_number_like<'de, D>(deserializer: D) -> Result<Option<NumberLike>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().map(NumberLike::Number),
        Some(Value::String(s)) => Some(NumberLike::Text(s)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "option_f64")]
        a: Option<f64>,
        #[serde(default, deserialize_with = "option_u64")]
        b: Option<u64>,
        #[serde(default, deserialize_with = "f64_or_zero")]
        c: f64,
    }

    fn probe(value: Value) -> Probe {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_numbers_and_strings() {
        let p = probe(json!({ "a": "7.5", "b": "3", "c": 250 }));
        assert_eq!(p.a, Some(7.5));
        assert_eq!(p.b, Some(3));
        assert_eq!(p.c, 250.0);
    }

    #[test]
    fn test_null_and_missing() {
        let p = probe(json!({ "a": null, "c": null }));
        assert_eq!(p.a, None);
        assert_eq!(p.b, None);
        assert_eq!(p.c, 0.0);
    }

    #[test]
    fn test_garbage_reads_as_absent() {
        let p = probe(json!({ "a": "lots", "b": 2.5, "c": true }));
        assert_eq!(p.a, None);
        assert_eq!(p.b, None);
        assert_eq!(p.c, 0.0);
    }

    #[test]
    fn test_number_like_text() {
        assert_eq!(NumberLike::Text("8,412".into()).as_f64(), Some(8412.0));
        assert_eq!(NumberLike::Text(" 7.25 ".into()).as_f64(), Some(7.25));
        assert_eq!(NumberLike::Text("n/a".into()).as_f64(), None);
        assert_eq!(NumberLike::from(3.0).as_f64(), Some(3.0));
    }
}
