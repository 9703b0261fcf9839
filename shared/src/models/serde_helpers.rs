//! Lenient serde helpers for numeric fields.
//!
//! Back-office clients send money figures as numbers, numeric strings, or
//! nothing at all. These deserializers coerce whatever arrives into a safe
//! value instead of failing the whole request: malformed input degrades to
//! zero, so a reconciliation screen can always render.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn coerce_amount(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

fn coerce_count(value: &Value) -> i64 {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i
            } else {
                let f = n.as_f64().unwrap_or(0.0);
                if f.is_finite() { f.trunc() as i64 } else { 0 }
            }
        }
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// Deserialize an amount field, coercing strings/null/garbage to a finite f64.
pub fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_amount(&value))
}

/// Deserialize a transaction-count field, coercing to an integer (base-10
/// parse semantics: fractional values truncate toward zero).
pub fn lenient_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_count(&value))
}

/// Deserialize an optional amount. A missing key stays `None` (field
/// unchanged in partial edits); a present-but-malformed value degrades to
/// `Some(0.0)`.
pub fn lenient_opt_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Some(coerce_amount(&value)))
}

/// Optional counterpart of [`lenient_count`].
pub fn lenient_opt_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Some(coerce_count(&value)))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "super::lenient_amount")]
        amount: f64,
        #[serde(default, deserialize_with = "super::lenient_count")]
        count: i64,
    }

    #[test]
    fn numbers_pass_through() {
        let p: Probe = serde_json::from_str(r#"{"amount": 150.75, "count": 12}"#).unwrap();
        assert_eq!(p.amount, 150.75);
        assert_eq!(p.count, 12);
    }

    #[test]
    fn numeric_strings_coerce() {
        let p: Probe = serde_json::from_str(r#"{"amount": "99.50", "count": "7"}"#).unwrap();
        assert_eq!(p.amount, 99.5);
        assert_eq!(p.count, 7);
    }

    #[test]
    fn garbage_degrades_to_zero() {
        let p: Probe = serde_json::from_str(r#"{"amount": "abc", "count": "xyz"}"#).unwrap();
        assert_eq!(p.amount, 0.0);
        assert_eq!(p.count, 0);
    }

    #[test]
    fn null_and_missing_degrade_to_zero() {
        let p: Probe = serde_json::from_str(r#"{"amount": null}"#).unwrap();
        assert_eq!(p.amount, 0.0);
        assert_eq!(p.count, 0);
    }

    #[test]
    fn negative_values_are_not_clamped() {
        // Corrections/refunds may be entered as negatives; they pass through.
        let p: Probe = serde_json::from_str(r#"{"amount": -25.0, "count": -3}"#).unwrap();
        assert_eq!(p.amount, -25.0);
        assert_eq!(p.count, -3);
    }

    #[test]
    fn fractional_counts_truncate() {
        let p: Probe = serde_json::from_str(r#"{"count": 3.9}"#).unwrap();
        assert_eq!(p.count, 3);
    }
}
