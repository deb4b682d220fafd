use serde::{Deserialize, Deserializer, Serialize};

use super::value::parse_numeric_text;
use crate::core::formatter::number_to_string;

/// One day (or other bucket) of spend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostTrendPoint {
    /// ISO-8601 date or any parseable date label
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: String,
    /// Cost in dollars
    #[serde(default = "missing_number", deserialize_with = "lenient_number")]
    pub cost: f64,
}

/// Input/output token counts for one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenUsagePoint {
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: String,
    #[serde(default = "missing_number", deserialize_with = "lenient_number")]
    pub input: f64,
    #[serde(default = "missing_number", deserialize_with = "lenient_number")]
    pub output: f64,
}

impl CostTrendPoint {
    pub fn new(date: impl Into<String>, cost: f64) -> Self {
        Self {
            date: date.into(),
            cost,
        }
    }
}

impl TokenUsagePoint {
    pub fn new(date: impl Into<String>, input: f64, output: f64) -> Self {
        Self {
            date: date.into(),
            input,
            output,
        }
    }

    pub fn total(&self) -> f64 {
        self.input + self.output
    }
}

fn missing_number() -> f64 {
    f64::NAN
}

/// Numbers pass through, numeric strings are parsed, everything else is NaN.
fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        serde_json::Value::String(s) => parse_numeric_text(&s),
        _ => f64::NAN,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        serde_json::Value::Number(n) => number_to_string(n.as_f64().unwrap_or(f64::NAN)),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_point_from_json() {
        let point: CostTrendPoint =
            serde_json::from_str(r#"{"date":"2024-01-01","cost":950}"#).unwrap();
        assert_eq!(point, CostTrendPoint::new("2024-01-01", 950.0));
    }

    #[test]
    fn non_numeric_cost_becomes_nan() {
        let point: CostTrendPoint =
            serde_json::from_str(r#"{"date":"2024-01-01","cost":"n/a"}"#).unwrap();
        assert!(point.cost.is_nan());

        let point: CostTrendPoint = serde_json::from_str(r#"{"date":"2024-01-01"}"#).unwrap();
        assert!(point.cost.is_nan());
    }

    #[test]
    fn numeric_strings_are_parsed() {
        let point: TokenUsagePoint =
            serde_json::from_str(r#"{"date":"2024-01-01","input":"1500","output":250}"#)
                .unwrap();
        assert_eq!(point.input, 1500.0);
        assert_eq!(point.total(), 1750.0);
    }

    #[test]
    fn negative_tokens_pass_through() {
        let point: TokenUsagePoint =
            serde_json::from_str(r#"{"date":"2024-01-01","input":-5,"output":10}"#).unwrap();
        assert_eq!(point.input, -5.0);
    }

    #[test]
    fn non_string_date_is_stringified() {
        let point: CostTrendPoint = serde_json::from_str(r#"{"date":20240101,"cost":1}"#).unwrap();
        assert_eq!(point.date, "20240101");

        let point: CostTrendPoint = serde_json::from_str(r#"{"date":null,"cost":1}"#).unwrap();
        assert_eq!(point.date, "");
    }
}
