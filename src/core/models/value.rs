use serde::{Deserialize, Serialize};

use crate::core::formatter::number_to_string;

/// A loosely-typed value handed to tick and tooltip formatters.
///
/// Rendering surfaces don't promise the type of what they pass to a formatter
/// hook, so formatters take this instead of a bare `&str` or `f64` and fall
/// back gracefully on the variants they don't expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartValue {
    Missing,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ChartValue {
    /// `Missing`, `false`, `0`, `NaN` and the empty string.
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Bool(b) => !b,
            Self::Number(n) => *n == 0.0 || n.is_nan(),
            Self::Text(s) => s.is_empty(),
        }
    }

    /// String form used when a label isn't text. `Missing` becomes "".
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Missing => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => number_to_string(*n),
            Self::Text(s) => s.clone(),
        }
    }

    /// Numeric conversion. Text is trimmed and parsed ("" is 0);
    /// anything unparseable or missing is NaN.
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Missing => f64::NAN,
            Self::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Number(n) => *n,
            Self::Text(s) => parse_numeric_text(s),
        }
    }

    /// Like [`to_number`](Self::to_number) but NaN and negative zero become 0.
    pub fn coerce_number(&self) -> f64 {
        let n = self.to_number();
        if n.is_nan() || n == 0.0 {
            0.0
        } else {
            n
        }
    }
}

pub(crate) fn parse_numeric_text(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    // Rust also accepts "inf" and "nan" spellings, which aren't numbers here.
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E'))
    {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

impl From<f64> for ChartValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for ChartValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ChartValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ChartValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<ChartValue>> From<Option<T>> for ChartValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Missing)
    }
}
