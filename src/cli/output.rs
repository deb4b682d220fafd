use crossterm::tty::IsTty;
use serde::Serialize;

use crate::core::config::MIN_CHART_WIDTH;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub pretty: bool,
    pub use_color: bool,
    /// Total text width available to a chart
    pub width: usize,
}

/// `color_flag` is false under `--no-color`; `setting` is the config's
/// "auto" | "always" | "never".
pub fn detect_color(color_flag: bool, setting: &str) -> bool {
    if !color_flag {
        return false;
    }
    match setting {
        "never" => false,
        "always" => true,
        _ => std::env::var("NO_COLOR").is_err() && std::io::stdout().is_tty(),
    }
}

/// Configured width, narrowed to fit the terminal when there is one.
pub fn chart_width(configured: usize) -> usize {
    let width = match crossterm::terminal::size() {
        Ok((columns, _)) if columns > 0 => configured.min(columns as usize),
        _ => configured,
    };
    width.max(MIN_CHART_WIDTH)
}

pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_format_names() {
        assert_eq!(OutputFormat::parse("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("yaml"), None);
    }

    #[test]
    fn color_flag_and_setting() {
        assert!(!detect_color(false, "always"));
        assert!(detect_color(true, "always"));
        assert!(!detect_color(true, "never"));
    }

    #[test]
    fn chart_width_has_a_floor() {
        assert!(chart_width(1) >= MIN_CHART_WIDTH);
        assert!(chart_width(60) <= 60);
    }

    #[test]
    fn json_pretty_and_compact() {
        let value = serde_json::json!({ "a": 1 });
        assert_eq!(to_json(&value, false).unwrap(), r#"{"a":1}"#);
        assert!(to_json(&value, true).unwrap().contains('\n'));
    }
}
