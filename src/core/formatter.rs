use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

use crate::core::models::value::ChartValue;

/// Text shown for a date label that can't be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
];

/// ISO-8601 timestamps with an offset that RFC 3339 rejects: no seconds,
/// or a basic "+0530" offset. `%#z` also takes "Z".
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%dT%H:%M:%S%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Returns "$1,235" for 1234.5: US dollars, no cents, comma grouping.
/// Halves round away from zero. Negative amounts render as "-$12".
pub fn format_currency(value: f64) -> String {
    if value.is_nan() {
        return "$NaN".to_string();
    }
    let sign = if value.is_sign_negative() { "-" } else { "" };
    if value.is_infinite() {
        return format!("{}$∞", sign);
    }
    let whole = format!("{:.0}", value.abs().round());
    format!("{}${}", sign, group_thousands(&whole))
}

/// Compacts token counts: "2.5M", "1.5K", or the plain number below 1,000.
pub fn format_number(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{}M", to_fixed(value / 1_000_000.0, 1))
    } else if value >= 1_000.0 {
        format!("{}K", to_fixed(value / 1_000.0, 1))
    } else {
        number_to_string(value)
    }
}

/// Returns "Mar 7" for "2024-03-07".
///
/// Text labels are parsed as dates; an unparseable one renders as
/// [`INVALID_DATE`]. Other labels render as "" when falsy and as their
/// plain string form otherwise.
pub fn format_date(label: &ChartValue) -> String {
    match label {
        ChartValue::Text(text) => match parse_date_label(text) {
            Some(date) => format!("{} {}", date.format("%b"), date.day()),
            None => INVALID_DATE.to_string(),
        },
        other if other.is_falsy() => String::new(),
        other => other.to_display_string(),
    }
}

/// Calendar date of a label. Timestamps carrying an offset resolve to
/// their UTC date; everything else keeps the date as written.
pub fn parse_date_label(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for fmt in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, fmt) {
            return Some(dt.with_timezone(&Utc).date_naive());
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date);
        }
    }

    // "2024" is January 1st
    if text.len() == 4 && text.bytes().all(|b| b.is_ascii_digit()) {
        return text
            .parse()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
    }

    // "2024-03" means the first of the month
    NaiveDate::parse_from_str(&format!("{}-01", text), "%Y-%m-%d").ok()
}

/// Shortest string that reads back as the same number: "500", "1.5",
/// "1e+21". Zero of either sign is "0".
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let abs = value.abs();
    if (1e-6..1e21).contains(&abs) {
        return format!("{}", value);
    }

    let sci = format!("{:e}", value);
    match sci.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => sci,
    }
}

/// Fixed-point with `digits` decimals, exact ties rounding away from zero
/// (so 1.25 is "1.3", where `{:.1}` would give "1.2").
///
/// The decimal expansion is taken 64 places past the cut, which is exact for
/// any magnitude of at least 2^-11.
fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() || value.abs() >= 1e21 {
        return number_to_string(value);
    }

    let expanded = format!("{:.*}", digits + 64, value.abs());
    let (int_part, frac_part) = expanded
        .split_once('.')
        .unwrap_or((expanded.as_str(), ""));
    let (kept, rest) = frac_part.split_at(digits.min(frac_part.len()));
    let round_up = rest.bytes().next().is_some_and(|d| d >= b'5');

    let mut buf: Vec<u8> = int_part.bytes().chain(kept.bytes()).collect();
    if round_up {
        let mut i = buf.len();
        loop {
            if i == 0 {
                buf.insert(0, b'1');
                break;
            }
            i -= 1;
            if buf[i] == b'9' {
                buf[i] = b'0';
            } else {
                buf[i] += 1;
                break;
            }
        }
    }

    let split = buf.len() - kept.len();
    let whole: String = buf[..split].iter().map(|&b| b as char).collect();
    let frac: String = buf[split..].iter().map(|&b| b as char).collect();

    let sign = if value < 0.0 { "-" } else { "" };
    if frac.is_empty() {
        format!("{}{}", sign, whole)
    } else {
        format!("{}{}.{}", sign, whole, frac)
    }
}

/// "1234567" -> "1,234,567"
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_currency_rounds_to_whole_dollars() {
        assert_eq!(format_currency(1234.5), "$1,235");
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(950.0), "$950");
        assert_eq!(format_currency(1200.0), "$1,200");
        assert_eq!(format_currency(0.49), "$0");
        assert_eq!(format_currency(2.5), "$3");
    }

    #[test]
    fn format_currency_groups_large_values() {
        assert_eq!(format_currency(1_000.0), "$1,000");
        assert_eq!(format_currency(999_999.6), "$1,000,000");
        assert_eq!(format_currency(123_456_789.0), "$123,456,789");
    }

    #[test]
    fn format_currency_edge_values() {
        assert_eq!(format_currency(-12.4), "-$12");
        assert_eq!(format_currency(f64::NAN), "$NaN");
        assert_eq!(format_currency(f64::INFINITY), "$∞");
    }

    #[test]
    fn format_number_compacts() {
        assert_eq!(format_number(500.0), "500");
        assert_eq!(format_number(1500.0), "1.5K");
        assert_eq!(format_number(2_500_000.0), "2.5M");
        assert_eq!(format_number(500_000.0), "500.0K");
        assert_eq!(format_number(250_000.0), "250.0K");
    }

    #[test]
    fn format_number_thresholds() {
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1_000.0), "1.0K");
        assert_eq!(format_number(999_999.0), "1000.0K");
        assert_eq!(format_number(1_000_000.0), "1.0M");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(12.75), "12.75");
    }

    #[test]
    fn format_number_ties_round_up() {
        assert_eq!(format_number(1_250.0), "1.3K");
        assert_eq!(format_number(1_050_000.0), "1.1M");
        assert_eq!(format_number(1_949.0), "1.9K");
    }

    #[test]
    fn format_number_passes_odd_values_through() {
        assert_eq!(format_number(-2_000.0), "-2000");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn format_date_month_and_day() {
        assert_eq!(format_date(&"2024-03-07".into()), "Mar 7");
        assert_eq!(format_date(&"2024-01-01".into()), "Jan 1");
        assert_eq!(format_date(&"2024-12-25T18:30:00".into()), "Dec 25");
        assert_eq!(format_date(&"2024-02-01T23:30:00Z".into()), "Feb 1");
        assert_eq!(format_date(&"2024-02-01T23:30:00-05:00".into()), "Feb 2");
        assert_eq!(format_date(&"2024-06".into()), "Jun 1");
        assert_eq!(format_date(&"March 7, 2024".into()), "Mar 7");
        assert_eq!(format_date(&"Mar 7 2024".into()), "Mar 7");
        assert_eq!(format_date(&"2024".into()), "Jan 1");
    }

    #[test]
    fn format_date_short_iso_timestamps() {
        assert_eq!(format_date(&"2024-03-07T10:00Z".into()), "Mar 7");
        assert_eq!(format_date(&"2024-03-07T10:00:00+0530".into()), "Mar 7");
        assert_eq!(format_date(&"2024-03-07T02:00:00+0530".into()), "Mar 6");
        assert_eq!(format_date(&"2024-03-07T23:30-02:00".into()), "Mar 8");
        assert_eq!(format_date(&"2024-03-07T10:00:00.250+0100".into()), "Mar 7");
    }

    #[test]
    fn format_date_non_string_labels() {
        assert_eq!(format_date(&ChartValue::Missing), "");
        assert_eq!(format_date(&ChartValue::Number(0.0)), "");
        assert_eq!(format_date(&ChartValue::Bool(false)), "");
        assert_eq!(format_date(&ChartValue::Number(3.0)), "3");
        assert_eq!(format_date(&ChartValue::Bool(true)), "true");
    }

    #[test]
    fn format_date_unparseable_text() {
        assert_eq!(format_date(&"not a date".into()), INVALID_DATE);
        assert_eq!(format_date(&"".into()), INVALID_DATE);
    }

    #[test]
    fn number_to_string_matches_shortest_form() {
        assert_eq!(number_to_string(500.0), "500");
        assert_eq!(number_to_string(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(1.5e-7), "1.5e-7");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn to_fixed_carries() {
        assert_eq!(to_fixed(9.96, 1), "10.0");
        assert_eq!(to_fixed(0.04, 1), "0.0");
        assert_eq!(to_fixed(2.0, 0), "2");
    }

    #[test]
    fn group_thousands_boundaries() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("123456"), "123,456");
    }

    #[test]
    fn formatting_is_idempotent() {
        for v in [0.0, 950.0, 1234.5, 2_500_000.0] {
            assert_eq!(format_currency(v), format_currency(v));
            assert_eq!(format_number(v), format_number(v));
        }
    }
}
