//! Render descriptions handed to a chart surface.
//!
//! Charts build one of these per render; a surface (the terminal renderer, or
//! anything consuming the JSON form) lays it out and draws it.

use serde::{Deserialize, Serialize};

use super::value::ChartValue;
use crate::core::formatter::{format_currency, format_date, format_number};
use crate::core::theme::Hsl;

/// Card shell: a title header above a bordered content region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub background: Hsl,
    pub border: Hsl,
    pub content: ChartCanvas,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Area,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartCanvas {
    pub kind: ChartKind,
    /// Fixed height in logical units
    pub height: u32,
    pub container: ResponsiveContainer,
    pub margin: Margin,
    pub grid: Grid,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub tooltip: Tooltip,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gradients: Vec<LinearGradient>,
    pub series: Vec<Series>,
    #[serde(default)]
    pub reference_lines: Vec<ReferenceLine>,
}

impl ChartCanvas {
    /// Number of x-axis buckets.
    pub fn len(&self) -> usize {
        self.x_axis.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_axis.ticks.is_empty()
    }
}

/// Fills its parent, sized in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsiveContainer {
    pub width_percent: u8,
    pub height_percent: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margin {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub stroke: Hsl,
    pub stroke_dasharray: String,
}

/// How an axis or tooltip label turns a raw value into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickFormat {
    Date,
    Currency,
    Compact,
}

impl TickFormat {
    pub fn apply(&self, value: &ChartValue) -> String {
        match self {
            Self::Date => format_date(value),
            Self::Currency => format_currency(value.to_number()),
            Self::Compact => format_number(value.to_number()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_key: Option<String>,
    pub tick_format: TickFormat,
    /// Category ticks in data order. Empty for a numeric axis, whose ticks
    /// are placed by the surface and formatted through `tick_format`.
    #[serde(default)]
    pub ticks: Vec<Tick>,
    pub font_size: u32,
    pub tick_line: bool,
    pub axis_line: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

impl Axis {
    pub fn format_tick(&self, value: &ChartValue) -> String {
        self.tick_format.apply(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub value: ChartValue,
    pub label: String,
}

/// Formatter hook for tooltip values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TooltipFormat {
    /// Currency amount labelled "Cost"
    Cost,
    /// Compact count labelled "Input Tokens" / "Output Tokens" by data key
    Tokens,
}

impl TooltipFormat {
    /// Returns `(value text, series label)`. Non-numeric values show as zero.
    pub fn apply(&self, value: &ChartValue, data_key: &str) -> (String, String) {
        let amount = value.coerce_number();
        match self {
            Self::Cost => (format_currency(amount), "Cost".to_string()),
            Self::Tokens => {
                let label = if data_key == "input" {
                    "Input Tokens"
                } else {
                    "Output Tokens"
                };
                (format_number(amount), label.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub formatter: TooltipFormat,
    pub label_format: TickFormat,
    pub content_style: TooltipStyle,
    /// One entry per data point, in data order
    pub items: Vec<TooltipItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipStyle {
    pub background: Hsl,
    pub border: Hsl,
    pub border_radius: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipItem {
    pub label: String,
    pub entries: Vec<TooltipEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipEntry {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub name: String,
    pub color: Hsl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    pub id: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stops: Vec<GradientStop>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset_percent: u8,
    pub color: Hsl,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Fill {
    Solid { color: Hsl },
    Gradient { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Curve {
    Monotone,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Series {
    Area(AreaSeries),
    Bar(BarSeries),
}

impl Series {
    pub fn data_key(&self) -> &str {
        match self {
            Self::Area(area) => &area.data_key,
            Self::Bar(bar) => &bar.data_key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaSeries {
    pub data_key: String,
    pub curve: Curve,
    pub stroke: Hsl,
    pub stroke_width: u32,
    pub fill: Fill,
    pub fill_opacity: f64,
    /// Raw values in data order; NaN is passed through untouched
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub data_key: String,
    /// Legend name
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_id: Option<String>,
    pub fill: Hsl,
    /// Corner radii: top-left, top-right, bottom-right, bottom-left
    pub radius: [u32; 4],
    pub segments: Vec<BarSegment>,
}

/// One series' slice of a bar. `top - base` is this series' value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarSegment {
    pub base: f64,
    pub top: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub y: f64,
    pub stroke: Hsl,
    pub stroke_dasharray: String,
    pub label: ReferenceLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPosition {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLabel {
    pub value: String,
    pub position: LabelPosition,
    pub fill: Hsl,
    pub font_size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_format_dispatch() {
        assert_eq!(TickFormat::Date.apply(&"2024-03-07".into()), "Mar 7");
        assert_eq!(TickFormat::Currency.apply(&1234.5.into()), "$1,235");
        assert_eq!(TickFormat::Compact.apply(&1500.0.into()), "1.5K");
    }

    #[test]
    fn tooltip_cost_coerces_non_numeric() {
        let (value, name) = TooltipFormat::Cost.apply(&"oops".into(), "cost");
        assert_eq!(value, "$0");
        assert_eq!(name, "Cost");
    }

    #[test]
    fn tooltip_tokens_names_by_data_key() {
        let (value, name) = TooltipFormat::Tokens.apply(&500_000.0.into(), "input");
        assert_eq!((value.as_str(), name.as_str()), ("500.0K", "Input Tokens"));

        let (value, name) = TooltipFormat::Tokens.apply(&ChartValue::Missing, "output");
        assert_eq!((value.as_str(), name.as_str()), ("0", "Output Tokens"));
    }

    #[test]
    fn series_serializes_with_type_tag() {
        let series = Series::Bar(BarSeries {
            data_key: "input".into(),
            name: "Input".into(),
            stack_id: Some("tokens".into()),
            fill: Hsl::new(0.0, 0.0, 0.0),
            radius: [0, 0, 0, 0],
            segments: vec![],
        });
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json["type"], "bar");
        assert_eq!(json["stack_id"], "tokens");
        assert_eq!(json["fill"], "hsl(0 0% 0%)");
    }
}
