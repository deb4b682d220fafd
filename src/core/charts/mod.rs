//! Dashboard chart components.
//!
//! Each component is a plain function from props and a [`Theme`] to a
//! [`Card`] description. Nothing is cached between calls.

pub mod cost_trend;
pub mod token_usage;

pub use cost_trend::{cost_trend_chart, CostTrendProps};
pub use token_usage::{token_usage_chart, TokenUsageProps};

use crate::core::models::value::ChartValue;
use crate::core::models::view::{
    Axis, Card, ChartCanvas, Grid, Margin, ResponsiveContainer, Tick, TickFormat, TooltipStyle,
};
use crate::core::theme::Theme;

/// Canvas height in logical units.
pub const CHART_HEIGHT: u32 = 250;

const AXIS_FONT_SIZE: u32 = 12;
const TOOLTIP_RADIUS: u32 = 6;

pub(crate) fn card(
    title: Option<&str>,
    default_title: &str,
    class_name: Option<&str>,
    theme: &Theme,
    content: ChartCanvas,
) -> Card {
    Card {
        title: title.unwrap_or(default_title).to_string(),
        class_name: class_name.map(str::to_string),
        background: theme.card,
        border: theme.border,
        content,
    }
}

pub(crate) fn container() -> ResponsiveContainer {
    ResponsiveContainer {
        width_percent: 100,
        height_percent: 100,
    }
}

pub(crate) fn margin() -> Margin {
    Margin {
        top: 10,
        right: 10,
        bottom: 0,
        left: 0,
    }
}

pub(crate) fn grid(theme: &Theme) -> Grid {
    Grid {
        stroke: theme.muted,
        stroke_dasharray: "3 3".to_string(),
    }
}

/// Category x-axis over the points' dates, labels in data order.
pub(crate) fn date_axis<'a>(dates: impl Iterator<Item = &'a str>) -> Axis {
    let ticks = dates
        .map(|date| {
            let value = ChartValue::from(date);
            let label = TickFormat::Date.apply(&value);
            Tick { value, label }
        })
        .collect();
    Axis {
        data_key: Some("date".to_string()),
        tick_format: TickFormat::Date,
        ticks,
        font_size: AXIS_FONT_SIZE,
        tick_line: false,
        axis_line: false,
        width: None,
    }
}

/// Numeric y-axis; the surface places the ticks.
pub(crate) fn value_axis(tick_format: TickFormat, width: u32) -> Axis {
    Axis {
        data_key: None,
        tick_format,
        ticks: Vec::new(),
        font_size: AXIS_FONT_SIZE,
        tick_line: false,
        axis_line: false,
        width: Some(width),
    }
}

pub(crate) fn tooltip_style(theme: &Theme) -> TooltipStyle {
    TooltipStyle {
        background: theme.card,
        border: theme.border,
        border_radius: TOOLTIP_RADIUS,
    }
}
