use serde::{Deserialize, Serialize};

use super::{card, container, date_axis, grid, margin, tooltip_style, value_axis, CHART_HEIGHT};
use crate::core::models::points::CostTrendPoint;
use crate::core::models::value::ChartValue;
use crate::core::models::view::{
    AreaSeries, Card, ChartCanvas, ChartKind, Curve, Fill, GradientStop, LabelPosition,
    LinearGradient, ReferenceLabel, ReferenceLine, Series, TickFormat, Tooltip, TooltipEntry,
    TooltipFormat, TooltipItem,
};
use crate::core::theme::Theme;

pub const DEFAULT_TITLE: &str = "Cost Trend";
pub const BUDGET_LABEL: &str = "Budget";

const GRADIENT_ID: &str = "colorCost";
const Y_AXIS_WIDTH: u32 = 60;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostTrendProps {
    pub data: Vec<CostTrendPoint>,
    /// Draws a dashed threshold when set to a non-zero number
    #[serde(default)]
    pub budget_line: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
}

/// Area chart of spend over time, with an optional budget line.
pub fn cost_trend_chart(props: &CostTrendProps, theme: &Theme) -> Card {
    let data = &props.data;

    let tooltip_items = data
        .iter()
        .map(|point| {
            let (value, name) = TooltipFormat::Cost.apply(&ChartValue::Number(point.cost), "cost");
            TooltipItem {
                label: TickFormat::Date.apply(&ChartValue::from(point.date.as_str())),
                entries: vec![TooltipEntry { name, value }],
            }
        })
        .collect();

    let canvas = ChartCanvas {
        kind: ChartKind::Area,
        height: CHART_HEIGHT,
        container: container(),
        margin: margin(),
        grid: grid(theme),
        x_axis: date_axis(data.iter().map(|p| p.date.as_str())),
        y_axis: value_axis(TickFormat::Currency, Y_AXIS_WIDTH),
        tooltip: Tooltip {
            formatter: TooltipFormat::Cost,
            label_format: TickFormat::Date,
            content_style: tooltip_style(theme),
            items: tooltip_items,
        },
        legend: None,
        gradients: vec![cost_gradient(theme)],
        series: vec![Series::Area(AreaSeries {
            data_key: "cost".to_string(),
            curve: Curve::Monotone,
            stroke: theme.primary,
            stroke_width: 2,
            fill: Fill::Gradient {
                id: GRADIENT_ID.to_string(),
            },
            fill_opacity: 1.0,
            values: data.iter().map(|p| p.cost).collect(),
        })],
        reference_lines: budget_reference_line(props.budget_line, theme)
            .into_iter()
            .collect(),
    };

    card(
        props.title.as_deref(),
        DEFAULT_TITLE,
        props.class_name.as_deref(),
        theme,
        canvas,
    )
}

/// Dashed "Budget" line at `budget`. Zero, NaN and `None` draw nothing.
pub fn budget_reference_line(budget: Option<f64>, theme: &Theme) -> Option<ReferenceLine> {
    let y = budget.filter(|b| *b != 0.0 && !b.is_nan())?;
    Some(ReferenceLine {
        y,
        stroke: theme.destructive,
        stroke_dasharray: "5 5".to_string(),
        label: ReferenceLabel {
            value: BUDGET_LABEL.to_string(),
            position: LabelPosition::Right,
            fill: theme.destructive,
            font_size: 12,
        },
    })
}

/// Primary at 30% near the line fading out toward the baseline.
fn cost_gradient(theme: &Theme) -> LinearGradient {
    LinearGradient {
        id: GRADIENT_ID.to_string(),
        x1: 0.0,
        y1: 0.0,
        x2: 0.0,
        y2: 1.0,
        stops: vec![
            GradientStop {
                offset_percent: 5,
                color: theme.primary,
                opacity: 0.3,
            },
            GradientStop {
                offset_percent: 95,
                color: theme.primary,
                opacity: 0.0,
            },
        ],
    }
}
