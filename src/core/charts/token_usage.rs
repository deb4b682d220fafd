use serde::{Deserialize, Serialize};

use super::{card, container, date_axis, grid, margin, tooltip_style, value_axis, CHART_HEIGHT};
use crate::core::models::points::TokenUsagePoint;
use crate::core::models::value::ChartValue;
use crate::core::models::view::{
    BarSegment, BarSeries, Card, ChartCanvas, ChartKind, Legend, LegendEntry, Series, TickFormat,
    Tooltip, TooltipEntry, TooltipFormat, TooltipItem,
};
use crate::core::theme::Theme;

pub const DEFAULT_TITLE: &str = "Token Usage";
pub const STACK_ID: &str = "tokens";

const Y_AXIS_WIDTH: u32 = 50;
const OUTPUT_ALPHA: f64 = 0.5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsageProps {
    pub data: Vec<TokenUsagePoint>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
}

/// Stacked input/output bar per bucket.
pub fn token_usage_chart(props: &TokenUsageProps, theme: &Theme) -> Card {
    let data = &props.data;
    let (input_segments, output_segments) = stack_segments(data);

    let input_color = theme.primary;
    let output_color = theme.primary.with_alpha(OUTPUT_ALPHA);

    let tooltip_items = data
        .iter()
        .map(|point| TooltipItem {
            label: TickFormat::Date.apply(&ChartValue::from(point.date.as_str())),
            entries: [("input", point.input), ("output", point.output)]
                .into_iter()
                .map(|(key, amount)| {
                    let (value, name) = TooltipFormat::Tokens.apply(&ChartValue::Number(amount), key);
                    TooltipEntry { name, value }
                })
                .collect(),
        })
        .collect();

    let canvas = ChartCanvas {
        kind: ChartKind::Bar,
        height: CHART_HEIGHT,
        container: container(),
        margin: margin(),
        grid: grid(theme),
        x_axis: date_axis(data.iter().map(|p| p.date.as_str())),
        y_axis: value_axis(TickFormat::Compact, Y_AXIS_WIDTH),
        tooltip: Tooltip {
            formatter: TooltipFormat::Tokens,
            label_format: TickFormat::Date,
            content_style: tooltip_style(theme),
            items: tooltip_items,
        },
        legend: Some(Legend {
            entries: vec![
                LegendEntry {
                    name: "Input".to_string(),
                    color: input_color,
                },
                LegendEntry {
                    name: "Output".to_string(),
                    color: output_color,
                },
            ],
        }),
        gradients: Vec::new(),
        series: vec![
            Series::Bar(BarSeries {
                data_key: "input".to_string(),
                name: "Input".to_string(),
                stack_id: Some(STACK_ID.to_string()),
                fill: input_color,
                radius: [0, 0, 0, 0],
                segments: input_segments,
            }),
            Series::Bar(BarSeries {
                data_key: "output".to_string(),
                name: "Output".to_string(),
                stack_id: Some(STACK_ID.to_string()),
                fill: output_color,
                radius: [4, 4, 0, 0],
                segments: output_segments,
            }),
        ],
        reference_lines: Vec::new(),
    };

    card(
        props.title.as_deref(),
        DEFAULT_TITLE,
        props.class_name.as_deref(),
        theme,
        canvas,
    )
}

/// Input sits on the baseline, output on top of input. Values are stacked
/// as given, so negative or NaN counts produce odd but finite-length output.
fn stack_segments(data: &[TokenUsagePoint]) -> (Vec<BarSegment>, Vec<BarSegment>) {
    data.iter()
        .map(|point| {
            let input = BarSegment {
                base: 0.0,
                top: point.input,
                value: point.input,
            };
            let output = BarSegment {
                base: point.input,
                top: point.input + point.output,
                value: point.output,
            };
            (input, output)
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars(card: &Card) -> Vec<&BarSeries> {
        card.content
            .series
            .iter()
            .filter_map(|s| match s {
                Series::Bar(bar) => Some(bar),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn scenario_single_bucket() {
        let props = TokenUsageProps {
            data: vec![TokenUsagePoint::new("2024-01-01", 500_000.0, 250_000.0)],
            ..Default::default()
        };
        let card = token_usage_chart(&props, &Theme::default());
        let series = bars(&card);
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].segments[0].top, 750_000.0);

        let item = &card.content.tooltip.items[0];
        assert_eq!(item.label, "Jan 1");
        assert_eq!(
            item.entries,
            vec![
                TooltipEntry {
                    name: "Input Tokens".into(),
                    value: "500.0K".into()
                },
                TooltipEntry {
                    name: "Output Tokens".into(),
                    value: "250.0K".into()
                },
            ]
        );

        let legend: Vec<&str> = card
            .content
            .legend
            .as_ref()
            .unwrap()
            .entries
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(legend, vec!["Input", "Output"]);
    }

    #[test]
    fn segments_sum_to_total() {
        let data = vec![
            TokenUsagePoint::new("2024-01-01", 1_200.0, 300.0),
            TokenUsagePoint::new("2024-01-02", 0.0, 42.0),
            TokenUsagePoint::new("2024-01-03", 3_000_000.0, 1.0),
        ];
        let card = token_usage_chart(
            &TokenUsageProps {
                data: data.clone(),
                ..Default::default()
            },
            &Theme::default(),
        );
        let series = bars(&card);
        for (i, point) in data.iter().enumerate() {
            let input = series[0].segments[i];
            let output = series[1].segments[i];
            assert_eq!(input.value + output.value, point.total());
            assert_eq!(input.base, 0.0);
            assert_eq!(output.base, input.top);
            assert_eq!(output.top, point.total());
        }
    }

    #[test]
    fn both_series_share_one_stack() {
        let card = token_usage_chart(&TokenUsageProps::default(), &Theme::default());
        let series = bars(&card);
        assert!(series
            .iter()
            .all(|s| s.stack_id.as_deref() == Some(STACK_ID)));
        assert_eq!(series[0].radius, [0, 0, 0, 0]);
        assert_eq!(series[1].radius, [4, 4, 0, 0]);
        assert_eq!(series[1].fill.alpha, 0.5);
    }

    #[test]
    fn axis_and_title_defaults() {
        let card = token_usage_chart(&TokenUsageProps::default(), &Theme::default());
        assert_eq!(card.title, "Token Usage");
        assert_eq!(card.content.kind, ChartKind::Bar);
        assert_eq!(card.content.y_axis.tick_format, TickFormat::Compact);
        assert_eq!(card.content.y_axis.width, Some(50));
        assert!(!card.content.y_axis.axis_line);
        assert!(card.content.legend.is_some());
        assert!(card.content.reference_lines.is_empty());
    }

    #[test]
    fn empty_data_renders_empty_frame() {
        let card = token_usage_chart(&TokenUsageProps::default(), &Theme::default());
        assert!(card.content.is_empty());
        assert!(bars(&card).iter().all(|s| s.segments.is_empty()));
    }

    #[test]
    fn malformed_counts_do_not_panic() {
        let props = TokenUsageProps {
            data: vec![TokenUsagePoint::new("", f64::NAN, -10.0)],
            ..Default::default()
        };
        let card = token_usage_chart(&props, &Theme::default());
        let item = &card.content.tooltip.items[0];
        assert_eq!(item.entries[0].value, "0");
        assert_eq!(item.entries[1].value, "-10");
        assert_eq!(item.label, "Invalid Date");
    }

    #[test]
    fn rendering_is_idempotent() {
        let props = TokenUsageProps {
            data: vec![TokenUsagePoint::new("2024-01-01", 1.0, 2.0)],
            title: Some("Tokens".into()),
            class_name: None,
        };
        let theme = Theme::default();
        assert_eq!(
            token_usage_chart(&props, &theme),
            token_usage_chart(&props, &theme)
        );
    }
}
