use colored::{control, Colorize};
use tracing::debug;

use crate::core::models::value::ChartValue;
use crate::core::models::view::{Card, ChartCanvas, LabelPosition, ReferenceLine, Series};

/// Plot rows above the baseline.
const PLOT_ROWS: usize = 8;
/// Y ticks including zero; one every `PLOT_ROWS / (Y_TICKS - 1)` rows.
const Y_TICKS: usize = 5;
const SERIES_GLYPHS: [char; 3] = ['█', '▓', '▒'];
const GRID_GLYPH: char = '┈';
const REFERENCE_GLYPH: char = '╌';

type Rgb = (u8, u8, u8);

/// Draw a chart card as terminal text.
///
/// Layout:
/// ```text
///  Cost Trend
///   $2,000 ┈┈┈┈┈┈┈┈┈┈┈┈┈┈┈┈┈┈┈┈
///
///   $1,500 ┈┈┈┈┈┈┈┈┈┈┈┈┈┈┈┈┈┈┈┈
///                    ▄▄▄▄▄▄▄▄▄▄
///   $1,000 ╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌ Budget
///          ████████████████████
///     $500 ████████████████████
///          ████████████████████
///       $0 ████████████████████
///          Jan 1     Feb 1
///
///   Jan 1  Cost $950
///   Feb 1  Cost $1,200
/// ```
pub fn render_card(card: &Card, width: usize, use_color: bool) -> String {
    control::set_override(use_color);

    let canvas = &card.content;
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!(" {}", card.title).bold().to_string());

    let ticks = y_ticks(canvas);
    let domain_max = ticks.last().copied().unwrap_or(1.0);
    let tick_labels: Vec<String> = ticks
        .iter()
        .map(|t| canvas.y_axis.format_tick(&ChartValue::Number(*t)))
        .collect();
    let label_width = tick_labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);

    let count = canvas.len();
    let plot_width = width.saturating_sub(label_width + 3).max(count).max(1);
    let col_width = if count == 0 {
        plot_width
    } else {
        (plot_width / count).max(1)
    };
    let used_width = if count == 0 {
        plot_width
    } else {
        col_width * count
    };

    for line in &canvas.reference_lines {
        if reference_row(line, domain_max).is_none() {
            debug!(
                y = line.y,
                label = %line.label.value,
                "reference line outside the plot, not drawn"
            );
        }
    }

    let grid_color = canvas.grid.stroke.to_rgb();
    let rows_per_tick = PLOT_ROWS / (Y_TICKS - 1);

    for row in (0..=PLOT_ROWS).rev() {
        let is_tick_row = row % rows_per_tick == 0;
        let label = if is_tick_row {
            tick_labels
                .get(row / rows_per_tick)
                .map(String::as_str)
                .unwrap_or("")
        } else {
            ""
        };

        let mut cells: Vec<String> = Vec::with_capacity(used_width);
        for col in 0..used_width.max(1) {
            let cell = if count == 0 {
                None
            } else {
                plot_cell(card, col / col_width, col % col_width, col_width, row, domain_max)
            };
            cells.push(match cell {
                Some((glyph, color)) => paint(&glyph.to_string(), color),
                None if is_tick_row => paint(&GRID_GLYPH.to_string(), grid_color),
                None => " ".to_string(),
            });
        }

        let mut suffix = String::new();
        for line in &canvas.reference_lines {
            if reference_row(line, domain_max) != Some(row) {
                continue;
            }
            let color = line.stroke.to_rgb();
            for cell in cells.iter_mut() {
                *cell = paint(&REFERENCE_GLYPH.to_string(), color);
            }
            let label_color = line.label.fill.to_rgb();
            match line.label.position {
                LabelPosition::Right => {
                    suffix.push(' ');
                    suffix.push_str(&paint(&line.label.value, label_color));
                }
                LabelPosition::Left => {
                    for (cell, ch) in cells.iter_mut().zip(line.label.value.chars()) {
                        *cell = paint(&ch.to_string(), label_color);
                    }
                }
            }
        }

        let separator = match (is_tick_row && canvas.y_axis.tick_line, canvas.y_axis.axis_line) {
            (true, _) => '┤',
            (false, true) => '│',
            _ => ' ',
        };
        lines.push(format!(
            "  {:>width$}{}{}{}",
            label,
            separator,
            cells.concat(),
            suffix,
            width = label_width
        ));
    }

    let indent = " ".repeat(label_width + 3);
    let x_labels = x_label_row(canvas, col_width);
    if !x_labels.trim().is_empty() {
        lines.push(format!("{}{}", indent, x_labels.trim_end()));
    }

    if let Some(legend) = &canvas.legend {
        let entries: Vec<String> = legend
            .entries
            .iter()
            .map(|entry| {
                format!(
                    "{} {}",
                    paint("■", entry.color.blend_over(&card.background)),
                    entry.name
                )
            })
            .collect();
        lines.push(format!("{}{}", indent, entries.join("  ")));
    }

    if !canvas.tooltip.items.is_empty() {
        lines.push(String::new());
        let date_width = canvas
            .tooltip
            .items
            .iter()
            .map(|item| item.label.chars().count())
            .max()
            .unwrap_or(0);
        for item in &canvas.tooltip.items {
            let entries: Vec<String> = item
                .entries
                .iter()
                .map(|e| format!("{} {}", e.name.cyan(), e.value))
                .collect();
            lines.push(format!(
                "  {:<width$}  {}",
                item.label,
                entries.join("   "),
                width = date_width
            ));
        }
    }

    lines.join("\n")
}

/// Y ticks from zero up to a 1/2/5 step that covers every drawn value,
/// including reference lines.
pub fn y_ticks(canvas: &ChartCanvas) -> Vec<f64> {
    let mut max = canvas
        .reference_lines
        .iter()
        .map(|line| line.y)
        .fold(0.0_f64, f64::max);
    for series in &canvas.series {
        match series {
            Series::Area(area) => {
                max = area.values.iter().copied().fold(max, f64::max);
            }
            Series::Bar(bar) => {
                for segment in &bar.segments {
                    max = max.max(segment.top).max(segment.base);
                }
            }
        }
    }

    let step = nice_step(max / (Y_TICKS - 1) as f64);
    (0..Y_TICKS).map(|i| step * i as f64).collect()
}

fn nice_step(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Glyph and color for one terminal cell of the plot, or `None` if empty.
fn plot_cell(
    card: &Card,
    index: usize,
    offset: usize,
    col_width: usize,
    row: usize,
    domain_max: f64,
) -> Option<(char, Rgb)> {
    if row == 0 {
        return baseline_cell(card, index, offset, col_width);
    }
    let top = domain_max * row as f64 / PLOT_ROWS as f64;
    let middle = domain_max * (row as f64 - 0.5) / PLOT_ROWS as f64;

    let mut bar_index = 0;
    for series in &card.content.series {
        match series {
            Series::Area(area) => {
                let value = *area.values.get(index)?;
                if value >= top {
                    return Some(('█', area.stroke.to_rgb()));
                }
                if value >= middle {
                    return Some(('▄', area.stroke.to_rgb()));
                }
            }
            Series::Bar(bar) => {
                let glyph = SERIES_GLYPHS[bar_index % SERIES_GLYPHS.len()];
                bar_index += 1;
                if col_width > 1 && offset == col_width - 1 {
                    continue;
                }
                let segment = bar.segments.get(index)?;
                let (low, high) = if segment.base <= segment.top {
                    (segment.base, segment.top)
                } else {
                    (segment.top, segment.base)
                };
                if middle >= low && middle <= high {
                    return Some((glyph, bar.fill.blend_over(&card.background)));
                }
            }
        }
    }
    None
}

/// The zero row shows the first series with a positive value at this bucket.
fn baseline_cell(card: &Card, index: usize, offset: usize, col_width: usize) -> Option<(char, Rgb)> {
    let mut bar_index = 0;
    for series in &card.content.series {
        match series {
            Series::Area(area) => {
                if area.values.get(index).is_some_and(|v| *v > 0.0) {
                    return Some(('█', area.stroke.to_rgb()));
                }
            }
            Series::Bar(bar) => {
                let glyph = SERIES_GLYPHS[bar_index % SERIES_GLYPHS.len()];
                bar_index += 1;
                if col_width > 1 && offset == col_width - 1 {
                    return None;
                }
                if bar.segments.get(index).is_some_and(|s| s.value > 0.0) {
                    return Some((glyph, bar.fill.blend_over(&card.background)));
                }
            }
        }
    }
    None
}

fn reference_row(line: &ReferenceLine, domain_max: f64) -> Option<usize> {
    if line.y.is_nan() || line.y <= 0.0 || domain_max <= 0.0 {
        return None;
    }
    let row = (line.y / domain_max * PLOT_ROWS as f64).round() as usize;
    (1..=PLOT_ROWS).contains(&row).then_some(row)
}

/// Category labels under their columns, skipping any that would overlap.
fn x_label_row(canvas: &ChartCanvas, col_width: usize) -> String {
    let mut buf: Vec<char> = Vec::new();
    let mut next_free = 0;
    for (i, tick) in canvas.x_axis.ticks.iter().enumerate() {
        let pos = i * col_width;
        if tick.label.is_empty() || pos < next_free {
            continue;
        }
        if buf.len() < pos {
            buf.resize(pos, ' ');
        }
        buf.extend(tick.label.chars());
        next_free = pos + tick.label.chars().count() + 1;
    }
    buf.into_iter().collect()
}

fn paint(text: &str, (r, g, b): Rgb) -> String {
    text.truecolor(r, g, b).to_string()
}
