use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::output::{to_json, OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::charts::{cost_trend_chart, token_usage_chart, CostTrendProps, TokenUsageProps};
use crate::core::data;
use crate::core::models::view::Card;
use crate::core::theme::Theme;

#[derive(Debug, Clone)]
pub struct CostArgs {
    pub file: PathBuf,
    pub budget: Option<f64>,
    pub title: Option<String>,
    pub class_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TokenArgs {
    pub file: PathBuf,
    pub title: Option<String>,
    pub class_name: Option<String>,
}

pub fn cost(args: CostArgs, theme: &Theme, opts: &OutputOptions) -> Result<()> {
    let data = data::load_cost_series(&args.file)
        .with_context(|| format!("Failed to load cost series from {}", args.file.display()))?;
    info!(points = data.len(), budget = ?args.budget, "rendering cost trend");

    let props = CostTrendProps {
        data,
        budget_line: args.budget,
        title: args.title,
        class_name: args.class_name,
    };
    let card = cost_trend_chart(&props, theme);
    println!("{}", render(&card, opts)?);
    Ok(())
}

pub fn tokens(args: TokenArgs, theme: &Theme, opts: &OutputOptions) -> Result<()> {
    let data = data::load_token_series(&args.file)
        .with_context(|| format!("Failed to load token series from {}", args.file.display()))?;
    info!(points = data.len(), "rendering token usage");

    let props = TokenUsageProps {
        data,
        title: args.title,
        class_name: args.class_name,
    };
    let card = token_usage_chart(&props, theme);
    println!("{}", render(&card, opts)?);
    Ok(())
}

fn render(card: &Card, opts: &OutputOptions) -> Result<String> {
    debug!(format = ?opts.format, width = opts.width, "rendering card");
    match opts.format {
        OutputFormat::Text => Ok(renderer::render_card(card, opts.width, opts.use_color)),
        OutputFormat::Json => to_json(card, opts.pretty).context("Failed to serialize chart"),
    }
}
