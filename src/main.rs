use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use tokencharts::cli;
use tokencharts::cli::chart_cmd::{CostArgs, TokenArgs};
use tokencharts::cli::output::{chart_width, detect_color, OutputFormat, OutputOptions};
use tokencharts::core::config::AppConfig;

#[derive(Parser)]
#[command(name = "tkc", about = "Cost and token usage charts", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text|json)
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Area chart of cost over time
    Cost {
        /// JSON array of {date, cost} points, or - for stdin
        file: PathBuf,

        /// Draw a budget threshold at this amount
        #[arg(short, long)]
        budget: Option<f64>,

        /// Card title (default: "Cost Trend")
        #[arg(short, long)]
        title: Option<String>,

        /// Style class carried into JSON output
        #[arg(long = "class")]
        class_name: Option<String>,
    },
    /// Stacked bar chart of input/output tokens over time
    Tokens {
        /// JSON array of {date, input, output} points, or - for stdin
        file: PathBuf,

        /// Card title (default: "Token Usage")
        #[arg(short, long)]
        title: Option<String>,

        /// Style class carried into JSON output
        #[arg(long = "class")]
        class_name: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate default config file
    Init,
    /// Validate config file
    Check,
    /// Print the config file path
    Path,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Config and output options shared by the chart commands.
fn chart_setup(cli: &Cli) -> anyhow::Result<(AppConfig, OutputOptions)> {
    let config = AppConfig::load().with_context(|| {
        format!(
            "Failed to load config from {}",
            AppConfig::config_path().display()
        )
    })?;
    for problem in config.validate() {
        warn!("{}", problem);
    }

    let format = if cli.json {
        OutputFormat::Json
    } else {
        match cli.format.as_deref() {
            Some(name) => match OutputFormat::parse(name) {
                Some(format) => format,
                None => bail!("Unknown format '{}' (expected text or json)", name),
            },
            None => {
                OutputFormat::parse(&config.settings.default_format).unwrap_or(OutputFormat::Text)
            }
        }
    };

    let output_opts = OutputOptions {
        format,
        pretty: cli.pretty,
        use_color: detect_color(!cli.no_color, &config.settings.color),
        width: chart_width(config.settings.chart_width),
    };
    Ok((config, output_opts))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Cost {
            file,
            budget,
            title,
            class_name,
        } => {
            let (config, output_opts) = chart_setup(&cli)?;
            let args = CostArgs {
                file: file.clone(),
                budget: *budget,
                title: title.clone(),
                class_name: class_name.clone(),
            };
            cli::chart_cmd::cost(args, &config.theme, &output_opts)?;
        }
        Commands::Tokens {
            file,
            title,
            class_name,
        } => {
            let (config, output_opts) = chart_setup(&cli)?;
            let args = TokenArgs {
                file: file.clone(),
                title: title.clone(),
                class_name: class_name.clone(),
            };
            cli::chart_cmd::tokens(args, &config.theme, &output_opts)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Init => cli::config_cmd::init()?,
            ConfigAction::Check => cli::config_cmd::check()?,
            ConfigAction::Path => cli::config_cmd::path()?,
        },
    }

    Ok(())
}
