//! GasCast CLI: daily natural-gas trend forecast.
//!
//! Commands:
//! - `forecast` fetches the latest price, updates the history and writes the report
//! - `score` scores a stored history without fetching gas prices
//! - `accuracy` exports the rolling hit rate of a stored history
//!
//! With `sources.oil_symbol` set, every command scores with the oil term.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gascast_core::data::DataSource;
use gascast_core::score_with_oil;
use gascast_runner::{
    build_oil_source, build_sources, load_history, oil_changes_for, render_report,
    rolling_accuracy_with_oil, run_daily, write_accuracy_csv, ApiKeys, ForecastConfig,
    PriceSources, SavedForecast,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gascast", about = "Daily natural-gas trend forecast", version)]
struct Cli {
    /// Path to the TOML config. Missing file means defaults.
    #[arg(long, global = true, default_value = "gascast.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the latest price, update the history, score and write the report.
    Forecast {
        /// Use only the synthetic source (no network access).
        #[arg(long, default_value_t = false)]
        synthetic: bool,
    },
    /// Score a stored price history without fetching gas prices.
    Score {
        /// History CSV. Defaults to `paths.history` from the config.
        #[arg(long)]
        history: Option<PathBuf>,

        /// Print the result as JSON instead of the text report.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Export the rolling hit rate of a stored price history.
    Accuracy {
        /// History CSV. Defaults to `paths.history` from the config.
        #[arg(long)]
        history: Option<PathBuf>,

        /// Predictions per window. Defaults to `backtest.window`.
        #[arg(long)]
        window: Option<usize>,

        /// Evaluate every n-th window end. Defaults to `backtest.stride`.
        #[arg(long)]
        stride: Option<usize>,

        /// Output CSV. Defaults to `paths.accuracy`.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gascast=info,gascast_core=info,gascast_runner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ForecastConfig::load(&cli.config)
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;

    match cli.command {
        Commands::Forecast { synthetic } => run_forecast(&config, synthetic),
        Commands::Score { history, json } => {
            run_score(&config, history.as_deref().unwrap_or(&config.paths.history), json)
        }
        Commands::Accuracy {
            history,
            window,
            stride,
            output,
        } => run_accuracy(
            &config,
            history.as_deref().unwrap_or(&config.paths.history),
            window.unwrap_or(config.backtest.window),
            stride.unwrap_or(config.backtest.stride),
            output.as_deref().unwrap_or(&config.paths.accuracy),
        ),
    }
}

fn run_forecast(config: &ForecastConfig, synthetic: bool) -> Result<()> {
    let sources = if synthetic {
        PriceSources::synthetic(config)
    } else {
        build_sources(config, &ApiKeys::from_env())?
    };
    let outcome = run_daily(config, &sources, chrono::Local::now().naive_local())?;

    print!("{}", outcome.report);
    Ok(())
}

fn run_score(config: &ForecastConfig, history: &Path, json: bool) -> Result<()> {
    let series = load_history(history)?;
    let oil_source = build_oil_source(config)?;
    let oil = oil_changes_for(config, oil_source.as_deref(), &series);
    let result = score_with_oil(&series, &config.params, oil.as_deref());

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let saved = SavedForecast::new(
            result,
            chrono::Local::now().naive_local(),
            Some(DataSource::History),
            config.params.fingerprint(),
        );
        print!("{}", render_report(&saved, None));
    }
    Ok(())
}

fn run_accuracy(
    config: &ForecastConfig,
    history: &Path,
    window: usize,
    stride: usize,
    output: &Path,
) -> Result<()> {
    let series = load_history(history)?;
    let oil_source = build_oil_source(config)?;
    let oil = oil_changes_for(config, oil_source.as_deref(), &series);
    let points = rolling_accuracy_with_oil(&series, &config.params, oil.as_deref(), window, stride)?;
    write_accuracy_csv(output, &points)?;

    let mean = if points.is_empty() {
        None
    } else {
        Some(points.iter().map(|p| p.hit_rate).sum::<f64>() / points.len() as f64)
    };
    info!(points = points.len(), path = %output.display(), "accuracy written");
    match (mean, points.last()) {
        (Some(mean), Some(last)) => println!(
            "{} windows of {window} predictions: mean hit rate {mean:.2} %, latest {:.2} % ({})",
            points.len(),
            last.hit_rate,
            last.date
        ),
        _ => println!(
            "History of {} bars is too short for a window of {window}",
            series.len()
        ),
    }
    Ok(())
}
