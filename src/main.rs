//! # Cape Surf Application Entry Point
//!
//! Loads configuration, obtains the tide and marine feeds (from files or
//! over HTTP), derives the current conditions and prints a report.

#[cfg(test)]
mod tests;

use cape_surf_lib::config::Config;
use cape_surf_lib::feed::{self, FeedError};
use cape_surf_lib::marine::MarineFeed;
use cape_surf_lib::report::{render_summary, render_tide_chart, render_window_table, Report};
use cape_surf_lib::tides::TideTable;
use chrono::Utc;
use clap::Parser;
use log::warn;
use std::path::PathBuf;

const CHART_ROWS: usize = 16;

#[derive(Parser)]
#[command(
    name = "cape-surf",
    version,
    about = "Tide and surf conditions for Cape Town beaches"
)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = cape_surf_lib::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Read tide extrema from a JSON file instead of the tide endpoint
    #[arg(long)]
    tides: Option<PathBuf>,

    /// Read the marine feed from a JSON file instead of the marine API
    #[arg(long)]
    marine: Option<PathBuf>,

    /// Hours in the wave forecast window (overrides config)
    #[arg(long)]
    window: Option<usize>,

    /// Start the window at the first hour in the feed rather than now
    #[arg(long)]
    no_anchor: bool,

    /// Also draw the ASCII tide chart
    #[arg(long)]
    chart: bool,

    /// Print derived values as JSON
    #[arg(long)]
    json: bool,
}

/// Log a feed failure and continue without that feed.
fn or_empty<T: Default>(result: Result<T, FeedError>, what: &str) -> T {
    result.unwrap_or_else(|error| {
        warn!("{what} feed unavailable: {error}");
        T::default()
    })
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = Config::load_from_path(&cli.config);
    if let Some(hours) = cli.window {
        config.display.window_hours = hours;
    }
    if cli.no_anchor {
        config.display.anchor_to_now = false;
    }

    // Only the HTTP feeds need the runtime
    let rt = tokio::runtime::Runtime::new()?;

    let (tides, marine): (TideTable, MarineFeed) = rt.block_on(async {
        let tides = match &cli.tides {
            Some(path) => feed::load_tides(path),
            None => feed::fetch_tides(&config).await,
        };
        let marine = match &cli.marine {
            Some(path) => feed::load_marine(path),
            None => feed::fetch_marine(&config).await,
        };
        (or_empty(tides, "tide"), or_empty(marine, "marine"))
    });

    let report = Report::build(&config, &tides, &marine, Utc::now());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", render_summary(&report));
    println!("{}", render_window_table(&report.window));
    if cli.chart {
        println!("{}", render_tide_chart(&report.curve, CHART_ROWS));
    }

    Ok(())
}
