//! # Configuration Management
//!
//! Loads settings from `cape-surf.toml`: which beach to report on, how times
//! are displayed, and where feeds come from. A missing or malformed file
//! never stops the tool; the defaults describe Muizenberg in SAST.

use crate::marine::{
    DisplayZone, WindowOptions, CAPE_TOWN_OFFSET_MINUTES, DEFAULT_TIME_FORMAT,
};
use chrono::Duration;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "cape-surf.toml";

/// Application configuration loaded from cape-surf.toml
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub beach: BeachConfig,
    pub display: DisplayConfig,
    pub sources: SourcesConfig,
}

/// The beach whose conditions are reported
#[derive(Debug, Deserialize, Serialize)]
pub struct BeachConfig {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Display and windowing configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Fixed display timezone as minutes east of UTC (SAST = 120)
    pub utc_offset_minutes: i32,
    /// chrono strftime pattern for displayed times
    pub time_format: String,
    /// Number of hourly wave records in the forecast window
    pub window_hours: usize,
    /// Start the window at the current hour rather than the first in the feed
    pub anchor_to_now: bool,
    /// Tide chart spans -window to +window hours around now
    pub chart_half_window_hours: i64,
    /// Tide chart sampling interval
    pub chart_step_minutes: i64,
}

/// Feed endpoints
#[derive(Debug, Deserialize, Serialize)]
pub struct SourcesConfig {
    /// Base URL of the marine-weather API
    pub marine_api_base: String,
    /// Backend endpoint returning tide extrema for the beach
    pub tides_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            beach: BeachConfig {
                name: "Muizenberg".to_string(),
                latitude: -34.1083,
                longitude: 18.4694,
            },
            display: DisplayConfig {
                utc_offset_minutes: CAPE_TOWN_OFFSET_MINUTES,
                time_format: DEFAULT_TIME_FORMAT.to_string(),
                window_hours: 24,
                anchor_to_now: true,
                chart_half_window_hours: 12,
                chart_step_minutes: 10,
            },
            sources: SourcesConfig {
                marine_api_base: "https://marine-api.open-meteo.com/v1/marine".to_string(),
                tides_url: "http://localhost:3001/api/tides".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from cape-surf.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!("Loaded configuration for beach: {}", config.beach.name);
                    config
                }
                Err(e) => {
                    warn!("Invalid config file format: {}", e);
                    warn!("Using default configuration (Muizenberg)");
                    Self::default()
                }
            },
            Err(_) => {
                info!(
                    "No config file at {}, using default configuration (Muizenberg)",
                    path.as_ref().display()
                );
                Self::default()
            }
        }
    }

    /// Save current configuration as pretty-printed TOML
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Display zone for formatted times.
    ///
    /// An invalid time format is replaced by `%H:%M` and an out-of-range
    /// offset by SAST; both are reported.
    pub fn display_zone(&self) -> DisplayZone {
        let time_format = if DisplayZone::is_valid_format(&self.display.time_format) {
            self.display.time_format.as_str()
        } else {
            warn!(
                "time_format {:?} is not a valid pattern; using {}",
                self.display.time_format, DEFAULT_TIME_FORMAT
            );
            DEFAULT_TIME_FORMAT
        };

        DisplayZone::from_offset_minutes(self.display.utc_offset_minutes, time_format)
            .unwrap_or_else(|| {
                warn!(
                    "utc_offset_minutes {} is out of range; using SAST",
                    self.display.utc_offset_minutes
                );
                DisplayZone::from_offset_minutes(CAPE_TOWN_OFFSET_MINUTES, time_format)
                    .unwrap_or_default()
            })
    }

    pub fn window_options(&self) -> WindowOptions {
        WindowOptions {
            size: self.display.window_hours,
            anchor_to_now: self.display.anchor_to_now,
        }
    }

    /// Half width of the tide chart; an unrepresentable value falls back to 12 hours.
    pub fn chart_half_window(&self) -> Duration {
        let hours = self.display.chart_half_window_hours;
        Duration::try_hours(hours).unwrap_or_else(|| {
            warn!("chart_half_window_hours {hours} is out of range; using 12");
            Duration::hours(12)
        })
    }

    /// Tide chart sampling interval; an unrepresentable value falls back to 10 minutes.
    pub fn chart_step(&self) -> Duration {
        let minutes = self.display.chart_step_minutes;
        Duration::try_minutes(minutes).unwrap_or_else(|| {
            warn!("chart_step_minutes {minutes} is out of range; using 10");
            Duration::minutes(10)
        })
    }
}
