//! # Feed Loading
//!
//! Gets raw tide and marine payloads into the core types, from a file on
//! disk or over HTTP.
//!
//! ## Data Sources
//!
//! ### Tide extrema
//! - **Endpoint**: the beach backend's tide route, which proxies a
//!   third-party oceanographic provider and refreshes every few hours
//! - **Format**: JSON array of `{ time, type, height }`, or an object with
//!   that array under `extremes`
//!
//! ### Marine conditions
//! - **URL**: Open-Meteo marine API for the configured coordinates
//! - **Format**: hourly parallel arrays plus a `current` snapshot, times in GMT
//!
//! ## Error Handling
//!
//! Failure modes surface through [`FeedError`]:
//! - **Network**: connection failures, timeouts and non-2xx statuses
//! - **Parse**: payloads that are not the expected JSON shape
//! - **File system**: unreadable local feed files
//!
//! The binary logs these and renders the report without the missing data.
//! Staleness, retries and caching are left to whatever serves the feeds.

use crate::config::Config;
use crate::marine::MarineFeed;
use crate::tides::TideTable;
use crate::TideExtremum;
use log::{debug, info};
use serde::Deserialize;
use std::{fs, io, path::Path, time::Duration};
use thiserror::Error;

/// Errors that can occur while loading a feed.
#[derive(Error, Debug)]
pub enum FeedError {
    /// HTTP request failed (network, server, or protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Payload was not valid JSON of the expected shape
    #[error("malformed feed: {0}")]
    Json(#[from] serde_json::Error),

    /// Local feed file could not be read
    #[error("feed IO: {0}")]
    Io(#[from] io::Error),
}

/// HTTP timeout for a single feed request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const MARINE_VARIABLES: &str = "wave_height,wave_period,wave_direction";

/// Both shapes the tide endpoint has served.
#[derive(Deserialize)]
#[serde(untagged)]
enum TidePayload {
    List(Vec<TideExtremum>),
    Wrapped { extremes: Vec<TideExtremum> },
}

/// Parse a tide payload into a time-ordered table.
pub fn parse_tides(json: &str) -> Result<TideTable, FeedError> {
    let extrema = match serde_json::from_str::<TidePayload>(json)? {
        TidePayload::List(extrema) => extrema,
        TidePayload::Wrapped { extremes } => extremes,
    };
    debug!("parsed {} tide extrema", extrema.len());
    Ok(TideTable::sorted(extrema))
}

pub fn parse_marine(json: &str) -> Result<MarineFeed, FeedError> {
    Ok(serde_json::from_str(json)?)
}

/// Read a tide feed saved to disk.
pub fn load_tides<P: AsRef<Path>>(path: P) -> Result<TideTable, FeedError> {
    parse_tides(&fs::read_to_string(path)?)
}

/// Read a marine feed saved to disk.
pub fn load_marine<P: AsRef<Path>>(path: P) -> Result<MarineFeed, FeedError> {
    parse_marine(&fs::read_to_string(path)?)
}

/// Query parameters for the marine API request.
pub fn marine_query(config: &Config) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", config.beach.latitude.to_string()),
        ("longitude", config.beach.longitude.to_string()),
        ("hourly", MARINE_VARIABLES.to_string()),
        ("current", MARINE_VARIABLES.to_string()),
        ("timezone", "GMT".to_string()),
    ]
}

fn client() -> Result<reqwest::Client, FeedError> {
    Ok(reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Fetch hourly and current marine conditions for the configured beach.
///
/// # Example
/// ```no_run
/// use cape_surf_lib::config::Config;
/// use cape_surf_lib::feed::fetch_marine;
/// use cape_surf_lib::marine::MarineFeed;
///
/// # async fn run() {
/// let feed = fetch_marine(&Config::default()).await.unwrap_or_else(|err| {
///     eprintln!("Failed to fetch marine data: {}", err);
///     MarineFeed::default()
/// });
/// # }
/// ```
pub async fn fetch_marine(config: &Config) -> Result<MarineFeed, FeedError> {
    info!("Fetching marine conditions for {}", config.beach.name);
    let body = client()?
        .get(&config.sources.marine_api_base)
        .query(&marine_query(config))
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    parse_marine(&body)
}

/// Fetch tide extrema from the backend tide endpoint.
pub async fn fetch_tides(config: &Config) -> Result<TideTable, FeedError> {
    info!("Fetching tide extrema from {}", config.sources.tides_url);
    let body = client()?
        .get(&config.sources.tides_url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    parse_tides(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TideKind;
    use tempfile::NamedTempFile;

    const TIDES_JSON: &str = r#"[
        { "time": "2026-10-14T06:21:00Z", "type": "low", "height": 0.31 },
        { "time": "2026-10-14T00:05:00Z", "type": "high", "height": 1.78 },
        { "time": "2026-10-14T12:40:00+00:00", "type": "high", "height": 1.69 }
    ]"#;

    #[test]
    fn test_parse_tides_sorts_feed() {
        let table = parse_tides(TIDES_JSON).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.extrema()[0].kind, TideKind::High);
        assert_eq!(table.extrema()[1].height, 0.31);
        assert!(table.alternates());
    }

    #[test]
    fn test_parse_tides_wrapped_shape() {
        let json = format!(r#"{{ "station": "Cape Town", "extremes": {TIDES_JSON} }}"#);
        assert_eq!(parse_tides(&json).unwrap().len(), 3);
    }

    #[test]
    fn test_parse_tides_rejects_garbage() {
        assert!(matches!(parse_tides("{\"oops\": true}"), Err(FeedError::Json(_))));
    }

    #[test]
    fn test_load_from_disk() {
        let tides = NamedTempFile::new().unwrap();
        fs::write(tides.path(), TIDES_JSON).unwrap();
        assert_eq!(load_tides(tides.path()).unwrap().len(), 3);

        let marine = NamedTempFile::new().unwrap();
        fs::write(marine.path(), r#"{ "current": { "wave_height": 1.2, "wave_period": 9.0 } }"#).unwrap();
        let feed = load_marine(marine.path()).unwrap();
        assert_eq!(feed.current.and_then(|c| c.wave_height), Some(1.2));

        assert!(matches!(load_tides("/nonexistent/tides.json"), Err(FeedError::Io(_))));
    }

    #[test]
    fn test_marine_query_uses_configured_beach() {
        let config = Config::default();
        let query = marine_query(&config);
        assert!(query.contains(&("latitude", "-34.1083".to_string())));
        assert!(query.contains(&("hourly", MARINE_VARIABLES.to_string())));
        assert!(query.contains(&("timezone", "GMT".to_string())));
    }
}
