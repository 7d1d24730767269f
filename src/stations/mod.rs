//! # Station scrapers
//!
//! Collects "recently played" songs from three families of radio station
//! sites:
//!
//! - [`cbs`] - JSON playlist endpoint paged backwards with a `before` time
//! - [`tunegenie`] - JSON now-playing endpoint queried per `since`/`until` window
//! - [`iheart`] - HTML page whose image `alt` texts carry `Title - Artist`,
//!   plus one "load more" request
//!
//! Every station runs in its own task. A failing station is reported and
//! skipped; the others still contribute.

pub mod cbs;
pub mod iheart;
pub mod tunegenie;
mod window;

pub use window::{TimeWindow, time_windows, time_windows_with};

use std::{collections::BTreeMap, time::Duration};

use chrono::Local;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderName, HeaderValue, REFERER},
};
use thiserror::Error;

use crate::{
    config::StationsConfig,
    types::{ScrapedSong, StationHaul},
    warning,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum StationError {
    #[error("request to {station} failed: {source}")]
    Http {
        station: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected payload from {station}: {reason}")]
    Payload { station: String, reason: String },
    #[error("task for {station} did not finish: {reason}")]
    Task { station: String, reason: String },
}

impl StationError {
    pub(crate) fn http(station: &str, source: reqwest::Error) -> Self {
        StationError::Http {
            station: station.to_string(),
            source,
        }
    }

    pub(crate) fn payload(station: &str, reason: impl ToString) -> Self {
        StationError::Payload {
            station: station.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub fn build_client() -> Result<Client, reqwest::Error> {
    Client::builder().timeout(REQUEST_TIMEOUT).build()
}

/// Turns configured headers into a [`HeaderMap`], adding `Referer`. Entries
/// that are not valid header names or values are skipped.
pub fn header_map(headers: &BTreeMap<String, String>, referer: &str) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) else {
            warning!("Ignoring invalid header {}", name);
            continue;
        };
        map.insert(name, value);
    }
    if let Ok(value) = HeaderValue::from_str(referer) {
        map.insert(REFERER, value);
    }
    map
}

pub(crate) fn starts_with_any(value: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|p| value.starts_with(p.as_str()))
}

/// Scrapes every configured station, or only the one named `only`.
///
/// Stations that fail are reported with a warning and contribute nothing.
pub async fn scrape_all(config: &StationsConfig, only: Option<&str>) -> Vec<StationHaul> {
    let client = match build_client() {
        Ok(client) => client,
        Err(e) => {
            warning!("Cannot build HTTP client: {}", e);
            return Vec::new();
        }
    };

    let wanted = |name: &str| only.is_none_or(|o| o.eq_ignore_ascii_case(name));
    let now = Local::now();
    let mut handles = Vec::new();

    for endpoint in config.cbs.stations.iter().filter(|s| wanted(&s.name)) {
        let client = client.clone();
        let endpoint = endpoint.clone();
        let headers = config.cbs.headers.clone();
        let windows = time_windows(now, config.steps, config.cbs.interval_hours);
        let name = endpoint.name.clone();
        let handle = tokio::spawn(async move {
            cbs::fetch(&client, &endpoint, &headers, &windows).await
        });
        handles.push((name, handle));
    }

    for endpoint in config.tunegenie.stations.iter().filter(|s| wanted(&s.name)) {
        let client = client.clone();
        let endpoint = endpoint.clone();
        let tunegenie = config.tunegenie.clone();
        let windows = time_windows(now, config.steps, config.tunegenie.interval_hours);
        let name = endpoint.name.clone();
        let handle = tokio::spawn(async move {
            tunegenie::fetch(&client, &endpoint, &tunegenie, &windows).await
        });
        handles.push((name, handle));
    }

    for station in config.iheart.stations.iter().filter(|s| wanted(s)) {
        let client = client.clone();
        let station = station.clone();
        let iheart = config.iheart.clone();
        let name = station.clone();
        let handle =
            tokio::spawn(async move { iheart::fetch(&client, &station, &iheart).await });
        handles.push((name, handle));
    }

    let mut hauls = Vec::new();
    for (station, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(StationError::Task {
                station: station.clone(),
                reason: e.to_string(),
            }),
        };

        match result {
            Ok(songs) => hauls.push(StationHaul { station, songs }),
            Err(e) => warning!("{}", e),
        }
    }

    hauls
}

/// Flattens per-station results into one list without exact duplicates.
pub fn merge_hauls(hauls: &[StationHaul]) -> Vec<ScrapedSong> {
    crate::dedup::unique_songs(
        hauls
            .iter()
            .flat_map(|h| h.songs.iter().cloned())
            .collect(),
    )
}
