use reqwest::Client;
use serde::Deserialize;

use super::{StationError, TimeWindow, header_map, starts_with_any};
use crate::{
    config::{StationEndpoint, TuneGenieConfig},
    types::ScrapedSong,
};

#[derive(Debug, Deserialize)]
struct NowPlayingResponse {
    #[serde(default)]
    response: Vec<NowPlayingEntry>,
}

#[derive(Debug, Deserialize)]
struct NowPlayingEntry {
    artist: Option<String>,
    song: Option<String>,
}

/// Extracts songs from a now-playing payload. Entries whose artist starts with
/// one of `skip_prefixes` are programme blocks, not songs.
pub fn parse_payload(
    body: &str,
    skip_prefixes: &[String],
) -> Result<Vec<ScrapedSong>, serde_json::Error> {
    let response: NowPlayingResponse = serde_json::from_str(body)?;
    Ok(response
        .response
        .into_iter()
        .filter_map(|entry| match (entry.artist, entry.song) {
            (Some(artist), Some(title)) if !artist.is_empty() && !title.is_empty() => {
                Some(ScrapedSong { artist, title })
            }
            _ => None,
        })
        .filter(|song| !starts_with_any(&song.artist, skip_prefixes))
        .collect())
}

pub async fn fetch(
    client: &Client,
    endpoint: &StationEndpoint,
    config: &TuneGenieConfig,
    windows: &[TimeWindow],
) -> Result<Vec<ScrapedSong>, StationError> {
    let headers = header_map(&config.headers, &endpoint.url);
    let mut handles = Vec::new();

    for window in windows {
        let request = client
            .get(&endpoint.url)
            .headers(headers.clone())
            .query(&[("since", window.since_param()), ("until", window.until_param())]);
        handles.push(tokio::spawn(async move {
            match request.send().await.and_then(|r| r.error_for_status()) {
                Ok(response) => response.text().await,
                Err(e) => Err(e),
            }
        }));
    }

    let mut songs = Vec::new();
    for handle in handles {
        let body = handle
            .await
            .map_err(|e| StationError::payload(&endpoint.name, e))?
            .map_err(|e| StationError::http(&endpoint.name, e))?;
        let page = parse_payload(&body, &config.skip_prefixes)
            .map_err(|e| StationError::payload(&endpoint.name, e))?;
        songs.extend(page);
    }

    Ok(songs)
}
