use std::collections::BTreeMap;

use reqwest::Client;
use serde::Deserialize;

use super::{StationError, TimeWindow, header_map};
use crate::{config::StationEndpoint, types::ScrapedSong};

#[derive(Debug, Deserialize)]
struct PlaylistResponse {
    data: PlaylistData,
}

#[derive(Debug, Deserialize)]
struct PlaylistData {
    #[serde(rename = "recentEvents", default)]
    recent_events: Vec<RecentEvent>,
}

#[derive(Debug, Deserialize)]
struct RecentEvent {
    artist: Option<String>,
    title: Option<String>,
}

/// Extracts songs from one `recentEvents` payload. Events without both an
/// artist and a title (station IDs, ads) are skipped.
pub fn parse_payload(body: &str) -> Result<Vec<ScrapedSong>, serde_json::Error> {
    let response: PlaylistResponse = serde_json::from_str(body)?;
    Ok(response
        .data
        .recent_events
        .into_iter()
        .filter_map(|event| match (event.artist, event.title) {
            (Some(artist), Some(title)) if !artist.is_empty() && !title.is_empty() => {
                Some(ScrapedSong { artist, title })
            }
            _ => None,
        })
        .collect())
}

/// Requests one page per window, all at once, and concatenates the songs.
pub async fn fetch(
    client: &Client,
    endpoint: &StationEndpoint,
    headers: &BTreeMap<String, String>,
    windows: &[TimeWindow],
) -> Result<Vec<ScrapedSong>, StationError> {
    let headers = header_map(headers, &endpoint.url);
    let mut handles = Vec::new();

    for window in windows {
        let request = client
            .get(&endpoint.url)
            .headers(headers.clone())
            .query(&[
                ("action", "playlist".to_string()),
                ("type", "json".to_string()),
                ("before", window.until_param()),
            ]);
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
        let page = parse_payload(&body).map_err(|e| StationError::payload(&endpoint.name, e))?;
        songs.extend(page);
    }

    Ok(songs)
}
