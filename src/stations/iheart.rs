use reqwest::{
    Client,
    header::{HeaderValue, ORIGIN},
};
use scraper::{Html, Selector};

use super::{StationError, header_map, starts_with_any};
use crate::{config::IHeartConfig, types::ScrapedSong};

/// Songs found on one HTML page and the token for the next one, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub songs: Vec<ScrapedSong>,
    pub next_page_token: Option<String>,
}

/// Reads every `alt="Title - Artist"` attribute in `html`.
///
/// Texts that do not split into exactly two parts are logos or artwork
/// captions and are ignored, as are artists starting with `skip_prefixes`.
pub fn parse_page(html: &str, skip_prefixes: &[String]) -> Result<Page, String> {
    let document = Html::parse_document(html);
    let alt_selector = Selector::parse("[alt]").map_err(|e| e.to_string())?;
    let token_selector = Selector::parse("[data-nextpagetoken]").map_err(|e| e.to_string())?;

    let songs = document
        .select(&alt_selector)
        .filter_map(|element| element.value().attr("alt"))
        .filter_map(|alt| {
            let parts: Vec<&str> = alt.split(" - ").map(str::trim).collect();
            match parts.as_slice() {
                [title, artist] if !title.is_empty() && !artist.is_empty() => {
                    Some(ScrapedSong::new(*artist, *title))
                }
                _ => None,
            }
        })
        .filter(|song| !starts_with_any(&song.artist, skip_prefixes))
        .collect();

    let next_page_token = document
        .select(&token_selector)
        .filter_map(|element| element.value().attr("data-nextpagetoken"))
        .map(str::to_string)
        .find(|token| !token.is_empty());

    Ok(Page {
        songs,
        next_page_token,
    })
}

/// Fetches the recently-played page, then one "load more" page when the first
/// page hands out a continuation token.
pub async fn fetch(
    client: &Client,
    station: &str,
    config: &IHeartConfig,
) -> Result<Vec<ScrapedSong>, StationError> {
    let page_url = config.page_url(station);
    let html = client
        .get(&page_url)
        .headers(header_map(&config.headers, &page_url))
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| StationError::http(station, e))?
        .text()
        .await
        .map_err(|e| StationError::http(station, e))?;

    let first = parse_page(&html, &config.skip_prefixes)
        .map_err(|e| StationError::payload(station, e))?;
    let mut songs = first.songs;

    let Some(token) = first.next_page_token else {
        return Ok(songs);
    };

    let mut headers = header_map(&config.headers, &page_url);
    if let Ok(origin) = HeaderValue::from_str(&config.origin(station)) {
        headers.insert(ORIGIN, origin);
    }

    let more = client
        .post(config.load_more_url(station))
        .headers(headers)
        .form(&[
            ("nextPageToken", token),
            ("template", "playlist".to_string()),
            ("offset", "0".to_string()),
            ("limit", config.load_more_limit.to_string()),
        ])
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| StationError::http(station, e))?
        .text()
        .await
        .map_err(|e| StationError::http(station, e))?;

    let next = parse_page(&more, &config.skip_prefixes)
        .map_err(|e| StationError::payload(station, e))?;
    songs.extend(next.songs);

    Ok(songs)
}
