use reqwest::Client;

use super::send_with_retry;
use crate::{
    config, dedup,
    types::{SearchResponse, SearchTrack},
};

const SEARCH_LIMIT: u32 = 10;

/// Picks the first hit whose artists contain `artist` and whose name contains
/// `title`, both compared folded.
///
/// Search results are ranked fuzzily and often lead with covers or karaoke
/// versions, so the top hit alone is not trusted.
pub fn pick_match<'a>(
    tracks: &'a [SearchTrack],
    artist: &str,
    title: &str,
) -> Option<&'a SearchTrack> {
    let artist = dedup::fold(artist);
    let title = dedup::fold(title);

    tracks.iter().find(|track| {
        let artists = track
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        dedup::fold(&artists).contains(&artist) && dedup::fold(&track.name).contains(&title)
    })
}

/// Resolves a song to its track URI, or `None` when the catalog has no
/// matching track.
pub async fn find_track(
    token: &str,
    artist: &str,
    title: &str,
) -> Result<Option<String>, reqwest::Error> {
    let client = Client::new();
    let api_url = format!("{uri}/search", uri = config::spotify_apiurl());
    let query = format!("{} {}", artist, title);
    let limit = SEARCH_LIMIT.to_string();

    let response = send_with_retry(|| {
        client.get(&api_url).bearer_auth(token).query(&[
            ("q", query.as_str()),
            ("type", "track"),
            ("limit", limit.as_str()),
        ])
    })
    .await?;

    let result = response.json::<SearchResponse>().await?;
    Ok(pick_match(&result.tracks.items, artist, title).map(|t| t.uri.clone()))
}
