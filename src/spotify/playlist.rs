use chrono::{DateTime, Local};
use reqwest::Client;

use super::send_with_retry;
use crate::{
    config,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, GetUserPlaylistsResponse, PlaylistOccupancy,
    },
};

/// Spotify accepts at most this many URIs per add request.
pub const ADD_TRACKS_BATCH: usize = 100;

const PLAYLISTS_PAGE: usize = 50;

/// `<prefix><MMDDYYYYHHMMSS><micros>`, unique per creation.
pub fn new_playlist_name(prefix: &str, now: DateTime<Local>) -> String {
    format!("{}{}", prefix, now.format("%m%d%Y%H%M%S%6f"))
}

/// Creates a private playlist for the configured user.
pub async fn create(token: &str, name: String) -> Result<CreatePlaylistResponse, reqwest::Error> {
    let client = Client::new();
    let api_url = format!(
        "{uri}/users/{user}/playlists",
        uri = config::spotify_apiurl(),
        user = config::spotify_user()
    );
    let body = CreatePlaylistRequest {
        description: "Songs recently played on the radio, collected by sporadio.".to_string(),
        name,
        public: false,
        collaborative: false,
    };

    let response =
        send_with_retry(|| client.post(&api_url).bearer_auth(token).json(&body)).await?;
    response.json::<CreatePlaylistResponse>().await
}

/// Appends `uris` to a playlist in order, in batches of [`ADD_TRACKS_BATCH`].
///
/// Stops at the first failing batch; earlier batches stay applied.
pub async fn add_tracks(
    token: &str,
    playlist_id: &str,
    uris: &[String],
) -> Result<Vec<AddTrackToPlaylistResponse>, reqwest::Error> {
    let client = Client::new();
    let api_url = format!(
        "{uri}/playlists/{id}/tracks",
        uri = config::spotify_apiurl(),
        id = playlist_id
    );

    let mut snapshots = Vec::new();
    for chunk in uris.chunks(ADD_TRACKS_BATCH) {
        let body = AddTrackToPlaylistRequest {
            uris: chunk.to_vec(),
        };
        let response =
            send_with_retry(|| client.post(&api_url).bearer_auth(token).json(&body)).await?;
        snapshots.push(response.json::<AddTrackToPlaylistResponse>().await?);
    }

    Ok(snapshots)
}

/// Fill levels of the current user's playlists named `<prefix>...`, in the
/// order Spotify lists them.
pub async fn occupancy(token: &str, prefix: &str) -> Result<Vec<PlaylistOccupancy>, reqwest::Error> {
    let client = Client::new();
    let api_url = format!("{uri}/me/playlists", uri = config::spotify_apiurl());
    let limit = PLAYLISTS_PAGE.to_string();

    let mut playlists = Vec::new();
    let mut offset = 0;

    loop {
        let offset_param = offset.to_string();
        let response = send_with_retry(|| {
            client
                .get(&api_url)
                .bearer_auth(token)
                .query(&[("limit", limit.as_str()), ("offset", offset_param.as_str())])
        })
        .await?;
        let page = response.json::<GetUserPlaylistsResponse>().await?;
        let fetched = page.items.len();

        playlists.extend(
            page.items
                .into_iter()
                .filter(|p| p.name.starts_with(prefix))
                .map(|p| PlaylistOccupancy::new(p.id, p.tracks.total)),
        );

        if page.next.is_none() || fetched == 0 {
            break;
        }
        offset += fetched;
    }

    Ok(playlists)
}
