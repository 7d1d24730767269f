use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// Raw token endpoint payload. `refresh_token` and `scope` are omitted on some
/// refresh responses.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

/// An artist/title pair as it came off a station page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScrapedSong {
    pub artist: String,
    pub title: String,
}

impl ScrapedSong {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }
}

/// Songs returned by one station.
#[derive(Debug, Clone)]
pub struct StationHaul {
    pub station: String,
    pub songs: Vec<ScrapedSong>,
}

/// One row of the local track cache.
///
/// `playlist_id` stays empty until the track has been placed in a playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub artist: String,
    pub title: String,
    pub catalog_id: String,
    pub timestamp: String,
    #[serde(default)]
    pub playlist_id: String,
}

/// Fill level of one playlist at allocation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistOccupancy {
    pub playlist_id: String,
    pub song_count: usize,
}

impl PlaylistOccupancy {
    pub fn new(playlist_id: impl Into<String>, song_count: usize) -> Self {
        Self {
            playlist_id: playlist_id.into(),
            song_count,
        }
    }
}

/// `slot_count` consecutive songs go to `playlist_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationChunk {
    pub playlist_id: String,
    pub slot_count: usize,
}

impl AllocationChunk {
    pub fn new(playlist_id: impl Into<String>, slot_count: usize) -> Self {
        Self {
            playlist_id: playlist_id.into(),
            slot_count,
        }
    }
}

/// Where playlist fill levels are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OccupancySource {
    /// Ask the catalog for the current track totals
    Remote,
    /// Count cached tracks per playlist
    Cache,
}

#[derive(Tabled)]
pub struct SongTableRow {
    pub station: String,
    pub artist: String,
    pub title: String,
    pub status: String,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub artist: String,
    pub title: String,
    pub playlist: String,
    pub added: String,
}

#[derive(Tabled)]
pub struct OccupancyTableRow {
    pub playlist: String,
    pub songs: usize,
    pub free: usize,
}

#[derive(Tabled)]
pub struct PlanTableRow {
    pub playlist: String,
    pub slots: usize,
    pub first: String,
    pub last: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: SearchTracks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTracks {
    pub items: Vec<SearchTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTrack {
    pub id: String,
    pub name: String,
    pub uri: String,
    pub artists: Vec<SearchArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserPlaylistsResponse {
    pub items: Vec<Playlist>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub tracks: PlaylistTracksRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    pub total: usize,
}
