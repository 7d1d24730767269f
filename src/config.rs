//! Configuration management for sporadio.
//!
//! Two sources feed the application:
//!
//! 1. Environment variables, optionally loaded from `sporadio/.env` in the
//!    platform local data directory. They carry the Spotify credentials and
//!    endpoints.
//! 2. `sporadio/stations.toml` in the same directory, describing which radio
//!    stations to scrape and how. Built-in defaults apply when the file does
//!    not exist.
//!
//! Values are passed explicitly into the scrapers; nothing here is global
//! mutable state.

use std::{
    collections::BTreeMap,
    env,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error;

pub const DEFAULT_PLAYLIST_PREFIX: &str = "Alt-Radio-Station-";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse .env file: {0}")]
    Env(#[from] dotenv::Error),
    #[error("cannot parse station configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Root of everything sporadio keeps on disk.
///
/// - Linux: `~/.local/share/sporadio`
/// - macOS: `~/Library/Application Support/sporadio`
/// - Windows: `%LOCALAPPDATA%/sporadio`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sporadio");
    path
}

/// Loads `sporadio/.env` into the process environment.
///
/// A missing file is not an error; variables may come from the shell instead.
pub async fn load_env() -> Result<(), ConfigError> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path)?;
    Ok(())
}

fn required(key: &str) -> String {
    match env::var(key) {
        Ok(value) => value,
        Err(_) => error!(
            "{} must be set. Add it to {}",
            key,
            data_dir().join(".env").display()
        ),
    }
}

/// Address the OAuth callback server binds to, e.g. `127.0.0.1:8080`.
pub fn server_addr() -> String {
    required("SERVER_ADDRESS")
}

/// Spotify user that owns the radio playlists.
pub fn spotify_user() -> String {
    required("SPOTIFY_USER_ID")
}

pub fn spotify_client_id() -> String {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Must match the redirect URI registered for the Spotify application.
pub fn spotify_redirect_uri() -> String {
    required("SPOTIFY_API_REDIRECT_URI")
}

/// e.g. `playlist-read-private playlist-modify-private`
pub fn spotify_scope() -> String {
    required("SPOTIFY_API_AUTH_SCOPE")
}

pub fn spotify_apiauth_url() -> String {
    required("SPOTIFY_API_AUTH_URL")
}

pub fn spotify_apiurl() -> String {
    required("SPOTIFY_API_URL")
}

pub fn spotify_apitoken_url() -> String {
    required("SPOTIFY_API_TOKEN_URL")
}

/// Name prefix of the playlists sporadio fills.
pub fn playlist_prefix() -> String {
    env::var("SPORADIO_PLAYLIST_PREFIX")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PLAYLIST_PREFIX.to_string())
}

/// A named station endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationEndpoint {
    pub name: String,
    pub url: String,
}

impl StationEndpoint {
    fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationsConfig {
    /// Number of time windows requested per windowed station.
    #[serde(default = "default_steps")]
    pub steps: u32,
    #[serde(default)]
    pub cbs: CbsConfig,
    #[serde(default)]
    pub tunegenie: TuneGenieConfig,
    #[serde(default)]
    pub iheart: IHeartConfig,
}

/// Stations serving `?action=playlist&type=json&before=<time>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CbsConfig {
    #[serde(default = "default_cbs_stations")]
    pub stations: Vec<StationEndpoint>,
    #[serde(default = "default_headers")]
    pub headers: BTreeMap<String, String>,
    #[serde(default = "default_interval_hours")]
    pub interval_hours: u32,
}

/// Stations serving `?since=<time>&until=<time>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuneGenieConfig {
    #[serde(default = "default_tunegenie_stations")]
    pub stations: Vec<StationEndpoint>,
    #[serde(default = "default_headers")]
    pub headers: BTreeMap<String, String>,
    #[serde(default = "default_interval_hours")]
    pub interval_hours: u32,
    /// Entries whose artist starts with one of these are show names.
    #[serde(default = "default_tunegenie_skip")]
    pub skip_prefixes: Vec<String>,
}

/// Stations with an HTML "recently played" page. `{station}` in the URL
/// templates is replaced by the station name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IHeartConfig {
    #[serde(default = "default_iheart_stations")]
    pub stations: Vec<String>,
    #[serde(default = "default_iheart_url")]
    pub url: String,
    #[serde(default = "default_iheart_load_more_url")]
    pub load_more_url: String,
    #[serde(default = "default_iheart_origin")]
    pub origin: String,
    #[serde(default = "default_load_more_limit")]
    pub load_more_limit: u32,
    #[serde(default = "default_headers")]
    pub headers: BTreeMap<String, String>,
    #[serde(default = "default_iheart_skip")]
    pub skip_prefixes: Vec<String>,
}

impl IHeartConfig {
    pub fn page_url(&self, station: &str) -> String {
        self.url.replace("{station}", station)
    }

    pub fn load_more_url(&self, station: &str) -> String {
        self.load_more_url.replace("{station}", station)
    }

    pub fn origin(&self, station: &str) -> String {
        self.origin.replace("{station}", station)
    }
}

impl StationsConfig {
    pub fn path() -> PathBuf {
        data_dir().join("stations.toml")
    }

    /// Reads [`StationsConfig::path`], falling back to the built-in stations.
    pub async fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()).await
    }

    pub async fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = async_fs::read_to_string(path).await?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn station_names(&self) -> Vec<String> {
        self.cbs
            .stations
            .iter()
            .map(|s| s.name.clone())
            .chain(self.tunegenie.stations.iter().map(|s| s.name.clone()))
            .chain(self.iheart.stations.iter().cloned())
            .collect()
    }
}

impl Default for StationsConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            cbs: CbsConfig::default(),
            tunegenie: TuneGenieConfig::default(),
            iheart: IHeartConfig::default(),
        }
    }
}

impl Default for CbsConfig {
    fn default() -> Self {
        Self {
            stations: default_cbs_stations(),
            headers: default_headers(),
            interval_hours: default_interval_hours(),
        }
    }
}

impl Default for TuneGenieConfig {
    fn default() -> Self {
        Self {
            stations: default_tunegenie_stations(),
            headers: default_headers(),
            interval_hours: default_interval_hours(),
            skip_prefixes: default_tunegenie_skip(),
        }
    }
}

impl Default for IHeartConfig {
    fn default() -> Self {
        Self {
            stations: default_iheart_stations(),
            url: default_iheart_url(),
            load_more_url: default_iheart_load_more_url(),
            origin: default_iheart_origin(),
            load_more_limit: default_load_more_limit(),
            headers: default_headers(),
            skip_prefixes: default_iheart_skip(),
        }
    }
}

fn default_steps() -> u32 {
    3
}

fn default_interval_hours() -> u32 {
    12
}

fn default_load_more_limit() -> u32 {
    50
}

fn default_headers() -> BTreeMap<String, String> {
    [
        ("DNT", "1"),
        ("Accept-Language", "en-US,en;q=0.8"),
        (
            "User-Agent",
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/61.0.3163.100 Safari/537.36",
        ),
        ("Accept", "*/*"),
        ("X-Requested-With", "XMLHttpRequest"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_cbs_stations() -> Vec<StationEndpoint> {
    vec![
        StationEndpoint::new("wxrt", "http://wxrt.cbslocal.com/playlist/"),
        StationEndpoint::new("x1075lasvegas", "http://x1075.cbslocal.com/playlist"),
        StationEndpoint::new("kroq", "http://www.roq.com/playlist/"),
        StationEndpoint::new("live105", "http://www.live.com/playlist/"),
    ]
}

fn default_tunegenie_stations() -> Vec<StationEndpoint> {
    vec![
        StationEndpoint::new("wwyy", "http://wwyy.tunegenie.com/api/v1/brand/nowplaying/"),
        StationEndpoint::new("wkqx", "http://wkqx.tunegenie.com/api/v1/brand/nowplaying/"),
    ]
}

fn default_tunegenie_skip() -> Vec<String> {
    ["Weekdays,", "The Valley's", "Sundays,"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_iheart_stations() -> Vec<String> {
    vec!["star1019".to_string(), "dc101".to_string()]
}

fn default_iheart_url() -> String {
    "https://{station}.iheart.com/music/recently-played/".to_string()
}

fn default_iheart_load_more_url() -> String {
    "https://{station}.iheart.com/api/music/load_more/".to_string()
}

fn default_iheart_origin() -> String {
    "https://{station}.iheart.com".to_string()
}

fn default_iheart_skip() -> Vec<String> {
    [
        "Hawaii's Alternative",
        "STATION_LOGO",
        "{{",
        "iHeartRadio",
        "Sundays,",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
