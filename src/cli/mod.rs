//! # CLI Module
//!
//! User-facing commands. Each one wires the station scrapers, the dedup
//! filter, the allocator and the Spotify client together and reports progress
//! with the crate's output macros.
//!
//! - [`auth`] - Spotify login (PKCE)
//! - [`sync`] - scrape, filter, resolve and file new songs into playlists
//! - [`scrape`] - show what the stations are playing and what is new
//! - [`playlists`] - show playlist fill levels
//! - [`cache`] - inspect the local track cache
//!
//! ## Typical use
//!
//! ```bash
//! sporadio auth
//! sporadio sync --dry-run
//! sporadio sync
//! sporadio playlists --occupancy cache
//! ```

mod auth;
mod cache;
mod playlists;
mod scrape;
mod sync;

pub use auth::auth;
pub use cache::cache;
pub use playlists::playlists;
pub use scrape::scrape;
pub use sync::sync;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::StationsConfig, error, management::TrackCacheManager, stations, success,
    types::StationHaul,
};

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

async fn load_stations() -> StationsConfig {
    match StationsConfig::load().await {
        Ok(config) => config,
        Err(e) => error!(
            "Cannot read {}. Err: {}",
            StationsConfig::path().display(),
            e
        ),
    }
}

async fn load_cache() -> TrackCacheManager {
    let path = TrackCacheManager::default_path();
    match TrackCacheManager::load_or_default(&path).await {
        Ok(cache) => cache,
        Err(e) => error!("Cannot read {}. Err: {}", path.display(), e),
    }
}

async fn scrape_with_spinner(config: &StationsConfig, only: Option<&str>) -> Vec<StationHaul> {
    let pb = spinner("Fetching recently played songs from radio stations...");
    let hauls = stations::scrape_all(config, only).await;
    pb.finish_and_clear();

    for haul in &hauls {
        success!("{}: {} songs", haul.station, haul.songs.len());
    }
    hauls
}
