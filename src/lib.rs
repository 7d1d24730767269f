//! Radio Playlist Sync Library
//!
//! Collects the "recently played" lists of a handful of alternative rock
//! stations, drops everything that was already filed, resolves the rest in the
//! Spotify catalog and spreads the new tracks over playlists of at most
//! [`allocator::PLAYLIST_CAPACITY`] songs, opening new playlists as the old
//! ones fill up.
//!
//! # Modules
//!
//! - `allocator` - playlist capacity allocation
//! - `api` - HTTP endpoints for the local OAuth callback server
//! - `cli` - command implementations
//! - `config` - environment variables and the station configuration
//! - `dedup` - song normalization and the "already seen" filter
//! - `management` - token and track cache persistence
//! - `server` - local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client
//! - `stations` - radio station scrapers
//! - `types` - shared data structures
//! - `utils` - small helpers
//!
//! # Example
//!
//! ```ignore
//! use sporadio::{allocator, types::PlaylistOccupancy};
//!
//! let existing = vec![PlaylistOccupancy::new("p1", 799)];
//! let chunks: Vec<_> = allocator::allocate(&existing, 3, || Ok("p2".to_string()))
//!     .collect::<Result<_, _>>()?;
//! assert_eq!(chunks.len(), 2);
//! ```

pub mod allocator;
pub mod api;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod management;
pub mod server;
pub mod spotify;
pub mod stations;
pub mod types;
pub mod utils;

/// Prints a progress line prefixed with a blue `o`.
///
/// ```ignore
/// info!("Scraping {} stations", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a completed step prefixed with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints the message with a red `!` and exits with status 1.
///
/// The expansion diverges, so it can stand in a `match` arm of any type:
///
/// ```ignore
/// let cache = match TrackCacheManager::load(&path).await {
///     Ok(cache) => cache,
///     Err(e) => error!("Cannot read {}. Err: {}", path.display(), e),
/// };
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a recoverable problem prefixed with a yellow `!`.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
