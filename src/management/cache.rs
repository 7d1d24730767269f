use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{
    config,
    dedup::{self, TrackIndex},
    types::{PlaylistOccupancy, Track},
};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cannot access track cache: {0}")]
    Io(#[from] std::io::Error),
    #[error("track cache is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Every track sporadio has placed so far. Only ever appended to.
pub struct TrackCacheManager {
    path: PathBuf,
    tracks: Vec<Track>,
}

impl TrackCacheManager {
    pub fn new(path: PathBuf, tracks: Option<Vec<Track>>) -> Self {
        Self {
            path,
            tracks: tracks.unwrap_or_default(),
        }
    }

    pub fn default_path() -> PathBuf {
        config::data_dir().join("cache/tracks.json")
    }

    pub async fn load(path: &Path) -> Result<Self, CacheError> {
        let content = async_fs::read_to_string(path).await?;
        let tracks: Vec<Track> = serde_json::from_str(&content)?;
        Ok(Self {
            path: path.to_path_buf(),
            tracks,
        })
    }

    /// Like [`TrackCacheManager::load`], but a missing file is an empty cache.
    pub async fn load_or_default(path: &Path) -> Result<Self, CacheError> {
        match Self::load(path).await {
            Err(CacheError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                Ok(Self::new(path.to_path_buf(), None))
            }
            other => other,
        }
    }

    /// Writes the cache next to its final location and renames it into
    /// place, so an interrupted write never leaves a truncated cache behind.
    pub async fn persist(&self) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.tracks)?;
        let staging = self.staging_path();
        async_fs::write(&staging, json).await?;
        async_fs::rename(&staging, &self.path).await?;
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    pub fn append(&mut self, tracks: Vec<Track>) -> &mut Self {
        self.tracks.extend(tracks);
        self
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn count(&self) -> usize {
        self.tracks.len()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn index(&self) -> TrackIndex {
        TrackIndex::from_tracks(&self.tracks)
    }

    pub fn is_known(&self, artist: &str, title: &str) -> bool {
        dedup::is_known(&self.tracks, artist, title)
    }

    /// Tracks whose artist and title contain the given (folded) fragments.
    pub fn search(&self, artist: Option<&str>, title: Option<&str>) -> Vec<&Track> {
        let artist = artist.map(dedup::fold);
        let title = title.map(dedup::fold);
        self.tracks
            .iter()
            .filter(|t| {
                artist
                    .as_ref()
                    .is_none_or(|a| dedup::fold(&t.artist).contains(a.as_str()))
                    && title
                        .as_ref()
                        .is_none_or(|s| dedup::fold(&t.title).contains(s.as_str()))
            })
            .collect()
    }

    /// Cached track count per playlist, in order of first appearance. Tracks
    /// that never made it into a playlist are not counted.
    pub fn occupancy(&self) -> Vec<PlaylistOccupancy> {
        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();

        for track in &self.tracks {
            if track.playlist_id.is_empty() {
                continue;
            }
            let count = counts.entry(track.playlist_id.as_str()).or_insert_with(|| {
                order.push(track.playlist_id.as_str());
                0
            });
            *count += 1;
        }

        order
            .into_iter()
            .map(|id| PlaylistOccupancy::new(id, counts[id]))
            .collect()
    }
}
