//! Scraped song cleanup and membership tests against the track cache.
//!
//! Matching is deliberately loose: a scraped pair counts as known when its
//! folded artist and title are substrings of a cached track's folded artist
//! and title. Folding lowercases and strips diacritics.

use std::collections::HashSet;

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::types::{ScrapedSong, Track};

/// Tokens containing any of these are dropped during normalization.
pub const BANNED_MARKERS: [&str; 6] = ["**", "[", "]", "(", ")", "+"];

/// Stations emit this for characters they failed to decode.
pub const CORRUPTED_MARKER: &str = "??";

/// Lowercases `value` and removes combining marks, so `Beyoncé` folds to
/// `beyonce`. `ß` folds to `ss`.
pub fn fold(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .replace('ß', "ss")
}

pub fn normalize_field(value: &str) -> String {
    value
        .split_whitespace()
        .filter(|token| !BANNED_MARKERS.iter().any(|m| token.contains(m)))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn is_corrupted(artist: &str, title: &str) -> bool {
    artist.contains(CORRUPTED_MARKER) || title.contains(CORRUPTED_MARKER)
}

/// Returns the cleaned-up song, or `None` when it is corrupted or nothing
/// searchable is left after dropping banned tokens.
pub fn normalize(song: &ScrapedSong) -> Option<ScrapedSong> {
    if is_corrupted(&song.artist, &song.title) {
        return None;
    }

    let artist = normalize_field(&song.artist);
    let title = normalize_field(&song.title);
    if artist.is_empty() || title.is_empty() {
        return None;
    }

    Some(ScrapedSong { artist, title })
}

/// Drops exact duplicates, keeping the first occurrence.
pub fn unique_songs(songs: Vec<ScrapedSong>) -> Vec<ScrapedSong> {
    let mut seen = HashSet::new();
    songs
        .into_iter()
        .filter(|song| seen.insert(song.clone()))
        .collect()
}

pub fn is_known(cache: &[Track], artist: &str, title: &str) -> bool {
    let artist = fold(artist);
    let title = fold(title);
    cache
        .iter()
        .any(|t| fold(&t.artist).contains(&artist) && fold(&t.title).contains(&title))
}

/// Pre-folded artist/title pairs, so repeated lookups do not refold the whole
/// cache.
#[derive(Debug, Clone, Default)]
pub struct TrackIndex {
    entries: Vec<(String, String)>,
}

impl TrackIndex {
    pub fn from_tracks(tracks: &[Track]) -> Self {
        let mut index = Self::default();
        for track in tracks {
            index.insert(&track.artist, &track.title);
        }
        index
    }

    pub fn insert(&mut self, artist: &str, title: &str) {
        self.entries.push((fold(artist), fold(title)));
    }

    pub fn contains(&self, artist: &str, title: &str) -> bool {
        let artist = fold(artist);
        let title = fold(title);
        self.entries
            .iter()
            .any(|(a, t)| a.contains(&artist) && t.contains(&title))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalizes `songs` and keeps the ones the cache index has not seen.
///
/// Within the batch a song is dropped only when its folded artist and title
/// equal those of an earlier accepted song, so the outcome does not depend on
/// scrape order.
pub fn filter_new<I>(songs: I, known: &TrackIndex) -> Vec<ScrapedSong>
where
    I: IntoIterator<Item = ScrapedSong>,
{
    let mut batch = HashSet::new();
    let mut fresh = Vec::new();
    for song in songs {
        let Some(song) = normalize(&song) else {
            continue;
        };
        if known.contains(&song.artist, &song.title) {
            continue;
        }
        if batch.insert((fold(&song.artist), fold(&song.title))) {
            fresh.push(song);
        }
    }
    fresh
}
