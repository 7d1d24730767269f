//! Playlist capacity allocation.
//!
//! Spreads a batch of new songs over playlists that hold at most
//! [`PLAYLIST_CAPACITY`] tracks each. Existing playlists with room are filled
//! first, in the order they are supplied; once they are used up, fresh
//! playlists are requested one at a time.
//!
//! The allocation is driven by [`AllocationPlan`], a small state machine that
//! never talks to the network. A caller that can create playlists
//! synchronously uses [`allocate`] and gets a plain iterator. The sync command
//! drives the plan by hand because playlist creation is an async request.

use std::{collections::VecDeque, iter::FusedIterator, ops::Range};

use thiserror::Error;

use crate::types::{AllocationChunk, PlaylistOccupancy};

/// Maximum number of tracks a single playlist may hold.
pub const PLAYLIST_CAPACITY: usize = 800;

/// Creating a fresh playlist failed. The songs that were not allocated yet are
/// left for a later run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to create playlist: {0}")]
pub struct PlaylistCreationError(pub String);

/// Outcome of a single [`AllocationPlan::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The next chunk to apply.
    Chunk(AllocationChunk),
    /// Songs remain but every known playlist is full. Feed a new playlist in
    /// through [`AllocationPlan::provide_playlist`] and step again.
    NeedsPlaylist,
    /// Every song has a slot.
    Done,
}

#[derive(Debug, Clone)]
pub struct AllocationPlan {
    capacity: usize,
    remaining: usize,
    open: VecDeque<(String, usize)>,
}

impl AllocationPlan {
    pub fn new(existing: &[PlaylistOccupancy], new_song_count: usize) -> Self {
        Self::with_capacity(existing, new_song_count, PLAYLIST_CAPACITY)
    }

    /// A capacity of zero is treated as one so that fresh playlists always
    /// make progress.
    pub fn with_capacity(
        existing: &[PlaylistOccupancy],
        new_song_count: usize,
        capacity: usize,
    ) -> Self {
        let capacity = capacity.max(1);
        let open = existing
            .iter()
            .filter(|p| p.song_count < capacity)
            .map(|p| (p.playlist_id.clone(), capacity - p.song_count))
            .collect();

        Self {
            capacity,
            remaining: new_song_count,
            open,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Songs that have not been given a slot yet.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn step(&mut self) -> Step {
        if self.remaining == 0 {
            return Step::Done;
        }

        match self.open.pop_front() {
            Some((playlist_id, available)) => {
                let take = available.min(self.remaining);
                self.remaining -= take;
                Step::Chunk(AllocationChunk {
                    playlist_id,
                    slot_count: take,
                })
            }
            None => Step::NeedsPlaylist,
        }
    }

    /// Registers an empty playlist that was created after a
    /// [`Step::NeedsPlaylist`].
    pub fn provide_playlist(&mut self, playlist_id: String) {
        self.open.push_back((playlist_id, self.capacity));
    }
}

/// Iterator returned by [`allocate`].
///
/// Yields `Err` at most once; a failed playlist creation ends the allocation.
pub struct Allocation<F> {
    plan: AllocationPlan,
    create_playlist: F,
    halted: bool,
}

impl<F> Allocation<F> {
    pub fn remaining(&self) -> usize {
        self.plan.remaining()
    }
}

impl<F> Iterator for Allocation<F>
where
    F: FnMut() -> Result<String, PlaylistCreationError>,
{
    type Item = Result<AllocationChunk, PlaylistCreationError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted {
            return None;
        }

        loop {
            match self.plan.step() {
                Step::Chunk(chunk) => return Some(Ok(chunk)),
                Step::Done => {
                    self.halted = true;
                    return None;
                }
                Step::NeedsPlaylist => match (self.create_playlist)() {
                    Ok(playlist_id) => self.plan.provide_playlist(playlist_id),
                    Err(e) => {
                        self.halted = true;
                        return Some(Err(e));
                    }
                },
            }
        }
    }
}

impl<F> FusedIterator for Allocation<F> where F: FnMut() -> Result<String, PlaylistCreationError> {}

/// Lazily splits `new_song_count` songs over `existing` playlists, calling
/// `create_playlist` whenever they run out of room.
pub fn allocate<F>(
    existing: &[PlaylistOccupancy],
    new_song_count: usize,
    create_playlist: F,
) -> Allocation<F>
where
    F: FnMut() -> Result<String, PlaylistCreationError>,
{
    allocate_with_capacity(existing, new_song_count, PLAYLIST_CAPACITY, create_playlist)
}

pub fn allocate_with_capacity<F>(
    existing: &[PlaylistOccupancy],
    new_song_count: usize,
    capacity: usize,
    create_playlist: F,
) -> Allocation<F>
where
    F: FnMut() -> Result<String, PlaylistCreationError>,
{
    Allocation {
        plan: AllocationPlan::with_capacity(existing, new_song_count, capacity),
        create_playlist,
        halted: false,
    }
}

/// Hands out the index range of the song list each chunk covers.
///
/// Ranges follow each other without gaps: every chunk starts where the
/// previous one ended. Ranges past the end of the list are empty.
#[derive(Debug, Clone)]
pub struct SongCursor {
    offset: usize,
    len: usize,
}

impl SongCursor {
    pub fn new(len: usize) -> Self {
        Self { offset: 0, len }
    }

    pub fn next_range(&mut self, chunk: &AllocationChunk) -> Range<usize> {
        let start = self.offset.min(self.len);
        let end = (self.offset + chunk.slot_count).min(self.len);
        self.offset += chunk.slot_count;
        start..end
    }
}

/// Pairs every chunk with the songs it covers, see [`SongCursor`].
pub fn slice_song_ids<'a, T>(
    songs: &'a [T],
    chunks: &'a [AllocationChunk],
) -> Vec<(&'a AllocationChunk, &'a [T])> {
    let mut cursor = SongCursor::new(songs.len());
    chunks
        .iter()
        .map(|chunk| (chunk, &songs[cursor.next_range(chunk)]))
        .collect()
}
