use std::cell::Cell;

use sporadio::allocator::*;
use sporadio::types::{AllocationChunk, PlaylistOccupancy};

fn chunk(id: &str, slots: usize) -> AllocationChunk {
    AllocationChunk::new(id, slots)
}

fn never_create() -> Result<String, PlaylistCreationError> {
    panic!("create_playlist must not be called")
}

#[test]
fn test_fills_existing_playlists_in_order() {
    let existing = vec![
        PlaylistOccupancy::new("p1", 790),
        PlaylistOccupancy::new("p2", 50),
    ];

    let chunks: Vec<_> = allocate(&existing, 30, never_create)
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(chunks, vec![chunk("p1", 10), chunk("p2", 20)]);
}

#[test]
fn test_full_playlist_triggers_single_creation() {
    let existing = vec![PlaylistOccupancy::new("p1", PLAYLIST_CAPACITY)];
    let calls = Cell::new(0);

    let chunks: Vec<_> = allocate(&existing, 5, || {
        calls.set(calls.get() + 1);
        Ok("fresh".to_string())
    })
    .collect::<Result<_, _>>()
    .unwrap();

    assert_eq!(chunks, vec![chunk("fresh", 5)]);
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_zero_songs_yields_nothing() {
    let existing = vec![PlaylistOccupancy::new("p1", 10)];
    let mut allocation = allocate(&existing, 0, never_create);

    assert!(allocation.next().is_none());
    assert!(allocate(&[], 0, never_create).next().is_none());
}

#[test]
fn test_large_batch_spans_several_new_playlists() {
    let mut created = 0;
    let chunks: Vec<_> = allocate(&[], 2000, || {
        created += 1;
        Ok(format!("new-{}", created))
    })
    .collect::<Result<_, _>>()
    .unwrap();

    assert_eq!(
        chunks,
        vec![chunk("new-1", 800), chunk("new-2", 800), chunk("new-3", 400)]
    );
    assert_eq!(created, 3);
}

#[test]
fn test_chunks_sum_to_song_count_and_respect_capacity() {
    let existing = vec![
        PlaylistOccupancy::new("a", 0),
        PlaylistOccupancy::new("b", 799),
        PlaylistOccupancy::new("c", 800),
        PlaylistOccupancy::new("d", 400),
    ];
    let mut created = 0;
    let chunks: Vec<_> = allocate(&existing, 1500, || {
        created += 1;
        Ok(format!("new-{}", created))
    })
    .collect::<Result<_, _>>()
    .unwrap();

    let total: usize = chunks.iter().map(|c| c.slot_count).sum();
    assert_eq!(total, 1500);
    assert!(chunks.iter().all(|c| c.slot_count > 0));
    assert!(chunks.iter().all(|c| c.slot_count <= PLAYLIST_CAPACITY));
    assert!(!chunks.iter().any(|c| c.playlist_id == "c"));
    assert_eq!(
        chunks,
        vec![
            chunk("a", 800),
            chunk("b", 1),
            chunk("d", 400),
            chunk("new-1", 299)
        ]
    );
}

#[test]
fn test_over_capacity_playlist_is_treated_as_full() {
    let existing = vec![PlaylistOccupancy::new("legacy", 950)];

    let chunks: Vec<_> = allocate(&existing, 3, || Ok("fresh".to_string()))
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(chunks, vec![chunk("fresh", 3)]);
}

#[test]
fn test_creation_failure_halts_allocation() {
    let existing = vec![PlaylistOccupancy::new("p1", 795)];
    let mut allocation = allocate(&existing, 20, || {
        Err(PlaylistCreationError("quota exceeded".to_string()))
    });

    assert_eq!(allocation.next(), Some(Ok(chunk("p1", 5))));
    assert_eq!(
        allocation.next(),
        Some(Err(PlaylistCreationError("quota exceeded".to_string())))
    );
    assert_eq!(allocation.remaining(), 15);
    assert_eq!(allocation.next(), None);
    assert_eq!(allocation.next(), None);
}

#[test]
fn test_allocation_is_lazy() {
    let calls = Cell::new(0);
    let mut allocation = allocate(&[], 2000, || {
        calls.set(calls.get() + 1);
        Ok(format!("new-{}", calls.get()))
    });

    assert_eq!(calls.get(), 0);
    assert_eq!(allocation.next(), Some(Ok(chunk("new-1", 800))));
    assert_eq!(calls.get(), 1);

    drop(allocation);
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_custom_capacity() {
    let existing = vec![PlaylistOccupancy::new("p1", 8)];
    let chunks: Vec<_> = allocate_with_capacity(&existing, 25, 10, || Ok("n".to_string()))
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(
        chunks,
        vec![chunk("p1", 2), chunk("n", 10), chunk("n", 10), chunk("n", 3)]
    );
}

#[test]
fn test_plan_steps_through_creation() {
    let mut plan = AllocationPlan::new(&[PlaylistOccupancy::new("p1", 799)], 3);

    assert_eq!(plan.capacity(), PLAYLIST_CAPACITY);
    assert_eq!(plan.step(), Step::Chunk(chunk("p1", 1)));
    assert_eq!(plan.remaining(), 2);
    assert_eq!(plan.step(), Step::NeedsPlaylist);
    assert_eq!(plan.step(), Step::NeedsPlaylist);

    plan.provide_playlist("p2".to_string());
    assert_eq!(plan.step(), Step::Chunk(chunk("p2", 2)));
    assert_eq!(plan.step(), Step::Done);
    assert_eq!(plan.remaining(), 0);
}

#[test]
fn test_zero_capacity_still_makes_progress() {
    let plan = AllocationPlan::with_capacity(&[], 2, 0);
    assert_eq!(plan.capacity(), 1);

    let chunks: Vec<_> = allocate_with_capacity(&[], 2, 0, || Ok("n".to_string()))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(chunks, vec![chunk("n", 1), chunk("n", 1)]);
}

#[test]
fn test_slices_are_contiguous() {
    let songs: Vec<u32> = (0..30).collect();
    let chunks = vec![chunk("p1", 10), chunk("p2", 15), chunk("p3", 5)];

    let sliced = slice_song_ids(&songs, &chunks);

    assert_eq!(sliced.len(), 3);
    assert_eq!(sliced[0].1, &songs[0..10]);
    assert_eq!(sliced[1].1, &songs[10..25]);
    assert_eq!(sliced[2].1, &songs[25..30]);
    assert_eq!(sliced[2].0.playlist_id, "p3");
}

#[test]
fn test_slices_clamp_to_available_songs() {
    let songs = vec!["a", "b", "c"];
    let chunks = vec![chunk("p1", 2), chunk("p2", 5), chunk("p3", 1)];

    let sliced = slice_song_ids(&songs, &chunks);

    assert_eq!(sliced[0].1, &["a", "b"]);
    assert_eq!(sliced[1].1, &["c"]);
    assert!(sliced[2].1.is_empty());
}

#[test]
fn test_creation_error_message() {
    let err = PlaylistCreationError("401 Unauthorized".to_string());
    assert_eq!(err.to_string(), "failed to create playlist: 401 Unauthorized");
}

#[test]
fn test_cursor_follows_plan_across_new_playlists() {
    let songs: Vec<String> = (0..25).map(|i| format!("spotify:track:{}", i)).collect();
    let mut plan = AllocationPlan::with_capacity(&[PlaylistOccupancy::new("p1", 8)], 25, 10);
    let mut cursor = SongCursor::new(songs.len());
    let mut created = 0;
    let mut placed: Vec<(String, &[String])> = Vec::new();

    loop {
        match plan.step() {
            Step::Done => break,
            Step::NeedsPlaylist => {
                created += 1;
                plan.provide_playlist(format!("new-{}", created));
            }
            Step::Chunk(chunk) => {
                let range = cursor.next_range(&chunk);
                assert_eq!(range.len(), chunk.slot_count);
                placed.push((chunk.playlist_id, &songs[range]));
            }
        }
    }

    assert_eq!(created, 3);
    assert_eq!(placed.len(), 4);
    assert_eq!(placed[0].0, "p1");
    assert_eq!(placed[0].1, &songs[0..2]);
    assert_eq!(placed[1].0, "new-1");
    assert_eq!(placed[1].1, &songs[2..12]);
    assert_eq!(placed[2].0, "new-2");
    assert_eq!(placed[2].1, &songs[12..22]);
    assert_eq!(placed[3].0, "new-3");
    assert_eq!(placed[3].1, &songs[22..25]);

    let flattened: Vec<&String> = placed.iter().flat_map(|(_, s)| s.iter()).collect();
    assert_eq!(flattened, songs.iter().collect::<Vec<_>>());
}

#[test]
fn test_cursor_ranges_past_the_end_are_empty() {
    let mut cursor = SongCursor::new(3);

    assert_eq!(cursor.next_range(&chunk("p1", 2)), 0..2);
    assert_eq!(cursor.next_range(&chunk("p2", 5)), 2..3);
    assert!(cursor.next_range(&chunk("p3", 1)).is_empty());
}
