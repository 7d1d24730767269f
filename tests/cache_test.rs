use sporadio::management::{CacheError, TrackCacheManager};
use sporadio::types::{PlaylistOccupancy, Track};
use tempfile::tempdir;

fn track(artist: &str, title: &str, playlist_id: &str) -> Track {
    Track {
        artist: artist.to_string(),
        title: title.to_string(),
        catalog_id: format!("spotify:track:{}", title.replace(' ', "")),
        timestamp: "2024-03-01 12:00:00".to_string(),
        playlist_id: playlist_id.to_string(),
    }
}

#[tokio::test]
async fn test_missing_cache_file_is_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tracks.json");

    let cache = TrackCacheManager::load_or_default(&path).await.unwrap();

    assert_eq!(cache.count(), 0);
    assert!(cache.occupancy().is_empty());
    assert!(matches!(
        TrackCacheManager::load(&path).await,
        Err(CacheError::Io(_))
    ));
}

#[tokio::test]
async fn test_persist_and_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cache").join("tracks.json");

    let mut cache = TrackCacheManager::new(path.clone(), None);
    cache.append(vec![
        track("Muse", "Uprising", "p1"),
        track("Beck", "Loser", "p1"),
    ]);
    cache.persist().await.unwrap();

    let mut reloaded = TrackCacheManager::load(&path).await.unwrap();
    assert_eq!(reloaded.tracks(), cache.tracks());

    reloaded.append(vec![track("Blur", "Song 2", "p2")]);
    reloaded.persist().await.unwrap();

    let again = TrackCacheManager::load_or_default(&path).await.unwrap();
    assert_eq!(again.count(), 3);
    assert_eq!(again.tracks()[0].artist, "Muse");
    assert_eq!(again.tracks()[2].playlist_id, "p2");
}

#[tokio::test]
async fn test_corrupt_cache_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tracks.json");
    std::fs::write(&path, "not json").unwrap();

    assert!(matches!(
        TrackCacheManager::load_or_default(&path).await,
        Err(CacheError::Serde(_))
    ));
}

#[tokio::test]
async fn test_records_without_playlist_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tracks.json");
    std::fs::write(
        &path,
        r#"[{"artist":"Muse","title":"Uprising","catalog_id":"spotify:track:1","timestamp":"2024-03-01 12:00:00"}]"#,
    )
    .unwrap();

    let cache = TrackCacheManager::load(&path).await.unwrap();

    assert_eq!(cache.count(), 1);
    assert!(cache.tracks()[0].playlist_id.is_empty());
    assert!(cache.occupancy().is_empty());
}

#[test]
fn test_occupancy_counts_per_playlist_in_first_seen_order() {
    let mut cache = TrackCacheManager::new("unused.json".into(), None);
    cache.append(vec![
        track("A", "1", "p2"),
        track("B", "2", "p1"),
        track("C", "3", "p2"),
        track("D", "4", ""),
        track("E", "5", "p2"),
    ]);

    assert_eq!(
        cache.occupancy(),
        vec![PlaylistOccupancy::new("p2", 3), PlaylistOccupancy::new("p1", 1)]
    );
}

#[test]
fn test_known_and_search() {
    let cache = TrackCacheManager::new(
        "unused.json".into(),
        Some(vec![
            track("Beyoncé", "Halo", "p1"),
            track("The Black Keys", "Lonely Boy", "p1"),
            track("The Black Keys", "Gold on the Ceiling", "p1"),
        ]),
    );

    assert!(cache.is_known("beyonce", "halo"));
    assert!(!cache.is_known("Beyonce", "Crazy in Love"));
    assert!(cache.index().contains("black keys", "ceiling"));

    assert_eq!(cache.search(Some("black keys"), None).len(), 2);
    assert_eq!(cache.search(None, Some("HALO")).len(), 1);
    assert_eq!(cache.search(Some("black keys"), Some("lonely")).len(), 1);
    assert_eq!(cache.search(None, None).len(), 3);
}

#[tokio::test]
async fn test_persist_replaces_file_without_leftovers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tracks.json");
    std::fs::write(&path, "[]").unwrap();

    let cache = TrackCacheManager::new(path.clone(), Some(vec![track("Muse", "Uprising", "p1")]));
    cache.persist().await.unwrap();

    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("tracks.json")]);

    let reloaded = TrackCacheManager::load(&path).await.unwrap();
    assert_eq!(reloaded.tracks(), cache.tracks());
}
