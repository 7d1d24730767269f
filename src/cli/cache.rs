use tabled::Table;

use crate::{info, success, types::TrackTableRow, utils::truncate};

/// Lists cached tracks, optionally filtered. With both `artist` and `title`
/// it answers whether that song would be treated as already seen.
pub async fn cache(artist: Option<String>, title: Option<String>) {
    let cache = super::load_cache().await;

    if let (Some(artist), Some(title)) = (&artist, &title) {
        if cache.is_known(artist, title) {
            success!("{} - {} is already in the cache.", artist, title);
        } else {
            info!("{} - {} is new.", artist, title);
        }
        return;
    }

    let matches = cache.search(artist.as_deref(), title.as_deref());
    if matches.is_empty() {
        info!("No cached tracks match.");
        return;
    }

    let rows: Vec<TrackTableRow> = matches
        .iter()
        .map(|t| TrackTableRow {
            artist: truncate(&t.artist, 30),
            title: truncate(&t.title, 40),
            playlist: t.playlist_id.clone(),
            added: t.timestamp.clone(),
        })
        .collect();

    println!("{}", Table::new(rows));
    info!(
        "Showing {} of {} cached tracks ({})",
        matches.len(),
        cache.count(),
        cache.path().display()
    );

    for playlist in cache.occupancy() {
        info!("{}: {} tracks", playlist.playlist_id, playlist.song_count);
    }
}
