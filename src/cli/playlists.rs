use tabled::Table;

use crate::{
    allocator::PLAYLIST_CAPACITY,
    config, error, info,
    management::{TokenManager, TrackCacheManager},
    spotify,
    types::{OccupancySource, OccupancyTableRow, PlaylistOccupancy},
};

/// Prints how full every managed playlist is.
pub async fn playlists(source: OccupancySource) {
    let cache = super::load_cache().await;

    let occupancy = match read_occupancy(source, &cache, None).await {
        Ok(occupancy) => occupancy,
        Err(e) => error!("Cannot read playlist occupancy. Err: {}", e),
    };

    if occupancy.is_empty() {
        info!(
            "No playlists named {}* yet. The next sync creates one.",
            config::playlist_prefix()
        );
        return;
    }

    let rows: Vec<OccupancyTableRow> = occupancy
        .iter()
        .map(|p| OccupancyTableRow {
            playlist: p.playlist_id.clone(),
            songs: p.song_count,
            free: PLAYLIST_CAPACITY.saturating_sub(p.song_count),
        })
        .collect();
    let free: usize = rows.iter().map(|r| r.free).sum();

    println!("{}", Table::new(rows));
    info!(
        "{} playlists, {} free slots before a new playlist is needed",
        occupancy.len(),
        free
    );
}

/// Reads playlist fill levels from the catalog or derives them from the
/// cache. A missing token manager is loaded on demand for remote reads.
pub(crate) async fn read_occupancy(
    source: OccupancySource,
    cache: &TrackCacheManager,
    token_mgr: Option<&mut TokenManager>,
) -> Result<Vec<PlaylistOccupancy>, String> {
    match source {
        OccupancySource::Cache => Ok(cache.occupancy()),
        OccupancySource::Remote => {
            let token = match token_mgr {
                Some(mgr) => mgr.get_valid_token().await,
                None => spotify::load_token_manager().await.get_valid_token().await,
            };
            spotify::playlist::occupancy(&token, &config::playlist_prefix())
                .await
                .map_err(|e| e.to_string())
        }
    }
}
