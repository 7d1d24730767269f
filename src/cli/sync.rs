use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    allocator::{self, AllocationPlan, PlaylistCreationError, SongCursor, Step},
    config, dedup, error, info,
    management::TokenManager,
    spotify::{self, playlist::ADD_TRACKS_BATCH},
    stations, success,
    types::{AllocationChunk, OccupancySource, PlanTableRow, PlaylistOccupancy, ScrapedSong, Track},
    utils, warning,
};

use super::playlists::read_occupancy;

/// Scrapes the stations, drops songs the cache already knows, resolves the
/// rest in the catalog and files them into playlists.
///
/// With `dry_run` the allocation is only printed; no playlist is created or
/// modified and the cache is left untouched.
pub async fn sync(dry_run: bool, source: OccupancySource) {
    let station_config = super::load_stations().await;
    let hauls = super::scrape_with_spinner(&station_config, None).await;
    let scraped = stations::merge_hauls(&hauls);

    if scraped.is_empty() {
        error!("Unable to retrieve song data from the radio stations.");
    }
    info!(
        "Scraped {} distinct songs from {} stations",
        scraped.len(),
        hauls.len()
    );

    let mut cache = super::load_cache().await;
    let candidates = dedup::filter_new(scraped, &cache.index());

    if candidates.is_empty() {
        success!("No new songs since the last run.");
        return;
    }
    info!("{} songs are not in the cache yet", candidates.len());

    let mut token_mgr = spotify::load_token_manager().await;
    let tracks = resolve(&mut token_mgr, candidates).await;

    if tracks.is_empty() {
        success!("None of the new songs were found in the catalog.");
        return;
    }

    let occupancy = match read_occupancy(source, &cache, Some(&mut token_mgr)).await {
        Ok(occupancy) => occupancy,
        Err(e) => error!("Cannot read playlist occupancy. Err: {}", e),
    };

    if dry_run {
        print_plan(&occupancy, &tracks);
        return;
    }

    let placed = place(&mut token_mgr, &occupancy, tracks).await;
    let placed_count = placed.len();
    cache.append(placed);

    if let Err(e) = cache.persist().await {
        error!("Failed to save track cache. Err: {}", e);
    }

    success!(
        "Added {} songs. The cache now holds {} tracks.",
        placed_count,
        cache.count()
    );
}

/// Looks every song up in the catalog. Songs that are not found, or whose
/// search fails, are skipped and will be looked up again next run.
async fn resolve(token_mgr: &mut TokenManager, songs: Vec<ScrapedSong>) -> Vec<Track> {
    let pb = ProgressBar::new(songs.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.blue} {pos}/{len} {msg}") {
        pb.set_style(style);
    }

    let mut tracks = Vec::new();
    let mut missing = 0;

    for song in songs {
        pb.set_message(format!("{} - {}", song.artist, song.title));
        let token = token_mgr.get_valid_token().await;

        match spotify::search::find_track(&token, &song.artist, &song.title).await {
            Ok(Some(uri)) => tracks.push(Track {
                artist: song.artist,
                title: song.title,
                catalog_id: uri,
                timestamp: utils::format_timestamp(Local::now()),
                playlist_id: String::new(),
            }),
            Ok(None) => missing += 1,
            Err(e) => pb.suspend(|| {
                warning!("Search for {} - {} failed: {}", song.artist, song.title, e)
            }),
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(
        "Resolved {} songs, {} not found in the catalog",
        tracks.len(),
        missing
    );
    tracks
}

/// Drives the allocation against Spotify and returns the tracks that were
/// actually added, each tagged with its playlist.
///
/// A failed playlist creation stops the allocation; a failed add skips the
/// rest of that chunk.
async fn place(
    token_mgr: &mut TokenManager,
    occupancy: &[PlaylistOccupancy],
    mut tracks: Vec<Track>,
) -> Vec<Track> {
    let prefix = config::playlist_prefix();
    let mut plan = AllocationPlan::new(occupancy, tracks.len());
    let mut cursor = SongCursor::new(tracks.len());
    let mut placed = Vec::new();

    loop {
        match plan.step() {
            Step::Done => break,
            Step::NeedsPlaylist => {
                let token = token_mgr.get_valid_token().await;
                match create_playlist(&token, &prefix).await {
                    Ok(playlist_id) => plan.provide_playlist(playlist_id),
                    Err(e) => {
                        warning!(
                            "{}. {} songs are left for the next run.",
                            e,
                            plan.remaining()
                        );
                        break;
                    }
                }
            }
            Step::Chunk(chunk) => {
                let chunk_tracks = &mut tracks[cursor.next_range(&chunk)];

                for batch in chunk_tracks.chunks_mut(ADD_TRACKS_BATCH) {
                    let uris: Vec<String> = batch.iter().map(|t| t.catalog_id.clone()).collect();
                    let token = token_mgr.get_valid_token().await;

                    if let Err(e) =
                        spotify::playlist::add_tracks(&token, &chunk.playlist_id, &uris).await
                    {
                        warning!(
                            "Failed to add songs to playlist {}: {}",
                            chunk.playlist_id,
                            e
                        );
                        break;
                    }

                    for track in batch.iter_mut() {
                        track.playlist_id = chunk.playlist_id.clone();
                    }
                    placed.extend(batch.iter().cloned());
                }

                success!(
                    "Filled {} slots in playlist {}",
                    chunk.slot_count,
                    chunk.playlist_id
                );
            }
        }
    }

    placed
}

async fn create_playlist(token: &str, prefix: &str) -> Result<String, PlaylistCreationError> {
    let name = spotify::playlist::new_playlist_name(prefix, Local::now());
    let playlist = spotify::playlist::create(token, name)
        .await
        .map_err(|e| PlaylistCreationError(e.to_string()))?;

    success!("Created playlist {} ({})", playlist.name, playlist.id);
    Ok(playlist.id)
}

fn print_plan(occupancy: &[PlaylistOccupancy], tracks: &[Track]) {
    let mut created = 0;
    let chunks: Vec<AllocationChunk> = allocator::allocate(occupancy, tracks.len(), || {
        created += 1;
        Ok(format!("<new playlist {}>", created))
    })
    .filter_map(Result::ok)
    .collect();

    let label = |t: &Track| utils::truncate(&format!("{} - {}", t.artist, t.title), 40);
    let rows: Vec<PlanTableRow> = allocator::slice_song_ids(tracks, &chunks)
        .into_iter()
        .map(|(chunk, songs)| PlanTableRow {
            playlist: chunk.playlist_id.clone(),
            slots: chunk.slot_count,
            first: songs.first().map(label).unwrap_or_default(),
            last: songs.last().map(label).unwrap_or_default(),
        })
        .collect();

    println!("{}", Table::new(rows));
    info!(
        "Dry run: {} songs would go into {} playlists, {} of them new.",
        tracks.len(),
        chunks.len(),
        created
    );
}
