use std::collections::HashSet;

use tabled::Table;

use crate::{
    dedup, error, info,
    types::SongTableRow,
    utils::truncate,
};

/// Scrapes the stations without touching the catalog and marks every song
/// as new, known, repeated or dropped.
pub async fn scrape(station: Option<String>) {
    let config = super::load_stations().await;

    if let Some(name) = &station {
        let names = config.station_names();
        if !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            error!(
                "Unknown station {}. Configured stations: {}",
                name,
                names.join(", ")
            );
        }
    }

    let hauls = super::scrape_with_spinner(&config, station.as_deref()).await;
    let cache = super::load_cache().await;
    let known = cache.index();
    let mut batch = HashSet::new();

    let mut rows = Vec::new();
    let (mut new, mut seen, mut dropped) = (0, 0, 0);

    for haul in &hauls {
        for song in dedup::unique_songs(haul.songs.clone()) {
            let normalized = dedup::normalize(&song);
            let status = match &normalized {
                None => {
                    dropped += 1;
                    "dropped"
                }
                Some(n) if known.contains(&n.artist, &n.title) => {
                    seen += 1;
                    "known"
                }
                Some(n) if batch.insert((dedup::fold(&n.artist), dedup::fold(&n.title))) => {
                    new += 1;
                    "new"
                }
                Some(_) => "repeat",
            };
            let shown = normalized.unwrap_or(song);

            rows.push(SongTableRow {
                station: haul.station.clone(),
                artist: truncate(&shown.artist, 30),
                title: truncate(&shown.title, 40),
                status: status.to_string(),
            });
        }
    }

    if rows.is_empty() {
        error!("Unable to retrieve song data from the radio stations.");
    }

    println!("{}", Table::new(rows));
    info!("{} new, {} already known, {} dropped", new, seen, dropped);
}
