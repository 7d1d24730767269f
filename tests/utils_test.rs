use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{Local, TimeZone};
use sha2::{Digest, Sha256};
use sporadio::spotify::{playlist::new_playlist_name, search::pick_match};
use sporadio::types::{SearchArtist, SearchTrack};
use sporadio::utils::*;

fn search_track(uri: &str, name: &str, artists: &[&str]) -> SearchTrack {
    SearchTrack {
        id: uri.rsplit(':').next().unwrap_or_default().to_string(),
        name: name.to_string(),
        uri: uri.to_string(),
        artists: artists
            .iter()
            .map(|a| SearchArtist {
                name: a.to_string(),
            })
            .collect(),
    }
}

#[test]
fn test_code_verifier_shape() {
    let verifier = generate_code_verifier();

    assert_eq!(verifier.len(), 128);
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(verifier, generate_code_verifier());
}

#[test]
fn test_code_challenge_is_url_safe_sha256() {
    let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
    let expected = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));

    let challenge = generate_code_challenge(verifier);

    assert_eq!(challenge, expected);
    assert_eq!(challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
    assert!(!challenge.contains('='));
}

#[test]
fn test_playlist_name() {
    let now = Local.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();

    assert_eq!(
        new_playlist_name("Alt-Radio-Station-", now),
        "Alt-Radio-Station-03012024090507000000"
    );
}

#[test]
fn test_format_timestamp() {
    let time = Local.with_ymd_and_hms(2024, 12, 24, 18, 30, 0).unwrap();
    assert_eq!(format_timestamp(time), "2024-12-24 18:30:00");
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("Muse", 10), "Muse");
    assert_eq!(truncate("Red Hot Chili Peppers", 8), "Red Hot…");
    assert_eq!(truncate("Sigur Rós", 9), "Sigur Rós");
}

#[test]
fn test_pick_match_skips_covers() {
    let results = vec![
        search_track("spotify:track:1", "Creep - Karaoke Version", &["Karaoke Hits"]),
        search_track("spotify:track:2", "Creep", &["Radiohead"]),
        search_track("spotify:track:3", "Creep (Acoustic)", &["Radiohead"]),
    ];

    let hit = pick_match(&results, "radiohead", "creep").unwrap();
    assert_eq!(hit.uri, "spotify:track:2");
}

#[test]
fn test_pick_match_uses_all_artists_and_folds_accents() {
    let results = vec![search_track(
        "spotify:track:9",
        "Déjà Vu",
        &["Beyoncé", "JAY-Z"],
    )];

    assert!(pick_match(&results, "jay-z", "deja vu").is_some());
    assert!(pick_match(&results, "Beyonce", "Déjà Vu").is_some());
    assert!(pick_match(&results, "Rihanna", "Deja Vu").is_none());
    assert!(pick_match(&[], "Rihanna", "Umbrella").is_none());
}
