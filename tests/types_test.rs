use serde_json::json;
use ytmb::types::{HomeSection, Listing, PlaylistItem};

fn listing(value: serde_json::Value) -> Listing {
    serde_json::from_value(value).expect("valid listing")
}

#[test]
fn test_video_id_makes_a_song() {
    let parsed = listing(json!({
        "title": "Song",
        "videoId": "v1",
        "playlistId": "RDAMVMv1",
        "artists": [{"name": "Someone", "id": "UC1"}]
    }));
    match parsed {
        Listing::Song(track) => {
            assert_eq!(track.video_id, "v1");
            assert_eq!(track.artist_names(), "Someone");
        }
        other => panic!("expected a song, got {}", other.kind()),
    }
}

#[test]
fn test_subscribers_make_an_artist() {
    let parsed = listing(json!({"title": "Band", "browseId": "UCband", "subscribers": "1.2M"}));
    assert_eq!(parsed.kind(), "artist");
}

#[test]
fn test_type_makes_an_album() {
    let parsed = listing(json!({
        "title": "Record",
        "browseId": "MPREb",
        "type": "Album",
        "year": "2020"
    }));
    match parsed {
        Listing::Album(album) => {
            assert_eq!(album.browse_id, "MPREb");
            assert_eq!(album.year.as_deref(), Some("2020"));
        }
        other => panic!("expected an album, got {}", other.kind()),
    }
}

#[test]
fn test_playlist_or_radio_by_count() {
    let playlist = listing(json!({"title": "Mix", "playlistId": "PL1", "count": 25}));
    assert_eq!(playlist.kind(), "playlist");

    let zero = listing(json!({"title": "Mix", "playlistId": "PL1", "count": 0}));
    assert_eq!(zero.kind(), "radio");

    let radio = listing(json!({"title": "Radio", "playlistId": "RDAT", "description": "radio"}));
    assert_eq!(radio.kind(), "radio");
}

#[test]
fn test_unrecognized_shapes_are_rejected() {
    assert!(serde_json::from_value::<Listing>(json!({"title": "Nothing"})).is_err());
    assert!(
        serde_json::from_value::<Listing>(json!({"title": "Band", "subscribers": "10"})).is_err()
    );
}

#[test]
fn test_listing_survives_reserialization() {
    let original = listing(json!({"title": "Mix", "playlistId": "PL1", "count": 3}));
    let value = serde_json::to_value(&original).unwrap();
    assert_eq!(value["playlistId"], "PL1");
    assert_eq!(listing(value), original);
}

#[test]
fn test_home_section_parsing() {
    let section: HomeSection = serde_json::from_value(json!({
        "title": "Quick picks",
        "contents": [
            {"title": "A", "videoId": "a"},
            {"title": "B", "browseId": "MPREb", "type": "EP"}
        ]
    }))
    .unwrap();
    let kinds: Vec<&str> = section.contents.iter().map(Listing::kind).collect();
    assert_eq!(kinds, vec!["song", "album"]);
}

#[test]
fn test_playlist_item_defaults() {
    let item: PlaylistItem = serde_json::from_value(json!({
        "videoId": "v1",
        "title": "Song",
        "setVideoId": "S1"
    }))
    .unwrap();
    assert_eq!(item.set_video_id, "S1");
    assert_eq!(item.track.video_id, "v1");
    assert!(item.is_available);
    assert!(!item.is_explicit);
}
