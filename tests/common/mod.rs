#![allow(dead_code)]

use std::{
    path::PathBuf,
    sync::{Mutex, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use ytmb::{
    config::Settings,
    management::{Library, LibraryService, StoredPlaylist},
    service::{MusicService, ServiceError},
    types::{
        AlbumListing, ArtistListing, HomeSection, Listing, PlaylistItem, PlaylistListing,
        PlaylistRef, RadioListing, Track,
    },
    utils::generate_id,
};

pub fn track(video_id: &str, title: &str) -> Track {
    Track {
        video_id: video_id.to_string(),
        title: title.to_string(),
        artists: Vec::new(),
        thumbnails: Vec::new(),
    }
}

pub fn item(video_id: &str, set_video_id: &str) -> PlaylistItem {
    PlaylistItem {
        track: track(video_id, &format!("Title {video_id}")),
        set_video_id: set_video_id.to_string(),
        is_available: true,
        is_explicit: false,
    }
}

pub fn song(video_id: &str) -> Listing {
    Listing::Song(track(video_id, &format!("Title {video_id}")))
}

pub fn playlist_listing(title: &str, playlist_id: &str, count: u32) -> Listing {
    Listing::Playlist(PlaylistListing {
        title: title.to_string(),
        playlist_id: playlist_id.to_string(),
        count,
        description: String::new(),
        thumbnails: Vec::new(),
    })
}

pub fn album_listing(title: &str, browse_id: &str) -> Listing {
    Listing::Album(AlbumListing {
        title: title.to_string(),
        browse_id: browse_id.to_string(),
        kind: "Album".to_string(),
        year: None,
        artists: Vec::new(),
        audio_playlist_id: None,
        is_explicit: false,
        thumbnails: Vec::new(),
    })
}

pub fn radio_listing(title: &str, playlist_id: &str) -> Listing {
    Listing::Radio(RadioListing {
        title: title.to_string(),
        playlist_id: playlist_id.to_string(),
        description: String::new(),
        thumbnails: Vec::new(),
    })
}

pub fn artist_listing(title: &str, browse_id: &str) -> Listing {
    Listing::Artist(ArtistListing {
        title: title.to_string(),
        browse_id: browse_id.to_string(),
        subscribers: "1K".to_string(),
        thumbnails: Vec::new(),
    })
}

pub fn section(title: &str, contents: Vec<Listing>) -> HomeSection {
    HomeSection {
        title: title.to_string(),
        contents,
    }
}

pub fn stored_playlist(playlist_id: &str, title: &str, items: Vec<PlaylistItem>) -> StoredPlaylist {
    StoredPlaylist {
        reference: PlaylistRef {
            playlist_id: playlist_id.to_string(),
            title: title.to_string(),
            thumbnails: Vec::new(),
            description: String::new(),
            count: None,
        },
        items,
    }
}

/// Items with `video_id` = each id and `set_video_id` = `<id>-set`.
pub fn items(ids: &[&str]) -> Vec<PlaylistItem> {
    ids.iter().map(|id| item(id, &format!("{id}-set"))).collect()
}

pub fn video_ids<T: ytmb::types::Identified>(tracks: &[T]) -> Vec<String> {
    tracks.iter().map(|t| t.video_id().to_string()).collect()
}

/// A home feed of `count` songs in one section, ids `<prefix>0..`.
pub fn song_library(prefix: &str, count: usize) -> Library {
    let songs = (0..count).map(|i| song(&format!("{prefix}{i}"))).collect();
    Library {
        home: vec![section("Quick picks", songs)],
        ..Default::default()
    }
}

pub fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ytmb-test-{}", generate_id("", 12)));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub fn settings() -> Settings {
    Settings::new(temp_dir()).with_fetch_timeout(Duration::from_millis(500))
}

/// Wraps a [`LibraryService`], recording every call and optionally failing
/// writes.
pub struct RecordingService {
    pub inner: LibraryService,
    pub calls: Mutex<Vec<String>>,
    pub fail_add: bool,
    pub fail_remove: bool,
}

impl RecordingService {
    pub fn new(library: Library) -> Self {
        Self {
            inner: LibraryService::in_memory("tester", library),
            calls: Mutex::new(Vec::new()),
            fail_add: false,
            fail_remove: false,
        }
    }

    pub fn failing_add(mut self) -> Self {
        self.fail_add = true;
        self
    }

    pub fn failing_remove(mut self) -> Self {
        self.fail_remove = true;
        self
    }

    fn record(&self, call: String) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub async fn playlist_ids(&self, playlist_id: &str) -> Vec<String> {
        let items = self
            .inner
            .get_playlist_tracks(playlist_id)
            .await
            .expect("playlist exists");
        video_ids(&items)
    }
}

#[async_trait]
impl MusicService for RecordingService {
    async fn get_home(&self) -> Result<Vec<HomeSection>, ServiceError> {
        self.record("get_home".into());
        self.inner.get_home().await
    }

    async fn get_library_playlists(&self) -> Result<Vec<PlaylistRef>, ServiceError> {
        self.record("get_library_playlists".into());
        self.inner.get_library_playlists().await
    }

    async fn get_playlist(&self, playlist_id: &str) -> Result<PlaylistRef, ServiceError> {
        self.record(format!("get_playlist {playlist_id}"));
        self.inner.get_playlist(playlist_id).await
    }

    async fn get_playlist_tracks(
        &self,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistItem>, ServiceError> {
        self.record(format!("get_playlist_tracks {playlist_id}"));
        self.inner.get_playlist_tracks(playlist_id).await
    }

    async fn get_radio_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, ServiceError> {
        self.record(format!("get_radio_tracks {playlist_id}"));
        self.inner.get_radio_tracks(playlist_id).await
    }

    async fn get_album_tracks(&self, browse_id: &str) -> Result<Vec<Track>, ServiceError> {
        self.record(format!("get_album_tracks {browse_id}"));
        self.inner.get_album_tracks(browse_id).await
    }

    async fn get_artist_tracks(&self, browse_id: &str) -> Result<Vec<Track>, ServiceError> {
        self.record(format!("get_artist_tracks {browse_id}"));
        self.inner.get_artist_tracks(browse_id).await
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        video_ids: &[String],
        allow_duplicates: bool,
    ) -> Result<(), ServiceError> {
        self.record(format!("add_tracks {}", video_ids.join(",")));
        if self.fail_add {
            return Err(ServiceError::Rejected("add refused".into()));
        }
        self.inner
            .add_tracks(playlist_id, video_ids, allow_duplicates)
            .await
    }

    async fn remove_tracks(
        &self,
        playlist_id: &str,
        items: &[PlaylistItem],
    ) -> Result<(), ServiceError> {
        let sets: Vec<&str> = items.iter().map(|i| i.set_video_id.as_str()).collect();
        self.record(format!("remove_tracks {}", sets.join(",")));
        if self.fail_remove {
            return Err(ServiceError::Rejected("remove refused".into()));
        }
        self.inner.remove_tracks(playlist_id, items).await
    }

    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
    ) -> Result<PlaylistRef, ServiceError> {
        self.record(format!("create_playlist {title}"));
        self.inner.create_playlist(title, description).await
    }
}

/// Never answers within any reasonable timeout.
pub struct StalledService;

#[async_trait]
impl MusicService for StalledService {
    async fn get_home(&self) -> Result<Vec<HomeSection>, ServiceError> {
        stall().await
    }

    async fn get_library_playlists(&self) -> Result<Vec<PlaylistRef>, ServiceError> {
        stall().await
    }

    async fn get_playlist(&self, _playlist_id: &str) -> Result<PlaylistRef, ServiceError> {
        stall().await
    }

    async fn get_playlist_tracks(
        &self,
        _playlist_id: &str,
    ) -> Result<Vec<PlaylistItem>, ServiceError> {
        stall().await
    }

    async fn get_radio_tracks(&self, _playlist_id: &str) -> Result<Vec<Track>, ServiceError> {
        stall().await
    }

    async fn get_album_tracks(&self, _browse_id: &str) -> Result<Vec<Track>, ServiceError> {
        stall().await
    }

    async fn get_artist_tracks(&self, _browse_id: &str) -> Result<Vec<Track>, ServiceError> {
        stall().await
    }

    async fn add_tracks(
        &self,
        _playlist_id: &str,
        _video_ids: &[String],
        _allow_duplicates: bool,
    ) -> Result<(), ServiceError> {
        stall().await
    }

    async fn remove_tracks(
        &self,
        _playlist_id: &str,
        _items: &[PlaylistItem],
    ) -> Result<(), ServiceError> {
        stall().await
    }

    async fn create_playlist(
        &self,
        _title: &str,
        _description: &str,
    ) -> Result<PlaylistRef, ServiceError> {
        stall().await
    }
}

async fn stall<T>() -> Result<T, ServiceError> {
    tokio::time::sleep(Duration::from_secs(3600)).await;
    Err(ServiceError::Rejected("stalled".into()))
}
