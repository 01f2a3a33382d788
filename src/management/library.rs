use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::{
    service::{MusicService, ServiceError},
    types::{HomeSection, Listing, PlaylistItem, PlaylistRef, Track},
    utils,
};

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("cannot access library snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("library snapshot {path} is malformed: {source}")]
    Serde {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPlaylist {
    #[serde(flatten)]
    pub reference: PlaylistRef,
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
}

impl StoredPlaylist {
    fn counted_reference(&self) -> PlaylistRef {
        PlaylistRef {
            count: Some(self.items.len() as u32),
            ..self.reference.clone()
        }
    }
}

/// Snapshot of everything the service knows about one user.
///
/// Radios are keyed by playlist id, albums and artists by browse id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    #[serde(default)]
    pub home: Vec<HomeSection>,
    #[serde(default)]
    pub playlists: Vec<StoredPlaylist>,
    #[serde(default)]
    pub radios: BTreeMap<String, Vec<Track>>,
    #[serde(default)]
    pub albums: BTreeMap<String, Vec<Track>>,
    #[serde(default)]
    pub artists: BTreeMap<String, Vec<Track>>,
}

impl Library {
    pub async fn load(path: &Path) -> Result<Self, LibraryError> {
        let content = async_fs::read_to_string(path)
            .await
            .map_err(|source| LibraryError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        serde_json::from_str(&content).map_err(|source| LibraryError::Serde {
            path: path.to_path_buf(),
            source,
        })
    }

    pub async fn save(&self, path: &Path) -> Result<(), LibraryError> {
        let io_error = |source| LibraryError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await.map_err(io_error)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|source| LibraryError::Serde {
            path: path.to_path_buf(),
            source,
        })?;
        async_fs::write(path, json).await.map_err(io_error)
    }

    pub fn playlist(&self, playlist_id: &str) -> Option<&StoredPlaylist> {
        self.playlists
            .iter()
            .find(|p| p.reference.playlist_id == playlist_id)
    }

    fn playlist_mut(&mut self, playlist_id: &str) -> Option<&mut StoredPlaylist> {
        self.playlists
            .iter_mut()
            .find(|p| p.reference.playlist_id == playlist_id)
    }

    /// Looks a track up anywhere in the snapshot by `video_id`.
    pub fn find_track(&self, video_id: &str) -> Option<Track> {
        let from_home = self
            .home
            .iter()
            .flat_map(|s| s.contents.iter())
            .find_map(|listing| match listing {
                Listing::Song(track) if track.video_id == video_id => Some(track),
                _ => None,
            });

        from_home
            .or_else(|| {
                self.playlists
                    .iter()
                    .flat_map(|p| p.items.iter())
                    .map(|item| &item.track)
                    .find(|t| t.video_id == video_id)
            })
            .or_else(|| {
                self.radios
                    .values()
                    .chain(self.albums.values())
                    .chain(self.artists.values())
                    .flatten()
                    .find(|t| t.video_id == video_id)
            })
            .cloned()
    }
}

/// A [`MusicService`] backed by a [`Library`] snapshot.
///
/// When opened from a file, every mutation is written back before the call
/// returns. A mutation whose write fails leaves the in-memory snapshot as it
/// was.
pub struct LibraryService {
    user: String,
    library: Mutex<Library>,
    path: Option<PathBuf>,
}

impl LibraryService {
    pub fn in_memory(user: impl Into<String>, library: Library) -> Self {
        Self {
            user: user.into(),
            library: Mutex::new(library),
            path: None,
        }
    }

    pub async fn open(user: impl Into<String>, path: PathBuf) -> Result<Self, LibraryError> {
        let library = Library::load(&path).await?;
        Ok(Self {
            user: user.into(),
            library: Mutex::new(library),
            path: Some(path),
        })
    }

    pub async fn snapshot(&self) -> Library {
        self.library.lock().await.clone()
    }

    async fn persist(&self, library: &Library) -> Result<(), ServiceError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        library.save(path).await.map_err(|e| match e {
            LibraryError::Io { source, .. } => ServiceError::Io(source),
            LibraryError::Serde { source, .. } => ServiceError::Serde(source),
        })
    }
}

#[async_trait]
impl MusicService for LibraryService {
    async fn get_home(&self) -> Result<Vec<HomeSection>, ServiceError> {
        Ok(self.library.lock().await.home.clone())
    }

    async fn get_library_playlists(&self) -> Result<Vec<PlaylistRef>, ServiceError> {
        let library = self.library.lock().await;
        Ok(library
            .playlists
            .iter()
            .map(StoredPlaylist::counted_reference)
            .collect())
    }

    async fn get_playlist(&self, playlist_id: &str) -> Result<PlaylistRef, ServiceError> {
        let library = self.library.lock().await;
        library
            .playlist(playlist_id)
            .map(StoredPlaylist::counted_reference)
            .ok_or_else(|| ServiceError::NotFound(format!("playlist {playlist_id}")))
    }

    async fn get_playlist_tracks(
        &self,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistItem>, ServiceError> {
        let library = self.library.lock().await;
        library
            .playlist(playlist_id)
            .map(|p| p.items.clone())
            .ok_or_else(|| ServiceError::NotFound(format!("playlist {playlist_id}")))
    }

    async fn get_radio_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, ServiceError> {
        let library = self.library.lock().await;
        library
            .radios
            .get(playlist_id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("radio {playlist_id}")))
    }

    async fn get_album_tracks(&self, browse_id: &str) -> Result<Vec<Track>, ServiceError> {
        let library = self.library.lock().await;
        library
            .albums
            .get(browse_id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("album {browse_id}")))
    }

    async fn get_artist_tracks(&self, browse_id: &str) -> Result<Vec<Track>, ServiceError> {
        let library = self.library.lock().await;
        library
            .artists
            .get(browse_id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("artist {browse_id}")))
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        video_ids: &[String],
        allow_duplicates: bool,
    ) -> Result<(), ServiceError> {
        let mut library = self.library.lock().await;
        let mut updated = library.clone();

        let tracks: Vec<Track> = video_ids
            .iter()
            .map(|id| {
                updated.find_track(id).unwrap_or_else(|| Track {
                    video_id: id.clone(),
                    title: id.clone(),
                    artists: Vec::new(),
                    thumbnails: Vec::new(),
                })
            })
            .collect();

        let playlist = updated
            .playlist_mut(playlist_id)
            .ok_or_else(|| ServiceError::NotFound(format!("playlist {playlist_id}")))?;

        let mut present: HashSet<String> = playlist
            .items
            .iter()
            .map(|item| item.track.video_id.clone())
            .collect();

        for track in tracks {
            if !allow_duplicates && !present.insert(track.video_id.clone()) {
                continue;
            }
            playlist.items.push(PlaylistItem {
                track,
                set_video_id: utils::generate_id("", 16),
                is_available: true,
                is_explicit: false,
            });
        }

        self.persist(&updated).await?;
        *library = updated;
        Ok(())
    }

    async fn remove_tracks(
        &self,
        playlist_id: &str,
        items: &[PlaylistItem],
    ) -> Result<(), ServiceError> {
        let mut library = self.library.lock().await;
        let mut updated = library.clone();
        let playlist = updated
            .playlist_mut(playlist_id)
            .ok_or_else(|| ServiceError::NotFound(format!("playlist {playlist_id}")))?;

        let doomed: HashSet<&str> = items.iter().map(|i| i.set_video_id.as_str()).collect();
        playlist
            .items
            .retain(|item| !doomed.contains(item.set_video_id.as_str()));

        self.persist(&updated).await?;
        *library = updated;
        Ok(())
    }

    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
    ) -> Result<PlaylistRef, ServiceError> {
        if title.trim().is_empty() {
            return Err(ServiceError::Rejected("playlist title cannot be blank".into()));
        }

        let mut library = self.library.lock().await;
        let reference = PlaylistRef {
            playlist_id: utils::generate_id("PL", 32),
            title: title.to_string(),
            thumbnails: Vec::new(),
            description: description.to_string(),
            count: None,
        };
        let mut updated = library.clone();
        updated.playlists.push(StoredPlaylist {
            reference: reference.clone(),
            items: Vec::new(),
        });
        self.persist(&updated).await?;
        *library = updated;

        tracing::info!(user = %self.user, playlist_id = %reference.playlist_id, "playlist created");
        Ok(PlaylistRef {
            count: Some(0),
            ..reference
        })
    }
}
