//! The music service contract consumed by the engine.
//!
//! A [`MusicService`] is bound to one user. The engine never talks to the
//! remote service directly; it goes through [`guarded`], which bounds every
//! call with the configured timeout, and through [`read_or_empty`], which
//! applies the read policy: a failed read is logged and treated as an empty
//! result, so one bad listing or playlist never aborts a session.

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{HomeSection, PlaylistItem, PlaylistRef, Track};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed data: {0}")]
    Serde(#[from] serde_json::Error),
}

#[async_trait]
pub trait MusicService: Send + Sync {
    /// Ordered sections of the user's personalized home feed.
    async fn get_home(&self) -> Result<Vec<HomeSection>, ServiceError>;

    /// Playlists in the user's library.
    async fn get_library_playlists(&self) -> Result<Vec<PlaylistRef>, ServiceError>;

    async fn get_playlist(&self, playlist_id: &str) -> Result<PlaylistRef, ServiceError>;

    async fn get_playlist_tracks(
        &self,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistItem>, ServiceError>;

    /// Tracks of a radio ("watch playlist"), addressed by playlist id.
    async fn get_radio_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, ServiceError>;

    async fn get_album_tracks(&self, browse_id: &str) -> Result<Vec<Track>, ServiceError>;

    /// The "songs" result list of an artist page.
    async fn get_artist_tracks(&self, browse_id: &str) -> Result<Vec<Track>, ServiceError>;

    async fn add_tracks(
        &self,
        playlist_id: &str,
        video_ids: &[String],
        allow_duplicates: bool,
    ) -> Result<(), ServiceError>;

    /// Removes occurrences, matched on `set_video_id`.
    async fn remove_tracks(
        &self,
        playlist_id: &str,
        items: &[PlaylistItem],
    ) -> Result<(), ServiceError>;

    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
    ) -> Result<PlaylistRef, ServiceError>;
}

/// Runs one service call with an upper bound on its duration.
pub async fn guarded<T, F>(timeout: Duration, operation: &str, call: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    tracing::trace!(operation, "service call started");
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::debug!(operation, ?timeout, "service call timed out");
            Err(ServiceError::Timeout(timeout))
        }
    }
}

/// Runs a read with [`guarded`], logging any failure and substituting an
/// empty list.
pub async fn read_or_empty<T, F>(timeout: Duration, operation: &str, call: F) -> Vec<T>
where
    F: Future<Output = Result<Vec<T>, ServiceError>>,
{
    match guarded(timeout, operation, call).await {
        Ok(items) => items,
        Err(error) => {
            tracing::warn!(operation, %error, "read failed, using an empty result");
            Vec::new()
        }
    }
}
