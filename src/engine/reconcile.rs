//! Bringing a target playlist in line with a desired set of tracks.
//!
//! Both write strategies read the playlist once, then add before they remove.
//! There is no locking: a concurrent edit of the same playlist between the
//! read and the writes can make the computed diff stale.

use std::collections::HashSet;

use thiserror::Error;

use crate::{
    config::Settings,
    service::{MusicService, ServiceError, guarded, read_or_empty},
    types::{Identified, PlaylistItem},
};

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("{count} tracks failed to add: {source}")]
    Add {
        count: usize,
        #[source]
        source: ServiceError,
    },
    #[error("{count} tracks failed to remove: {source}")]
    Remove {
        count: usize,
        /// Tracks that were added before the removal failed.
        added: usize,
        #[source]
        source: ServiceError,
    },
}

/// Elements of `minuend` whose `video_id` does not appear in `subtrahend`,
/// in `minuend` order.
pub fn difference<A, B>(minuend: &[A], subtrahend: &[B]) -> Vec<A>
where
    A: Identified + Clone,
    B: Identified,
{
    let excluded: HashSet<&str> = subtrahend.iter().map(Identified::video_id).collect();
    minuend
        .iter()
        .filter(|item| !excluded.contains(item.video_id()))
        .cloned()
        .collect()
}

/// Minimal change set: tracks present on both sides stay untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePlan<T> {
    pub to_add: Vec<T>,
    pub to_remove: Vec<PlaylistItem>,
}

impl<T> UpdatePlan<T>
where
    T: Identified + Clone,
{
    pub fn new(current: &[PlaylistItem], desired: &[T]) -> Self {
        Self {
            to_add: difference(desired, current),
            to_remove: difference(current, desired),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Adds every desired track and removes every pre-existing occurrence.
///
/// Tracks on both sides are added again and their old occurrence removed, so
/// the playlist briefly holds them twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverwritePlan<T> {
    pub to_add: Vec<T>,
    pub to_remove: Vec<PlaylistItem>,
}

impl<T> OverwritePlan<T>
where
    T: Identified + Clone,
{
    pub fn new(current: &[PlaylistItem], desired: &[T]) -> Self {
        Self {
            to_add: desired.to_vec(),
            to_remove: current.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub added: usize,
    pub removed: usize,
}

pub async fn current_items<S>(service: &S, playlist_id: &str, settings: &Settings) -> Vec<PlaylistItem>
where
    S: MusicService + ?Sized,
{
    read_or_empty(
        settings.fetch_timeout,
        "get_playlist_tracks",
        service.get_playlist_tracks(playlist_id),
    )
    .await
}

/// Applies the minimal diff between the playlist and `desired`.
///
/// Safe to re-run: with an unchanged `desired` the second run does nothing.
pub async fn update_playlist<S, T>(
    service: &S,
    playlist_id: &str,
    desired: &[T],
    settings: &Settings,
) -> Result<ReconcileReport, ReconcileError>
where
    S: MusicService + ?Sized,
    T: Identified + Clone,
{
    let current = current_items(service, playlist_id, settings).await;
    tracing::debug!(playlist_id, found = current.len(), "updating playlist");

    let plan = UpdatePlan::new(&current, desired);
    apply_update(service, playlist_id, &plan, settings).await
}

/// Applies an already computed [`UpdatePlan`].
pub async fn apply_update<S, T>(
    service: &S,
    playlist_id: &str,
    plan: &UpdatePlan<T>,
    settings: &Settings,
) -> Result<ReconcileReport, ReconcileError>
where
    S: MusicService + ?Sized,
    T: Identified,
{
    apply(service, playlist_id, &plan.to_add, &plan.to_remove, settings).await
}

/// Replaces the playlist contents with `desired`.
///
/// Not safe to blindly re-run after a partial failure: a failed removal
/// leaves both the old and the new occurrences in place.
pub async fn overwrite_playlist<S, T>(
    service: &S,
    playlist_id: &str,
    desired: &[T],
    settings: &Settings,
) -> Result<ReconcileReport, ReconcileError>
where
    S: MusicService + ?Sized,
    T: Identified + Clone,
{
    let current = current_items(service, playlist_id, settings).await;
    tracing::debug!(playlist_id, found = current.len(), "overwriting playlist");

    let plan = OverwritePlan::new(&current, desired);
    apply(service, playlist_id, &plan.to_add, &plan.to_remove, settings).await
}

pub async fn clear_playlist<S>(
    service: &S,
    playlist_id: &str,
    settings: &Settings,
) -> Result<ReconcileReport, ReconcileError>
where
    S: MusicService + ?Sized,
{
    let current = current_items(service, playlist_id, settings).await;
    apply::<S, PlaylistItem>(service, playlist_id, &[], &current, settings).await
}

async fn apply<S, T>(
    service: &S,
    playlist_id: &str,
    to_add: &[T],
    to_remove: &[PlaylistItem],
    settings: &Settings,
) -> Result<ReconcileReport, ReconcileError>
where
    S: MusicService + ?Sized,
    T: Identified,
{
    let mut report = ReconcileReport::default();

    if !to_add.is_empty() {
        let video_ids: Vec<String> = to_add.iter().map(|t| t.video_id().to_string()).collect();
        tracing::debug!(playlist_id, ?video_ids, "adding tracks");
        guarded(
            settings.fetch_timeout,
            "add_tracks",
            service.add_tracks(playlist_id, &video_ids, true),
        )
        .await
        .map_err(|source| ReconcileError::Add {
            count: video_ids.len(),
            source,
        })?;
        report.added = video_ids.len();
    }

    if !to_remove.is_empty() {
        tracing::debug!(playlist_id, count = to_remove.len(), "removing tracks");
        guarded(
            settings.fetch_timeout,
            "remove_tracks",
            service.remove_tracks(playlist_id, to_remove),
        )
        .await
        .map_err(|source| ReconcileError::Remove {
            count: to_remove.len(),
            added: report.added,
            source,
        })?;
        report.removed = to_remove.len();
    }

    Ok(report)
}
