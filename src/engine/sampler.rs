//! Depleting random sampler over a user's home feed.
//!
//! Sampling happens at the listing level: each draw removes one uniformly
//! chosen `(listing, section)` pair from the pool and then picks one track out
//! of whatever that listing resolves to. A listing is never revisited, so a
//! session issues at most one fetch per pool entry, and a listing with many
//! tracks is no more likely to be chosen than a single song.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use rand::{Rng, seq::IndexedRandom};
use serde::Serialize;

use crate::{
    config::Settings,
    engine::resolver::resolve,
    service::MusicService,
    types::{HomeSection, Listing, Track},
};

/// Collection label used for bare songs found directly in a section.
pub const SONGS_LABEL: &str = "Songs";

/// Outcome of a single draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draw {
    Picked(Track),
    /// The drawn listing resolved to no tracks. It is gone from the pool.
    Empty,
    /// Nothing left to draw from.
    Exhausted,
}

/// Section title → collection label → titles chosen from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ledger {
    sections: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
}

impl Ledger {
    pub fn record(&mut self, section: &str, collection: &str, title: &str) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .entry(collection.to_string())
            .or_default()
            .insert(title.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn titles(&self, section: &str, collection: &str) -> Option<&BTreeSet<String>> {
        self.sections.get(section)?.get(collection)
    }

    /// Number of distinct `(section, collection, title)` entries.
    pub fn len(&self) -> usize {
        self.sections
            .values()
            .flat_map(|collections| collections.values())
            .map(BTreeSet::len)
            .sum()
    }
}

impl fmt::Display for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "(nothing selected)");
        }
        for (section, collections) in &self.sections {
            writeln!(f, "{section}")?;
            for (collection, titles) in collections {
                writeln!(f, "  {collection}")?;
                for title in titles {
                    writeln!(f, "    - {title}")?;
                }
            }
        }
        Ok(())
    }
}

/// Result of draining a sampler towards a target count.
#[derive(Debug, Clone)]
pub struct Sampled {
    pub tracks: Vec<Track>,
    pub requested: usize,
    /// The pool ran dry before `requested` tracks were collected.
    pub exhausted: bool,
    pub ledger: Ledger,
}

impl Sampled {
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.tracks.len())
    }
}

pub struct HomeSampler<'a, S: ?Sized, R> {
    service: &'a S,
    settings: &'a Settings,
    pool: Vec<(Listing, String)>,
    ledger: Ledger,
    rng: R,
}

impl<'a, S, R> HomeSampler<'a, S, R>
where
    S: MusicService + ?Sized,
    R: Rng,
{
    /// Flattens the (already filtered) sections into the sampling pool.
    pub fn new(service: &'a S, sections: Vec<HomeSection>, settings: &'a Settings, rng: R) -> Self {
        let pool: Vec<(Listing, String)> = sections
            .into_iter()
            .flat_map(|section| {
                let title = section.title;
                section
                    .contents
                    .into_iter()
                    .map(move |listing| (listing, title.clone()))
            })
            .collect();

        tracing::debug!(pool = pool.len(), "home sampler initialized");

        Self {
            service,
            settings,
            pool,
            ledger: Ledger::default(),
            rng,
        }
    }

    /// Listings not drawn yet.
    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }

    pub async fn sample(&mut self) -> Draw {
        if self.pool.is_empty() {
            return Draw::Exhausted;
        }

        let index = self.rng.random_range(0..self.pool.len());
        let (listing, section) = self.pool.swap_remove(index);

        let tracks = resolve(self.service, &listing, self.settings).await;
        let Some(track) = tracks.choose(&mut self.rng).cloned() else {
            tracing::debug!(
                section = %section,
                listing = listing.title(),
                "listing produced no track"
            );
            return Draw::Empty;
        };

        self.ledger
            .record(&section, collection_label(&listing), &track.title);
        Draw::Picked(track)
    }

    /// Draws until `count` tracks are collected or the pool is exhausted.
    ///
    /// Falling short is a normal outcome: it is logged as a warning together
    /// with the ledger, and the caller gets whatever was collected.
    pub async fn drain(mut self, count: usize) -> Sampled {
        let settings = self.settings;
        let mut tracks = Vec::with_capacity(count);
        let mut exhausted = false;

        while tracks.len() < count {
            match self.sample().await {
                Draw::Picked(track) => tracks.push(track),
                Draw::Empty => continue,
                Draw::Exhausted => {
                    exhausted = true;
                    break;
                }
            }
        }

        let sampled = Sampled {
            tracks,
            requested: count,
            exhausted,
            ledger: self.ledger,
        };

        if sampled.shortfall() > 0 {
            tracing::warn!(
                requested = sampled.requested,
                drawn = sampled.tracks.len(),
                deficit = sampled.shortfall(),
                "home feed ran out of listings\n{}",
                sampled.ledger
            );
        } else if settings.debug {
            tracing::debug!("sampled {} tracks\n{}", sampled.tracks.len(), sampled.ledger);
        }

        sampled
    }
}

fn collection_label(listing: &Listing) -> &str {
    match listing {
        Listing::Song(_) => SONGS_LABEL,
        other if other.title().is_empty() => SONGS_LABEL,
        other => other.title(),
    }
}
