//! Blends: one playlist sampled from the home feeds of several users.

use rand::Rng;

use crate::{
    config::Settings,
    engine::{
        combine::{CombinationMethod, SampleMethod, SampleSize, combine},
        filter::FilterSets,
        sampler::{HomeSampler, Sampled},
    },
    service::{MusicService, read_or_empty},
    types::Track,
    utils::split_evenly,
};

pub struct BlendSource<'a, S: ?Sized> {
    pub user: &'a str,
    pub service: &'a S,
    pub filters: &'a FilterSets,
}

#[derive(Debug, Clone)]
pub struct UserSample {
    pub user: String,
    pub sampled: Sampled,
}

#[derive(Debug, Clone)]
pub struct Blend {
    pub tracks: Vec<Track>,
    pub samples: Vec<UserSample>,
}

impl Blend {
    pub fn shortfall(&self) -> usize {
        self.samples.iter().map(|s| s.sampled.shortfall()).sum()
    }
}

/// Samples `length` tracks across `sources` and interleaves them.
///
/// Each user gets an equal share, the first users in order taking one extra
/// track when `length` does not divide evenly. A user whose feed runs dry
/// simply contributes less; the deficit is not moved to other users.
pub async fn blend<S, R>(
    sources: &[BlendSource<'_, S>],
    length: usize,
    settings: &Settings,
    rng: &mut R,
) -> Blend
where
    S: MusicService + ?Sized,
    R: Rng + ?Sized,
{
    let shares = split_evenly(length, sources.len());
    let mut samples = Vec::with_capacity(sources.len());

    for (source, share) in sources.iter().zip(shares) {
        let home = read_or_empty(settings.fetch_timeout, "get_home", source.service.get_home()).await;
        let sections = source.filters.apply(home);
        tracing::debug!(
            user = source.user,
            share,
            sections = sections.len(),
            filter = %source.filters.describe(),
            "sampling home feed"
        );

        let sampled = HomeSampler::new(source.service, sections, settings, &mut *rng)
            .drain(share)
            .await;
        samples.push(UserSample {
            user: source.user.to_string(),
            sampled,
        });
    }

    let sequences: Vec<Vec<Track>> = samples.iter().map(|s| s.sampled.tracks.clone()).collect();
    let tracks = combine(
        &sequences,
        SampleSize::All,
        SampleMethod::InOrder,
        CombinationMethod::Interleaved,
        rng,
    );

    Blend { tracks, samples }
}
