//! Combination of several independent track sequences into one.
//!
//! A combination runs in three steps: the size policy resolves to a limit, each
//! sequence is sampled on its own under that limit, and the sampled sequences
//! are merged. Merging never adds or drops items; interleaving simply stops
//! drawing from a sequence once it runs out.

use std::{fmt, str::FromStr};

use rand::{
    Rng,
    seq::{IndexedRandom, SliceRandom},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}', expected one of: {expected}")]
pub struct ParseMethodError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

/// How many items to take from each source sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawSampleSize", into = "RawSampleSize")]
pub enum SampleSize {
    #[default]
    All,
    /// As many as the shortest source holds.
    Shortest,
    Count(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleMethod {
    Random,
    #[default]
    InOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationMethod {
    Interleaved,
    #[default]
    Concatenated,
    Shuffled,
}

impl FromStr for SampleSize {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(SampleSize::All),
            "shortest" | "shortest_playlist" => Ok(SampleSize::Shortest),
            other => other.parse::<usize>().map(SampleSize::Count).map_err(|_| {
                ParseMethodError {
                    kind: "sample size",
                    value: s.to_string(),
                    expected: "all, shortest_playlist or a number",
                }
            }),
        }
    }
}

impl fmt::Display for SampleSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleSize::All => write!(f, "all"),
            SampleSize::Shortest => write!(f, "shortest_playlist"),
            SampleSize::Count(n) => write!(f, "{n}"),
        }
    }
}

/// Routine files store explicit sizes as numbers and policies as strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawSampleSize {
    Count(usize),
    Text(String),
}

impl TryFrom<RawSampleSize> for SampleSize {
    type Error = ParseMethodError;

    fn try_from(raw: RawSampleSize) -> Result<Self, Self::Error> {
        match raw {
            RawSampleSize::Count(n) => Ok(SampleSize::Count(n)),
            RawSampleSize::Text(text) => text.parse(),
        }
    }
}

impl From<SampleSize> for RawSampleSize {
    fn from(size: SampleSize) -> Self {
        match size {
            SampleSize::Count(n) => RawSampleSize::Count(n),
            other => RawSampleSize::Text(other.to_string()),
        }
    }
}

impl FromStr for SampleMethod {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "random" => Ok(SampleMethod::Random),
            "in_order" => Ok(SampleMethod::InOrder),
            _ => Err(ParseMethodError {
                kind: "sample method",
                value: s.to_string(),
                expected: "random, in_order",
            }),
        }
    }
}

impl fmt::Display for SampleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleMethod::Random => write!(f, "random"),
            SampleMethod::InOrder => write!(f, "in_order"),
        }
    }
}

impl FromStr for CombinationMethod {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "interleaved" => Ok(CombinationMethod::Interleaved),
            "concatenated" => Ok(CombinationMethod::Concatenated),
            "shuffled" => Ok(CombinationMethod::Shuffled),
            _ => Err(ParseMethodError {
                kind: "combination method",
                value: s.to_string(),
                expected: "interleaved, concatenated, shuffled",
            }),
        }
    }
}

impl fmt::Display for CombinationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombinationMethod::Interleaved => write!(f, "interleaved"),
            CombinationMethod::Concatenated => write!(f, "concatenated"),
            CombinationMethod::Shuffled => write!(f, "shuffled"),
        }
    }
}

/// Resolves a size policy against the actual inputs. `None` means unbounded.
pub fn resolve_limit<T>(sequences: &[Vec<T>], size: SampleSize) -> Option<usize> {
    match size {
        SampleSize::All => None,
        SampleSize::Shortest => Some(sequences.iter().map(Vec::len).min().unwrap_or(0)),
        SampleSize::Count(n) => Some(n),
    }
}

/// Samples every sequence independently, each clamped to its own length.
pub fn sample_each<T, R>(
    sequences: &[Vec<T>],
    limit: Option<usize>,
    method: SampleMethod,
    rng: &mut R,
) -> Vec<Vec<T>>
where
    T: Clone,
    R: Rng + ?Sized,
{
    sequences
        .iter()
        .map(|sequence| {
            let take = limit.map_or(sequence.len(), |l| l.min(sequence.len()));
            match method {
                SampleMethod::Random => sequence.choose_multiple(&mut *rng, take).cloned().collect(),
                SampleMethod::InOrder => sequence[..take].to_vec(),
            }
        })
        .collect()
}

pub fn merge<T, R>(sampled: Vec<Vec<T>>, method: CombinationMethod, rng: &mut R) -> Vec<T>
where
    R: Rng + ?Sized,
{
    match method {
        CombinationMethod::Interleaved => interleave(sampled),
        CombinationMethod::Concatenated => sampled.into_iter().flatten().collect(),
        CombinationMethod::Shuffled => {
            let mut combined: Vec<T> = sampled.into_iter().flatten().collect();
            combined.shuffle(rng);
            combined
        }
    }
}

/// Round-robin over the sequences: every first item, then every second, and
/// so on. Exhausted sequences are skipped, nothing is padded.
fn interleave<T>(sampled: Vec<Vec<T>>) -> Vec<T> {
    let total = sampled.iter().map(Vec::len).sum();
    let rounds = sampled.iter().map(Vec::len).max().unwrap_or(0);
    let mut iters: Vec<_> = sampled.into_iter().map(Vec::into_iter).collect();

    let mut combined = Vec::with_capacity(total);
    for _ in 0..rounds {
        combined.extend(iters.iter_mut().filter_map(Iterator::next));
    }
    combined
}

pub fn combine<T, R>(
    sequences: &[Vec<T>],
    size: SampleSize,
    sample: SampleMethod,
    combination: CombinationMethod,
    rng: &mut R,
) -> Vec<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let limit = resolve_limit(sequences, size);
    let sampled = sample_each(sequences, limit, sample, rng);
    tracing::debug!(
        ?limit,
        lengths = ?sampled.iter().map(Vec::len).collect::<Vec<_>>(),
        %sample,
        %combination,
        "sequences sampled"
    );
    merge(sampled, combination, rng)
}
