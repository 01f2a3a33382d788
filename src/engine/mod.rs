//! # Track Sampling & Combination Engine
//!
//! - [`resolver`] turns a feed listing into tracks
//! - [`filter`] applies a user's section whitelist or blacklist
//! - [`sampler`] draws tracks from a filtered home feed without replacement
//! - [`combine`] merges several track sequences under a size limit, a
//!   sampling method and a combination method
//! - [`reconcile`] writes a desired track set into a playlist
//! - [`blend`] allocates and samples a multi-user blend
//!
//! Everything here talks to the outside world only through
//! [`crate::service::MusicService`].

pub mod blend;
pub mod combine;
pub mod filter;
pub mod reconcile;
pub mod resolver;
pub mod sampler;

pub use blend::{Blend, BlendSource, UserSample, blend};
pub use combine::{CombinationMethod, SampleMethod, SampleSize, combine};
pub use filter::{FilterSets, filter_sections};
pub use reconcile::{
    OverwritePlan, ReconcileError, ReconcileReport, UpdatePlan, apply_update, clear_playlist,
    current_items, difference, overwrite_playlist, update_playlist,
};
pub use resolver::resolve;
pub use sampler::{Draw, HomeSampler, Ledger, Sampled};
