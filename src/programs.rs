//! The playlist programs ytmb can run, directly or as saved routines.
//!
//! | program | size | sampling | combination | write |
//! |---|---|---|---|---|
//! | Mixtape | shortest | random | interleaved | overwrite |
//! | Compilation | all | in order | concatenated | update |
//! | Advanced | any | any | any | update or overwrite |
//! | Blend | `length` split across users | home feed | interleaved | overwrite |

use std::{fmt, str::FromStr};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::Settings,
    engine::{
        BlendSource, CombinationMethod, Ledger, ReconcileError, ReconcileReport, SampleMethod,
        SampleSize, UpdatePlan, apply_update, blend, combine, current_items, overwrite_playlist,
        update_playlist,
    },
    management::{ProgramKind, Routine, RoutineError, UserError, UserRegistry},
    service::{MusicService, ServiceError, guarded, read_or_empty},
    types::{PlaylistItem, PlaylistRef},
};

pub const DEFAULT_BLEND_LENGTH: usize = 30;

fn default_blend_length() -> usize {
    DEFAULT_BLEND_LENGTH
}

#[derive(Debug, Error)]
pub enum ProgramError {
    #[error(transparent)]
    User(#[from] UserError),
    #[error("cannot open target playlist {playlist_id}: {source}")]
    Target {
        playlist_id: String,
        #[source]
        source: ServiceError,
    },
    #[error("a program needs at least one source")]
    NoSources,
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMethod {
    #[default]
    Update,
    Overwrite,
}

impl FromStr for WriteMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "update" => Ok(WriteMethod::Update),
            "overwrite" => Ok(WriteMethod::Overwrite),
            other => Err(format!(
                "unknown write method '{other}', expected update or overwrite"
            )),
        }
    }
}

impl fmt::Display for WriteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteMethod::Update => write!(f, "update"),
            WriteMethod::Overwrite => write!(f, "overwrite"),
        }
    }
}

/// Source playlists and target all belong to `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistsParameters {
    pub name: String,
    pub source_playlists: Vec<String>,
    pub target_playlist: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedParameters {
    pub name: String,
    pub source_playlists: Vec<String>,
    pub target_playlist: String,
    #[serde(default)]
    pub sample_size: SampleSize,
    #[serde(default)]
    pub sample_method: SampleMethod,
    #[serde(default)]
    pub combination_method: CombinationMethod,
    #[serde(default)]
    pub write_method: WriteMethod,
}

/// `target_playlist` belongs to `name`; tracks are sampled from the home
/// feeds of `source_users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlendParameters {
    pub name: String,
    pub source_users: Vec<String>,
    pub target_playlist: String,
    #[serde(default = "default_blend_length")]
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Program {
    Blend(BlendParameters),
    Mixtape(PlaylistsParameters),
    Compilation(PlaylistsParameters),
    Advanced(AdvancedParameters),
}

impl Program {
    pub fn kind(&self) -> ProgramKind {
        match self {
            Program::Blend(_) => ProgramKind::Blend,
            Program::Mixtape(_) => ProgramKind::Mixtape,
            Program::Compilation(_) => ProgramKind::Compilation,
            Program::Advanced(_) => ProgramKind::Advanced,
        }
    }

    /// User owning the target playlist.
    pub fn owner(&self) -> &str {
        match self {
            Program::Blend(p) => &p.name,
            Program::Mixtape(p) | Program::Compilation(p) => &p.name,
            Program::Advanced(p) => &p.name,
        }
    }

    pub fn target_playlist(&self) -> &str {
        match self {
            Program::Blend(p) => &p.target_playlist,
            Program::Mixtape(p) | Program::Compilation(p) => &p.target_playlist,
            Program::Advanced(p) => &p.target_playlist,
        }
    }

    pub fn set_target_playlist(&mut self, playlist_id: impl Into<String>) {
        let playlist_id = playlist_id.into();
        match self {
            Program::Blend(p) => p.target_playlist = playlist_id,
            Program::Mixtape(p) | Program::Compilation(p) => p.target_playlist = playlist_id,
            Program::Advanced(p) => p.target_playlist = playlist_id,
        }
    }

    pub fn to_routine(&self, desc: impl Into<String>) -> Result<Routine, RoutineError> {
        let args = match self {
            Program::Blend(p) => serde_json::to_value(p)?,
            Program::Mixtape(p) | Program::Compilation(p) => serde_json::to_value(p)?,
            Program::Advanced(p) => serde_json::to_value(p)?,
        };
        Ok(Routine {
            prog: self.kind(),
            desc: desc.into(),
            args,
        })
    }

    pub fn from_routine(routine: &Routine) -> Result<Self, RoutineError> {
        let prog = routine.prog;
        let args = routine.args.clone();
        let invalid = |source| RoutineError::Arguments { prog, source };
        Ok(match prog {
            ProgramKind::Blend => Program::Blend(serde_json::from_value(args).map_err(invalid)?),
            ProgramKind::Mixtape => {
                Program::Mixtape(serde_json::from_value(args).map_err(invalid)?)
            }
            ProgramKind::Compilation => {
                Program::Compilation(serde_json::from_value(args).map_err(invalid)?)
            }
            ProgramKind::Advanced => {
                Program::Advanced(serde_json::from_value(args).map_err(invalid)?)
            }
        })
    }
}

/// What a program run did to its target.
#[derive(Debug, Clone, Default)]
pub struct ProgramReport {
    pub target: Option<PlaylistRef>,
    /// Size of the desired track set.
    pub tracks: usize,
    pub written: ReconcileReport,
    /// Changes a compilation planned before writing.
    pub planned: Option<UpdatePlan<PlaylistItem>>,
    /// Tracks a blend could not sample.
    pub shortfall: usize,
    /// Per-user selection ledgers of a blend.
    pub ledgers: Vec<(String, Ledger)>,
}

pub async fn run<R>(
    program: &Program,
    registry: &UserRegistry,
    settings: &Settings,
    rng: &mut R,
) -> Result<ProgramReport, ProgramError>
where
    R: Rng + ?Sized,
{
    tracing::info!(program = %program.kind(), owner = program.owner(), "running program");
    match program {
        Program::Mixtape(p) => {
            let parameters = AdvancedParameters {
                name: p.name.clone(),
                source_playlists: p.source_playlists.clone(),
                target_playlist: p.target_playlist.clone(),
                sample_size: SampleSize::Shortest,
                sample_method: SampleMethod::Random,
                combination_method: CombinationMethod::Interleaved,
                write_method: WriteMethod::Overwrite,
            };
            run_playlists(&parameters, false, registry, settings, rng).await
        }
        Program::Compilation(p) => {
            let parameters = AdvancedParameters {
                name: p.name.clone(),
                source_playlists: p.source_playlists.clone(),
                target_playlist: p.target_playlist.clone(),
                sample_size: SampleSize::All,
                sample_method: SampleMethod::InOrder,
                combination_method: CombinationMethod::Concatenated,
                write_method: WriteMethod::Update,
            };
            run_playlists(&parameters, true, registry, settings, rng).await
        }
        Program::Advanced(p) => run_playlists(p, false, registry, settings, rng).await,
        Program::Blend(p) => run_blend(p, registry, settings, rng).await,
    }
}

async fn open_target<S>(
    service: &S,
    playlist_id: &str,
    settings: &Settings,
) -> Result<PlaylistRef, ProgramError>
where
    S: MusicService + ?Sized,
{
    guarded(
        settings.fetch_timeout,
        "get_playlist",
        service.get_playlist(playlist_id),
    )
    .await
    .map_err(|source| ProgramError::Target {
        playlist_id: playlist_id.to_string(),
        source,
    })
}

/// With `preview`, an update keeps its plan in the report.
async fn run_playlists<R>(
    parameters: &AdvancedParameters,
    preview: bool,
    registry: &UserRegistry,
    settings: &Settings,
    rng: &mut R,
) -> Result<ProgramReport, ProgramError>
where
    R: Rng + ?Sized,
{
    if parameters.source_playlists.is_empty() {
        return Err(ProgramError::NoSources);
    }

    let service = registry.open(&parameters.name).await?;
    let target = open_target(&service, &parameters.target_playlist, settings).await?;

    let mut sources: Vec<Vec<PlaylistItem>> = Vec::with_capacity(parameters.source_playlists.len());
    for playlist_id in &parameters.source_playlists {
        let items = read_or_empty(
            settings.fetch_timeout,
            "get_playlist_tracks",
            service.get_playlist_tracks(playlist_id),
        )
        .await;
        tracing::debug!(playlist_id = %playlist_id, tracks = items.len(), "source playlist read");
        sources.push(items);
    }

    let tracks = combine(
        &sources,
        parameters.sample_size,
        parameters.sample_method,
        parameters.combination_method,
        rng,
    );

    let mut planned = None;
    let written = match parameters.write_method {
        WriteMethod::Update if preview => {
            let current = current_items(&service, &target.playlist_id, settings).await;
            let plan = UpdatePlan::new(&current, &tracks);
            let written = apply_update(&service, &target.playlist_id, &plan, settings).await?;
            planned = Some(plan);
            written
        }
        WriteMethod::Update => {
            update_playlist(&service, &target.playlist_id, &tracks, settings).await?
        }
        WriteMethod::Overwrite => {
            overwrite_playlist(&service, &target.playlist_id, &tracks, settings).await?
        }
    };

    Ok(ProgramReport {
        target: Some(target),
        tracks: tracks.len(),
        written,
        planned,
        ..Default::default()
    })
}

async fn run_blend<R>(
    parameters: &BlendParameters,
    registry: &UserRegistry,
    settings: &Settings,
    rng: &mut R,
) -> Result<ProgramReport, ProgramError>
where
    R: Rng + ?Sized,
{
    if parameters.source_users.is_empty() {
        return Err(ProgramError::NoSources);
    }

    let owner = registry.open(&parameters.name).await?;
    let target = open_target(&owner, &parameters.target_playlist, settings).await?;

    let mut services = Vec::with_capacity(parameters.source_users.len());
    for user in &parameters.source_users {
        let service = registry.open(user).await?;
        let filters = registry.filters(user).await?;
        services.push((user.as_str(), service, filters));
    }
    let sources: Vec<BlendSource<'_, _>> = services
        .iter()
        .map(|(user, service, filters)| BlendSource {
            user,
            service,
            filters,
        })
        .collect();

    let blended = blend(&sources, parameters.length, settings, rng).await;
    let written = overwrite_playlist(&owner, &target.playlist_id, &blended.tracks, settings).await?;

    Ok(ProgramReport {
        target: Some(target),
        tracks: blended.tracks.len(),
        written,
        planned: None,
        shortfall: blended.shortfall(),
        ledgers: blended
            .samples
            .into_iter()
            .map(|s| (s.user, s.sampled.ledger))
            .collect(),
    })
}
