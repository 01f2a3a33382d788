use crate::{
    config::Settings,
    error, info,
    management::{RoutineStore, UserRegistry},
    programs::{self, Program, ProgramReport},
    service::{MusicService, guarded, read_or_empty},
    success,
    types::PlaylistItem,
    utils, warning,
};

/// How a program was requested on the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Write into a non-empty target without complaining.
    pub force: bool,
    /// Title of a new playlist to use as the target.
    pub create: Option<String>,
    /// Store the program as a routine under this name instead of running it.
    pub save: Option<String>,
    pub desc: Option<String>,
}

pub async fn run_program(settings: &Settings, mut program: Program, options: RunOptions) {
    let registry = UserRegistry::new(settings);

    if let Some(title) = &options.create {
        let playlist_id = create_target(settings, &registry, program.owner(), title).await;
        program.set_target_playlist(playlist_id);
    } else if !options.force {
        guard_target(settings, &registry, &program).await;
    }

    if let Some(name) = &options.save {
        save_routine(settings, name, &program, options.desc.as_deref().unwrap_or_default()).await;
        return;
    }

    execute(settings, &registry, &program).await;
}

/// Runs `program` and prints what happened to its target.
pub(crate) async fn execute(settings: &Settings, registry: &UserRegistry, program: &Program) {
    let pb = utils::spinner(format!(
        "Running {} into {}",
        program.kind(),
        program.target_playlist()
    ));
    let result = programs::run(program, registry, settings, &mut rand::rng()).await;
    pb.finish_and_clear();

    match result {
        Ok(report) => print_report(settings, program, &report),
        Err(e) => error!("{} failed. Err: {}", program.kind(), e),
    }
}

fn print_report(settings: &Settings, program: &Program, report: &ProgramReport) {
    let title = report
        .target
        .as_ref()
        .map_or(program.target_playlist(), |t| t.title.as_str());

    if let Some(plan) = &report.planned {
        let titles = |items: &[PlaylistItem]| {
            items
                .iter()
                .map(|i| i.track.title.as_str())
                .collect::<Vec<_>>()
                .join("\n\t")
        };
        info!("Tracks to add:\n\t{}", titles(&plan.to_add));
        info!("Tracks to remove:\n\t{}", titles(&plan.to_remove));
    }

    for (user, ledger) in &report.ledgers {
        if settings.debug {
            info!("Selected from {}:\n{}", user, ledger);
        }
    }
    if report.shortfall > 0 {
        warning!(
            "{} tracks could not be sampled, see the log for details",
            report.shortfall
        );
    }

    success!(
        "{} wrote {} tracks into {} (+{} / -{})",
        program.kind(),
        report.tracks,
        title,
        report.written.added,
        report.written.removed
    );
}

async fn create_target(
    settings: &Settings,
    registry: &UserRegistry,
    owner: &str,
    title: &str,
) -> String {
    let service = match registry.open(owner).await {
        Ok(service) => service,
        Err(e) => error!("{}", e),
    };
    match guarded(
        settings.fetch_timeout,
        "create_playlist",
        service.create_playlist(title, "Created by ytmb"),
    )
    .await
    {
        Ok(playlist) => {
            success!("Playlist {} created with id {}", title, playlist.playlist_id);
            playlist.playlist_id
        }
        Err(e) => error!("Cannot create playlist {}. Err: {}", title, e),
    }
}

/// Refuses to touch a target that already holds tracks.
async fn guard_target(settings: &Settings, registry: &UserRegistry, program: &Program) {
    let service = match registry.open(program.owner()).await {
        Ok(service) => service,
        Err(e) => error!("{}", e),
    };
    let current = read_or_empty(
        settings.fetch_timeout,
        "get_playlist_tracks",
        service.get_playlist_tracks(program.target_playlist()),
    )
    .await;

    if !current.is_empty() {
        error!(
            "Target playlist {} is not empty ({} tracks), {} will modify it. Use --force to continue",
            program.target_playlist(),
            current.len(),
            program.kind()
        );
    }
}

async fn save_routine(settings: &Settings, name: &str, program: &Program, desc: &str) {
    let routine = match program.to_routine(desc) {
        Ok(routine) => routine,
        Err(e) => error!("Cannot save routine {}. Err: {}", name, e),
    };
    let store = RoutineStore::new(settings);
    match store.add(name, routine).await {
        Ok(()) => success!("Routine {} saved, run it with `ytmb routines run {}`", name, name),
        Err(e) => error!("Cannot save routine {}. Err: {}", name, e),
    }
}
