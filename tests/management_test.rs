mod common;

use common::{items, settings, song_library, stored_playlist, temp_dir};
use rand::{SeedableRng, rngs::StdRng};
use serde_json::json;
use ytmb::{
    config::Settings,
    engine::{CombinationMethod, SampleMethod, SampleSize},
    management::{Library, ProgramKind, Routine, RoutineError, RoutineStore, UserError, UserRegistry},
    programs::{
        self, AdvancedParameters, BlendParameters, PlaylistsParameters, Program, ProgramError,
        WriteMethod,
    },
    service::MusicService,
};

fn alice_library() -> Library {
    Library {
        playlists: vec![
            stored_playlist("PL1", "First", items(&["a", "b", "c"])),
            stored_playlist("PL2", "Second", items(&["d", "e"])),
            stored_playlist("PLt", "Target", items(&["x"])),
        ],
        ..Default::default()
    }
}

async fn registry_with_alice(settings: &Settings) -> UserRegistry {
    let registry = UserRegistry::new(settings);
    registry.add("alice", &alice_library(), false).await.unwrap();
    registry
}

async fn target_ids(registry: &UserRegistry, user: &str, playlist_id: &str) -> Vec<String> {
    let service = registry.open(user).await.unwrap();
    let items = service.get_playlist_tracks(playlist_id).await.unwrap();
    common::video_ids(&items)
}

fn playlists_parameters() -> PlaylistsParameters {
    PlaylistsParameters {
        name: "alice".to_string(),
        source_playlists: vec!["PL1".to_string(), "PL2".to_string()],
        target_playlist: "PLt".to_string(),
    }
}

#[tokio::test]
async fn test_user_registration() {
    let settings = settings();
    let registry = UserRegistry::new(&settings);
    assert!(registry.list().await.unwrap().is_empty());

    registry.add("bob", &Library::default(), false).await.unwrap();
    registry.add("alice", &alice_library(), false).await.unwrap();

    assert_eq!(registry.list().await.unwrap(), vec!["alice", "bob"]);
    assert!(registry.exists("alice"));
    assert!(!registry.exists("carol"));

    let duplicate = registry.add("bob", &Library::default(), false).await;
    assert!(matches!(duplicate, Err(UserError::AlreadyExists(_))));
    registry.add("bob", &alice_library(), true).await.unwrap();
    let bob = registry.open("bob").await.unwrap();
    assert_eq!(bob.get_library_playlists().await.unwrap().len(), 3);

    let invalid = registry.add("../escape", &Library::default(), false).await;
    assert!(matches!(invalid, Err(UserError::InvalidName(_))));
    assert!(matches!(
        registry.open("carol").await,
        Err(UserError::Unknown(_))
    ));
}

#[tokio::test]
async fn test_library_service_persists_mutations() {
    let settings = settings();
    let registry = registry_with_alice(&settings).await;

    let service = registry.open("alice").await.unwrap();
    let created = service.create_playlist("Fresh", "new").await.unwrap();
    assert!(created.playlist_id.starts_with("PL"));
    assert_eq!(created.count, Some(0));
    service
        .add_tracks(&created.playlist_id, &["a".to_string(), "zz".to_string()], false)
        .await
        .unwrap();
    service
        .add_tracks(&created.playlist_id, &["a".to_string()], false)
        .await
        .unwrap();

    let reopened = registry.open("alice").await.unwrap();
    let tracks = reopened.get_playlist_tracks(&created.playlist_id).await.unwrap();
    assert_eq!(common::video_ids(&tracks), vec!["a", "zz"]);
    assert_eq!(tracks[0].track.title, "Title a");
    assert_eq!(tracks[1].track.title, "zz");
    assert_ne!(tracks[0].set_video_id, tracks[1].set_video_id);

    assert!(service.create_playlist("  ", "").await.is_err());
}

#[tokio::test]
async fn test_routine_store() {
    let settings = settings();
    let store = RoutineStore::new(&settings);
    assert!(store.get_routines().await.unwrap().is_empty());

    let program = Program::Advanced(AdvancedParameters {
        name: "alice".to_string(),
        source_playlists: vec!["PL1".to_string()],
        target_playlist: "PLt".to_string(),
        sample_size: SampleSize::Count(12),
        sample_method: SampleMethod::Random,
        combination_method: CombinationMethod::Shuffled,
        write_method: WriteMethod::Overwrite,
    });
    store
        .add("weekly", program.to_routine("every monday").unwrap())
        .await
        .unwrap();

    let raw = std::fs::read_to_string(settings.routines_path()).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored["weekly"]["prog"], "Automated Advanced");
    assert_eq!(stored["weekly"]["args"]["sample_size"], 12);

    let routine = store.get("weekly").await.unwrap();
    assert_eq!(routine.desc, "every monday");
    assert_eq!(Program::from_routine(&routine).unwrap(), program);

    assert!(matches!(store.add(" ", routine.clone()).await, Err(RoutineError::BlankName)));
    store.remove("weekly").await.unwrap();
    assert!(matches!(store.get("weekly").await, Err(RoutineError::Unknown(_))));
    assert!(matches!(store.remove("weekly").await, Err(RoutineError::Unknown(_))));
}

#[test]
fn test_routine_arguments() {
    let routine: Routine = serde_json::from_value(json!({
        "prog": "Automated Blend",
        "desc": "",
        "args": {"name": "alice", "source_users": ["alice", "bob"], "target_playlist": "PLb"}
    }))
    .unwrap();
    assert_eq!(routine.prog, ProgramKind::Blend);
    match Program::from_routine(&routine).unwrap() {
        Program::Blend(p) => assert_eq!(p.length, programs::DEFAULT_BLEND_LENGTH),
        other => panic!("expected a blend, got {}", other.kind()),
    }

    let broken = Routine {
        prog: ProgramKind::Mixtape,
        desc: String::new(),
        args: json!({"name": "alice"}),
    };
    assert!(matches!(
        Program::from_routine(&broken),
        Err(RoutineError::Arguments { prog: ProgramKind::Mixtape, .. })
    ));
}

#[tokio::test]
async fn test_mixtape_overwrites_with_equal_shares() {
    let settings = settings();
    let registry = registry_with_alice(&settings).await;
    let program = Program::Mixtape(playlists_parameters());

    let report = programs::run(&program, &registry, &settings, &mut StdRng::seed_from_u64(5))
        .await
        .unwrap();

    assert_eq!(report.tracks, 4);
    assert_eq!(report.written.removed, 1);
    let ids = target_ids(&registry, "alice", "PLt").await;
    assert_eq!(ids.len(), 4);
    for (position, id) in ids.iter().enumerate() {
        let from = if position % 2 == 0 { ["a", "b", "c"].as_slice() } else { ["d", "e"].as_slice() };
        assert!(from.contains(&id.as_str()));
    }
}

#[tokio::test]
async fn test_compilation_updates_in_order() {
    let settings = settings();
    let registry = registry_with_alice(&settings).await;
    let program = Program::Compilation(playlists_parameters());

    let mut rng = StdRng::seed_from_u64(0);
    let report = programs::run(&program, &registry, &settings, &mut rng)
        .await
        .unwrap();
    assert_eq!((report.written.added, report.written.removed), (5, 1));
    assert_eq!(
        target_ids(&registry, "alice", "PLt").await,
        vec!["a", "b", "c", "d", "e"]
    );
    let plan = report.planned.expect("compilation reports its plan");
    assert_eq!(common::video_ids(&plan.to_add), vec!["a", "b", "c", "d", "e"]);
    assert_eq!(common::video_ids(&plan.to_remove), vec!["x"]);

    let again = programs::run(&program, &registry, &settings, &mut rng)
        .await
        .unwrap();
    assert_eq!((again.written.added, again.written.removed), (0, 0));
}

#[tokio::test]
async fn test_advanced_update_reports_no_plan() {
    let settings = settings();
    let registry = registry_with_alice(&settings).await;
    let program = Program::Advanced(AdvancedParameters {
        name: "alice".to_string(),
        source_playlists: vec!["PL2".to_string()],
        target_playlist: "PLt".to_string(),
        sample_size: SampleSize::All,
        sample_method: SampleMethod::InOrder,
        combination_method: CombinationMethod::Concatenated,
        write_method: WriteMethod::Update,
    });

    let report = programs::run(&program, &registry, &settings, &mut StdRng::seed_from_u64(0))
        .await
        .unwrap();

    assert!(report.planned.is_none());
    assert_eq!((report.written.added, report.written.removed), (2, 1));
    assert_eq!(target_ids(&registry, "alice", "PLt").await, vec!["d", "e"]);
}

#[tokio::test]
async fn test_failed_write_leaves_library_unchanged() {
    let settings = settings();
    let registry = registry_with_alice(&settings).await;
    let service = registry.open("alice").await.unwrap();

    // A directory in place of the snapshot file makes every write fail.
    let path = registry.library_path("alice");
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir_all(&path).unwrap();

    let added = service.add_tracks("PLt", &["a".to_string()], true).await;
    assert!(added.is_err());
    let removed = service.remove_tracks("PLt", &items(&["x"])).await;
    assert!(removed.is_err());
    assert!(service.create_playlist("Fresh", "").await.is_err());

    let snapshot = service.snapshot().await;
    assert_eq!(snapshot, alice_library());
}

#[tokio::test]
async fn test_blend_program_writes_owner_target() {
    let settings = settings();
    let registry = registry_with_alice(&settings).await;
    registry.add("bob", &song_library("bob", 8), false).await.unwrap();
    let mut carol = song_library("carol", 8);
    carol
        .playlists
        .push(stored_playlist("PLblend", "Blend", Vec::new()));
    registry.add("carol", &carol, false).await.unwrap();

    let program = Program::Blend(BlendParameters {
        name: "carol".to_string(),
        source_users: vec!["bob".to_string(), "carol".to_string()],
        target_playlist: "PLblend".to_string(),
        length: 5,
    });
    let report = programs::run(&program, &registry, &settings, &mut StdRng::seed_from_u64(3))
        .await
        .unwrap();

    assert_eq!(report.tracks, 5);
    assert_eq!(report.shortfall, 0);
    assert_eq!(report.ledgers.len(), 2);
    let ids = target_ids(&registry, "carol", "PLblend").await;
    assert_eq!(ids.iter().filter(|id| id.starts_with("bob")).count(), 3);
    assert_eq!(ids.iter().filter(|id| id.starts_with("carol")).count(), 2);
}

#[tokio::test]
async fn test_program_errors() {
    let settings = settings();
    let registry = registry_with_alice(&settings).await;
    let mut rng = StdRng::seed_from_u64(0);

    let mut missing_target = playlists_parameters();
    missing_target.target_playlist = "PLnope".to_string();
    let result = programs::run(
        &Program::Mixtape(missing_target),
        &registry,
        &settings,
        &mut rng,
    )
    .await;
    assert!(matches!(result, Err(ProgramError::Target { .. })));

    let mut unknown_user = playlists_parameters();
    unknown_user.name = "nobody".to_string();
    let result = programs::run(
        &Program::Compilation(unknown_user),
        &registry,
        &settings,
        &mut rng,
    )
    .await;
    assert!(matches!(result, Err(ProgramError::User(UserError::Unknown(_)))));

    let mut no_sources = playlists_parameters();
    no_sources.source_playlists.clear();
    let result = programs::run(&Program::Mixtape(no_sources), &registry, &settings, &mut rng).await;
    assert!(matches!(result, Err(ProgramError::NoSources)));
}

#[tokio::test]
async fn test_missing_source_playlist_reads_as_empty() {
    let settings = settings();
    let registry = registry_with_alice(&settings).await;
    let mut parameters = playlists_parameters();
    parameters.source_playlists.push("PLgone".to_string());

    let report = programs::run(
        &Program::Compilation(parameters),
        &registry,
        &settings,
        &mut StdRng::seed_from_u64(0),
    )
    .await
    .unwrap();

    assert_eq!(report.tracks, 5);
}

#[test]
fn test_settings_paths() {
    let dir = temp_dir();
    let settings = Settings::new(dir.clone());
    assert_eq!(settings.users_dir(), dir.join("users"));
    assert_eq!(settings.routines_path(), dir.join("routines.json"));
    assert!(!settings.debug);
    assert!(settings.with_debug(true).debug);
}
