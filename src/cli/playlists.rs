use tabled::Table;

use crate::{
    config::Settings,
    engine, error, info,
    management::UserRegistry,
    service::{MusicService, guarded},
    success,
    types::PlaylistTableRow,
    utils, warning,
};

pub async fn list_playlists(settings: &Settings, user: &str) {
    let registry = UserRegistry::new(settings);
    let service = match registry.open(user).await {
        Ok(service) => service,
        Err(e) => error!("{}", e),
    };

    let playlists = match guarded(
        settings.fetch_timeout,
        "get_library_playlists",
        service.get_library_playlists(),
    )
    .await
    {
        Ok(playlists) => playlists,
        Err(e) => error!("Cannot load playlists of {}. Err: {}", user, e),
    };

    if playlists.is_empty() {
        warning!("User {} has no playlists", user);
        return;
    }

    let rows: Vec<PlaylistTableRow> = playlists
        .into_iter()
        .map(|p| PlaylistTableRow {
            title: p.title,
            id: p.playlist_id,
            tracks: p.count.map_or_else(|| "?".to_string(), |c| c.to_string()),
        })
        .collect();
    println!("{}", Table::new(rows));
}

pub async fn clear_playlist(settings: &Settings, user: &str, target: &str) {
    let registry = UserRegistry::new(settings);
    let service = match registry.open(user).await {
        Ok(service) => service,
        Err(e) => error!("{}", e),
    };

    if let Err(e) = guarded(
        settings.fetch_timeout,
        "get_playlist",
        service.get_playlist(target),
    )
    .await
    {
        error!("Cannot open playlist {}. Err: {}", target, e);
    }

    let pb = utils::spinner(format!("Clearing playlist {}", target));
    let result = engine::clear_playlist(&service, target, settings).await;
    pb.finish_and_clear();

    match result {
        Ok(report) if report.removed == 0 => info!("Playlist {} is already empty", target),
        Ok(report) => success!("Removed {} tracks from {}", report.removed, target),
        Err(e) => error!("Cannot clear playlist {}. Err: {}", target, e),
    }
}
