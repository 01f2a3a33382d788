use std::path::Path;

use tabled::Table;

use crate::{
    config::Settings,
    error, info,
    management::{Library, UserRegistry},
    service::{MusicService, read_or_empty},
    success,
    types::UserTableRow,
    utils, warning,
};

pub async fn add_user(settings: &Settings, name: &str, snapshot: &Path, force: bool) {
    let registry = UserRegistry::new(settings);

    let pb = utils::spinner(format!("Reading library snapshot {}", snapshot.display()));
    let library = match Library::load(snapshot).await {
        Ok(library) => library,
        Err(e) => {
            pb.finish_and_clear();
            error!("Cannot import user {}. Err: {}", name, e);
        }
    };
    pb.finish_and_clear();

    info!(
        "Snapshot holds {} home sections and {} playlists",
        library.home.len(),
        library.playlists.len()
    );

    match registry.add(name, &library, force).await {
        Ok(()) => success!("User {} added", name),
        Err(e) => error!("Cannot add user {}. Err: {}", name, e),
    }
}

pub async fn list_users(settings: &Settings) {
    let registry = UserRegistry::new(settings);
    let names = match registry.list().await {
        Ok(names) => names,
        Err(e) => error!("Cannot list users. Err: {}", e),
    };

    if names.is_empty() {
        warning!("No users registered yet, add one with `ytmb users add`");
        return;
    }

    let mut rows: Vec<UserTableRow> = Vec::with_capacity(names.len());
    for name in names {
        let service = match registry.open(&name).await {
            Ok(service) => service,
            Err(e) => {
                warning!("Skipping user {}. Err: {}", name, e);
                continue;
            }
        };
        let filter = match registry.filters(&name).await {
            Ok(filters) => filters.describe(),
            Err(e) => {
                warning!("{}", e);
                "unreadable".to_string()
            }
        };
        let timeout = settings.fetch_timeout;
        let playlists = read_or_empty(
            timeout,
            "get_library_playlists",
            service.get_library_playlists(),
        )
        .await;
        let sections = read_or_empty(timeout, "get_home", service.get_home()).await;

        rows.push(UserTableRow {
            name,
            playlists: playlists.len(),
            sections: sections.len(),
            filter,
        });
    }

    println!("{}", Table::new(rows));
}
