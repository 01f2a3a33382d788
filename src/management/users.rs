use std::path::PathBuf;

use thiserror::Error;

use crate::{
    config::Settings,
    engine::FilterSets,
    management::{
        filters::load_filter_sets,
        library::{Library, LibraryError, LibraryService},
    },
    utils::is_ok_filename,
};

const LIBRARY_FILE: &str = "library.json";

#[derive(Debug, Error)]
pub enum UserError {
    #[error("'{0}' is not a valid user name, use only letters, numbers, underscores and dashes")]
    InvalidName(String),
    #[error("user '{0}' already exists")]
    AlreadyExists(String),
    #[error("unknown user '{0}'")]
    Unknown(String),
    #[error(transparent)]
    Library(#[from] LibraryError),
    #[error("cannot read filters of user '{user}': {source}")]
    Filters {
        user: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Named users, one directory each under `<data_dir>/users`.
#[derive(Debug, Clone)]
pub struct UserRegistry {
    root: PathBuf,
}

impl UserRegistry {
    pub fn new(settings: &Settings) -> Self {
        Self {
            root: settings.users_dir(),
        }
    }

    pub fn user_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn library_path(&self, name: &str) -> PathBuf {
        self.user_dir(name).join(LIBRARY_FILE)
    }

    pub fn exists(&self, name: &str) -> bool {
        is_ok_filename(name) && self.library_path(name).is_file()
    }

    /// Registers `name` with the given library snapshot.
    pub async fn add(&self, name: &str, library: &Library, force: bool) -> Result<(), UserError> {
        if !is_ok_filename(name) {
            return Err(UserError::InvalidName(name.to_string()));
        }
        if self.exists(name) && !force {
            return Err(UserError::AlreadyExists(name.to_string()));
        }

        library.save(&self.library_path(name)).await?;
        tracing::info!(user = name, "user registered");
        Ok(())
    }

    /// Sorted names of every registered user.
    pub async fn list(&self) -> Result<Vec<String>, UserError> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if let Some(name) = entry.file_name().to_str() {
                if self.exists(name) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub async fn open(&self, name: &str) -> Result<LibraryService, UserError> {
        if !self.exists(name) {
            return Err(UserError::Unknown(name.to_string()));
        }
        Ok(LibraryService::open(name, self.library_path(name)).await?)
    }

    pub async fn filters(&self, name: &str) -> Result<FilterSets, UserError> {
        load_filter_sets(&self.user_dir(name))
            .await
            .map_err(|source| UserError::Filters {
                user: name.to_string(),
                source,
            })
    }
}
