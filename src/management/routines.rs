use std::{collections::BTreeMap, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Settings;

#[derive(Debug, Error)]
pub enum RoutineError {
    #[error("no routine named '{0}'")]
    Unknown(String),
    #[error("routine name cannot be blank")]
    BlankName,
    #[error("invalid arguments for {prog}: {source}")]
    Arguments {
        prog: ProgramKind,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgramKind {
    #[serde(rename = "Automated Blend")]
    Blend,
    #[serde(rename = "Automated Mixtape")]
    Mixtape,
    #[serde(rename = "Automated Compilation")]
    Compilation,
    #[serde(rename = "Automated Advanced")]
    Advanced,
}

impl std::fmt::Display for ProgramKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ProgramKind::Blend => "Automated Blend",
            ProgramKind::Mixtape => "Automated Mixtape",
            ProgramKind::Compilation => "Automated Compilation",
            ProgramKind::Advanced => "Automated Advanced",
        };
        write!(f, "{label}")
    }
}

/// A saved program invocation. `args` holds the program's parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub prog: ProgramKind,
    #[serde(default)]
    pub desc: String,
    pub args: serde_json::Value,
}

/// Named routines persisted in `<data_dir>/routines.json`.
pub struct RoutineStore {
    path: PathBuf,
}

impl RoutineStore {
    pub fn new(settings: &Settings) -> Self {
        Self {
            path: settings.routines_path(),
        }
    }

    /// All routines; a missing file means none were saved yet.
    pub async fn get_routines(&self) -> Result<BTreeMap<String, Routine>, RoutineError> {
        if !self.path.is_file() {
            return Ok(BTreeMap::new());
        }
        let content = async_fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    pub async fn write_routines(
        &self,
        routines: &BTreeMap<String, Routine>,
    ) -> Result<(), RoutineError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(routines)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    pub async fn get(&self, name: &str) -> Result<Routine, RoutineError> {
        self.get_routines()
            .await?
            .remove(name)
            .ok_or_else(|| RoutineError::Unknown(name.to_string()))
    }

    /// Saves `routine` under `name`, replacing any routine of the same name.
    pub async fn add(&self, name: &str, routine: Routine) -> Result<(), RoutineError> {
        if name.trim().is_empty() {
            return Err(RoutineError::BlankName);
        }
        let mut routines = self.get_routines().await?;
        routines.insert(name.to_string(), routine);
        self.write_routines(&routines).await
    }

    pub async fn remove(&self, name: &str) -> Result<Routine, RoutineError> {
        let mut routines = self.get_routines().await?;
        let removed = routines
            .remove(name)
            .ok_or_else(|| RoutineError::Unknown(name.to_string()))?;
        self.write_routines(&routines).await?;
        Ok(removed)
    }
}
