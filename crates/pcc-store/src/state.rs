use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::family::HashFamily;

pub const STATE_FILE_NAME: &str = "state.json";

/// Persisted record of which hash families have completed a full import
/// and are therefore queryable. Importers are the only writers; serving
/// only reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct State {
    pub supported_hash_functions: Vec<HashFamily>,
}

/// Reads and writes `<storage_root>/state.json`.
#[derive(Debug, Clone)]
pub struct StateRegistry {
    path: PathBuf,
}

impl StateRegistry {
    pub fn new(storage_root: impl AsRef<Path>) -> Self {
        StateRegistry {
            path: storage_root.as_ref().join(STATE_FILE_NAME),
        }
    }

    /// A missing file is an empty `State`, not an error: a fresh storage
    /// root simply supports nothing yet.
    pub fn read(&self) -> Result<State, StoreError> {
        match File::open(&self.path) {
            Ok(file) => serde_json::from_reader(file).map_err(|source| StoreError::StateDecode {
                path: self.path.clone(),
                source,
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(State::default()),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Idempotently records that `family` has been fully imported.
    pub fn add(&self, family: HashFamily) -> Result<(), StoreError> {
        let mut state = self.read()?;
        if state.supported_hash_functions.contains(&family) {
            return Ok(());
        }
        state.supported_hash_functions.push(family);
        tracing::info!(%family, path = ?self.path, "marking hash family as fully imported");

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let file = File::create(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &state).map_err(|source| {
            StoreError::StateDecode {
                path: self.path.clone(),
                source,
            }
        })
    }

    /// Like `read`, but a missing file is an error: serving requires an
    /// explicit prior import, and a cold store is a misconfiguration, not
    /// "zero families supported".
    pub fn supported(&self) -> Result<Vec<HashFamily>, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::StateNotFound {
                path: self.path.clone(),
            });
        }
        Ok(self.read()?.supported_hash_functions)
    }
}
