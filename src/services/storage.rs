use crate::domain::models::AppState;
use crate::domain::seed::seed_state;
use std::path::{Path, PathBuf};

/// Fixed storage key; the state file is `<data_dir>/<key>.json`.
pub const STORAGE_KEY: &str = "regutrack_db_v1";

#[derive(thiserror::Error, Debug)]
pub enum PersistError {
    #[error("failed to write state file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Observer notified with the full state after every store transition.
pub trait StateSink {
    fn persist(&mut self, state: &AppState) -> Result<(), PersistError>;
}

pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateSink for FileSink {
    fn persist(&mut self, state: &AppState) -> Result<(), PersistError> {
        save_state(&self.path, state)
    }
}

pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".config/regutrack"))
}

pub fn state_path(data_dir: &Path) -> PathBuf {
    data_dir.join(format!("{}.json", STORAGE_KEY))
}

/// Reads the state file, falling back to the seed dataset when it is missing
/// or unreadable. Failures are logged, never returned.
pub fn load_state(path: &Path) -> AppState {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no state file, using seed data");
        return seed_state();
    }
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "failed to read state, using seed data"
            );
            return seed_state();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(state) => state,
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "failed to parse state, using seed data"
            );
            seed_state()
        }
    }
}

/// Whole-state write through a sibling temp file so a crash never leaves a
/// truncated state file behind.
pub fn save_state(path: &Path, state: &AppState) -> Result<(), PersistError> {
    let io = |source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io)?;
    }
    let raw = serde_json::to_string_pretty(state)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, raw).map_err(io)?;
    std::fs::rename(&tmp, path).map_err(io)?;
    tracing::debug!(
        path = %path.display(),
        verifiers = state.verifiers.len(),
        requirements = state.requirements.len(),
        "state saved"
    );
    Ok(())
}
