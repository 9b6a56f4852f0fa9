use crate::domain::models::ConfigFile;
use crate::services::storage::config_dir;
use anyhow::Context;
use std::path::{Path, PathBuf};

pub fn config_path() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Missing file means defaults; a present but malformed file is an error.
pub fn load_config() -> anyhow::Result<ConfigFile> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> anyhow::Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let raw = std::fs::read_to_string(path)?;
    let config: ConfigFile =
        toml::from_str(&raw).with_context(|| format!("invalid config file {}", path.display()))?;
    if config.dashboard.due_soon_days < 0 {
        anyhow::bail!("dashboard.due_soon_days must not be negative");
    }
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// `--data-dir` wins over the config file, which wins over `~/.config/regutrack`.
pub fn resolve_data_dir(flag: Option<&Path>, config: &ConfigFile) -> anyhow::Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = &config.storage.data_dir {
        return Ok(dir.clone());
    }
    config_dir()
}
