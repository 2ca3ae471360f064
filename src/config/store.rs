//! Per-process config store.
//!
//! The backing file is read at most once, on first access. Every mutation
//! rewrites the whole file before returning. Concurrent `sesh` processes
//! are not coordinated: the last writer wins.

use std::path::PathBuf;

use crate::config::loader::ConfigError;
use crate::config::types::Config;
use crate::paths::{self, HomeDir, PathError};

/// Lazily loaded search paths and editor preference.
#[derive(Debug, Default)]
pub struct ConfigStore {
    home: HomeDir,
    config: Option<Config>,
}

impl ConfigStore {
    /// Store rooted at the OS home directory.
    pub fn new() -> Self {
        Self::with_home(HomeDir::system())
    }

    /// Store rooted at an injected home directory.
    pub fn with_home(home: HomeDir) -> Self {
        Self { home, config: None }
    }

    pub fn home(&self) -> &HomeDir {
        &self.home
    }

    /// Copy of the stored search paths.
    pub fn search_paths(&mut self) -> Result<Vec<String>, ConfigError> {
        Ok(load_cached(&mut self.config, &self.home)?.paths.clone())
    }

    pub fn editor_command(&mut self) -> Result<String, ConfigError> {
        Ok(load_cached(&mut self.config, &self.home)?.editor.clone())
    }

    pub fn set_editor_command(&mut self, command: &str) -> Result<(), ConfigError> {
        let config = load_cached(&mut self.config, &self.home)?;
        config.editor = command.to_string();
        persist(&self.home, config)
    }

    /// Append the resolved form of `raw`. No dedup, no existence check.
    pub fn add_search_path(&mut self, raw: &str) -> Result<(), ConfigError> {
        let config = load_cached(&mut self.config, &self.home)?;
        let resolved = paths::resolve_to_string(raw, &self.home)?;
        tracing::debug!(path = %resolved, "adding search path");
        config.paths.push(resolved);
        persist(&self.home, config)
    }

    /// Remove every entry equal to the resolved form of `raw`.
    ///
    /// Fails with [`ConfigError::PathNotFound`] and leaves the list untouched
    /// when nothing matches.
    pub fn remove_search_path(&mut self, raw: &str) -> Result<(), ConfigError> {
        let config = load_cached(&mut self.config, &self.home)?;
        let resolved = paths::resolve_to_string(raw, &self.home)?;

        if !config.paths.iter().any(|p| *p == resolved) {
            return Err(ConfigError::PathNotFound { path: resolved });
        }

        let before = config.paths.len();
        config.paths.retain(|p| *p != resolved);
        tracing::debug!(
            path = %resolved,
            removed = before - config.paths.len(),
            "removed search path"
        );
        persist(&self.home, config)
    }
}

/// Home in the same cleaned, absolute form as every stored path.
fn home_path(home: &HomeDir) -> Result<PathBuf, ConfigError> {
    match paths::resolve("~", home) {
        Ok(path) => Ok(path),
        Err(PathError::HomeUnavailable { .. }) => Err(ConfigError::HomeResolution),
        Err(e) => Err(e.into()),
    }
}

/// Return the cached config, loading (or bootstrapping) it on first use.
fn load_cached<'a>(
    cache: &'a mut Option<Config>,
    home: &HomeDir,
) -> Result<&'a mut Config, ConfigError> {
    let config = match cache.take() {
        Some(config) => config,
        None => load_or_bootstrap(home)?,
    };
    Ok(cache.insert(config))
}

fn load_or_bootstrap(home_dir: &HomeDir) -> Result<Config, ConfigError> {
    let home = home_path(home_dir)?;
    let path = Config::config_path(&home);

    if let Some(config) = Config::load_from(&path, &home)? {
        tracing::debug!(path = %path.display(), "loaded config");
        return Ok(config);
    }

    let config = Config::bootstrap(&home);
    persist(home_dir, &config)?;
    tracing::info!(path = %path.display(), "created default config");
    Ok(config)
}

/// Write the full config. Home is resolved again rather than remembered.
fn persist(home: &HomeDir, config: &Config) -> Result<(), ConfigError> {
    let home = home_path(home)?;
    let path = Config::config_path(&home);
    config.save_to(&path)?;
    tracing::debug!(path = %path.display(), "saved config");
    Ok(())
}
