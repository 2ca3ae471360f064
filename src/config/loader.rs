use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::types::{Config, RawConfig};
use crate::paths::PathError;

/// Errors that can occur while loading, saving or editing the config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine user home directory")]
    HomeResolution,

    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write config file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode config: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    PathResolution(#[from] PathError),

    #[error("path not found: {path}")]
    PathNotFound { path: String },
}

impl Config {
    /// Location of the backing store: `<home>/.config/sesh/config.json`.
    pub fn config_path(home: &Path) -> PathBuf {
        home.join(".config").join("sesh").join("config.json")
    }

    /// Read and parse the config at `path`.
    ///
    /// Returns `Ok(None)` when the file does not exist. Any other failure is
    /// an error; defaults are only applied to fields missing from a file
    /// that parsed.
    pub fn load_from(path: &Path, home: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        let raw: RawConfig = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(Some(Config::from_raw(raw, home)))
    }

    /// Write the whole config to `path`, creating parent directories.
    ///
    /// The content goes to a sibling `.tmp` file first and is renamed over
    /// the target.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            create_config_dir(parent).map_err(write_err)?;
        }

        let mut content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize { source: e })?;
        content.push('\n');

        let tmp = path.with_extension("json.tmp");
        if let Err(e) = write_file(&tmp, content.as_bytes()) {
            let _ = fs::remove_file(&tmp);
            return Err(write_err(e));
        }
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(write_err(e));
        }
        Ok(())
    }
}

fn create_config_dir(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(dir)
}

fn write_file(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    let mut file = options.open(path)?;
    file.write_all(content)?;
    file.sync_all()
}
