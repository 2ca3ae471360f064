//! Shared test utilities.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use sesh::config::{Config, ConfigStore};
use sesh::paths::HomeDir;
use tempfile::TempDir;

/// A throwaway home directory.
pub struct TempHome {
    pub dir: TempDir,
}

impl TempHome {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn path_str(&self) -> String {
        self.path().to_str().expect("temp dir is UTF-8").to_string()
    }

    /// Create `rel` (and parents) under the home directory.
    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.path().join(rel);
        std::fs::create_dir_all(&path).expect("Failed to create dir");
        path
    }

    pub fn config_path(&self) -> PathBuf {
        Config::config_path(self.path())
    }

    pub fn write_config(&self, content: &str) {
        let path = self.config_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    pub fn read_config(&self) -> String {
        std::fs::read_to_string(self.config_path()).expect("config file should exist")
    }

    /// A store that has not loaded anything yet, as in a new process.
    pub fn store(&self) -> ConfigStore {
        ConfigStore::with_home(HomeDir::fixed(self.path()))
    }
}
