use std::path::Path;

use serde::{Deserialize, Serialize};

/// Editor used when the config does not name one.
pub const DEFAULT_EDITOR: &str = "nvim";

/// Persisted launcher configuration.
///
/// Field order here is the field order on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Directories whose immediate children are offered as projects.
    /// Insertion order, duplicates allowed.
    pub paths: Vec<String>,
    /// Shell command run in the editor window of a new session.
    pub editor: String,
}

/// On-disk shape. Both fields are optional when reading.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawConfig {
    #[serde(default)]
    pub paths: Option<Vec<String>>,
    #[serde(default)]
    pub editor: Option<String>,
}

impl Config {
    /// First-run config: the home directory as the only search path.
    pub fn bootstrap(home: &Path) -> Self {
        Self {
            paths: vec![home.to_string_lossy().into_owned()],
            editor: DEFAULT_EDITOR.to_string(),
        }
    }

    /// Apply defaults to a parsed file.
    ///
    /// A missing or `null` path list becomes `[home]`; an explicitly empty
    /// list stays empty. A missing or empty editor becomes [`DEFAULT_EDITOR`].
    pub(crate) fn from_raw(raw: RawConfig, home: &Path) -> Self {
        let paths = raw
            .paths
            .unwrap_or_else(|| vec![home.to_string_lossy().into_owned()]);
        let editor = raw
            .editor
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string());
        Self { paths, editor }
    }
}
