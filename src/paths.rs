//! Path resolution for user-supplied directories.
//!
//! Input from the command line may be home-relative (`~/code`) or relative
//! to the working directory. Everything stored in the config goes through
//! [`resolve`] first so that equal directories compare equal as strings.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// Errors produced while turning raw input into an absolute path.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("cannot expand '{path}': home directory is unavailable")]
    HomeUnavailable { path: String },

    #[error("cannot make '{path}' absolute: {source}")]
    CurrentDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("path '{path}' is not valid UTF-8")]
    NotUtf8 { path: String },
}

/// Injectable home directory lookup.
///
/// The lookup runs on every [`HomeDir::get`] call; nothing is cached.
#[derive(Clone)]
pub struct HomeDir {
    resolve: Arc<dyn Fn() -> Option<PathBuf> + Send + Sync>,
}

impl HomeDir {
    /// Resolve through the OS (`$HOME` on Unix).
    pub fn system() -> Self {
        Self::from_fn(dirs::home_dir)
    }

    /// Always resolve to `path`.
    pub fn fixed(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::from_fn(move || Some(path.clone()))
    }

    /// Never resolve. Useful for exercising failure paths.
    pub fn unavailable() -> Self {
        Self::from_fn(|| None)
    }

    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> Option<PathBuf> + Send + Sync + 'static,
    {
        Self {
            resolve: Arc::new(f),
        }
    }

    pub fn get(&self) -> Option<PathBuf> {
        (self.resolve)()
    }
}

impl Default for HomeDir {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for HomeDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HomeDir").finish_non_exhaustive()
    }
}

/// Replace a leading `~` with the home directory.
///
/// The remainder is joined as a path segment, so `~`, `~/` and `~//` all
/// yield the home directory itself. Input without a leading `~` is
/// returned as-is.
pub fn expand_home(raw: &str, home: &HomeDir) -> Result<PathBuf, PathError> {
    let Some(rest) = raw.strip_prefix('~') else {
        return Ok(PathBuf::from(raw));
    };

    let home = home.get().ok_or_else(|| PathError::HomeUnavailable {
        path: raw.to_string(),
    })?;

    let rest = rest.trim_start_matches(std::path::MAIN_SEPARATOR);
    if rest.is_empty() {
        Ok(home)
    } else {
        Ok(home.join(rest))
    }
}

/// Expand `~`, absolutize against the working directory, and clean.
///
/// Purely syntactic: the result does not have to exist.
pub fn resolve(raw: &str, home: &HomeDir) -> Result<PathBuf, PathError> {
    let expanded = expand_home(raw, home)?;

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        let cwd = std::env::current_dir().map_err(|source| PathError::CurrentDir {
            path: raw.to_string(),
            source,
        })?;
        cwd.join(expanded)
    };

    Ok(clean(&absolute))
}

/// [`resolve`], then convert to the string form kept in the config.
pub fn resolve_to_string(raw: &str, home: &HomeDir) -> Result<String, PathError> {
    resolve(raw, home)?
        .into_os_string()
        .into_string()
        .map_err(|os| PathError::NotUtf8 {
            path: os.to_string_lossy().into_owned(),
        })
}

/// Whether `raw` (after `~` expansion) names an existing directory.
///
/// An unresolvable home directory counts as "not a directory" rather than
/// an error.
pub fn is_valid_dir(raw: &str, home: &HomeDir) -> bool {
    match expand_home(raw, home) {
        Ok(path) => path.is_dir(),
        Err(_) => false,
    }
}

/// Lexically normalize an absolute path: drop `.`, fold `..`, drop
/// trailing separators. `..` never climbs above the root.
fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if out.parent().is_some() {
                    out.pop();
                }
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> HomeDir {
        HomeDir::fixed("/home/u")
    }

    #[test]
    fn expand_replaces_tilde_prefix() {
        assert_eq!(
            expand_home("~/projects", &home()).unwrap(),
            PathBuf::from("/home/u/projects")
        );
    }

    #[test]
    fn expand_bare_tilde_variants_yield_home() {
        for raw in ["~", "~/", "~//"] {
            assert_eq!(expand_home(raw, &home()).unwrap(), PathBuf::from("/home/u"));
        }
    }

    #[test]
    fn expand_leaves_other_input_alone() {
        assert_eq!(
            expand_home("/srv/code", &HomeDir::unavailable()).unwrap(),
            PathBuf::from("/srv/code")
        );
        assert_eq!(
            expand_home("code/~x", &HomeDir::unavailable()).unwrap(),
            PathBuf::from("code/~x")
        );
    }

    #[test]
    fn expand_without_home_fails() {
        let err = expand_home("~/x", &HomeDir::unavailable()).unwrap_err();
        assert!(matches!(err, PathError::HomeUnavailable { .. }));
    }

    #[test]
    fn resolve_cleans_lexically() {
        assert_eq!(
            resolve("/a/./b/../c/", &home()).unwrap(),
            PathBuf::from("/a/c")
        );
        assert_eq!(resolve("/../..", &home()).unwrap(), PathBuf::from("/"));
        assert_eq!(
            resolve("~/projects/../work", &home()).unwrap(),
            PathBuf::from("/home/u/work")
        );
    }

    #[test]
    fn resolve_relative_uses_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(resolve("sub", &home()).unwrap(), cwd.join("sub"));
    }

    #[test]
    fn resolve_to_string_matches_home_form() {
        assert_eq!(
            resolve_to_string("~/projects", &home()).unwrap(),
            resolve_to_string("/home/u/projects", &home()).unwrap()
        );
    }

    #[test]
    fn valid_dir_checks_existence() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        let home = HomeDir::fixed(dir.path());

        assert!(is_valid_dir("~", &home));
        assert!(is_valid_dir(dir.path().to_str().unwrap(), &home));
        assert!(!is_valid_dir("~/file.txt", &home));
        assert!(!is_valid_dir("~/missing", &home));
        assert!(!is_valid_dir("~", &HomeDir::unavailable()));
    }
}
