//! Interactive project picker.
//!
//! Lists the immediate, non-hidden subdirectories of every search path with
//! `find` and pipes them into `fzf`. `fzf` draws its UI on the controlling
//! terminal; only the chosen line comes back on stdout.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};

/// Exit status `fzf` uses when the user aborts (Esc / Ctrl-C).
const FZF_ABORTED: i32 = 130;

/// Arguments for `find` listing candidate projects under `paths`.
pub fn find_args(paths: &[String]) -> Vec<String> {
    let mut args: Vec<String> = paths.to_vec();
    args.extend(
        ["-mindepth", "1", "-maxdepth", "1", "-type", "d", "!", "-name", ".*"]
            .iter()
            .map(|s| s.to_string()),
    );
    args
}

/// Let the user pick a project directory.
///
/// Returns `Ok(None)` if the user cancelled.
pub fn select_project(paths: &[String]) -> Result<Option<PathBuf>> {
    if paths.is_empty() {
        bail!("no search paths configured; add one with `sesh add PATH`");
    }

    let args = find_args(paths);
    tracing::debug!(?args, "spawning find");
    let mut find = Command::new("find")
        .args(&args)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .context("failed to start find")?;

    let listing = find
        .stdout
        .take()
        .context("find stdout was not captured")?;

    let fzf = Command::new("fzf")
        .stdin(Stdio::from(listing))
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn();
    let fzf = match fzf {
        Ok(child) => child,
        Err(e) => {
            let _ = find.kill();
            let _ = find.wait();
            return Err(e).context("failed to start fzf");
        }
    };

    let output = fzf
        .wait_with_output()
        .context("failed to read fzf output")?;

    match find.wait() {
        Ok(status) if !status.success() => {
            tracing::warn!(%status, "find exited unsuccessfully");
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "failed to wait for find"),
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    interpret_selection(output.status.code(), output.status.success(), &stdout)
}

/// Decide what an `fzf` run means.
///
/// `code` is the exit code (None if killed by a signal).
pub fn interpret_selection(
    code: Option<i32>,
    success: bool,
    stdout: &str,
) -> Result<Option<PathBuf>> {
    if code == Some(FZF_ABORTED) {
        tracing::debug!("selection aborted");
        return Ok(None);
    }
    if !success {
        match code {
            Some(code) => bail!("fzf exited with status {}", code),
            None => bail!("fzf was terminated by a signal"),
        }
    }

    let choice = stdout.trim();
    if choice.is_empty() {
        return Ok(None);
    }
    Ok(Some(PathBuf::from(choice)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_args_put_paths_first() {
        let args = find_args(&["/a".to_string(), "/b c".to_string()]);
        assert_eq!(
            args,
            vec![
                "/a", "/b c", "-mindepth", "1", "-maxdepth", "1", "-type", "d", "!", "-name",
                ".*"
            ]
        );
    }

    #[test]
    fn abort_is_not_an_error() {
        assert!(interpret_selection(Some(130), false, "").unwrap().is_none());
    }

    #[test]
    fn selection_is_trimmed() {
        let choice = interpret_selection(Some(0), true, "/home/u/proj\n").unwrap();
        assert_eq!(choice, Some(PathBuf::from("/home/u/proj")));
    }

    #[test]
    fn empty_output_means_nothing_chosen() {
        assert!(interpret_selection(Some(0), true, "  \n").unwrap().is_none());
    }

    #[test]
    fn other_failures_are_errors() {
        let err = interpret_selection(Some(2), false, "").unwrap_err();
        assert!(err.to_string().contains("status 2"));
        assert!(interpret_selection(None, false, "").is_err());
    }

    #[test]
    fn empty_search_paths_rejected() {
        let err = select_project(&[]).unwrap_err();
        assert!(err.to_string().contains("no search paths"));
    }
}
