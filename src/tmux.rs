//! tmux session launcher.
//!
//! One session per project directory, named after the directory. A new
//! session gets an `editor` window running the configured editor (falling
//! back to a shell when it exits) and a `terminal` window.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};

/// Session identifier for a project directory: its final segment with `.`
/// replaced by `_` (tmux treats `.` as a pane separator in targets).
pub fn session_name(project_dir: &Path) -> String {
    let base = match project_dir.file_name() {
        Some(name) => name.to_string_lossy(),
        None => project_dir.as_os_str().to_string_lossy(),
    };
    base.replace('.', "_")
}

/// A single tmux invocation made while creating a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmuxStep {
    pub args: Vec<String>,
    /// Abort the launch if this step fails.
    pub required: bool,
}

/// Every tmux command needed to open one project.
#[derive(Debug, Clone)]
pub struct SessionPlan {
    name: String,
    project_dir: PathBuf,
    editor: String,
}

impl SessionPlan {
    pub fn new(project_dir: &Path, editor: &str) -> Self {
        Self {
            name: session_name(project_dir),
            project_dir: project_dir.to_path_buf(),
            editor: editor.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `=NAME`: a target that only matches this exact session name.
    /// Plain `NAME` would also match a session that merely starts with it.
    fn exact_target(&self) -> String {
        format!("={}", self.name)
    }

    pub fn has_session_args(&self) -> Vec<String> {
        strings(&["has-session", "-t", self.exact_target().as_str()])
    }

    /// Steps that create the session detached, in order.
    pub fn create_steps(&self) -> Vec<TmuxStep> {
        let dir = self.project_dir.to_string_lossy().into_owned();
        let editor_cmd = format!("{}; exec $SHELL", self.editor);
        let editor_target = format!("{}:editor", self.name);

        vec![
            TmuxStep {
                args: strings(&[
                    "new-session",
                    "-ds",
                    self.name.as_str(),
                    "-c",
                    dir.as_str(),
                    "-n",
                    "editor",
                    "sh",
                    "-c",
                    editor_cmd.as_str(),
                ]),
                required: true,
            },
            TmuxStep {
                args: strings(&[
                    "new-window",
                    "-t",
                    self.name.as_str(),
                    "-c",
                    dir.as_str(),
                    "-n",
                    "terminal",
                ]),
                required: true,
            },
            TmuxStep {
                args: strings(&["select-window", "-t", editor_target.as_str()]),
                required: false,
            },
            TmuxStep {
                args: strings(&["set-option", "-t", self.name.as_str(), "set-titles", "on"]),
                required: false,
            },
            TmuxStep {
                args: strings(&[
                    "set-option",
                    "-t",
                    self.name.as_str(),
                    "set-titles-string",
                    "#W",
                ]),
                required: false,
            },
        ]
    }

    /// `switch-client` from inside tmux, `attach-session` otherwise.
    pub fn attach_args(&self, inside_tmux: bool) -> Vec<String> {
        let verb = if inside_tmux {
            "switch-client"
        } else {
            "attach-session"
        };
        strings(&[verb, "-t", self.exact_target().as_str()])
    }
}

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// Whether this process runs inside a tmux client.
pub fn inside_tmux() -> bool {
    std::env::var_os("TMUX").is_some_and(|v| !v.is_empty())
}

/// Create the session for `project_dir` if needed, then attach to it.
pub fn launch(project_dir: &Path, editor: &str) -> Result<()> {
    let plan = SessionPlan::new(project_dir, editor);

    if session_exists(&plan) {
        tracing::debug!(session = plan.name(), "session already exists");
    } else {
        create_session(&plan)?;
    }

    let args = plan.attach_args(inside_tmux());
    tracing::debug!(?args, "attaching");
    let status = Command::new("tmux")
        .args(&args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .context("failed to run tmux")?;

    if !status.success() {
        bail!("tmux {} exited with {}", args[0], status);
    }
    Ok(())
}

fn session_exists(plan: &SessionPlan) -> bool {
    Command::new("tmux")
        .args(plan.has_session_args())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn create_session(plan: &SessionPlan) -> Result<()> {
    tracing::info!(session = plan.name(), "creating session");
    for step in plan.create_steps() {
        tracing::debug!(args = ?step.args, "tmux");
        let result = Command::new("tmux")
            .args(&step.args)
            .stdin(Stdio::null())
            .status();

        let failure = match result {
            Ok(status) if status.success() => continue,
            Ok(status) => format!("exited with {}", status),
            Err(e) => e.to_string(),
        };

        if step.required {
            bail!("failed to run tmux {}: {}", step.args[0], failure);
        }
        tracing::warn!(args = ?step.args, %failure, "optional tmux step failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_name_uses_last_segment() {
        assert_eq!(session_name(Path::new("/home/u/projects/sesh")), "sesh");
        assert_eq!(session_name(Path::new("/home/u/site.io")), "site_io");
        assert_eq!(session_name(Path::new("/home/u/a.b.c/")), "a_b_c");
    }

    #[test]
    fn session_name_for_root() {
        assert_eq!(session_name(Path::new("/")), "/");
    }

    #[test]
    fn create_steps_open_editor_then_terminal() {
        let plan = SessionPlan::new(Path::new("/p/app.rs"), "nvim .");
        let steps = plan.create_steps();

        assert_eq!(steps.len(), 5);
        assert_eq!(
            steps[0].args,
            vec![
                "new-session",
                "-ds",
                "app_rs",
                "-c",
                "/p/app.rs",
                "-n",
                "editor",
                "sh",
                "-c",
                "nvim .; exec $SHELL"
            ]
        );
        assert!(steps[0].required);
        assert_eq!(
            steps[1].args,
            vec!["new-window", "-t", "app_rs", "-c", "/p/app.rs", "-n", "terminal"]
        );
        assert!(steps[1].required);
        assert_eq!(steps[2].args, vec!["select-window", "-t", "app_rs:editor"]);
        assert!(steps[2..].iter().all(|s| !s.required));
        assert_eq!(
            steps[4].args,
            vec!["set-option", "-t", "app_rs", "set-titles-string", "#W"]
        );
    }

    #[test]
    fn attach_or_switch() {
        let plan = SessionPlan::new(Path::new("/p/app"), "vim");
        assert_eq!(plan.has_session_args(), vec!["has-session", "-t", "=app"]);
        assert_eq!(plan.attach_args(false), vec!["attach-session", "-t", "=app"]);
        assert_eq!(plan.attach_args(true), vec!["switch-client", "-t", "=app"]);
    }

    #[test]
    fn targets_do_not_prefix_match_longer_sessions() {
        let plan = SessionPlan::new(Path::new("/p/app"), "vim");
        let args = plan.has_session_args();
        assert_eq!(args[2], "=app");
        for inside in [false, true] {
            assert_eq!(plan.attach_args(inside)[2], "=app");
        }
    }
}
