//! sesh: open project directories as tmux sessions.
//!
//! The library holds the pieces the `sesh` binary wires together:
//! the persisted [`config`], [`paths`] resolution, the fzf [`picker`]
//! and the [`tmux`] launcher.

pub mod config;
pub mod logging;
pub mod paths;
pub mod picker;
pub mod tmux;
