//! Persistent launcher configuration.
//!
//! - [`types`]: the [`Config`] value and its defaulting rules
//! - [`loader`]: backing-store location, read/write, [`ConfigError`]
//! - [`store`]: [`ConfigStore`], the lazily loaded per-process handle

pub mod loader;
pub mod store;
pub mod types;

pub use loader::ConfigError;
pub use store::ConfigStore;
pub use types::{Config, DEFAULT_EDITOR};
