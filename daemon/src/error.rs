//! Error types for minewatchd.

use thiserror::Error;

/// Fatal, process-level error. Anything that reaches `main` ends the daemon.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Watch event stream closed")]
    WatchClosed,

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Config not found: {0}")]
    ConfigNotFound(std::path::PathBuf),

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("Invalid config: {0}")]
    ConfigInvalid(String),
}
