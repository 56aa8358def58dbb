//! Error types for startup and configuration.

use std::io;

use thiserror::Error;

/// Fatal errors that abort the game loop.
#[derive(Debug, Error)]
pub enum GameError {
    /// Terminal setup, drawing or event polling failed.
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),

    /// The configured log file could not be created.
    #[error("could not open log file '{path}': {source}")]
    LogFile { path: String, source: io::Error },
}

/// Problems with `config.toml`. Never fatal: defaults are used instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read '{path}': {source}")]
    Read { path: String, source: io::Error },

    #[error("parse error in '{path}': {source}")]
    Parse { path: String, source: toml::de::Error },
}
