//! Error types for the demo binary.

use hepevd_server::{ConfigError, ServerError};

/// Top-level error for the demo binary.
///
/// Each variant wraps a library error so `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The event display server failed to start or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: ServerError,
    },
}
