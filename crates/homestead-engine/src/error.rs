//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and the interactive session.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or catalog validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: homestead_core::config::ConfigError,
    },

    /// Reading from stdin failed.
    #[error("input error: {source}")]
    Input {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The farm actor has stopped and no longer accepts requests.
    #[error("farm actor is not running")]
    ActorGone,

    /// The farm actor dropped a request without replying.
    #[error("farm actor dropped the reply: {source}")]
    NoReply {
        /// The underlying channel error.
        #[from]
        source: tokio::sync::oneshot::error::RecvError,
    },
}
