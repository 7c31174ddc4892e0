//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode of startup and the run itself so
//! `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ritual_core::config::ConfigError,
    },

    /// The logging subscriber could not be installed.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },

    /// Demo terrain construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: ritual_world::WorldError,
    },

    /// The scan worker or a configured ritual failed to start.
    #[error("setup error: {source}")]
    Setup {
        /// The underlying setup error.
        #[from]
        source: ritual_core::tick::SetupError,
    },

    /// The run loop failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: ritual_core::runner::RunnerError,
    },
}
