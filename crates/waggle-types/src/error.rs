use thiserror::Error;

/// Errors from bot registration and claim arbitration.
#[derive(Debug, Error)]
pub enum CoordinationError {
    #[error("bot weight {0} out of range (1-10)")]
    InvalidWeight(u32),

    #[error("bot id cannot be empty")]
    EmptyBotId,

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors from provider registration and budget admission.
#[derive(Debug, Error)]
pub enum RateLimitError {
    #[error("provider '{0}' is not registered")]
    UnknownProvider(String),

    #[error("provider '{name}': {limit} limit must be positive")]
    InvalidLimit { name: String, limit: &'static str },

    #[error("admission queue closed")]
    QueueClosed,
}

/// Errors from repository operations (used by trait definitions in waggle-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors raised while loading or validating configuration. All of these are
/// fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file '{}': {message}", path.display())]
    Parse {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("invalid config value for '{field}': {message}")]
    Invalid { field: String, message: String },
}
