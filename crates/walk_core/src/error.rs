use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that abort a propagation run.
///
/// A run either completes with a full aggregate or returns one of these; no
/// partial result is ever handed back.
#[derive(Debug, Error)]
pub enum Error {
    /// Working memory for the requested population could not be reserved.
    #[error("failed to allocate working memory for {particles} particles")]
    Allocation { particles: u64 },

    /// The worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}
