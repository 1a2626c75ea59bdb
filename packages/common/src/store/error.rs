use thiserror::Error;

/// Errors surfaced by document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached, or a transaction timed out. Callers
    /// must treat this as fatal for the current request; no side effect may
    /// be assumed to have happened.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored document does not deserialize into its expected shape.
    #[error("malformed document at '{path}': {reason}")]
    Malformed { path: String, reason: String },
}

impl StoreError {
    pub fn malformed(path: &str, reason: impl std::fmt::Display) -> Self {
        Self::Malformed {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}
