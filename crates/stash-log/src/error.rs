use std::io;
use std::path::PathBuf;

/// Errors from logger setup.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// A log file could not be created or opened for appending.
    #[error("cannot open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result alias for logger operations.
pub type LogResult<T> = Result<T, LogError>;
