//! # Error Taxonomy
//!
//! Errors raised while classifying a message, touching the table store, applying a
//! ledger operation or loading configuration. Everything except `ConfigError` is
//! turned into a chat reply by the router.

use thiserror::Error;

/// Raised by the input classifier.
#[derive(Debug, Error, PartialEq)]
pub enum ClassifyError {
    /// Malformed command. `expected` is the format echoed back to the caretaker.
    #[error("malformed `{keyword}` command, expected: {expected}")]
    Format { keyword: String, expected: String },
    /// Free text matching no command shape while fallback is disabled.
    #[error("unrecognized message")]
    Unrecognized,
}

/// Raised by a `RecordStore` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("week {requested} is out of sequence, next week is {expected}")]
    WeekOutOfSequence { expected: u32, requested: u32 },
    #[error("storage lock poisoned")]
    LockPoisoned,
}

/// Raised by the progress ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Valid query, no matching rows. Informational, never a fault.
    #[error("no records found for {0}")]
    NotFound(String),
    #[error("week {requested} given, next week is {expected}")]
    WeekMismatch { expected: u32, requested: u32 },
    #[error(transparent)]
    Storage(StoreError),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::WeekOutOfSequence { expected, requested } => {
                LedgerError::WeekMismatch { expected, requested }
            }
            other => LedgerError::Storage(other),
        }
    }
}

/// Missing or invalid external configuration. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("missing required setting `{0}`")]
    Missing(&'static str),
    #[error("unsupported delimiter {0:?}, use ';' or '-'")]
    UnsupportedDelimiter(char),
}
