// Read-only reference data supplied by the surrounding layers: the champion
// catalog, the counter/synergy/meta/trait knowledge tables, and per-player
// champion pools. Everything here is loaded once at startup and shared
// immutably across sessions.

pub mod champions;
pub mod knowledge;
pub mod pools;

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading reference data files.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}
