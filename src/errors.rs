//! error kinds raised while computing a similarity matrix.
//!
//! All of them are fatal: there is no retry layer and a single failing pair
//! invalidates the whole run.

use std::path::PathBuf;

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, HybridError>;

#[derive(Debug, Error)]
pub enum HybridError {
    /// empty or garbled fasta file
    #[error("empty or improperly formated fasta file {path:?} : {msg}")]
    Format { path: PathBuf, msg: String },

    /// genome directory without anything to compare
    #[error("the provided directory is empty : {0:?}")]
    EmptyInput(PathBuf),

    /// an external program is not installed or not on the path
    #[error("required program {program} not found : {msg}")]
    MissingDependency { program: String, msg: String },

    /// aligner failed or produced nothing for a pair
    #[error("alignment of {reference} against {query} failed : {msg}")]
    Alignment {
        reference: String,
        query: String,
        msg: String,
    },

    /// a worker did not come back to the coordinator
    #[error("worker failure : {0}")]
    Worker(String),

    /// sequence archive request failed
    #[error("download of {id} failed : {msg}")]
    Download { id: String, msg: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
} // end of HybridError
