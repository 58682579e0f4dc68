//! Error types for the core crate.
//!
//! The connection state machine and the reducer inputs never fail; the only
//! fallible operation here is touching the session identity file.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors from loading or persisting the session identity.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// Reading the identity file failed for a reason other than absence.
    #[error("failed to read identity file {path}: {source}")]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// Writing a freshly generated identity failed.
    #[error("failed to write identity file {path}: {source}")]
    Write {
        /// File that was written.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
}
