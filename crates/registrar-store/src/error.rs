//! Error types for the storage layer.

use std::path::PathBuf;

use registrar_core::IdError;
use thiserror::Error;

/// A result type using `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a backing file failed.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A record could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// A data file holds a record that cannot be read back, so rewriting the
    /// file would lose data.
    #[error("{} line {line} is corrupt: {source}", path.display())]
    Corrupt {
        /// The file being read.
        path: PathBuf,
        /// One-based line number of the bad record.
        line: usize,
        /// Why the record was rejected.
        #[source]
        source: CodecError,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while turning a single line into a record or back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A numeric column did not hold an unsigned integer.
    #[error("field `{field}` is not an integer: {value:?}")]
    InvalidInteger {
        /// Column name.
        field: &'static str,
        /// Raw text found in the column.
        value: String,
    },

    /// The key column did not hold a valid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),

    /// A value contains the field delimiter or a line break and cannot be written.
    #[error("field `{field}` contains a delimiter or line break")]
    ForbiddenChar {
        /// Column name.
        field: &'static str,
    },
}
