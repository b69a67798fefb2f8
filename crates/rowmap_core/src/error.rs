//! Error types for Rowmap core.

use rowmap_codec::{CodecError, StorageClass};
use rowmap_store::StoreError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in Rowmap core operations.
///
/// Every variant is unrecoverable at the point of detection and propagates
/// synchronously to the caller of the triggering call; background terminals
/// deliver these through the task handle instead of swallowing them.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Field value codec error.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Storage backend error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A record type with zero column fields.
    #[error("record type {record} has no column fields")]
    NoColumns {
        /// Name of the offending record type.
        record: String,
    },

    /// A fetched column with no matching field on the record type.
    ///
    /// Indicates drift between the row shape and the type shape.
    #[error("no field matches column {column} (of type {class})")]
    MissingField {
        /// The unmatched column name.
        column: String,
        /// The storage class the column advertised.
        class: StorageClass,
    },

    /// A write operation invoked with an empty payload.
    #[error("no values were provided for this query to run")]
    NoValues,

    /// A table target used on a session with no embedded database.
    #[error("session was not configured with a database; it can only use provider targets")]
    NoDatabase,

    /// A provider target whose authority has no registered client.
    #[error("no provider client registered for authority {authority}")]
    UnknownProvider {
        /// The unmatched authority.
        authority: String,
    },

    /// An operation that does not apply to the builder's kind.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },

    /// A background task terminated without delivering a result.
    #[error("background task terminated without delivering a result")]
    TaskFailed,
}

impl CoreError {
    /// Creates a no-columns error for a record type.
    pub fn no_columns(record: impl Into<String>) -> Self {
        Self::NoColumns {
            record: record.into(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }
}
