//! Error types for the store crate.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in storage backends.
///
/// Backend-level faults (malformed filter text, placeholder/argument
/// mismatches, I/O failures) propagate unwrapped inside
/// [`StoreError::Sqlite`] and [`StoreError::Provider`]; this layer adds no
/// retries and no partial-write recovery.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A fault from the embedded SQL engine.
    #[error("embedded store error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A target URI whose scheme does not address a provider.
    #[error("unsupported scheme in {uri}: only provider:// URIs address remote providers")]
    UnsupportedScheme {
        /// The offending URI.
        uri: String,
    },

    /// A provider URI that does not parse.
    #[error("invalid provider URI {uri}: {message}")]
    InvalidUri {
        /// The offending URI.
        uri: String,
        /// Description of the parse failure.
        message: String,
    },

    /// An update was issued with no column values to apply.
    #[error("write set is empty: no column values to apply")]
    EmptyWriteSet,

    /// A fault reported by a remote provider client.
    #[error("provider error: {message}")]
    Provider {
        /// Description of the provider fault.
        message: String,
    },
}

impl StoreError {
    /// Creates an invalid URI error.
    pub fn invalid_uri(uri: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidUri {
            uri: uri.into(),
            message: message.into(),
        }
    }

    /// Creates a provider fault.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }
}
