//! Error types for the codec crate.

use crate::field::FieldKind;
use crate::value::StorageClass;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during field value encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A column's storage class does not match the field's declared kind.
    #[error("column {column} of type {class} doesn't match field of type {field}")]
    TypeMismatch {
        /// The column being decoded.
        column: String,
        /// The storage class the column advertised.
        class: StorageClass,
        /// The declared kind of the target field.
        field: FieldKind,
    },

    /// A graph field's value could not be serialized.
    #[error("unable to serialize value of type {type_name}: {message}")]
    Unserializable {
        /// Name of the unserializable type.
        type_name: String,
        /// Description of the serialization failure.
        message: String,
    },

    /// A graph payload could not be deserialized into its declared type.
    #[error("unable to deserialize payload into type {type_name}: {message}")]
    GraphDecode {
        /// Name of the declared type.
        type_name: String,
        /// Description of the deserialization failure.
        message: String,
    },

    /// An image payload is not a valid encoded image.
    #[error("malformed image payload: {message}")]
    ImageMalformed {
        /// Description of the framing error.
        message: String,
    },

    /// A field mutator received a value of a kind it does not accept.
    #[error("field {field} received a value of an unexpected kind")]
    UnexpectedValue {
        /// The field that rejected the value.
        field: String,
    },
}

impl CodecError {
    /// Creates a type mismatch error for a column/field pair.
    pub fn type_mismatch(column: impl Into<String>, class: StorageClass, field: FieldKind) -> Self {
        Self::TypeMismatch {
            column: column.into(),
            class,
            field,
        }
    }

    /// Creates an unserializable value error.
    pub fn unserializable(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unserializable {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Creates a graph decode error.
    pub fn graph_decode(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::GraphDecode {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Creates a malformed image error.
    pub fn image_malformed(message: impl Into<String>) -> Self {
        Self::ImageMalformed {
            message: message.into(),
        }
    }

    /// Creates an unexpected value error for a field mutator.
    pub fn unexpected_value(field: impl Into<String>) -> Self {
        Self::UnexpectedValue {
            field: field.into(),
        }
    }
}
