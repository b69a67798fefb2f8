//! Declared field kinds and typed field values.

use crate::image::ImageData;
use crate::value::StorageClass;
use std::fmt;

/// The declared value type of a record field.
///
/// The storage class of a column is [`FieldKind::storage_class`], a pure
/// function of the declared kind. The set of kinds is closed: a field is
/// either a recognized primitive, a recognized binary form, or an opaque
/// serialized graph with an explicit codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A text string.
    Text,
    /// A single character, stored as a one-character string.
    Char,
    /// A character array, stored as a string and split on decode.
    CharArray,
    /// Single-precision floating point.
    F32,
    /// Double-precision floating point.
    F64,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// Boolean, stored as `1`/`0`.
    Bool,
    /// A raw byte sequence, stored as-is.
    Bytes,
    /// An image, stored with the fixed lossless encoding.
    Image,
    /// An opaque serialized object graph (see [`crate::graph`]).
    Graph,
}

impl FieldKind {
    /// Computes the storage class for this declared kind.
    ///
    /// This mapping is deterministic and authoritative:
    ///
    /// | Declared kind | Storage class |
    /// |---|---|
    /// | `Text`, `Char`, `CharArray` | TEXT |
    /// | `F32`, `F64` | REAL |
    /// | `I16`, `I32`, `I64`, `Bool` | INTEGER |
    /// | `Bytes`, `Image`, `Graph` | BLOB |
    #[must_use]
    pub const fn storage_class(self) -> StorageClass {
        match self {
            FieldKind::Text | FieldKind::Char | FieldKind::CharArray => StorageClass::Text,
            FieldKind::F32 | FieldKind::F64 => StorageClass::Real,
            FieldKind::I16 | FieldKind::I32 | FieldKind::I64 | FieldKind::Bool => {
                StorageClass::Integer
            }
            FieldKind::Bytes | FieldKind::Image | FieldKind::Graph => StorageClass::Blob,
        }
    }

    /// Returns the kind's name for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Char => "char",
            FieldKind::CharArray => "char array",
            FieldKind::F32 => "f32",
            FieldKind::F64 => "f64",
            FieldKind::I16 => "i16",
            FieldKind::I32 => "i32",
            FieldKind::I64 => "i64",
            FieldKind::Bool => "bool",
            FieldKind::Bytes => "bytes",
            FieldKind::Image => "image",
            FieldKind::Graph => "graph",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed field value in transit between a record and a row.
///
/// Produced by field accessors on the write path and by
/// [`decode`](crate::decode) on the read path. Graph payloads travel as the
/// serialized bytes; the concrete type is only known to the field's
/// accessor and mutator.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text string.
    Text(String),
    /// Single character.
    Char(char),
    /// Character array.
    CharArray(Vec<char>),
    /// Single-precision float.
    F32(f32),
    /// Double-precision float.
    F64(f64),
    /// 16-bit integer.
    I16(i16),
    /// 32-bit integer.
    I32(i32),
    /// 64-bit integer.
    I64(i64),
    /// Boolean.
    Bool(bool),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Decoded image.
    Image(ImageData),
    /// Serialized graph payload.
    Graph(Vec<u8>),
}

impl FieldValue {
    /// Returns the declared kind this value belongs to.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Char(_) => FieldKind::Char,
            FieldValue::CharArray(_) => FieldKind::CharArray,
            FieldValue::F32(_) => FieldKind::F32,
            FieldValue::F64(_) => FieldKind::F64,
            FieldValue::I16(_) => FieldKind::I16,
            FieldValue::I32(_) => FieldKind::I32,
            FieldValue::I64(_) => FieldKind::I64,
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Bytes(_) => FieldKind::Bytes,
            FieldValue::Image(_) => FieldKind::Image,
            FieldValue::Graph(_) => FieldKind::Graph,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_kinds_map_to_text() {
        assert_eq!(FieldKind::Text.storage_class(), StorageClass::Text);
        assert_eq!(FieldKind::Char.storage_class(), StorageClass::Text);
        assert_eq!(FieldKind::CharArray.storage_class(), StorageClass::Text);
    }

    #[test]
    fn float_kinds_map_to_real() {
        assert_eq!(FieldKind::F32.storage_class(), StorageClass::Real);
        assert_eq!(FieldKind::F64.storage_class(), StorageClass::Real);
    }

    #[test]
    fn integer_kinds_map_to_integer() {
        assert_eq!(FieldKind::I16.storage_class(), StorageClass::Integer);
        assert_eq!(FieldKind::I32.storage_class(), StorageClass::Integer);
        assert_eq!(FieldKind::I64.storage_class(), StorageClass::Integer);
        assert_eq!(FieldKind::Bool.storage_class(), StorageClass::Integer);
    }

    #[test]
    fn everything_else_maps_to_blob() {
        assert_eq!(FieldKind::Bytes.storage_class(), StorageClass::Blob);
        assert_eq!(FieldKind::Image.storage_class(), StorageClass::Blob);
        assert_eq!(FieldKind::Graph.storage_class(), StorageClass::Blob);
    }

    #[test]
    fn value_kinds() {
        assert_eq!(FieldValue::I64(3).kind(), FieldKind::I64);
        assert_eq!(FieldValue::Bool(true).kind(), FieldKind::Bool);
        assert_eq!(
            FieldValue::Text("x".to_string()).kind(),
            FieldKind::Text
        );
        assert_eq!(FieldValue::Graph(vec![0]).kind(), FieldKind::Graph);
    }
}
