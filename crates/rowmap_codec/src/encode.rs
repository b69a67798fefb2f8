//! Field-to-storage encoding.

use crate::field::FieldValue;
use crate::value::StorageValue;

/// Encodes a typed field value into its storage primitive.
///
/// The conversion is total: every field value has exactly one storage
/// representation under the kind-to-storage-class mapping. Booleans become
/// `1`/`0`, character kinds become text, images use the fixed lossless
/// encoding, and graph values arrive already serialized (see
/// [`crate::graph::encode`]).
///
/// Absent field values never reach this function - the marshaler omits them
/// from the write set entirely rather than writing storage NULL.
#[must_use]
pub fn encode(value: FieldValue) -> StorageValue {
    match value {
        FieldValue::Text(s) => StorageValue::Text(s),
        FieldValue::Char(c) => StorageValue::Text(c.to_string()),
        FieldValue::CharArray(chars) => StorageValue::Text(chars.into_iter().collect()),
        FieldValue::F32(x) => StorageValue::Real(f64::from(x)),
        FieldValue::F64(x) => StorageValue::Real(x),
        FieldValue::I16(n) => StorageValue::Integer(i64::from(n)),
        FieldValue::I32(n) => StorageValue::Integer(i64::from(n)),
        FieldValue::I64(n) => StorageValue::Integer(n),
        FieldValue::Bool(b) => StorageValue::Integer(i64::from(b)),
        FieldValue::Bytes(b) => StorageValue::Blob(b),
        FieldValue::Image(image) => StorageValue::Blob(image.encode()),
        FieldValue::Graph(bytes) => StorageValue::Blob(bytes),
    }
}
