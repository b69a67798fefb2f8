//! Storage-to-field decoding.

use crate::error::{CodecError, CodecResult};
use crate::field::{FieldKind, FieldValue};
use crate::image::ImageData;
use crate::value::StorageValue;

/// Decodes a storage primitive into a typed field value.
///
/// Dispatch is keyed on the field's *declared* kind, not on the column's
/// advertised class. `Ok(None)` is the field's absent state: a storage NULL
/// decodes to `None` for every kind, short-circuiting all other rules, and
/// an empty TEXT cell decodes to `None` for the character kinds.
///
/// # Errors
///
/// Returns [`CodecError::TypeMismatch`] naming `column` when the declared
/// kind is incompatible with the cell's storage class, and
/// [`CodecError::ImageMalformed`] for an undecodable image payload.
pub fn decode(
    value: &StorageValue,
    kind: FieldKind,
    column: &str,
) -> CodecResult<Option<FieldValue>> {
    let mismatch = || Err(CodecError::type_mismatch(column, value.class(), kind));

    match value {
        StorageValue::Null => Ok(None),
        StorageValue::Integer(n) => match kind {
            // Narrowing is a plain truncating conversion, as the embedded
            // cursor's typed getters are.
            #[allow(clippy::cast_possible_truncation)]
            FieldKind::I16 => Ok(Some(FieldValue::I16(*n as i16))),
            #[allow(clippy::cast_possible_truncation)]
            FieldKind::I32 => Ok(Some(FieldValue::I32(*n as i32))),
            FieldKind::I64 => Ok(Some(FieldValue::I64(*n))),
            // 1 is true; anything else is false.
            FieldKind::Bool => Ok(Some(FieldValue::Bool(*n == 1))),
            _ => mismatch(),
        },
        StorageValue::Real(x) => match kind {
            #[allow(clippy::cast_possible_truncation)]
            FieldKind::F32 => Ok(Some(FieldValue::F32(*x as f32))),
            FieldKind::F64 => Ok(Some(FieldValue::F64(*x))),
            _ => mismatch(),
        },
        StorageValue::Text(s) => match kind {
            FieldKind::Text => Ok(Some(FieldValue::Text(s.clone()))),
            FieldKind::Char => Ok(s.chars().next().map(FieldValue::Char)),
            FieldKind::CharArray => {
                if s.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(FieldValue::CharArray(s.chars().collect())))
                }
            }
            _ => mismatch(),
        },
        StorageValue::Blob(b) => match kind {
            FieldKind::Bytes => Ok(Some(FieldValue::Bytes(b.clone()))),
            FieldKind::Image => Ok(Some(FieldValue::Image(ImageData::decode(b)?))),
            // The payload passes through opaque; the field's mutator owns
            // the deserialization into the declared type.
            FieldKind::Graph => Ok(Some(FieldValue::Graph(b.clone()))),
            _ => mismatch(),
        },
    }
}
