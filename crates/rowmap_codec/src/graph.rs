//! Opaque serialized-graph payloads for reference-valued fields.
//!
//! A field whose declared kind is [`Graph`](crate::FieldKind::Graph) holds a
//! value of some caller type - typically a reference to another record. The
//! referenced object graph is captured by value: [`encode`] serializes it to
//! CBOR bytes at write time and [`decode`] reconstructs it at read time.
//!
//! The set of representable types is closed and auditable: a graph field's
//! type must implement `Serialize` and `DeserializeOwned`, and the codec is
//! registered by the field's accessor/mutator pair. CBOR carries no
//! reference sharing, so graphs must be acyclic.

use crate::error::{CodecError, CodecResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::type_name;

/// Serializes a graph value into its opaque byte payload.
///
/// # Errors
///
/// Returns [`CodecError::Unserializable`] naming the value's type if
/// serialization fails.
pub fn encode<T: Serialize>(value: &T) -> CodecResult<Vec<u8>> {
    let mut bytes = Vec::new();
    ciborium::ser::into_writer(value, &mut bytes)
        .map_err(|e| CodecError::unserializable(type_name::<T>(), e.to_string()))?;
    Ok(bytes)
}

/// Deserializes a graph payload into its declared type.
///
/// # Errors
///
/// Returns [`CodecError::GraphDecode`] naming the declared type if the
/// payload does not deserialize.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> CodecResult<T> {
    ciborium::de::from_reader(bytes)
        .map_err(|e| CodecError::graph_decode(type_name::<T>(), e.to_string()))
}
