//! # Rowmap Codec
//!
//! Storage primitives and the field value codec for Rowmap.
//!
//! This crate provides:
//! - The five storage primitives: NULL, INTEGER, REAL, TEXT, BLOB
//! - The closed set of declared field kinds and the deterministic
//!   kind-to-storage-class mapping
//! - Bidirectional conversion between typed field values and storage
//!   primitives
//! - Opaque serialized-graph payloads for reference-valued fields
//!   (CBOR via serde)
//! - The fixed lossless image encoding
//!
//! ## Conversion rules
//!
//! Encoding is total: every field value has exactly one storage
//! representation. Decoding is keyed on the field's declared kind and fails
//! with a [`CodecError::TypeMismatch`] when the kind is incompatible with
//! the cell's storage class. A storage NULL always decodes to the field's
//! absent state.
//!
//! ## Usage
//!
//! ```
//! use rowmap_codec::{decode, encode, FieldKind, FieldValue, StorageValue};
//!
//! let cell = encode(FieldValue::Bool(true));
//! assert_eq!(cell, StorageValue::Integer(1));
//!
//! let back = decode(&cell, FieldKind::Bool, "admin").unwrap();
//! assert_eq!(back, Some(FieldValue::Bool(true)));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decode;
mod encode;
mod error;
mod field;
pub mod graph;
mod image;
mod value;

pub use decode::decode;
pub use encode::encode;
pub use error::{CodecError, CodecResult};
pub use field::{FieldKind, FieldValue};
pub use image::ImageData;
pub use value::{StorageClass, StorageValue};
