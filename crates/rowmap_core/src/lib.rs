//! # Rowmap Core
//!
//! Record mapping, query building, and the session layer for Rowmap.
//!
//! This crate provides:
//! - The [`Record`] descriptor trait: a static, explicit table of column
//!   fields per record type
//! - Schema derivation from the descriptor ([`derive_schema`]) and DDL
//!   rendering
//! - Row marshaling between typed records and backend boundary types
//! - The fluent [`Query`] builder with synchronous and background
//!   terminals
//! - The [`Session`] handle binding builders to the embedded store or to
//!   remote providers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rowmap_core::{Session, Record};
//!
//! let session = Session::builder().database("app.db").build();
//!
//! session
//!     .insert_into::<Person>("people")?
//!     .values([Person::new("Waverly", 18, 8.9)])
//!     .run()?;
//!
//! let adults = session
//!     .select_from::<Person>("people")?
//!     .filter("age > ?", [18])
//!     .sort("age DESC")
//!     .limit(10)
//!     .all()?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod marshal;
mod query;
mod record;
mod schema;
mod session;
mod task;

pub use error::{CoreError, CoreResult};
pub use marshal::{record_to_values, row_to_record};
pub use query::{Operation, Query};
pub use record::{ColumnFlags, FieldGet, FieldSet, FieldSpec, Record};
pub use schema::{derive_schema, ColumnDef, TableSchema};
pub use session::{Session, SessionBuilder, Target};
pub use task::QueryTask;

// The codec and store vocabularies are part of this crate's public
// surface; re-export them so callers need a single dependency.
pub use rowmap_codec::{
    graph, CodecError, CodecResult, FieldKind, FieldValue, ImageData, StorageClass, StorageValue,
};
pub use rowmap_store::{
    EmbeddedDatabase, EmbeddedTable, Filter, ProviderClient, ProviderUri, RemoteTable, Row,
    StoreError, StoreResult, TableBackend, WriteSet, PROVIDER_SCHEME,
};
