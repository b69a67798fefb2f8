//! # Rowmap Store
//!
//! Storage backend contract and implementations for Rowmap.
//!
//! This crate provides:
//! - The [`TableBackend`] capability contract the query builder executes
//!   against
//! - The boundary types crossing it: [`Row`], [`WriteSet`], [`Filter`]
//! - The embedded SQLite implementation ([`EmbeddedDatabase`] /
//!   [`EmbeddedTable`]) with lazy opening, once-per-process schema
//!   creation, and the drop-and-recreate-on-version-bump policy
//! - The remote provider variant ([`ProviderClient`] / [`RemoteTable`])
//!   addressed by `provider://` URIs
//!
//! The two implementations are interchangeable behind the contract; which
//! one a query runs against is fixed when the query is built.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod embedded;
mod error;
mod provider;
mod types;

pub use backend::TableBackend;
pub use embedded::{EmbeddedDatabase, EmbeddedTable};
pub use error::{StoreError, StoreResult};
pub use provider::{ProviderClient, ProviderUri, RemoteTable, PROVIDER_SCHEME};
pub use types::{Filter, Row, WriteSet};
