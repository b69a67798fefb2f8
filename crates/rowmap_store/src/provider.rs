//! Remote provider storage backend.

use crate::backend::TableBackend;
use crate::error::{StoreError, StoreResult};
use crate::types::{Filter, Row, WriteSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// The only URI scheme that addresses a remote provider.
pub const PROVIDER_SCHEME: &str = "provider";

/// A validated provider target URI, e.g. `provider://com.example.people`.
///
/// The scheme must be [`PROVIDER_SCHEME`]; anything else is rejected at
/// parse time, so a constructed `ProviderUri` always addresses a provider -
/// backend selection is an explicit variant, never inferred from string
/// shape downstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProviderUri {
    authority: String,
    raw: String,
}

impl ProviderUri {
    /// Parses and validates a provider URI.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnsupportedScheme`] for any scheme other than
    /// `provider`, and [`StoreError::InvalidUri`] when the scheme or
    /// authority is missing.
    pub fn parse(uri: &str) -> StoreResult<Self> {
        let Some((scheme, rest)) = uri.split_once("://") else {
            return Err(StoreError::invalid_uri(uri, "missing scheme"));
        };
        if scheme != PROVIDER_SCHEME {
            return Err(StoreError::UnsupportedScheme {
                uri: uri.to_string(),
            });
        }
        let authority = match rest.split_once('/') {
            Some((authority, _)) => authority,
            None => rest,
        };
        if authority.is_empty() {
            return Err(StoreError::invalid_uri(uri, "missing authority"));
        }
        Ok(Self {
            authority: authority.to_string(),
            raw: uri.to_string(),
        })
    }

    /// Returns the authority component, used to look up the client.
    #[must_use]
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Returns the full URI text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ProviderUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ProviderUri {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A client for an external provider process.
///
/// Implementations forward each capability call over whatever transport the
/// provider speaks; this layer defines only the in-process contract. The
/// single-insert and bulk-insert paths are distinct calls because they have
/// different performance and atomicity characteristics in the provider
/// contract - the caller chooses by payload cardinality.
///
/// Implementations must be `Send + Sync`; calls may arrive from background
/// terminals.
pub trait ProviderClient: Send + Sync {
    /// Fetches rows matching `filter`, in `order`.
    ///
    /// # Errors
    ///
    /// Returns an error on a transport or provider fault.
    fn query(
        &self,
        uri: &ProviderUri,
        projection: Option<&[String]>,
        filter: Option<&Filter>,
        order: Option<&str>,
    ) -> StoreResult<Vec<Row>>;

    /// Inserts a single row and returns its row id.
    ///
    /// # Errors
    ///
    /// Returns an error on a transport or provider fault.
    fn insert(&self, uri: &ProviderUri, values: &WriteSet) -> StoreResult<i64>;

    /// Inserts several rows in one provider call and returns the count
    /// actually inserted.
    ///
    /// # Errors
    ///
    /// Returns an error on a transport or provider fault.
    fn bulk_insert(&self, uri: &ProviderUri, values: &[WriteSet]) -> StoreResult<u64>;

    /// Applies `values` to rows matching `filter`; returns the affected
    /// count.
    ///
    /// # Errors
    ///
    /// Returns an error on a transport or provider fault.
    fn update(
        &self,
        uri: &ProviderUri,
        values: &WriteSet,
        filter: Option<&Filter>,
    ) -> StoreResult<u64>;

    /// Deletes rows matching `filter` (all rows when `None`); returns the
    /// affected count.
    ///
    /// # Errors
    ///
    /// Returns an error on a transport or provider fault.
    fn delete(&self, uri: &ProviderUri, filter: Option<&Filter>) -> StoreResult<u64>;

    /// Administrative drop of the provider's backing table.
    ///
    /// # Errors
    ///
    /// Returns an error on a transport or provider fault.
    fn drop_table(&self, uri: &ProviderUri) -> StoreResult<()>;
}

/// A table behind a remote provider client.
pub struct RemoteTable {
    client: Arc<dyn ProviderClient>,
    uri: ProviderUri,
}

impl RemoteTable {
    /// Creates the backend for one provider target.
    pub fn new(client: Arc<dyn ProviderClient>, uri: ProviderUri) -> Self {
        Self { client, uri }
    }

    /// Returns the target URI.
    #[must_use]
    pub fn uri(&self) -> &ProviderUri {
        &self.uri
    }
}

impl TableBackend for RemoteTable {
    fn ensure_schema(&self, _create_sql: &str) -> StoreResult<()> {
        // The provider process owns its schema.
        Ok(())
    }

    fn query(
        &self,
        projection: Option<&[String]>,
        filter: Option<&Filter>,
        order: Option<&str>,
        _limit: Option<u64>,
    ) -> StoreResult<Vec<Row>> {
        // The provider protocol carries no limit parameter.
        self.client.query(&self.uri, projection, filter, order)
    }

    fn insert(&self, values: &WriteSet) -> StoreResult<i64> {
        self.client.insert(&self.uri, values)
    }

    fn bulk_insert(&self, values: &[WriteSet]) -> StoreResult<u64> {
        self.client.bulk_insert(&self.uri, values)
    }

    fn update(&self, values: &WriteSet, filter: Option<&Filter>) -> StoreResult<u64> {
        if values.is_empty() {
            return Err(StoreError::EmptyWriteSet);
        }
        self.client.update(&self.uri, values, filter)
    }

    fn delete(&self, filter: Option<&Filter>) -> StoreResult<u64> {
        self.client.delete(&self.uri, filter)
    }

    fn drop_table(&self) -> StoreResult<()> {
        self.client.drop_table(&self.uri)
    }
}
