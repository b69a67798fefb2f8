//! Storage backend trait definition.

use crate::error::StoreResult;
use crate::types::{Filter, Row, WriteSet};

/// The capability contract a query target is executed against.
///
/// A `TableBackend` is one table's worth of storage - the query builder is
/// backend-agnostic and issues every operation through this trait. Rows and
/// write sets cross the boundary as name-to-storage-primitive pairs; filter
/// text passes through verbatim with its positional arguments.
///
/// # Invariants
///
/// - `ensure_schema` is idempotent; implementations may make it a no-op
///   when the backing store owns its own schema
/// - `query` returns rows whose column set reflects the requested
///   projection (or every column when no projection is given)
/// - each call is its own atomic unit at the backend's discretion; no
///   transaction spans multiple calls
/// - implementations must be `Send + Sync` for use from background
///   terminals
///
/// # Implementors
///
/// - [`crate::EmbeddedTable`] - a table in the embedded SQLite store
/// - [`crate::RemoteTable`] - a table behind a remote provider client
pub trait TableBackend: Send + Sync {
    /// Creates the backing table if it is absent.
    ///
    /// `create_sql` is the full schema text
    /// (`CREATE TABLE IF NOT EXISTS …`).
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store rejects the schema.
    fn ensure_schema(&self, create_sql: &str) -> StoreResult<()>;

    /// Fetches rows matching `filter`, in `order`, up to `limit`.
    ///
    /// A `None` projection selects every column. The remote provider
    /// protocol carries no limit parameter, so `limit` applies to the
    /// embedded store only.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed filter text, a
    /// placeholder/argument mismatch, or an I/O fault.
    fn query(
        &self,
        projection: Option<&[String]>,
        filter: Option<&Filter>,
        order: Option<&str>,
        limit: Option<u64>,
    ) -> StoreResult<Vec<Row>>;

    /// Inserts a single row and returns its row id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the row.
    fn insert(&self, values: &WriteSet) -> StoreResult<i64>;

    /// Inserts several rows and returns the count actually inserted.
    ///
    /// # Errors
    ///
    /// Returns an error on the first rejected row; atomicity across rows is
    /// whatever the backing store natively offers.
    fn bulk_insert(&self, values: &[WriteSet]) -> StoreResult<u64>;

    /// Applies `values` to every row matching `filter` and returns the
    /// affected-row count.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::EmptyWriteSet`] when `values` has no
    /// entries, or a backend fault.
    fn update(&self, values: &WriteSet, filter: Option<&Filter>) -> StoreResult<u64>;

    /// Deletes every row matching `filter` (all rows when `None`) and
    /// returns the affected-row count.
    ///
    /// # Errors
    ///
    /// Returns an error on a backend fault.
    fn delete(&self, filter: Option<&Filter>) -> StoreResult<u64>;

    /// Drops the backing table if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error on a backend fault.
    fn drop_table(&self) -> StoreResult<()>;
}
