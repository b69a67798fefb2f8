//! The fluent query builder.

use crate::error::{CoreError, CoreResult};
use crate::marshal;
use crate::record::Record;
use crate::task::QueryTask;
use rowmap_codec::StorageValue;
use rowmap_store::{Filter, TableBackend};
use std::sync::Arc;
use tracing::debug;

/// The four terminal operation kinds, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Fetch rows into typed records.
    Select,
    /// Insert the payload records.
    Insert,
    /// Apply the last payload record to matching rows.
    Update,
    /// Delete matching rows.
    Delete,
}

/// A fluent, stateful query against one target.
///
/// Built by the [`Session`](crate::Session) surface
/// (`select_from` / `insert_into` / `update` / `delete_from`), which binds
/// the builder to exactly one resolved backend and one operation kind.
/// Configuration calls consume and return the builder and may be chained in
/// any order before a terminal call. Terminals take `&self` and may be
/// re-invoked: the same descriptor re-executes (which is not idempotent for
/// inserts).
///
/// Every terminal performs lazy schema creation against the target first -
/// at most once per process per target on the embedded store - so a
/// builder's own schema creation happens before its data operation.
pub struct Query<T: Record> {
    backend: Arc<dyn TableBackend>,
    create_sql: String,
    kind: Operation,
    projection: Option<Vec<String>>,
    filter: Option<Filter>,
    order: Option<String>,
    limit: u64,
    values: Vec<T>,
}

impl<T: Record> std::fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("create_sql", &self.create_sql)
            .field("kind", &self.kind)
            .field("projection", &self.projection)
            .field("filter", &self.filter)
            .field("order", &self.order)
            .field("limit", &self.limit)
            .field("values", &self.values.len())
            .finish_non_exhaustive()
    }
}

impl<T: Record + 'static> Query<T> {
    pub(crate) fn new(backend: Arc<dyn TableBackend>, create_sql: String, kind: Operation) -> Self {
        Self {
            backend,
            create_sql,
            kind,
            projection: None,
            filter: None,
            order: None,
            limit: 0,
            values: Vec::new(),
        }
    }

    /// Returns this builder's operation kind.
    #[must_use]
    pub fn kind(&self) -> Operation {
        self.kind
    }

    /// Restricts the columns a select fetches or an insert/update writes.
    ///
    /// Write-path matching is case-insensitive against column names.
    #[must_use]
    pub fn projection<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the filter predicate: clause text with `?` positional
    /// placeholders and the matching argument list.
    ///
    /// The argument count is not validated against the placeholder count;
    /// a mismatch surfaces as a backend-level fault.
    #[must_use]
    pub fn filter<I, V>(mut self, clause: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<StorageValue>,
    {
        self.filter = Some(Filter::new(
            clause,
            args.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Sets the sort order (raw order-by text).
    #[must_use]
    pub fn sort(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    /// Caps the number of rows a select fetches. Zero means unlimited.
    /// Applies to the embedded store only; the provider protocol carries no
    /// limit parameter.
    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the payload records for an insert or update, replacing any
    /// previously set payload.
    #[must_use]
    pub fn values(mut self, values: impl IntoIterator<Item = T>) -> Self {
        self.values = values.into_iter().collect();
        self
    }

    fn fetch(&self, limit: Option<u64>) -> CoreResult<Vec<T>> {
        if self.kind != Operation::Select {
            // Fetching on a non-select builder yields nothing.
            return Ok(Vec::new());
        }
        self.backend.ensure_schema(&self.create_sql)?;
        let rows = self.backend.query(
            self.projection.as_deref(),
            self.filter.as_ref(),
            self.order.as_deref(),
            limit,
        )?;
        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(marshal::row_to_record(row)?);
        }
        Ok(records)
    }

    /// Fetches the first matching record, or `None` when there are no
    /// matches. Never fails for zero rows - only for marshaling or backend
    /// faults.
    ///
    /// # Errors
    ///
    /// Returns a marshaling or backend error.
    pub fn one(&self) -> CoreResult<Option<T>> {
        Ok(self.fetch(Some(1))?.into_iter().next())
    }

    /// Fetches every matching record up to the configured limit. An empty
    /// result is an empty vec, distinguished from a backend fault.
    ///
    /// # Errors
    ///
    /// Returns a marshaling or backend error.
    pub fn all(&self) -> CoreResult<Vec<T>> {
        let limit = if self.limit > 0 {
            Some(self.limit)
        } else {
            None
        };
        self.fetch(limit)
    }

    /// Executes the builder's write operation and returns the affected or
    /// inserted row count.
    ///
    /// - **Insert**: one payload record uses the single-insert capability
    ///   and returns 1; several use one bulk insert and return the count
    ///   actually inserted.
    /// - **Update**: applies the *last* payload record's write set to rows
    ///   matching the filter; earlier payload records are silently ignored
    ///   (a quirk, not a feature).
    /// - **Delete**: ignores the payload; no filter means all rows.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoValues`] for an insert/update with an empty
    /// payload, [`CoreError::InvalidOperation`] on a select builder, or a
    /// marshaling/backend error.
    pub fn run(&self) -> CoreResult<u64> {
        debug!(kind = ?self.kind, "running query");
        match self.kind {
            Operation::Select => Err(CoreError::invalid_operation(
                "run() is not applicable to select queries",
            )),
            Operation::Insert => {
                if self.values.is_empty() {
                    return Err(CoreError::NoValues);
                }
                self.backend.ensure_schema(&self.create_sql)?;
                if let [value] = self.values.as_slice() {
                    let write_set = marshal::record_to_values(value, self.projection.as_deref())?;
                    self.backend.insert(&write_set)?;
                    Ok(1)
                } else {
                    let mut write_sets = Vec::with_capacity(self.values.len());
                    for value in &self.values {
                        write_sets.push(marshal::record_to_values(
                            value,
                            self.projection.as_deref(),
                        )?);
                    }
                    Ok(self.backend.bulk_insert(&write_sets)?)
                }
            }
            Operation::Update => {
                if self.values.is_empty() {
                    return Err(CoreError::NoValues);
                }
                self.backend.ensure_schema(&self.create_sql)?;
                let last = &self.values[self.values.len() - 1];
                let write_set = marshal::record_to_values(last, self.projection.as_deref())?;
                Ok(self.backend.update(&write_set, self.filter.as_ref())?)
            }
            Operation::Delete => {
                self.backend.ensure_schema(&self.create_sql)?;
                Ok(self.backend.delete(self.filter.as_ref())?)
            }
        }
    }

    /// Runs [`one`](Self::one) on a dedicated background thread.
    pub fn spawn_one(&self) -> QueryTask<Option<T>>
    where
        T: Clone + Send + 'static,
    {
        let query = self.clone();
        QueryTask::spawn(move || query.one())
    }

    /// Runs [`all`](Self::all) on a dedicated background thread.
    pub fn spawn_all(&self) -> QueryTask<Vec<T>>
    where
        T: Clone + Send + 'static,
    {
        let query = self.clone();
        QueryTask::spawn(move || query.all())
    }

    /// Runs [`run`](Self::run) on a dedicated background thread.
    pub fn spawn_run(&self) -> QueryTask<u64>
    where
        T: Clone + Send + 'static,
    {
        let query = self.clone();
        QueryTask::spawn(move || query.run())
    }
}

impl<T: Record + Clone> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            create_sql: self.create_sql.clone(),
            kind: self.kind,
            projection: self.projection.clone(),
            filter: self.filter.clone(),
            order: self.order.clone(),
            limit: self.limit,
            values: self.values.clone(),
        }
    }
}
