//! Embedded SQLite storage backend.

use crate::backend::TableBackend;
use crate::error::{StoreError, StoreResult};
use crate::types::{Filter, Row, WriteSet};
use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use rowmap_codec::StorageValue;
use rusqlite::types::Value as SqlValue;
use rusqlite::Connection;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Where the backing store lives.
#[derive(Debug, Clone)]
enum Location {
    /// A private in-memory store, mainly for tests.
    Memory,
    /// A database file on disk.
    File(PathBuf),
}

/// Connection state, populated on first use.
struct DbState {
    conn: Connection,
    /// Set when the store was opened under a bumped schema version: every
    /// table is dropped and recreated on its first use this process.
    reset_tables: bool,
}

struct DbInner {
    location: Location,
    version: u32,
    state: Mutex<Option<DbState>>,
    /// Tables whose schema creation already ran this process.
    created: Mutex<HashSet<String>>,
}

/// An embedded SQLite database.
///
/// The handle is cheap to clone and owns one physical table per table name.
/// The backing store opens lazily on the first operation. All access is
/// serialized through the connection - concurrency beyond that is SQLite's
/// own single-writer locking, not managed by this layer.
///
/// # Versioning
///
/// The configured schema version is recorded in `PRAGMA user_version`.
/// Opening an existing store under a different version triggers an
/// unconditional drop-and-recreate of each table on its first use: a
/// documented data-loss-on-upgrade policy, not a migration.
#[derive(Clone)]
pub struct EmbeddedDatabase {
    inner: Arc<DbInner>,
}

impl EmbeddedDatabase {
    /// Creates a handle for a file-backed store.
    ///
    /// No I/O happens here; the file is opened or created on first use.
    pub fn new(path: impl Into<PathBuf>, version: u32) -> Self {
        Self {
            inner: Arc::new(DbInner {
                location: Location::File(path.into()),
                version,
                state: Mutex::new(None),
                created: Mutex::new(HashSet::new()),
            }),
        }
    }

    /// Creates a handle for a private in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(DbInner {
                location: Location::Memory,
                version: 1,
                state: Mutex::new(None),
                created: Mutex::new(HashSet::new()),
            }),
        }
    }

    /// Returns the backend handle for one table of this store.
    pub fn table(&self, name: impl Into<String>) -> EmbeddedTable {
        EmbeddedTable {
            db: Arc::clone(&self.inner),
            table: name.into(),
        }
    }

    /// Drops a table if it exists, destroying its data.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened or the drop fails.
    pub fn drop_table(&self, name: &str) -> StoreResult<()> {
        let state = self.inner.state()?;
        debug!(table = name, "dropping table");
        state
            .conn
            .execute_batch(&format!("DROP TABLE IF EXISTS {name};"))?;
        drop(state);
        self.inner.created.lock().remove(name);
        Ok(())
    }
}

impl DbInner {
    /// Returns the connection, opening the backing store on first use.
    fn state(&self) -> StoreResult<MappedMutexGuard<'_, DbState>> {
        let mut guard = self.state.lock();
        if guard.is_none() {
            let conn = match &self.location {
                Location::Memory => Connection::open_in_memory()?,
                Location::File(path) => Connection::open(path)?,
            };
            let stored: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
            let reset_tables = stored != 0 && stored != i64::from(self.version);
            if reset_tables {
                warn!(
                    from = stored,
                    to = self.version,
                    "schema version bumped; existing tables will be dropped and recreated"
                );
            }
            conn.execute_batch(&format!("PRAGMA user_version = {};", self.version))?;
            debug!(location = ?self.location, version = self.version, "opened embedded store");
            *guard = Some(DbState { conn, reset_tables });
        }
        Ok(MutexGuard::map(guard, |slot| match slot {
            Some(state) => state,
            // Filled directly above.
            None => unreachable!(),
        }))
    }
}

/// One table of an [`EmbeddedDatabase`].
pub struct EmbeddedTable {
    db: Arc<DbInner>,
    table: String,
}

impl EmbeddedTable {
    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.table
    }
}

impl TableBackend for EmbeddedTable {
    fn ensure_schema(&self, create_sql: &str) -> StoreResult<()> {
        if self.db.created.lock().contains(&self.table) {
            return Ok(());
        }
        let state = self.db.state()?;
        if state.reset_tables {
            warn!(
                table = %self.table,
                "dropping table for schema version bump, which will destroy all old data"
            );
            state
                .conn
                .execute_batch(&format!("DROP TABLE IF EXISTS {};", self.table))?;
        }
        debug!(table = %self.table, "creating table if absent");
        state.conn.execute_batch(create_sql)?;
        drop(state);
        self.db.created.lock().insert(self.table.clone());
        Ok(())
    }

    fn query(
        &self,
        projection: Option<&[String]>,
        filter: Option<&Filter>,
        order: Option<&str>,
        limit: Option<u64>,
    ) -> StoreResult<Vec<Row>> {
        let state = self.db.state()?;

        let mut sql = String::from("SELECT ");
        match projection {
            Some(columns) if !columns.is_empty() => sql.push_str(&columns.join(", ")),
            _ => sql.push('*'),
        }
        sql.push_str(" FROM ");
        sql.push_str(&self.table);
        if let Some(filter) = filter {
            sql.push_str(" WHERE ");
            sql.push_str(&filter.clause);
        }
        if let Some(order) = order {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let mut stmt = state.conn.prepare(&sql)?;
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(ToString::to_string)
            .collect();
        let args = filter.map(|f| f.args.as_slice()).unwrap_or(&[]);
        let mut rows = stmt.query(rusqlite::params_from_iter(args.iter().map(to_sql)))?;

        let mut out = Vec::new();
        while let Some(fetched) = rows.next()? {
            let mut row = Row::new();
            for (index, name) in names.iter().enumerate() {
                let value: SqlValue = fetched.get(index)?;
                row.push(name.clone(), from_sql(value));
            }
            out.push(row);
        }
        Ok(out)
    }

    fn insert(&self, values: &WriteSet) -> StoreResult<i64> {
        let state = self.db.state()?;
        if values.is_empty() {
            // Every column was absent; insert a row of defaults.
            state
                .conn
                .execute(&format!("INSERT INTO {} DEFAULT VALUES", self.table), [])?;
        } else {
            let columns: Vec<&str> = values.names().collect();
            let marks = vec!["?"; columns.len()].join(", ");
            let sql = format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.table,
                columns.join(", "),
                marks
            );
            state
                .conn
                .execute(&sql, rusqlite::params_from_iter(values.values().map(to_sql)))?;
        }
        Ok(state.conn.last_insert_rowid())
    }

    fn bulk_insert(&self, values: &[WriteSet]) -> StoreResult<u64> {
        let mut inserted = 0u64;
        for write_set in values {
            self.insert(write_set)?;
            inserted += 1;
        }
        Ok(inserted)
    }

    fn update(&self, values: &WriteSet, filter: Option<&Filter>) -> StoreResult<u64> {
        if values.is_empty() {
            return Err(StoreError::EmptyWriteSet);
        }
        let state = self.db.state()?;

        let assignments: Vec<String> = values.names().map(|name| format!("{name} = ?")).collect();
        let mut sql = format!("UPDATE {} SET {}", self.table, assignments.join(", "));
        if let Some(filter) = filter {
            sql.push_str(" WHERE ");
            sql.push_str(&filter.clause);
        }

        let filter_args = filter.map(|f| f.args.as_slice()).unwrap_or(&[]);
        let params = values.values().chain(filter_args.iter()).map(to_sql);
        let changed = state.conn.execute(&sql, rusqlite::params_from_iter(params))?;
        Ok(changed as u64)
    }

    fn delete(&self, filter: Option<&Filter>) -> StoreResult<u64> {
        let state = self.db.state()?;

        let mut sql = format!("DELETE FROM {}", self.table);
        if let Some(filter) = filter {
            sql.push_str(" WHERE ");
            sql.push_str(&filter.clause);
        }

        let args = filter.map(|f| f.args.as_slice()).unwrap_or(&[]);
        let changed = state
            .conn
            .execute(&sql, rusqlite::params_from_iter(args.iter().map(to_sql)))?;
        Ok(changed as u64)
    }

    fn drop_table(&self) -> StoreResult<()> {
        let state = self.db.state()?;
        debug!(table = %self.table, "dropping table");
        state
            .conn
            .execute_batch(&format!("DROP TABLE IF EXISTS {};", self.table))?;
        drop(state);
        self.db.created.lock().remove(&self.table);
        Ok(())
    }
}

fn to_sql(value: &StorageValue) -> SqlValue {
    match value {
        StorageValue::Null => SqlValue::Null,
        StorageValue::Integer(n) => SqlValue::Integer(*n),
        StorageValue::Real(x) => SqlValue::Real(*x),
        StorageValue::Text(s) => SqlValue::Text(s.clone()),
        StorageValue::Blob(b) => SqlValue::Blob(b.clone()),
    }
}

fn from_sql(value: SqlValue) -> StorageValue {
    match value {
        SqlValue::Null => StorageValue::Null,
        SqlValue::Integer(n) => StorageValue::Integer(n),
        SqlValue::Real(x) => StorageValue::Real(x),
        SqlValue::Text(s) => StorageValue::Text(s),
        SqlValue::Blob(b) => StorageValue::Blob(b),
    }
}
