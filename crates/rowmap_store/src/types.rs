//! Boundary types exchanged with storage backends.

use rowmap_codec::StorageValue;

/// A single fetched row: ordered (column name, storage primitive) pairs.
///
/// Rows are transient - a backend constructs one per fetched record and the
/// marshaler consumes it immediately. The row's own column set is
/// authoritative on the read path: the marshaler iterates these columns,
/// not the record type's fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, StorageValue)>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column value.
    pub fn push(&mut self, name: impl Into<String>, value: StorageValue) {
        self.columns.push((name.into(), value));
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Looks up a column value by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&StorageValue> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Iterates the columns in fetch order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StorageValue)> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v))
    }
}

/// The name-to-storage-primitive mapping produced for an insert or update.
///
/// Entries keep the record type's declared field order. Absent field values
/// are omitted rather than stored as NULL, so a write set can legitimately
/// be empty even when the record has columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteSet {
    entries: Vec<(String, StorageValue)>,
}

impl WriteSet {
    /// Creates an empty write set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column value.
    pub fn put(&mut self, name: impl Into<String>, value: StorageValue) {
        self.entries.push((name.into(), value));
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the write set has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by exact column name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&StorageValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Iterates the column names in declared order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Iterates the values in declared order.
    pub fn values(&self) -> impl Iterator<Item = &StorageValue> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Iterates the entries in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StorageValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

/// A filter predicate: clause text with `?` positional placeholders and the
/// matching argument list.
///
/// The argument count is never validated against the placeholder count -
/// mismatches surface as backend-level faults.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// The predicate text, e.g. `"age > ?"`.
    pub clause: String,
    /// Positional arguments bound to the placeholders in order.
    pub args: Vec<StorageValue>,
}

impl Filter {
    /// Creates a filter from clause text and positional arguments.
    pub fn new(clause: impl Into<String>, args: Vec<StorageValue>) -> Self {
        Self {
            clause: clause.into(),
            args,
        }
    }
}
