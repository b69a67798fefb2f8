//! Schema derivation and DDL rendering.

use crate::error::{CoreError, CoreResult};
use crate::record::{ColumnFlags, Record};
use rowmap_codec::StorageClass;
use std::any::type_name;

/// One derived column definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// The storage column name.
    pub name: &'static str,
    /// The storage class, computed from the field's declared kind.
    pub class: StorageClass,
    /// Constraint flags, copied verbatim from the field spec.
    pub flags: ColumnFlags,
}

impl ColumnDef {
    /// Renders this column's definition clause.
    ///
    /// Constraints compose in the fixed order
    /// `<name> <CLASS> [PRIMARY KEY] [AUTOINCREMENT] [NOT NULL]`.
    #[must_use]
    pub fn definition(&self) -> String {
        let mut out = format!("{} {}", self.name, self.class);
        if self.flags.primary_key {
            out.push_str(" PRIMARY KEY");
        }
        if self.flags.auto_increment {
            out.push_str(" AUTOINCREMENT");
        }
        if self.flags.not_null {
            out.push_str(" NOT NULL");
        }
        out
    }
}

/// An ordered storage schema derived from a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    columns: Vec<ColumnDef>,
}

impl TableSchema {
    /// Returns the column definitions in declared order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Renders the schema text for a table.
    #[must_use]
    pub fn create_table_sql(&self, table: &str) -> String {
        let definitions: Vec<String> = self.columns.iter().map(ColumnDef::definition).collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({});",
            table,
            definitions.join(", ")
        )
    }
}

/// Derives the storage schema for a record type.
///
/// Derivation is pure and idempotent - the schema is a deterministic
/// function of the type's field table, never of runtime values. Callers
/// cache the result per builder; schema creation against a backend happens
/// once, lazily, on a target's first use.
///
/// # Errors
///
/// Returns [`CoreError::NoColumns`] when the type declares no column
/// fields, surfacing at schema-creation time rather than producing an
/// empty table.
pub fn derive_schema<T: Record + 'static>() -> CoreResult<TableSchema> {
    let columns: Vec<ColumnDef> = T::fields()
        .iter()
        .map(|field| ColumnDef {
            name: field.name(),
            class: field.kind().storage_class(),
            flags: field.flags(),
        })
        .collect();
    if columns.is_empty() {
        return Err(CoreError::no_columns(type_name::<T>()));
    }
    Ok(TableSchema { columns })
}
