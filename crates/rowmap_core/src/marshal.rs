//! Row marshaling between typed records and backend boundary types.

use crate::error::{CoreError, CoreResult};
use crate::record::Record;
use rowmap_codec::{decode, encode};
use rowmap_store::{Row, WriteSet};
use std::any::type_name;

/// Converts a fetched row into a typed record instance.
///
/// The **row's** column set is authoritative here: every fetched column is
/// resolved to a field by exact name match on the record type, and an
/// unmatched column is a [`CoreError::MissingField`] naming the column and
/// its storage class. (The write path is the mirror image - see
/// [`record_to_values`].) The instance starts from `T::default()`; fetched
/// values are decoded with each field's declared kind and applied through
/// its mutator.
///
/// # Errors
///
/// Returns [`CoreError::MissingField`] for a column with no matching
/// field, or a codec error when a cell does not decode into the declared
/// kind.
pub fn row_to_record<T: Record + 'static>(row: &Row) -> CoreResult<T> {
    let mut record = T::default();
    for (column, value) in row.iter() {
        let Some(field) = T::fields().iter().find(|f| f.name() == column) else {
            return Err(CoreError::MissingField {
                column: column.to_string(),
                class: value.class(),
            });
        };
        let decoded = decode(value, field.kind(), column)?;
        field.write(&mut record, decoded)?;
    }
    Ok(record)
}

/// Converts a record instance into a write set for an insert or update.
///
/// The **type's** field table is authoritative here, in declared order. An
/// optional projection restricts which fields are written, matched
/// case-insensitively against column names. Auto-increment fields are never
/// written, whatever value the caller supplied - the store assigns them.
/// An absent field value is omitted from the write set rather than written
/// as storage NULL; as a consequence, an update cannot clear a column to
/// NULL through this path (a known limitation).
///
/// # Errors
///
/// Returns [`CoreError::NoColumns`] when zero fields qualify after
/// projection filtering - independent of how many were actually non-null -
/// or the accessor's codec error (e.g. an unserializable graph value).
pub fn record_to_values<T: Record + 'static>(
    record: &T,
    projection: Option<&[String]>,
) -> CoreResult<WriteSet> {
    let mut write_set = WriteSet::new();
    let mut qualified = 0usize;

    for field in T::fields() {
        if let Some(projection) = projection {
            if !projection.is_empty()
                && !projection
                    .iter()
                    .any(|column| column.eq_ignore_ascii_case(field.name()))
            {
                continue;
            }
        }
        qualified += 1;
        if field.flags().auto_increment {
            continue;
        }
        let Some(value) = field.read(record)? else {
            continue;
        };
        write_set.put(field.name(), encode(value));
    }

    if qualified == 0 {
        return Err(CoreError::no_columns(type_name::<T>()));
    }
    Ok(write_set)
}
