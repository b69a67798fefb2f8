//! The static record descriptor.

use rowmap_codec::{CodecResult, FieldKind, FieldValue};
use std::fmt;

/// Constraint flags for a column field.
///
/// Flags compose into the column definition in a fixed order:
/// `PRIMARY KEY`, then `AUTOINCREMENT`, then `NOT NULL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnFlags {
    /// The column is the table's primary key.
    pub primary_key: bool,
    /// The store assigns this column's value; caller-supplied values are
    /// never written.
    pub auto_increment: bool,
    /// The column rejects NULL.
    pub not_null: bool,
}

impl ColumnFlags {
    /// No flags set.
    pub const NONE: Self = Self {
        primary_key: false,
        auto_increment: false,
        not_null: false,
    };

    /// Creates an empty flag set.
    #[must_use]
    pub const fn new() -> Self {
        Self::NONE
    }

    /// Sets the primary key flag.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Sets the auto-increment flag.
    #[must_use]
    pub const fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Sets the not-null flag.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }
}

/// Accessor: reads a field's current value, `None` when absent.
///
/// Graph fields serialize their referenced value here (see
/// [`rowmap_codec::graph::encode`]), so a serialization failure surfaces as
/// the accessor's error.
pub type FieldGet<T> = fn(&T) -> CodecResult<Option<FieldValue>>;

/// Mutator: writes a decoded value, `None` meaning the field's absent or
/// zero state. Graph fields deserialize their payload here.
pub type FieldSet<T> = fn(&mut T, Option<FieldValue>) -> CodecResult<()>;

/// One column field of a record type.
///
/// A spec carries everything schema derivation and marshaling need: the
/// storage name, the declared kind (from which the storage class is
/// computed), the constraint flags, and the accessor/mutator pair.
pub struct FieldSpec<T> {
    name: &'static str,
    kind: FieldKind,
    flags: ColumnFlags,
    get: FieldGet<T>,
    set: FieldSet<T>,
}

impl<T> FieldSpec<T> {
    /// Creates a field spec.
    #[must_use]
    pub const fn new(
        name: &'static str,
        kind: FieldKind,
        flags: ColumnFlags,
        get: FieldGet<T>,
        set: FieldSet<T>,
    ) -> Self {
        Self {
            name,
            kind,
            flags,
            get,
            set,
        }
    }

    /// Returns the storage column name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared kind.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns the constraint flags.
    #[must_use]
    pub fn flags(&self) -> ColumnFlags {
        self.flags
    }

    /// Reads the field's current value from a record.
    ///
    /// # Errors
    ///
    /// Returns the accessor's error, e.g. an unserializable graph value.
    pub fn read(&self, record: &T) -> CodecResult<Option<FieldValue>> {
        (self.get)(record)
    }

    /// Writes a decoded value into a record.
    ///
    /// # Errors
    ///
    /// Returns the mutator's error, e.g. an undecodable graph payload.
    pub fn write(&self, record: &mut T, value: Option<FieldValue>) -> CodecResult<()> {
        (self.set)(record, value)
    }
}

impl<T> fmt::Debug for FieldSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("flags", &self.flags)
            .finish()
    }
}

/// A caller type mapped to a table row.
///
/// The descriptor is static and explicit: `fields()` returns the ordered
/// table of column fields, built once at compile time. A record type must
/// declare at least one column field - schema derivation and write-set
/// construction both fail otherwise. Instantiation on the read path is
/// `Default::default()`.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Person {
///     id: i64,
///     name: Option<String>,
///     age: i32,
/// }
///
/// impl Record for Person {
///     fn fields() -> &'static [FieldSpec<Self>] {
///         const FIELDS: &[FieldSpec<Person>] = &[
///             FieldSpec::new(
///                 "_id",
///                 FieldKind::I64,
///                 ColumnFlags::new().primary_key().auto_increment().not_null(),
///                 |p| Ok(Some(FieldValue::I64(p.id))),
///                 |p, v| {
///                     p.id = match v {
///                         Some(FieldValue::I64(n)) => n,
///                         None => 0,
///                         _ => return Err(CodecError::unexpected_value("_id")),
///                     };
///                     Ok(())
///                 },
///             ),
///             // ... one spec per persisted field
///         ];
///         FIELDS
///     }
/// }
/// ```
pub trait Record: Default {
    /// Returns the ordered column field table for this type.
    fn fields() -> &'static [FieldSpec<Self>];
}
