//! The session handle and query entry points.

use crate::error::{CoreError, CoreResult};
use crate::query::{Operation, Query};
use crate::record::Record;
use crate::schema::derive_schema;
use rowmap_store::{
    EmbeddedDatabase, ProviderClient, ProviderUri, RemoteTable, TableBackend,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// What a query builder is bound to: a table in the embedded store or a
/// remote provider target.
///
/// The variant is chosen explicitly at construction - never inferred from
/// the shape of a string. Plain strings convert to table targets;
/// provider targets require a parsed [`ProviderUri`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A table in the session's embedded database.
    Table(String),
    /// A remote provider target.
    Provider(ProviderUri),
}

impl Target {
    /// Creates an embedded table target.
    pub fn table(name: impl Into<String>) -> Self {
        Self::Table(name.into())
    }

    /// Creates a remote provider target.
    #[must_use]
    pub fn provider(uri: ProviderUri) -> Self {
        Self::Provider(uri)
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Self::Table(name.to_string())
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Self::Table(name)
    }
}

impl From<ProviderUri> for Target {
    fn from(uri: ProviderUri) -> Self {
        Self::Provider(uri)
    }
}

struct SessionInner {
    database: Option<EmbeddedDatabase>,
    providers: HashMap<String, Arc<dyn ProviderClient>>,
}

/// The explicit handle every query builder is created from.
///
/// A `Session` is an ordinary owned value - construct one at startup, clone
/// it freely (clones share state), and drop it at shutdown. Builder
/// lifetimes are tied to the session's shared state, so there is no
/// use-after-teardown to guard against.
///
/// # Example
///
/// ```rust,ignore
/// let session = Session::builder()
///     .database("app.db")
///     .schema_version(2)
///     .build();
///
/// let inserted = session
///     .insert_into::<Person>("people")?
///     .values([person])
///     .run()?;
/// ```
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    /// Returns a builder for configuring a session.
    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Creates a session over a private in-memory store, mainly for tests.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::builder().in_memory().build()
    }

    /// Starts a select query against `target`.
    ///
    /// # Errors
    ///
    /// Fails at construction time for a record type with no columns, a
    /// table target without a configured database, or an unregistered
    /// provider authority.
    pub fn select_from<T: Record + 'static>(&self, target: impl Into<Target>) -> CoreResult<Query<T>> {
        self.query(target.into(), Operation::Select)
    }

    /// Starts an insert query against `target`.
    ///
    /// # Errors
    ///
    /// Fails as [`Self::select_from`] does.
    pub fn insert_into<T: Record + 'static>(&self, target: impl Into<Target>) -> CoreResult<Query<T>> {
        self.query(target.into(), Operation::Insert)
    }

    /// Starts an update query against `target`.
    ///
    /// # Errors
    ///
    /// Fails as [`Self::select_from`] does.
    pub fn update<T: Record + 'static>(&self, target: impl Into<Target>) -> CoreResult<Query<T>> {
        self.query(target.into(), Operation::Update)
    }

    /// Starts a delete query against `target`.
    ///
    /// # Errors
    ///
    /// Fails as [`Self::select_from`] does.
    pub fn delete_from<T: Record + 'static>(&self, target: impl Into<Target>) -> CoreResult<Query<T>> {
        self.query(target.into(), Operation::Delete)
    }

    /// Administrative drop of a target's backing table, destroying its
    /// data.
    ///
    /// # Errors
    ///
    /// Fails for an unresolvable target or a backend fault.
    pub fn drop_table(&self, target: impl Into<Target>) -> CoreResult<()> {
        match target.into() {
            Target::Table(name) => {
                let database = self.inner.database.as_ref().ok_or(CoreError::NoDatabase)?;
                debug!(table = %name, "dropping table");
                database.drop_table(&name)?;
                Ok(())
            }
            Target::Provider(uri) => {
                let client = self.provider_client(&uri)?;
                debug!(uri = %uri, "dropping provider table");
                client.drop_table(&uri)?;
                Ok(())
            }
        }
    }

    fn provider_client(&self, uri: &ProviderUri) -> CoreResult<&Arc<dyn ProviderClient>> {
        self.inner
            .providers
            .get(uri.authority())
            .ok_or_else(|| CoreError::UnknownProvider {
                authority: uri.authority().to_string(),
            })
    }

    fn query<T: Record + 'static>(&self, target: Target, kind: Operation) -> CoreResult<Query<T>> {
        // Schema derivation happens here so a columnless record type fails
        // at construction, not at the first terminal.
        let schema = derive_schema::<T>()?;
        let (backend, table): (Arc<dyn TableBackend>, String) = match target {
            Target::Table(name) => {
                let database = self.inner.database.as_ref().ok_or(CoreError::NoDatabase)?;
                (Arc::new(database.table(name.clone())), name)
            }
            Target::Provider(uri) => {
                let client = Arc::clone(self.provider_client(&uri)?);
                let table = uri.authority().to_string();
                (Arc::new(RemoteTable::new(client, uri)), table)
            }
        };
        let create_sql = schema.create_table_sql(&table);
        Ok(Query::new(backend, create_sql, kind))
    }
}

/// Configures and builds a [`Session`].
pub struct SessionBuilder {
    path: Option<PathBuf>,
    memory: bool,
    version: u32,
    providers: HashMap<String, Arc<dyn ProviderClient>>,
}

impl SessionBuilder {
    fn new() -> Self {
        Self {
            path: None,
            memory: false,
            version: 1,
            providers: HashMap::new(),
        }
    }

    /// Uses a file-backed embedded database at `path`.
    ///
    /// The backing store opens on first use.
    #[must_use]
    pub fn database(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self.memory = false;
        self
    }

    /// Uses a private in-memory embedded database.
    #[must_use]
    pub fn in_memory(mut self) -> Self {
        self.memory = true;
        self.path = None;
        self
    }

    /// Sets the embedded schema version (default 1).
    ///
    /// Opening an existing store under a bumped version drops and recreates
    /// each table on first use - a data-loss policy, not a migration.
    #[must_use]
    pub fn schema_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Registers a remote provider client for an authority.
    #[must_use]
    pub fn provider(mut self, authority: impl Into<String>, client: Arc<dyn ProviderClient>) -> Self {
        self.providers.insert(authority.into(), client);
        self
    }

    /// Builds the session.
    ///
    /// A session built with neither [`database`](Self::database) nor
    /// [`in_memory`](Self::in_memory) can only use provider targets; table
    /// targets fail with [`CoreError::NoDatabase`].
    #[must_use]
    pub fn build(self) -> Session {
        let database = if self.memory {
            Some(EmbeddedDatabase::in_memory())
        } else {
            self.path
                .map(|path| EmbeddedDatabase::new(path, self.version))
        };
        Session {
            inner: Arc::new(SessionInner {
                database,
                providers: self.providers,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ColumnFlags, FieldSpec};
    use rowmap_codec::{CodecError, FieldKind, FieldValue};

    #[derive(Debug, Default, Clone)]
    struct Tag {
        label: Option<String>,
    }

    impl Record for Tag {
        fn fields() -> &'static [FieldSpec<Self>] {
            const FIELDS: &[FieldSpec<Tag>] = &[FieldSpec::new(
                "label",
                FieldKind::Text,
                ColumnFlags::NONE,
                |t| Ok(t.label.clone().map(FieldValue::Text)),
                |t, v| {
                    t.label = match v {
                        Some(FieldValue::Text(s)) => Some(s),
                        None => None,
                        _ => return Err(CodecError::unexpected_value("label")),
                    };
                    Ok(())
                },
            )];
            FIELDS
        }
    }

    #[test]
    fn table_target_from_str() {
        assert_eq!(Target::from("people"), Target::Table("people".to_string()));
        assert_eq!(
            Target::table("people"),
            Target::Table("people".to_string())
        );
    }

    #[test]
    fn provider_target_requires_parsed_uri() {
        let uri = ProviderUri::parse("provider://com.example.tags").unwrap();
        assert_eq!(Target::from(uri.clone()), Target::Provider(uri));
    }

    #[test]
    fn table_target_without_database_fails() {
        let session = Session::builder().build();
        let err = session.select_from::<Tag>("tags").unwrap_err();
        assert!(matches!(err, CoreError::NoDatabase));
    }

    #[test]
    fn unknown_provider_authority_fails() {
        let session = Session::in_memory();
        let uri = ProviderUri::parse("provider://com.example.unregistered").unwrap();
        let err = session.select_from::<Tag>(uri).unwrap_err();
        match err {
            CoreError::UnknownProvider { authority } => {
                assert_eq!(authority, "com.example.unregistered");
            }
            other => panic!("expected UnknownProvider, got {other:?}"),
        }
    }

    #[test]
    fn clones_share_state() {
        let session = Session::in_memory();
        let clone = session.clone();

        session
            .insert_into::<Tag>("tags")
            .unwrap()
            .values([Tag {
                label: Some("a".to_string()),
            }])
            .run()
            .unwrap();

        let tags = clone.select_from::<Tag>("tags").unwrap().all().unwrap();
        assert_eq!(tags.len(), 1);
    }
}
