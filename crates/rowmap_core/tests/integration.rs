//! End-to-end tests for the mapping layer over both backends.

use rowmap_core::{
    graph, CodecError, ColumnFlags, CoreError, FieldKind, FieldSpec, FieldValue, ImageData,
    ProviderClient, ProviderUri, Record, Row, Session, StoreResult, TableBackend, WriteSet,
};
use rowmap_core::{EmbeddedDatabase, Filter};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Person {
    id: i64,
    name: Option<String>,
    age: i32,
    rank: f32,
    admin: bool,
    parent: Option<Box<Person>>,
}

impl Person {
    fn new(name: &str, age: i32, rank: f32) -> Self {
        Self {
            name: Some(name.to_string()),
            age,
            rank,
            ..Self::default()
        }
    }
}

impl Record for Person {
    fn fields() -> &'static [FieldSpec<Self>] {
        const FIELDS: &[FieldSpec<Person>] = &[
            FieldSpec::new(
                "_id",
                FieldKind::I64,
                ColumnFlags::new().primary_key().auto_increment().not_null(),
                |p| Ok(Some(FieldValue::I64(p.id))),
                |p, v| {
                    p.id = match v {
                        Some(FieldValue::I64(n)) => n,
                        None => 0,
                        _ => return Err(CodecError::unexpected_value("_id")),
                    };
                    Ok(())
                },
            ),
            FieldSpec::new(
                "name",
                FieldKind::Text,
                ColumnFlags::NONE,
                |p| Ok(p.name.clone().map(FieldValue::Text)),
                |p, v| {
                    p.name = match v {
                        Some(FieldValue::Text(s)) => Some(s),
                        None => None,
                        _ => return Err(CodecError::unexpected_value("name")),
                    };
                    Ok(())
                },
            ),
            FieldSpec::new(
                "age",
                FieldKind::I32,
                ColumnFlags::NONE,
                |p| Ok(Some(FieldValue::I32(p.age))),
                |p, v| {
                    p.age = match v {
                        Some(FieldValue::I32(n)) => n,
                        None => 0,
                        _ => return Err(CodecError::unexpected_value("age")),
                    };
                    Ok(())
                },
            ),
            FieldSpec::new(
                "rank",
                FieldKind::F32,
                ColumnFlags::NONE,
                |p| Ok(Some(FieldValue::F32(p.rank))),
                |p, v| {
                    p.rank = match v {
                        Some(FieldValue::F32(x)) => x,
                        None => 0.0,
                        _ => return Err(CodecError::unexpected_value("rank")),
                    };
                    Ok(())
                },
            ),
            FieldSpec::new(
                "admin",
                FieldKind::Bool,
                ColumnFlags::NONE,
                |p| Ok(Some(FieldValue::Bool(p.admin))),
                |p, v| {
                    p.admin = match v {
                        Some(FieldValue::Bool(b)) => b,
                        None => false,
                        _ => return Err(CodecError::unexpected_value("admin")),
                    };
                    Ok(())
                },
            ),
            FieldSpec::new(
                "parent",
                FieldKind::Graph,
                ColumnFlags::NONE,
                |p| match &p.parent {
                    Some(parent) => Ok(Some(FieldValue::Graph(graph::encode(parent.as_ref())?))),
                    None => Ok(None),
                },
                |p, v| {
                    p.parent = match v {
                        Some(FieldValue::Graph(bytes)) => {
                            Some(Box::new(graph::decode::<Person>(&bytes)?))
                        }
                        None => None,
                        _ => return Err(CodecError::unexpected_value("parent")),
                    };
                    Ok(())
                },
            ),
        ];
        FIELDS
    }
}

fn ignoring_id(mut person: Person) -> Person {
    person.id = 0;
    person
}

#[test]
fn scenario_insert_then_select_roundtrips() {
    let session = Session::in_memory();
    let waverly = Person::new("Waverly", 18, 8.9);

    let inserted = session
        .insert_into::<Person>("people")
        .unwrap()
        .values([waverly.clone()])
        .run()
        .unwrap();
    assert_eq!(inserted, 1);

    let people = session
        .select_from::<Person>("people")
        .unwrap()
        .all()
        .unwrap();
    assert_eq!(people.len(), 1);
    // The store assigned the auto-increment id.
    assert_eq!(people[0].id, 1);
    assert_eq!(ignoring_id(people[0].clone()), waverly);
}

#[test]
fn scenario_bulk_insert_then_delete_all() {
    let session = Session::in_memory();

    let inserted = session
        .insert_into::<Person>("people")
        .unwrap()
        .values([
            Person::new("one", 1, 0.0),
            Person::new("two", 2, 0.0),
            Person::new("three", 3, 0.0),
        ])
        .run()
        .unwrap();
    assert_eq!(inserted, 3);

    let deleted = session
        .delete_from::<Person>("people")
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(deleted, 3);

    let people = session
        .select_from::<Person>("people")
        .unwrap()
        .all()
        .unwrap();
    assert!(people.is_empty());
}

#[test]
fn scenario_insert_without_values_fails() {
    let session = Session::in_memory();
    let err = session
        .insert_into::<Person>("people")
        .unwrap()
        .run()
        .unwrap_err();
    assert!(matches!(err, CoreError::NoValues));
}

#[test]
fn scenario_filter_with_positional_argument() {
    let session = Session::in_memory();
    session
        .insert_into::<Person>("people")
        .unwrap()
        .values([
            Person::new("a", 18, 0.0),
            Person::new("b", 42, 0.0),
            Person::new("c", 20, 0.0),
            Person::new("d", 15, 0.0),
        ])
        .run()
        .unwrap();

    let matching = session
        .select_from::<Person>("people")
        .unwrap()
        .filter("age > ?", [19])
        .all()
        .unwrap();

    // Backend-native order: no sort was given.
    let ages: Vec<i32> = matching.iter().map(|p| p.age).collect();
    assert_eq!(ages, vec![42, 20]);
}

#[test]
fn scenario_update_applies_only_last_payload() {
    let session = Session::in_memory();
    session
        .insert_into::<Person>("people")
        .unwrap()
        .values([Person::new("Waverly", 18, 8.9)])
        .run()
        .unwrap();

    let ignored = Person::new("ignored", 1, 1.0);
    let applied = Person::new("applied", 99, 2.5);
    let changed = session
        .update::<Person>("people")
        .unwrap()
        .values([ignored, applied])
        .run()
        .unwrap();
    assert_eq!(changed, 1);

    let people = session
        .select_from::<Person>("people")
        .unwrap()
        .all()
        .unwrap();
    assert_eq!(people[0].name.as_deref(), Some("applied"));
    assert_eq!(people[0].age, 99);
}

#[test]
fn caller_supplied_id_is_never_written() {
    let session = Session::in_memory();
    let mut person = Person::new("Waverly", 18, 8.9);
    person.id = 999;

    session
        .insert_into::<Person>("people")
        .unwrap()
        .values([person])
        .run()
        .unwrap();

    let people = session
        .select_from::<Person>("people")
        .unwrap()
        .all()
        .unwrap();
    assert_eq!(people[0].id, 1);
}

#[test]
fn graph_field_roundtrips_deeply() {
    let session = Session::in_memory();
    let mut child = Person::new("child", 8, 0.0);
    child.parent = Some(Box::new(Person::new("parent", 40, 3.0)));

    session
        .insert_into::<Person>("people")
        .unwrap()
        .values([child.clone()])
        .run()
        .unwrap();

    let people = session
        .select_from::<Person>("people")
        .unwrap()
        .all()
        .unwrap();
    assert_eq!(ignoring_id(people[0].clone()), child);
    let parent = people[0].parent.as_deref().unwrap();
    assert_eq!(parent.name.as_deref(), Some("parent"));
    assert_eq!(parent.age, 40);
}

#[test]
fn one_returns_first_or_none() {
    let session = Session::in_memory();
    let select = session.select_from::<Person>("people").unwrap();
    assert_eq!(select.one().unwrap(), None);

    session
        .insert_into::<Person>("people")
        .unwrap()
        .values([Person::new("a", 1, 0.0), Person::new("b", 2, 0.0)])
        .run()
        .unwrap();

    // Re-invoking the same terminal re-executes against current state.
    let first = select.one().unwrap().unwrap();
    assert_eq!(first.name.as_deref(), Some("a"));
}

#[test]
fn limit_caps_select() {
    let session = Session::in_memory();
    session
        .insert_into::<Person>("people")
        .unwrap()
        .values([
            Person::new("a", 1, 0.0),
            Person::new("b", 2, 0.0),
            Person::new("c", 3, 0.0),
        ])
        .run()
        .unwrap();

    let people = session
        .select_from::<Person>("people")
        .unwrap()
        .limit(2)
        .all()
        .unwrap();
    assert_eq!(people.len(), 2);

    // Zero means unlimited.
    let people = session
        .select_from::<Person>("people")
        .unwrap()
        .limit(0)
        .all()
        .unwrap();
    assert_eq!(people.len(), 3);
}

#[test]
fn sort_orders_results() {
    let session = Session::in_memory();
    session
        .insert_into::<Person>("people")
        .unwrap()
        .values([
            Person::new("a", 18, 0.0),
            Person::new("b", 42, 0.0),
            Person::new("c", 20, 0.0),
        ])
        .run()
        .unwrap();

    let people = session
        .select_from::<Person>("people")
        .unwrap()
        .sort("age DESC")
        .all()
        .unwrap();
    let ages: Vec<i32> = people.iter().map(|p| p.age).collect();
    assert_eq!(ages, vec![42, 20, 18]);
}

#[test]
fn update_projection_restricts_written_columns() {
    let session = Session::in_memory();
    session
        .insert_into::<Person>("people")
        .unwrap()
        .values([Person::new("Waverly", 18, 8.9)])
        .run()
        .unwrap();

    let mut replacement = Person::new("replaced", 99, 1.5);
    replacement.admin = true;
    session
        .update::<Person>("people")
        .unwrap()
        .projection(["RANK"]) // case-insensitive match
        .values([replacement])
        .run()
        .unwrap();

    let people = session
        .select_from::<Person>("people")
        .unwrap()
        .all()
        .unwrap();
    assert_eq!(people[0].rank, 1.5);
    // Everything outside the projection kept its stored value.
    assert_eq!(people[0].name.as_deref(), Some("Waverly"));
    assert_eq!(people[0].age, 18);
    assert!(!people[0].admin);
}

#[test]
fn run_on_select_is_invalid() {
    let session = Session::in_memory();
    let err = session
        .select_from::<Person>("people")
        .unwrap()
        .run()
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidOperation { .. }));
}

#[test]
fn fetch_on_write_builder_yields_nothing() {
    let session = Session::in_memory();
    let insert = session
        .insert_into::<Person>("people")
        .unwrap()
        .values([Person::new("a", 1, 0.0)]);
    assert!(insert.all().unwrap().is_empty());
    assert_eq!(insert.one().unwrap(), None);
}

#[test]
fn spawn_all_delivers_on_the_task_channel() {
    let session = Session::in_memory();
    session
        .insert_into::<Person>("people")
        .unwrap()
        .values([Person::new("a", 1, 0.0), Person::new("b", 2, 0.0)])
        .run()
        .unwrap();

    let task = session
        .select_from::<Person>("people")
        .unwrap()
        .spawn_all();
    let people = task.join().unwrap();
    assert_eq!(people.len(), 2);
}

#[test]
fn spawn_run_delivers_errors() {
    let session = Session::in_memory();
    let task = session
        .insert_into::<Person>("people")
        .unwrap()
        .spawn_run();
    let err = task.join().unwrap_err();
    assert!(matches!(err, CoreError::NoValues));
}

/// An in-memory provider double, backed by its own embedded store the way
/// a real provider process owns its own database.
struct MemoryProvider {
    db: EmbeddedDatabase,
    table: String,
    create_sql: String,
    single_inserts: AtomicUsize,
    bulk_inserts: AtomicUsize,
}

impl MemoryProvider {
    fn new(table: &str, create_sql: &str) -> Self {
        Self {
            db: EmbeddedDatabase::in_memory(),
            table: table.to_string(),
            create_sql: create_sql.to_string(),
            single_inserts: AtomicUsize::new(0),
            bulk_inserts: AtomicUsize::new(0),
        }
    }

    fn table(&self) -> StoreResult<rowmap_core::EmbeddedTable> {
        let table = self.db.table(&self.table);
        table.ensure_schema(&self.create_sql)?;
        Ok(table)
    }
}

impl ProviderClient for MemoryProvider {
    fn query(
        &self,
        _uri: &ProviderUri,
        projection: Option<&[String]>,
        filter: Option<&Filter>,
        order: Option<&str>,
    ) -> StoreResult<Vec<Row>> {
        self.table()?.query(projection, filter, order, None)
    }

    fn insert(&self, _uri: &ProviderUri, values: &WriteSet) -> StoreResult<i64> {
        self.single_inserts.fetch_add(1, Ordering::SeqCst);
        self.table()?.insert(values)
    }

    fn bulk_insert(&self, _uri: &ProviderUri, values: &[WriteSet]) -> StoreResult<u64> {
        self.bulk_inserts.fetch_add(1, Ordering::SeqCst);
        self.table()?.bulk_insert(values)
    }

    fn update(
        &self,
        _uri: &ProviderUri,
        values: &WriteSet,
        filter: Option<&Filter>,
    ) -> StoreResult<u64> {
        self.table()?.update(values, filter)
    }

    fn delete(&self, _uri: &ProviderUri, filter: Option<&Filter>) -> StoreResult<u64> {
        self.table()?.delete(filter)
    }

    fn drop_table(&self, _uri: &ProviderUri) -> StoreResult<()> {
        self.db.drop_table(&self.table)
    }
}

fn provider_session() -> (Session, Arc<MemoryProvider>, ProviderUri) {
    let create_sql = rowmap_core::derive_schema::<Person>()
        .unwrap()
        .create_table_sql("people");
    let provider = Arc::new(MemoryProvider::new("people", &create_sql));
    let session = Session::builder()
        .provider("com.example.people", Arc::clone(&provider) as Arc<dyn ProviderClient>)
        .build();
    let uri = ProviderUri::parse("provider://com.example.people").unwrap();
    (session, provider, uri)
}

#[test]
fn remote_single_insert_uses_single_call() {
    let (session, provider, uri) = provider_session();

    let inserted = session
        .insert_into::<Person>(uri.clone())
        .unwrap()
        .values([Person::new("solo", 1, 0.0)])
        .run()
        .unwrap();
    assert_eq!(inserted, 1);
    assert_eq!(provider.single_inserts.load(Ordering::SeqCst), 1);
    assert_eq!(provider.bulk_inserts.load(Ordering::SeqCst), 0);

    let people = session
        .select_from::<Person>(uri)
        .unwrap()
        .all()
        .unwrap();
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].name.as_deref(), Some("solo"));
}

#[test]
fn remote_multi_insert_uses_bulk_call() {
    let (session, provider, uri) = provider_session();

    let inserted = session
        .insert_into::<Person>(uri)
        .unwrap()
        .values([Person::new("a", 1, 0.0), Person::new("b", 2, 0.0)])
        .run()
        .unwrap();
    assert_eq!(inserted, 2);
    assert_eq!(provider.single_inserts.load(Ordering::SeqCst), 0);
    assert_eq!(provider.bulk_inserts.load(Ordering::SeqCst), 1);
}

#[test]
fn remote_update_and_delete_forward() {
    let (session, _provider, uri) = provider_session();
    session
        .insert_into::<Person>(uri.clone())
        .unwrap()
        .values([Person::new("a", 18, 0.0), Person::new("b", 42, 0.0)])
        .run()
        .unwrap();

    let changed = session
        .update::<Person>(uri.clone())
        .unwrap()
        .projection(["rank"])
        .values([Person::new("x", 0, 9.5)])
        .filter("age > ?", [30])
        .run()
        .unwrap();
    assert_eq!(changed, 1);

    let deleted = session
        .delete_from::<Person>(uri)
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(deleted, 2);
}

#[test]
fn remote_drop_table_is_administrative() {
    let (session, _provider, uri) = provider_session();
    session
        .insert_into::<Person>(uri.clone())
        .unwrap()
        .values([Person::new("a", 1, 0.0)])
        .run()
        .unwrap();

    session.drop_table(uri.clone()).unwrap();

    // The provider recreates its table on next use; the data is gone.
    let people = session
        .select_from::<Person>(uri)
        .unwrap()
        .all()
        .unwrap();
    assert!(people.is_empty());
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Snapshot {
    id: i64,
    photo: Option<ImageData>,
}

impl Record for Snapshot {
    fn fields() -> &'static [FieldSpec<Self>] {
        const FIELDS: &[FieldSpec<Snapshot>] = &[
            FieldSpec::new(
                "_id",
                FieldKind::I64,
                ColumnFlags::new().primary_key().auto_increment().not_null(),
                |s| Ok(Some(FieldValue::I64(s.id))),
                |s, v| {
                    s.id = match v {
                        Some(FieldValue::I64(n)) => n,
                        None => 0,
                        _ => return Err(CodecError::unexpected_value("_id")),
                    };
                    Ok(())
                },
            ),
            FieldSpec::new(
                "photo",
                FieldKind::Image,
                ColumnFlags::NONE,
                |s| Ok(s.photo.clone().map(FieldValue::Image)),
                |s, v| {
                    s.photo = match v {
                        Some(FieldValue::Image(image)) => Some(image),
                        None => None,
                        _ => return Err(CodecError::unexpected_value("photo")),
                    };
                    Ok(())
                },
            ),
        ];
        FIELDS
    }
}

#[test]
fn image_field_roundtrips_losslessly() {
    let session = Session::in_memory();
    let photo = ImageData::new(2, 2, vec![7; 16]).unwrap();
    let snapshot = Snapshot {
        id: 0,
        photo: Some(photo.clone()),
    };

    session
        .insert_into::<Snapshot>("snapshots")
        .unwrap()
        .values([snapshot])
        .run()
        .unwrap();

    let snapshots = session
        .select_from::<Snapshot>("snapshots")
        .unwrap()
        .all()
        .unwrap();
    assert_eq!(snapshots[0].photo.as_ref(), Some(&photo));
}
