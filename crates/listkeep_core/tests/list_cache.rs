use listkeep_core::db::open_db_in_memory;
use listkeep_core::{
    CacheState, CollectionListCache, CollectionService, RecordListCache, RecordService,
    ServiceError, SqliteCollectionRepository, SqliteRecordRepository, DEFAULT_COLLECTION_NAME,
};
use rusqlite::Connection;
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

fn collection_service(conn: &Connection) -> CollectionService<SqliteCollectionRepository<'_>> {
    CollectionService::new(SqliteCollectionRepository::try_new(conn).unwrap())
}

fn record_service(conn: &Connection) -> RecordService<SqliteRecordRepository<'_>> {
    RecordService::new(SqliteRecordRepository::try_new(conn).unwrap())
}

#[test]
fn refresh_loads_collections_and_reports_ready() {
    let conn = open_db_in_memory().unwrap();
    let service = collection_service(&conn);
    service.create("Groceries").unwrap();

    let mut cache = CollectionListCache::new(&service);
    assert_eq!(cache.state(), &CacheState::Idle);

    cache.refresh().unwrap();
    assert_eq!(cache.state(), &CacheState::Ready);
    assert_eq!(cache.items().len(), 1);
    assert_eq!(cache.items()[0].name, "Groceries");
}

#[test]
fn optimistic_create_is_replaced_by_stored_collection() {
    let conn = open_db_in_memory().unwrap();
    let service = collection_service(&conn);
    let existing = service.create("Existing").unwrap();

    let mut cache = CollectionListCache::new(&service);
    cache.refresh().unwrap();

    let observed = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&observed);
    cache.subscribe(move |snapshot| {
        sink.borrow_mut().push(
            snapshot
                .items
                .iter()
                .map(|collection| (collection.id, collection.name.clone()))
                .collect::<Vec<_>>(),
        );
    });

    let created = cache.create("  ").unwrap();

    let observed = observed.borrow();
    assert_eq!(observed.len(), 2);
    let optimistic = &observed[0];
    assert_eq!(optimistic.len(), 2);
    assert_eq!(optimistic[0].1, DEFAULT_COLLECTION_NAME);
    assert_ne!(optimistic[0].0, created.id);

    assert_eq!(cache.items()[0], created);
    assert_eq!(cache.items()[1], existing);
    assert_eq!(cache.items(), service.list().unwrap().as_slice());
}

#[test]
fn failed_update_rolls_back_to_exact_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let service = collection_service(&conn);
    let target = service.create("Keep me").unwrap();
    service.create("Other").unwrap();

    let mut cache = CollectionListCache::new(&service);
    cache.refresh().unwrap();
    let before = cache.items().to_vec();

    let err = cache.update(target.id, "   ").unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(cache.items(), before.as_slice());
    assert_eq!(cache.state(), &CacheState::Ready);
}

#[test]
fn delete_of_externally_removed_collection_rolls_back() {
    let conn = open_db_in_memory().unwrap();
    let service = collection_service(&conn);
    let stale = service.create("Stale").unwrap();

    let mut cache = CollectionListCache::new(&service);
    cache.refresh().unwrap();
    let before = cache.items().to_vec();

    conn.execute("DELETE FROM collections WHERE id = ?1;", [stale.id.to_string()])
        .unwrap();

    let err = cache.delete(stale.id).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));
    assert_eq!(cache.items(), before.as_slice());

    cache.refresh().unwrap();
    assert!(cache.items().is_empty());
}

#[test]
fn record_cache_mirrors_service_after_each_mutation() {
    let conn = open_db_in_memory().unwrap();
    let collections = collection_service(&conn);
    let records = record_service(&conn);
    let list = collections.create("Groceries").unwrap();

    let mut cache = RecordListCache::new(&records, list.id);
    cache.refresh().unwrap();
    assert!(cache.items().is_empty());

    let milk = cache.create(" Milk ").unwrap();
    let bread = cache.create("Bread").unwrap();
    cache.toggle_complete(milk.id).unwrap();
    let copy = cache.copy(milk.id).unwrap();
    cache.update(bread.id, "Rye bread").unwrap();

    let stored = records.list_by_collection(list.id).unwrap();
    assert_eq!(cache.items(), stored.as_slice());
    assert_eq!(cache.items().last().map(|r| r.id), Some(copy.id));
    assert!(copy.completed);

    cache.delete(copy.id).unwrap();
    assert_eq!(cache.items(), records.list_by_collection(list.id).unwrap().as_slice());
}

#[test]
fn record_cache_failures_restore_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let collections = collection_service(&conn);
    let records = record_service(&conn);
    let list = collections.create("Groceries").unwrap();
    let milk = records.create(list.id, "Milk").unwrap();

    let mut cache = RecordListCache::new(&records, list.id);
    cache.refresh().unwrap();
    let before = cache.items().to_vec();
    let generation = cache.generation();

    assert!(cache.create("").is_err());
    assert_eq!(cache.items(), before.as_slice());

    assert!(cache.update(milk.id, &"z".repeat(501)).is_err());
    assert_eq!(cache.items(), before.as_slice());

    conn.execute("DELETE FROM records WHERE id = ?1;", [milk.id.to_string()])
        .unwrap();
    for result in [cache.toggle_complete(milk.id), cache.copy(milk.id)] {
        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
        assert_eq!(cache.items(), before.as_slice());
    }

    assert!(matches!(
        cache.delete(Uuid::new_v4()),
        Err(ServiceError::NotFound { .. })
    ));
    assert_eq!(cache.items(), before.as_slice());
    assert!(cache.generation() > generation);
}

#[test]
fn refresh_discards_pending_optimistic_state() {
    let conn = open_db_in_memory().unwrap();
    let collections = collection_service(&conn);
    let records = record_service(&conn);
    let list = collections.create("Groceries").unwrap();

    let mut cache = RecordListCache::new(&records, list.id);
    cache.refresh().unwrap();
    records.create(list.id, "Added elsewhere").unwrap();

    cache.refresh().unwrap();
    assert_eq!(cache.items().len(), 1);
    assert_eq!(cache.items()[0].text, "Added elsewhere");
}
