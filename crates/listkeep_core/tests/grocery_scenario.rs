use listkeep_core::{
    CollectionService, Database, RecordService, ServiceError, SqliteCollectionRepository,
    SqliteRecordRepository, StoreConfig, DEFAULT_COLLECTION_NAME,
};

#[test]
fn groceries_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = Database::new(StoreConfig::file(dir.path().join("lists.db")));
    let conn = db.initialize().unwrap();

    let collections = CollectionService::new(SqliteCollectionRepository::try_new(conn).unwrap());
    let records = RecordService::new(SqliteRecordRepository::try_new(conn).unwrap());

    let groceries = collections.create("Groceries").unwrap();
    let listed = collections.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Groceries");

    let milk = records.create(groceries.id, "Milk").unwrap();
    let items = records.list_by_collection(groceries.id).unwrap();
    assert_eq!(
        items.iter().map(|r| r.text.as_str()).collect::<Vec<_>>(),
        vec!["Milk"]
    );
    assert!(!items[0].completed);

    assert!(records.toggle_complete(milk.id).unwrap().completed);

    let copy = records.copy(milk.id).unwrap();
    let items = records.list_by_collection(groceries.id).unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|r| r.text == "Milk" && r.completed));
    assert_ne!(items[0].id, items[1].id);
    assert_eq!(items[1].id, copy.id);

    collections.delete(groceries.id).unwrap();
    assert!(records.list_by_collection(groceries.id).unwrap().is_empty());
    assert!(collections
        .list()
        .unwrap()
        .iter()
        .all(|c| c.name != "Groceries"));
}

#[test]
fn blank_record_fails_while_blank_collection_gets_default_name() {
    let mut db = Database::new(StoreConfig::in_memory());
    let conn = db.initialize().unwrap();
    let collections = CollectionService::new(SqliteCollectionRepository::try_new(conn).unwrap());
    let records = RecordService::new(SqliteRecordRepository::try_new(conn).unwrap());

    let untitled = collections.create("").unwrap();
    assert_eq!(untitled.name, DEFAULT_COLLECTION_NAME);

    let err = records.create(untitled.id, "").unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ref v) if v.field == "text"));
    assert_eq!(records.count_by_collection(untitled.id).unwrap(), 0);
}

#[test]
fn data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::file(dir.path().join("lists.db"));

    let mut db = Database::new(config.clone());
    let created = {
        let conn = db.initialize().unwrap();
        let collections =
            CollectionService::new(SqliteCollectionRepository::try_new(conn).unwrap());
        collections.create("Hardware").unwrap()
    };
    db.close().unwrap();

    let mut db = Database::new(config);
    let conn = db.initialize().unwrap();
    let collections = CollectionService::new(SqliteCollectionRepository::try_new(conn).unwrap());
    assert_eq!(collections.get_by_id(created.id).unwrap(), Some(created));
}
