use futures::StreamExt;
use std::time::Duration;
use tailorbook_core::{Customer, CustomerStore, Measurement, StoreConfig, StoreError};
use tokio::time::timeout;

const QUIET_PERIOD: Duration = Duration::from_millis(150);
const EMIT_DEADLINE: Duration = Duration::from_secs(5);

fn names(customers: &[Customer]) -> Vec<&str> {
    customers
        .iter()
        .map(|customer| customer.name.as_str())
        .collect()
}

async fn seed(store: &CustomerStore, names: &[&str]) -> Vec<i64> {
    let mut ids = Vec::new();
    for name in names {
        let id = store
            .insert(&Customer::new(*name, 8_032_458_214))
            .await
            .unwrap()
            .expect("fresh insert must assign an id");
        ids.push(id);
    }
    ids
}

#[tokio::test]
async fn insert_then_read_returns_equal_record() {
    let store = CustomerStore::open_in_memory().unwrap();
    let mut customer = Customer::new("Ada Obi", 8_032_458_214);
    customer.price = 1234.5;
    customer.deposit = 200.0;
    customer.balance = 1034.5;
    customer.address = "12 Marina Road".to_string();
    customer.measurements.set(Measurement::Bust, 36.25);
    customer.measurements.set(Measurement::Flap, 4.0);

    let id = store.insert(&customer).await.unwrap().unwrap();
    assert!(id > 0);

    let stored = store.find_by_id(id).await.unwrap().unwrap();
    customer.id = id;
    assert_eq!(stored, customer);
}

#[tokio::test]
async fn insert_with_existing_id_is_ignored() {
    let store = CustomerStore::open_in_memory().unwrap();
    let mut first = Customer::new("First", 1);
    first.id = 7;
    let mut second = Customer::new("Second", 2);
    second.id = 7;

    assert_eq!(store.insert(&first).await.unwrap(), Some(7));
    assert_eq!(store.insert(&second).await.unwrap(), None);

    let stored = store.find_by_id(7).await.unwrap().unwrap();
    assert_eq!(stored.name, "First");
    assert_eq!(store.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_is_idempotent_and_ignores_unknown_ids() {
    let store = CustomerStore::open_in_memory().unwrap();
    let ids = seed(&store, &["Tunde"]).await;

    let mut changed = store.find_by_id(ids[0]).await.unwrap().unwrap();
    changed.name = "Tunde Bakare".to_string();
    changed.measurements.set(Measurement::Hip, 40.0);

    assert!(store.update(&changed).await.unwrap());
    let after_first = store.find_by_id(ids[0]).await.unwrap().unwrap();
    assert!(store.update(&changed).await.unwrap());
    let after_second = store.find_by_id(ids[0]).await.unwrap().unwrap();
    assert_eq!(after_first, changed);
    assert_eq!(after_first, after_second);

    let mut ghost = Customer::new("Ghost", 0);
    ghost.id = 999;
    assert!(!store.update(&ghost).await.unwrap());
    assert_eq!(store.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_removes_exactly_one_id() {
    let store = CustomerStore::open_in_memory().unwrap();
    let ids = seed(&store, &["Apples", "Oranges", "Guava"]).await;

    // Only the id matters; other fields are not compared.
    let mut target = Customer::new("stale name", 0);
    target.id = ids[1];
    assert!(store.delete(&target).await.unwrap());
    assert!(!store.delete(&target).await.unwrap());

    assert!(store.find_by_id(ids[1]).await.unwrap().is_none());
    assert_eq!(
        names(&store.list_all().await.unwrap()),
        vec!["Apples", "Guava"]
    );
}

#[tokio::test]
async fn list_and_search_follow_name_order() {
    let store = CustomerStore::open_in_memory().unwrap();
    seed(&store, &["Apples", "Oranges", "Guava"]).await;

    assert_eq!(
        names(&store.list_all().await.unwrap()),
        vec!["Apples", "Guava", "Oranges"]
    );
    assert_eq!(
        names(&store.search_by_name_pattern("Or").await.unwrap()),
        vec!["Oranges"]
    );
    assert_eq!(
        names(&store.search_by_name_pattern("a").await.unwrap()),
        vec!["Guava", "Oranges"]
    );
    assert_eq!(
        names(&store.search_by_name_pattern("").await.unwrap()),
        vec!["Apples", "Guava", "Oranges"]
    );
}

#[tokio::test]
async fn search_is_case_sensitive_and_literal() {
    let store = CustomerStore::open_in_memory().unwrap();
    seed(&store, &["Oranges", "100% Cotton", "snake_case"]).await;

    assert!(store.search_by_name_pattern("or").await.unwrap().is_empty());
    assert_eq!(
        names(&store.search_by_name_pattern("%").await.unwrap()),
        vec!["100% Cotton"]
    );
    assert_eq!(
        names(&store.search_by_name_pattern("_").await.unwrap()),
        vec!["snake_case"]
    );
}

#[tokio::test]
async fn get_all_emits_current_list_then_each_change() {
    let store = CustomerStore::open_in_memory().unwrap();
    let mut stream = store.get_all();

    let initial = timeout(EMIT_DEADLINE, stream.next()).await.unwrap().unwrap();
    assert!(initial.unwrap().is_empty());

    seed(&store, &["Oranges"]).await;
    let after_insert = timeout(EMIT_DEADLINE, stream.next()).await.unwrap().unwrap();
    assert_eq!(names(&after_insert.unwrap()), vec!["Oranges"]);

    seed(&store, &["Apples"]).await;
    let after_second = timeout(EMIT_DEADLINE, stream.next()).await.unwrap().unwrap();
    assert_eq!(names(&after_second.unwrap()), vec!["Apples", "Oranges"]);
}

#[tokio::test]
async fn get_all_resorts_after_update_and_empties_after_last_delete() {
    let store = CustomerStore::open_in_memory().unwrap();
    let mut stream = store.get_all();
    let initial = timeout(EMIT_DEADLINE, stream.next()).await.unwrap().unwrap();
    assert!(initial.unwrap().is_empty());

    let ids = seed(&store, &["Apples", "Oranges"]).await;
    let mut latest = Vec::new();
    while names(&latest) != vec!["Apples", "Oranges"] {
        latest = timeout(EMIT_DEADLINE, stream.next()).await.unwrap().unwrap().unwrap();
    }

    let mut apples = store.find_by_id(ids[0]).await.unwrap().unwrap();
    apples.name = "Guava".to_string();
    assert!(store.update(&apples).await.unwrap());
    let resorted = timeout(EMIT_DEADLINE, stream.next()).await.unwrap().unwrap();
    assert_eq!(names(&resorted.unwrap()), vec!["Guava", "Oranges"]);

    for id in &ids {
        let target = Customer {
            id: *id,
            ..Customer::default()
        };
        assert!(store.delete(&target).await.unwrap());
    }
    let mut remaining = vec![Customer::default()];
    while !remaining.is_empty() {
        remaining = timeout(EMIT_DEADLINE, stream.next()).await.unwrap().unwrap().unwrap();
    }
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn no_op_writes_do_not_wake_subscribers() {
    let store = CustomerStore::open_in_memory().unwrap();
    let mut stream = store.get_all();
    timeout(EMIT_DEADLINE, stream.next()).await.unwrap();

    let mut ghost = Customer::new("Ghost", 0);
    ghost.id = 42;
    assert!(!store.update(&ghost).await.unwrap());
    assert!(!store.delete(&ghost).await.unwrap());

    assert!(timeout(QUIET_PERIOD, stream.next()).await.is_err());
}

#[tokio::test]
async fn get_by_id_is_silent_until_the_row_exists() {
    let store = CustomerStore::open_in_memory().unwrap();
    let mut stream = store.get_by_id(1);

    assert!(timeout(QUIET_PERIOD, stream.next()).await.is_err());

    let ids = seed(&store, &["Late Arrival"]).await;
    assert_eq!(ids, vec![1]);

    let customer = timeout(EMIT_DEADLINE, stream.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(customer.name, "Late Arrival");
}

#[tokio::test]
async fn file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::file(dir.path().join("tailorbook.db"));

    let store = CustomerStore::open(&config).unwrap();
    seed(&store, &["Persisted"]).await;
    store.close().unwrap();

    let reopened = CustomerStore::open(&config).unwrap();
    assert_eq!(
        names(&reopened.list_all().await.unwrap()),
        vec!["Persisted"]
    );
}

#[tokio::test]
async fn close_fails_while_live_queries_hold_the_store() {
    let store = CustomerStore::open_in_memory().unwrap();
    let stream = store.get_all();

    let err = store.clone().close().unwrap_err();
    assert!(matches!(err, StoreError::StillShared));

    drop(stream);
    store.close().unwrap();
}
