//! File-backed store shared by independent connections

use socnet_common::{Collection, Record, StatusUpdate, UserAccount};
use socnet_store::{
    Filter, RecordStore, SqliteConnector, StatusUpdates, StoreConnector, StoreError, UserAccounts,
};
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_concurrent_connections_write_one_file() {
    let dir = TempDir::new().unwrap();
    let connector = Arc::new(SqliteConnector::new(dir.path().join("social_network.db")));
    connector.connect().unwrap();

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let connector = Arc::clone(&connector);
            std::thread::spawn(move || {
                let store = connector.connect().unwrap();
                let users = UserAccounts::new(&store);
                for i in 0..25 {
                    let id = format!("w{worker}_{i}");
                    users
                        .add_user(&UserAccount::new(id.as_str(), "x@y", "N", "L"))
                        .unwrap();
                }
                // every worker also races on one shared key
                users.add_user(&UserAccount::new("shared", "s@y", "S", "L")).err()
            })
        })
        .collect();

    let errors: Vec<Option<StoreError>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(errors.iter().filter(|e| e.is_none()).count(), 1);
    assert!(errors.iter().flatten().all(StoreError::is_duplicate_key));
    assert_eq!(UserAccounts::new(&connector.connect().unwrap()).len().unwrap(), 101);
}

#[test]
fn test_cascade_delete_leaves_no_orphans() {
    let dir = TempDir::new().unwrap();
    let store = SqliteConnector::new(dir.path().join("db.sqlite")).connect().unwrap();
    let users = UserAccounts::new(&store);
    let statuses = StatusUpdates::new(&store);

    users.add_user(&UserAccount::new("evmiles97", "eve.miles@uw.edu", "Eve", "Miles")).unwrap();
    for i in 0..5 {
        statuses
            .add_status(&StatusUpdate::new(format!("evmiles97_{i:05}"), "evmiles97", "hi"))
            .unwrap();
    }

    assert_eq!(users.delete_user("evmiles97").unwrap(), 5);
    assert_eq!(
        store.count(Collection::Statuses, &Filter::eq("user_id", "evmiles97")).unwrap(),
        0
    );
    assert!(statuses.search_status("evmiles97_00003").unwrap().is_none());
}

#[test]
fn test_reassigned_status_is_not_revalidated() {
    let dir = TempDir::new().unwrap();
    let store = SqliteConnector::new(dir.path().join("db.sqlite")).connect().unwrap();
    UserAccounts::new(&store).add_user(&UserAccount::new("dave03", "d@x", "David", "Yuen")).unwrap();
    let statuses = StatusUpdates::new(&store);
    statuses.add_status(&StatusUpdate::new("dave03_00001", "dave03", "hi")).unwrap();

    statuses.update_status("dave03_00001", "nobody", "moved").unwrap();

    let moved = statuses.search_status("dave03_00001").unwrap().unwrap();
    assert_eq!(moved.user_id, "nobody");
    assert_eq!(moved.to_document().unwrap()["status_text"], "moved");
}

#[test]
fn test_drop_database_clears_both_collections() {
    let dir = TempDir::new().unwrap();
    let store = SqliteConnector::new(dir.path().join("db.sqlite")).connect().unwrap();
    UserAccounts::new(&store).add_user(&UserAccount::new("a", "a@x", "A", "B")).unwrap();
    StatusUpdates::new(&store).add_status(&StatusUpdate::new("a_1", "a", "t")).unwrap();

    store.drop_database().unwrap();

    for collection in Collection::all() {
        assert_eq!(store.count(collection, &Filter::all()).unwrap(), 0);
    }
    // schema is usable again right away
    UserAccounts::new(&store).add_user(&UserAccount::new("a", "a@x", "A", "B")).unwrap();
}
