//! SQLite record store tests.
//!
//! Run with: cargo test --features sqlite --test sqlite_store_test

#![cfg(feature = "sqlite")]

use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use mailrecord::store::{self, SqliteStore};
use mailrecord::{EmailRecord, NewEmail, RecordStore, StoreConfig};

fn record(to: &str) -> EmailRecord {
    let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
    EmailRecord::unsaved(NewEmail::new(to, "Hi", "<p>Body</p>"), created)
}

fn temp_db() -> PathBuf {
    std::env::temp_dir().join(format!("mailrecord-{}.db", uuid::Uuid::new_v4()))
}

#[tokio::test]
async fn records_survive_reconnect() {
    let path = temp_db();
    let uri = format!("sqlite:{}", path.display());

    let id = {
        let store = SqliteStore::connect(&uri, "emails").await.unwrap();
        store.insert(&record("a@x.com")).await.unwrap()
    };

    let store = SqliteStore::connect(&uri, "emails").await.unwrap();
    let records = store.find_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id.as_deref(), Some(id.as_str()));
    assert_eq!(records[0].to, "a@x.com");
    assert_eq!(records[0].created, record("a@x.com").created);

    drop(store);
    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn namespaces_are_separate_tables() {
    let path = temp_db();
    let uri = format!("sqlite:{}", path.display());

    let emails = SqliteStore::connect(&uri, "emails").await.unwrap();
    let archive = SqliteStore::connect(&uri, "archive").await.unwrap();

    emails.insert(&record("a@x.com")).await.unwrap();
    emails.insert(&record("b@x.com")).await.unwrap();
    archive.insert(&record("c@x.com")).await.unwrap();

    assert_eq!(emails.find_all().await.unwrap().len(), 2);
    let archived = archive.find_all().await.unwrap();
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].to, "c@x.com");

    drop((emails, archive));
    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn connect_by_uri_selects_sqlite() {
    let config = StoreConfig {
        uri: "sqlite::memory:".into(),
        namespace: "emails".into(),
    };

    let store = store::connect(config).await.unwrap();

    assert_eq!(store.store_name(), "sqlite");
    assert!(store.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn bad_namespace_is_rejected_before_connecting() {
    let config = StoreConfig {
        uri: "sqlite::memory:".into(),
        namespace: "emails\"; DROP TABLE emails; --".into(),
    };

    assert!(matches!(
        store::connect(config).await,
        Err(mailrecord::StoreError::Configuration(_))
    ));
}
