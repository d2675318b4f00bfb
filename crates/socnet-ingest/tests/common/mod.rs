//! Shared fixtures for loader tests

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use socnet_store::{Result as StoreResult, SqliteConnector, SqliteStore, StoreConnector, StoreError};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;

pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("social_network.db")
    }

    pub fn connector(&self) -> SqliteConnector {
        SqliteConnector::new(self.db_path())
    }

    pub fn store(&self) -> SqliteStore {
        self.connector().connect().unwrap()
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }
}

/// `rows` distinct accounts `user0..user{rows-1}`
pub fn accounts_csv(rows: usize) -> String {
    let mut csv = String::from("USER_ID,EMAIL,NAME,LASTNAME\n");
    for i in 0..rows {
        writeln!(csv, "user{i},user{i}@uw.edu,Name{i},Last{i}").unwrap();
    }
    csv
}

/// `per_user` statuses for each of `user0..user{users-1}`
pub fn statuses_csv(users: usize, per_user: usize) -> String {
    let mut csv = String::from("STATUS_ID,USER_ID,STATUS_TEXT\n");
    for u in 0..users {
        for s in 0..per_user {
            writeln!(csv, "user{u}_{s:05},user{u},Status {s} of user {u}").unwrap();
        }
    }
    csv
}

/// Which `connect()` call misbehaves (0-based)
#[derive(Clone, Copy)]
pub enum Fault {
    Fail(usize),
    Panic(usize),
    /// Every call from this one on sleeps first
    SlowFrom(usize, Duration),
}

/// Wraps a real connector and injects one fault
pub struct FaultyConnector {
    pub inner: SqliteConnector,
    pub fault: Fault,
    pub calls: AtomicUsize,
}

impl FaultyConnector {
    pub fn new(inner: SqliteConnector, fault: Fault) -> Self {
        Self {
            inner,
            fault,
            calls: AtomicUsize::new(0),
        }
    }
}

impl StoreConnector for FaultyConnector {
    type Store = SqliteStore;

    fn connect(&self) -> StoreResult<SqliteStore> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fault {
            Fault::Fail(n) if n == call => {
                return Err(StoreError::Io(std::io::Error::other("connection refused")))
            },
            Fault::Panic(n) if n == call => panic!("worker {call} lost its connection"),
            Fault::SlowFrom(n, delay) if call >= n => std::thread::sleep(delay),
            _ => {},
        }
        self.inner.connect()
    }

    fn describe(&self) -> String {
        format!("faulty:{}", self.inner.describe())
    }
}
