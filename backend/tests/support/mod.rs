#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use incidents_api::db::{SqliteConfig, SqliteRepository};
use incidents_api::models::NewIncident;
use tempfile::TempDir;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// A SQLite repository backed by a file in a temporary directory.
///
/// The directory lives as long as this value.
pub struct TestStore {
    pub dir: TempDir,
    pub repo: Arc<SqliteRepository>,
}

impl TestStore {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let repo = SqliteRepository::new(SqliteConfig::new(db_path(&dir))).expect("open store");
        Self {
            dir,
            repo: Arc::new(repo),
        }
    }
}

pub fn db_path(dir: &TempDir) -> String {
    dir.path().join("incidents.sqlite3").display().to_string()
}

/// Build a valid incident; only the fields tests filter on vary.
pub fn incident(
    case_number: &str,
    date: &str,
    time: &str,
    code: i64,
    police_grid: i64,
    neighborhood_number: i64,
) -> NewIncident {
    NewIncident {
        case_number: case_number.to_string(),
        date: date.to_string(),
        time: time.to_string(),
        code,
        incident: "Theft".to_string(),
        police_grid,
        neighborhood_number,
        block: "98X UNIVERSITY AV W".to_string(),
    }
}

/// A small spread of incidents across codes, grids, neighborhoods and days.
pub fn sample_incidents() -> Vec<NewIncident> {
    vec![
        incident("19245001", "2019-10-01", "08:15:00", 110, 38, 1),
        incident("19245002", "2019-10-05", "12:00:00", 700, 40, 2),
        incident("19245003", "2019-10-10", "18:30:45", 9954, 87, 7),
        incident("19245004", "2019-10-15", "23:59:59", 110, 87, 7),
        incident("19245005", "2019-10-31", "06:00:00", 600, 120, 11),
    ]
}
