use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::directory::schema::{Program, Snapshot};

const SNAPSHOT_FILE: &str = "hackerone_previous.json";

#[derive(Debug, Error)]
pub enum StoreError {
    /// No baseline exists yet. Not a failure: the first cycle saves one.
    #[error("no previous snapshot in the cache")]
    NotFound,
    #[error("snapshot store I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("cached snapshot is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Holds the last fetched snapshot as pretty-printed JSON in the cache
/// directory, so the baseline stays inspectable by hand.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn open(cache_dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(cache_dir)?;
        Ok(Self {
            path: cache_dir.join(SNAPSHOT_FILE),
        })
    }

    pub fn load_previous(&self) -> Result<Snapshot, StoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Err(StoreError::NotFound),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&data)?)
    }

    /// Replace the baseline wholesale. The write goes through a temp file and
    /// a rename, so a cycle killed mid-save never leaves a torn baseline.
    pub fn save(&self, programs: &[Program]) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(programs)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::{SnapshotStore, StoreError};
    use crate::directory::schema::Program;

    fn program(handle: &str) -> Program {
        Program {
            handle: handle.to_string(),
            name: handle.to_uppercase(),
            url: format!("https://hackerone.com/{handle}"),
            offers_bounties: true,
            submission_state: "open".to_string(),
            managed_program: None,
            targets: Default::default(),
        }
    }

    #[test]
    fn fresh_store_reports_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SnapshotStore::open(dir.path()).expect("open");
        assert!(matches!(store.load_previous(), Err(StoreError::NotFound)));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SnapshotStore::open(dir.path()).expect("open");
        let snapshot = vec![program("acme"), program("beta")];
        store.save(&snapshot).expect("save");
        let loaded = store.load_previous().expect("load");
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn open_creates_missing_cache_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("cache/bounty-watch");
        let store = SnapshotStore::open(&nested).expect("open");
        store.save(&[program("acme")]).expect("save");
        assert!(nested.join("hackerone_previous.json").exists());
    }

    #[test]
    fn saved_baseline_is_pretty_printed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SnapshotStore::open(dir.path()).expect("open");
        store.save(&[program("acme")]).expect("save");
        let raw = std::fs::read_to_string(store.path()).expect("read");
        assert!(raw.contains("\n  "), "expected indented JSON: {raw}");
    }

    #[test]
    fn corrupt_baseline_surfaces_as_malformed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SnapshotStore::open(dir.path()).expect("open");
        std::fs::write(store.path(), "not json").expect("write");
        assert!(matches!(
            store.load_previous(),
            Err(StoreError::Malformed(_))
        ));
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SnapshotStore::open(dir.path()).expect("open");
        store.save(&[program("acme")]).expect("save");
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .expect("read_dir")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
