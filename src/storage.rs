//! Snapshot Store
//!
//! Keeps every saved simulation in a single JSON file holding an ordered
//! list. Each save rewrites the whole list through a temp file + rename so an
//! interrupted write leaves the previous file intact. Records are carried as
//! raw JSON on save, so one record this build cannot read is never dropped.

use crate::snapshot::SimulationSnapshot;
use chrono::Utc;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("save file {path:?} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("save file {0:?} does not hold a list of snapshots")]
    NotAList(PathBuf),

    #[error("save file already holds {0} snapshots")]
    TooManySnapshots(usize),

    #[error("failed to encode snapshots: {0}")]
    Encode(#[from] serde_json::Error),
}

/// JSON-file backed list of simulation snapshots
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every readable snapshot, for display.
    ///
    /// A missing file yields an empty list. An unreadable or malformed file
    /// also yields an empty list (with a warning), and individual records
    /// that fail to parse are skipped.
    pub fn load_all(&self) -> Vec<SimulationSnapshot> {
        let records = match self.load_records() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("{}", e);
                return Vec::new();
            }
        };

        let snapshots: Vec<SimulationSnapshot> = records
            .into_iter()
            .enumerate()
            .filter_map(|(i, record)| match serde_json::from_value(record) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    tracing::warn!("Skipping record {} in {:?}: {}", i + 1, self.path, e);
                    None
                }
            })
            .collect();
        tracing::debug!("Loaded {} snapshots from {:?}", snapshots.len(), self.path);
        snapshots
    }

    /// Saved snapshot by its 1-based number
    pub fn get(&self, number: u32) -> Option<SimulationSnapshot> {
        self.load_all().into_iter().find(|s| s.number == number)
    }

    /// Append a snapshot, numbering it after the existing records.
    ///
    /// Existing records are rewritten untouched. A file that cannot be read
    /// or parsed as a list is left alone and the save fails.
    ///
    /// Returns the assigned number.
    pub fn save(&self, snapshot: &SimulationSnapshot) -> Result<u32, StorageError> {
        let mut records = self.load_records()?;
        let number = next_number(records.len())?;

        let mut entry = snapshot.clone();
        entry.number = number;
        entry.saved_at = Some(Utc::now());
        records.push(serde_json::to_value(&entry)?);

        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        records.serialize(&mut ser)?;

        self.atomic_write(&buf)?;
        tracing::info!("Saved simulation #{} to {:?}", number, self.path);
        Ok(number)
    }

    /// Delete every saved snapshot
    pub fn clear(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| self.io_error(e))?;
            tracing::info!("Removed save file {:?}", self.path);
        }
        Ok(())
    }

    /// Raw records in the save file; empty when there is no file yet
    fn load_records(&self) -> Result<Vec<Value>, StorageError> {
        if !self.path.exists() {
            tracing::info!("No save file at {:?}, no saved simulations", self.path);
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let value: Value =
            serde_json::from_str(&contents).map_err(|source| StorageError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        match value {
            Value::Array(records) => Ok(records),
            _ => Err(StorageError::NotAList(self.path.clone())),
        }
    }

    fn atomic_write(&self, data: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let write = || -> std::io::Result<()> {
            let mut file = File::create(&tmp)?;
            file.write_all(data)?;
            file.sync_all()?;
            fs::rename(&tmp, &self.path)
        };
        write().map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Number for the record appended after `existing` records
fn next_number(existing: usize) -> Result<u32, StorageError> {
    existing
        .checked_add(1)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or(StorageError::TooManySnapshots(existing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::Reading;
    use crate::plant::PlantState;

    /// Unique scratch directory per test
    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("plant_growth_sim_store_{}", name));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample() -> SimulationSnapshot {
        let mut plant = PlantState::new(12.0);
        plant.last_reading = Reading::new(30.0, 8.0, 22.0);
        SimulationSnapshot::from_plants(0, &[plant, PlantState::default()])
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = test_dir("missing");
        let store = SnapshotStore::new(dir.join("none.json"));
        assert!(store.load_all().is_empty());
        assert!(store.get(1).is_none());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_numbers_consecutively() {
        let dir = test_dir("numbering");
        let store = SnapshotStore::new(dir.join("data").join("saves.json"));

        assert_eq!(store.save(&sample()).unwrap(), 1);
        assert_eq!(store.save(&sample()).unwrap(), 2);

        let all = store.load_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].number, 2);
        assert!(all[1].saved_at.is_some());
        assert_eq!(all[0].plants().unwrap(), sample().plants().unwrap());

        // Temp file should not remain
        assert!(!dir.join("data").join("saves.json.tmp").exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_next_number_bounds() {
        assert_eq!(next_number(0).unwrap(), 1);
        assert_eq!(next_number(41).unwrap(), 42);
        assert_eq!(next_number(u32::MAX as usize - 1).unwrap(), u32::MAX);
        assert!(matches!(
            next_number(u32::MAX as usize),
            Err(StorageError::TooManySnapshots(_))
        ));
        assert!(matches!(next_number(usize::MAX), Err(StorageError::TooManySnapshots(_))));
    }

    #[test]
    fn test_four_space_indent() {
        let dir = test_dir("indent");
        let store = SnapshotStore::new(dir.join("saves.json"));
        store.save(&sample()).unwrap();
        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("[\n    {\n        \""));
        assert!(text.contains("\n        \"numero\": 1"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let dir = test_dir("malformed");
        let path = dir.join("saves.json");

        fs::write(&path, "{ not json").unwrap();
        assert!(SnapshotStore::new(&path).load_all().is_empty());

        fs::write(&path, r#"{"alturas": [3]}"#).unwrap();
        assert!(SnapshotStore::new(&path).load_all().is_empty());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_refuses_unparseable_file() {
        let dir = test_dir("unparseable");
        let path = dir.join("saves.json");
        let store = SnapshotStore::new(&path);

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(store.save(&sample()), Err(StorageError::Corrupt { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");

        fs::write(&path, r#"{"alturas": [3]}"#).unwrap();
        assert!(matches!(store.save(&sample()), Err(StorageError::NotAList(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"alturas": [3]}"#);

        fs::write(&path, [0xff, 0xfe, b'[', b']']).unwrap();
        assert!(matches!(store.save(&sample()), Err(StorageError::Io { .. })));
        assert_eq!(fs::read(&path).unwrap(), vec![0xff, 0xfe, b'[', b']']);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_bad_record_survives_save() {
        let dir = test_dir("bad_record");
        let store = SnapshotStore::new(dir.join("saves.json"));
        store.save(&sample()).unwrap();

        // Second record has a null height this build cannot read
        let mut records: Vec<Value> =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        let mut odd = records[0].clone();
        odd["numero"] = Value::from(2);
        odd["alturas"] = serde_json::json!([3, null]);
        records.push(odd.clone());
        fs::write(store.path(), serde_json::to_string(&records).unwrap()).unwrap();

        let readable = store.load_all();
        assert_eq!(readable.len(), 1);
        assert_eq!(readable[0].number, 1);

        assert_eq!(store.save(&sample()).unwrap(), 3);
        let after: Vec<Value> =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(after.len(), 3);
        assert_eq!(after[1], odd);
        assert_eq!(store.load_all().len(), 2);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_clear() {
        let dir = test_dir("clear");
        let store = SnapshotStore::new(dir.join("saves.json"));
        store.save(&sample()).unwrap();
        store.clear().unwrap();
        assert!(!store.path().exists());
        assert!(store.load_all().is_empty());
        // Clearing twice is fine
        store.clear().unwrap();
        let _ = fs::remove_dir_all(&dir);
    }
}
