use std::fs;
use std::path::PathBuf;

use log::{debug, warn};

use crate::error::StateSaveError;
use crate::model::Snapshot;

/// Owns the per-source state files: `<dir>/<source_key>.json`, each holding
/// the last persisted [`Snapshot`].
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, source_key: &str) -> PathBuf {
        self.dir.join(format!("{source_key}.json"))
    }

    /// A missing or unreadable file is "no prior state", never an error; a
    /// corrupt file is discarded and the next save overwrites it.
    pub fn load(&self, source_key: &str) -> Option<Snapshot> {
        let path = self.path(source_key);
        let raw = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(snapshot) => {
                debug!("loaded prior state for {source_key} from {}", path.display());
                Some(snapshot)
            }
            Err(err) => {
                warn!("discarding unreadable state for {source_key}: {err}");
                None
            }
        }
    }

    pub fn save(&self, source_key: &str, snapshot: &Snapshot) -> Result<(), StateSaveError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(
            self.path(source_key),
            serde_json::to_string_pretty(snapshot)?,
        )?;
        Ok(())
    }

    pub fn state_file(&self, source_key: &str) -> PathBuf {
        self.path(source_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AirportEntry, FlightInfo};
    use chrono::{TimeZone, Utc};

    fn scratch_dir(test: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("irrops-notify-{test}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn snapshot() -> Snapshot {
        Snapshot::new(
            Utc.with_ymd_and_hms(2025, 1, 15, 3, 0, 0).unwrap(),
            vec![FlightInfo {
                region: "Okinawa".into(),
                airports: vec![
                    AirportEntry::new("Naha")
                        .with_attribute("date", "Jan 15")
                        .with_attribute("content", "Possible cancellations due to typhoon"),
                ],
            }],
        )
    }

    #[test]
    fn missing_file_loads_as_none() {
        let store = StateStore::new(scratch_dir("missing"));
        assert_eq!(store.load("ana"), None);
    }

    #[test]
    fn corrupt_file_loads_as_none() {
        let dir = scratch_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("jal.json"), "{not json").unwrap();

        let store = StateStore::new(&dir);
        assert_eq!(store.load("jal"), None);
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = StateStore::new(scratch_dir("roundtrip"));
        let snapshot = snapshot();
        store.save("jal", &snapshot).unwrap();
        assert_eq!(store.load("jal"), Some(snapshot));
    }

    #[test]
    fn sources_use_independent_files() {
        let store = StateStore::new(scratch_dir("independent"));
        store.save("ana", &snapshot()).unwrap();
        assert_eq!(store.load("jal"), None);
        assert!(store.load("ana").is_some());
    }
}
