#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Simulated collaborators for the pose engine: an in-memory rig of named
//! parts, slider widgets, and key-value stores (memory and file backed).
//!
//! These stand in for the real scene/DOM/localStorage collaborators when
//! running headless — tests and the CLI both drive the engine through them.

pub mod error;
mod util;

use pose_traits::{KvStore, Orientation, Rig, SliderControl};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub use error::RigError;

/// In-memory rig: a flat set of named parts with mutable orientations.
#[derive(Debug, Default, Clone)]
pub struct SimulatedRig {
    parts: BTreeMap<String, Orientation>,
}

impl SimulatedRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a rig containing the given part names, all at the zero
    /// orientation (a freshly loaded asset).
    pub fn with_parts<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parts: names
                .into_iter()
                .map(|n| (n.into(), Orientation::ZERO))
                .collect(),
        }
    }

    /// Add one part at a given starting orientation.
    pub fn insert_part(&mut self, name: impl Into<String>, orientation: Orientation) {
        let _ = self.parts.insert(name.into(), orientation);
    }
}

impl Rig for SimulatedRig {
    fn part_names(&self) -> Vec<String> {
        self.parts.keys().cloned().collect()
    }

    fn orientation(&self, part: &str) -> Option<Orientation> {
        self.parts.get(part).copied()
    }

    fn set_orientation(&mut self, part: &str, orientation: Orientation) -> bool {
        match self.parts.get_mut(part) {
            Some(slot) => {
                *slot = orientation;
                true
            }
            None => false,
        }
    }
}

/// Simulated slider widget with a clamping range, mirroring an
/// `<input type=range>` control.
#[derive(Debug, Clone, Copy)]
pub struct SimSlider {
    min: i32,
    max: i32,
    value: i32,
}

impl SimSlider {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max, value: 0 }
    }
}

impl Default for SimSlider {
    fn default() -> Self {
        Self::new(-90, 90)
    }
}

impl SliderControl for SimSlider {
    fn min(&self) -> i32 {
        self.min
    }

    fn max(&self) -> i32 {
        self.max
    }

    fn value(&self) -> i32 {
        self.value
    }

    fn set_value(&mut self, value: i32) {
        self.value = value.clamp(self.min, self.max);
    }
}

/// Volatile in-memory store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        let _ = self.entries.insert(key.to_string(), value.to_string());
    }
}

/// File-backed store: each key becomes one file under a directory, written
/// atomically (tmp + rename). Read failures of any kind surface as `None`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        // Keys are engine-chosen constants, but sanitize anyway so a hostile
        // key cannot escape the directory.
        let safe: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(s) => Some(s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::debug!(key, error = %e, "store read failed");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            tracing::warn!(dir = %self.dir.display(), error = %e, "store dir create failed");
            return;
        }
        if let Err(e) = util::write_atomic(&self.key_path(key), value.as_bytes()) {
            tracing::warn!(key, error = %e, "store write failed");
        }
    }
}

/// Report whether a directory looks usable as a store location.
pub fn check_store_dir(dir: &Path) -> Result<(), RigError> {
    if dir.exists() && !dir.is_dir() {
        return Err(RigError::StorePath(dir.display().to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_rig_reports_unknown_parts() {
        let mut rig = SimulatedRig::with_parts(["a", "b"]);
        assert_eq!(rig.orientation("missing"), None);
        assert!(!rig.set_orientation("missing", Orientation::ZERO));
        assert!(rig.set_orientation("a", Orientation::new(0.1, 0.0, 0.0)));
        assert_eq!(rig.orientation("a"), Some(Orientation::new(0.1, 0.0, 0.0)));
    }

    #[test]
    fn sim_slider_clamps_into_range() {
        let mut s = SimSlider::new(-90, 90);
        s.set_value(300);
        assert_eq!(s.value(), 90);
        s.set_value(-300);
        assert_eq!(s.value(), -90);
    }

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v1");
        store.set("k", "v2");
        assert_eq!(store.get("k"), Some("v2".to_string()));
    }

    #[test]
    fn file_store_round_trips_and_tolerates_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FileStore::new(dir.path());
        assert_eq!(store.get("figure-dashboard-v1"), None);
        store.set("figure-dashboard-v1", "{\"x\":1}");
        assert_eq!(
            store.get("figure-dashboard-v1"),
            Some("{\"x\":1}".to_string())
        );
    }

    #[test]
    fn file_store_sanitizes_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FileStore::new(dir.path());
        store.set("../escape", "data");
        assert_eq!(store.get("../escape"), Some("data".to_string()));
        assert!(dir.path().join("___escape.json").exists());
    }
}
