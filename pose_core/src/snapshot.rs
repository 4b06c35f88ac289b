//! Flat persisted snapshot: slider-axis angles plus lighting parameters,
//! written on every user-visible change and read once at startup.
//!
//! The record lives under a single versioned storage key; schema changes
//! bump the key rather than migrating the payload. Corrupt or absent data
//! loads as `None` so startup is always resilient.

use pose_config::{JointGroup, LightingCfg};
use pose_traits::KvStore;
use serde::{Deserialize, Serialize};

/// Storage key for the snapshot record. The suffix is the schema version.
pub const SNAPSHOT_KEY: &str = "figure-dashboard-v1";

/// Slider-axis angle per group, whole degrees (the widget's unit).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliderAngles {
    pub left_arm: i32,
    pub right_arm: i32,
    pub head: i32,
}

impl SliderAngles {
    pub fn get(&self, group: JointGroup) -> i32 {
        match group {
            JointGroup::LeftArm => self.left_arm,
            JointGroup::RightArm => self.right_arm,
            JointGroup::Head => self.head,
        }
    }

    pub fn set(&mut self, group: JointGroup, deg: i32) {
        match group {
            JointGroup::LeftArm => self.left_arm = deg,
            JointGroup::RightArm => self.right_arm = deg,
            JointGroup::Head => self.head = deg,
        }
    }
}

/// Environment lighting parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lighting {
    pub exposure: f32,
    pub key_light: f32,
    pub ambient: f32,
}

impl From<LightingCfg> for Lighting {
    fn from(cfg: LightingCfg) -> Self {
        Self {
            exposure: cfg.exposure,
            key_light: cfg.key_light,
            ambient: cfg.ambient,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub angles: SliderAngles,
    pub lighting: Lighting,
}

/// Serialize and overwrite the record. Serialization of this plain struct
/// cannot fail in practice; a failure is logged and swallowed because
/// persistence is never allowed to disturb the engine.
pub fn save(store: &mut dyn KvStore, snapshot: &Snapshot) {
    match serde_json::to_string(snapshot) {
        Ok(json) => store.set(SNAPSHOT_KEY, &json),
        Err(e) => tracing::warn!(error = %e, "snapshot serialization failed"),
    }
}

/// Last saved record, or `None` when absent or corrupt.
pub fn load(store: &dyn KvStore) -> Option<Snapshot> {
    let raw = store.get(SNAPSHOT_KEY)?;
    match serde_json::from_str(&raw) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            tracing::debug!(error = %e, "discarding corrupt snapshot");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct MemStore(BTreeMap<String, String>);

    impl KvStore for MemStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).cloned()
        }
        fn set(&mut self, key: &str, value: &str) {
            self.0.insert(key.to_string(), value.to_string());
        }
    }

    #[test]
    fn round_trip_is_bit_exact() {
        let mut store = MemStore::default();
        let snap = Snapshot {
            angles: SliderAngles {
                left_arm: -35,
                right_arm: 55,
                head: 8,
            },
            lighting: Lighting {
                exposure: 1.35,
                key_light: 5.5,
                ambient: 0.07,
            },
        };
        save(&mut store, &snap);
        assert_eq!(load(&store), Some(snap));
    }

    #[test]
    fn missing_record_loads_as_none() {
        let store = MemStore::default();
        assert_eq!(load(&store), None);
    }

    #[test]
    fn corrupt_record_is_swallowed() {
        let mut store = MemStore::default();
        store.set(SNAPSHOT_KEY, "{not json");
        assert_eq!(load(&store), None);
    }

    #[test]
    fn save_overwrites_prior_record() {
        let mut store = MemStore::default();
        let mut snap = Snapshot {
            angles: SliderAngles::default(),
            lighting: Lighting::from(LightingCfg::default()),
        };
        save(&mut store, &snap);
        snap.angles.head = 30;
        save(&mut store, &snap);
        assert_eq!(load(&store).map(|s| s.angles.head), Some(30));
    }
}
