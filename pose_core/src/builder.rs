//! Engine assembly. Collaborators arrive as boxed trait objects; the
//! builder validates the config and rejects missing pieces with typed
//! errors instead of panicking later.

use std::sync::Arc;

use pose_config::{Config, JointGroup, MotionFile};
use pose_traits::{Clock, KvStore, MonotonicClock, SliderControl};

use crate::engine::PoseEngine;
use crate::error::{BuildError, Result};
use crate::inbox::CommandInbox;

pub struct EngineBuilder {
    config: Option<Config>,
    library: Option<MotionFile>,
    store: Option<Box<dyn KvStore>>,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
    sliders: [Option<Box<dyn SliderControl>>; JointGroup::COUNT],
    inbox_capacity: usize,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            library: None,
            store: None,
            clock: None,
            sliders: [None, None, None],
            inbox_capacity: 32,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_library(mut self, library: MotionFile) -> Self {
        self.library = Some(library);
        self
    }

    pub fn with_store(mut self, store: impl KvStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_slider(mut self, group: JointGroup, slider: impl SliderControl + 'static) -> Self {
        self.sliders[group.index()] = Some(Box::new(slider));
        self
    }

    pub fn with_inbox_capacity(mut self, capacity: usize) -> Self {
        self.inbox_capacity = capacity;
        self
    }

    pub fn build(self) -> Result<PoseEngine> {
        let config = self.config.unwrap_or_default();
        config
            .validate()
            .map_err(|e| eyre::Report::new(BuildError::InvalidConfig(e.to_string())))?;

        let library = match self.library {
            Some(lib) => {
                lib.validate()?;
                lib
            }
            None => MotionFile::builtin()?,
        };

        let store = self
            .store
            .ok_or_else(|| eyre::Report::new(BuildError::MissingStore))?;

        let mut sliders_iter = self.sliders.into_iter();
        let mut take = |group: JointGroup| -> Result<Box<dyn SliderControl>> {
            sliders_iter
                .next()
                .flatten()
                .ok_or_else(|| eyre::Report::new(BuildError::MissingSlider(group.name())))
        };
        let sliders = [
            take(JointGroup::LeftArm)?,
            take(JointGroup::RightArm)?,
            take(JointGroup::Head)?,
        ];

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(MonotonicClock::new()));

        Ok(PoseEngine::from_parts(
            config,
            library,
            sliders,
            store,
            clock,
            CommandInbox::new(self.inbox_capacity),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuildError;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct MemStore(BTreeMap<String, String>);
    impl KvStore for MemStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).cloned()
        }
        fn set(&mut self, key: &str, value: &str) {
            self.0.insert(key.into(), value.into());
        }
    }

    struct FakeSlider;
    impl SliderControl for FakeSlider {
        fn min(&self) -> i32 {
            -90
        }
        fn max(&self) -> i32 {
            90
        }
        fn value(&self) -> i32 {
            0
        }
        fn set_value(&mut self, _v: i32) {}
    }

    #[test]
    fn build_rejects_missing_store() {
        let err = EngineBuilder::new()
            .with_slider(JointGroup::LeftArm, FakeSlider)
            .with_slider(JointGroup::RightArm, FakeSlider)
            .with_slider(JointGroup::Head, FakeSlider)
            .build()
            .expect_err("store is required");
        assert!(err.downcast_ref::<BuildError>().is_some());
    }

    #[test]
    fn build_rejects_missing_slider() {
        let err = EngineBuilder::new()
            .with_store(MemStore::default())
            .with_slider(JointGroup::LeftArm, FakeSlider)
            .build()
            .expect_err("all sliders required");
        let be = err.downcast_ref::<BuildError>().expect("typed error");
        assert!(matches!(be, BuildError::MissingSlider("right_arm")));
    }

    #[test]
    fn build_succeeds_with_defaults() {
        let engine = EngineBuilder::new()
            .with_store(MemStore::default())
            .with_slider(JointGroup::LeftArm, FakeSlider)
            .with_slider(JointGroup::RightArm, FakeSlider)
            .with_slider(JointGroup::Head, FakeSlider)
            .build()
            .expect("builder with defaults");
        assert!(engine.active_motion().is_none());
    }
}
