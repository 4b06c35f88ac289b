#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Pose animation and motion-sequencing engine (renderer-agnostic).
//!
//! All scene/storage/UI interactions go through the `pose_traits` traits.
//!
//! ## Architecture
//!
//! - **Target model**: desired `{x,y,z}` degrees per joint group (`targets`)
//! - **Stepped animator**: rate-gated degree-by-degree slider motion (`stepper`)
//! - **Motion scheduler**: timed partial-keyframe playback (`scheduler`)
//! - **Axis ownership**: one authoritative writer per axis (`owner`)
//! - **Smoothing**: exponential blend of live part orientations (`smoothing`)
//! - **Snapshot**: flat persisted record of slider angles + lighting (`snapshot`)
//! - **Command inbox**: channel from an external command source (`inbox`)
//!
//! Angles on the slider axis are whole `i32` degrees, mirroring the slider
//! widget exactly; motion axes are `f32` degrees and trust the motion author.

pub mod builder;
pub mod engine;
pub mod error;
pub mod inbox;
pub mod owner;
pub mod scheduler;
pub mod smoothing;
pub mod snapshot;
pub mod stepper;
pub mod targets;
pub mod util;

pub use builder::EngineBuilder;
pub use engine::PoseEngine;
pub use error::{BuildError, PoseError, Result};
pub use inbox::{Command, CommandInbox, CommandSender, PoseAction};
pub use owner::{AxisOwner, AxisOwners};
pub use scheduler::MotionScheduler;
pub use smoothing::{ResolvedPart, SmoothingRenderer};
pub use snapshot::{Lighting, SliderAngles, Snapshot};
pub use stepper::SteppedAnimator;
pub use targets::{AxisTriple, TargetModel};

// Re-export the shared config vocabulary so downstream crates can use
// `pose_core::JointGroup` without a direct pose_config dependency.
pub use pose_config::{Axis, JointGroup};
