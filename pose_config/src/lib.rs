#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and motion-library parsing for the pose engine.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - `motions` holds the keyframe-sequence schema plus the builtin library;
//!   keyframe offsets are validated monotonic at load time, not at play time.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub mod motions;

pub use motions::{AxisOverride, GestureDef, Keyframe, MotionDef, MotionFile, OnComplete};

/// The fixed set of joint groups the engine controls.
///
/// Each group maps (via `[groups]`) to an ordered list of renderable part
/// names resolved once against the loaded asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointGroup {
    LeftArm,
    RightArm,
    Head,
}

impl JointGroup {
    pub const COUNT: usize = 3;
    pub const ALL: [Self; Self::COUNT] = [Self::LeftArm, Self::RightArm, Self::Head];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::LeftArm => 0,
            Self::RightArm => 1,
            Self::Head => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::LeftArm => "left_arm",
            Self::RightArm => "right_arm",
            Self::Head => "head",
        }
    }
}

impl FromStr for JointGroup {
    type Err = UnknownName;

    /// Accepts both snake_case (config files) and camelCase (the chat
    /// command source emits `leftArm`-style names).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left_arm" | "leftArm" => Ok(Self::LeftArm),
            "right_arm" | "rightArm" => Ok(Self::RightArm),
            "head" => Ok(Self::Head),
            _ => Err(UnknownName(s.to_string())),
        }
    }
}

impl std::fmt::Display for JointGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Rotation axis of a joint group.
///
/// Z is the slider-controlled axis; X (front/back swing) and Y (turn) are
/// motion-only axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const COUNT: usize = 3;
    pub const ALL: [Self; Self::COUNT] = [Self::X, Self::Y, Self::Z];
    /// The UI-synchronized axis driven by the stepped animator.
    pub const SLIDER: Self = Self::Z;

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

impl FromStr for Axis {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" | "X" => Ok(Self::X),
            "y" | "Y" => Ok(Self::Y),
            "z" | "Z" => Ok(Self::Z),
            _ => Err(UnknownName(s.to_string())),
        }
    }
}

/// Error for unrecognized group/axis names from config or command sources.
#[derive(Debug, Clone)]
pub struct UnknownName(pub String);

impl std::fmt::Display for UnknownName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown name: {}", self.0)
    }
}

impl std::error::Error for UnknownName {}

/// `[groups]`: joint group -> ordered part names in the loaded asset.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GroupsCfg {
    pub left_arm: Vec<String>,
    pub right_arm: Vec<String>,
    pub head: Vec<String>,
}

impl Default for GroupsCfg {
    fn default() -> Self {
        Self {
            left_arm: vec!["tripo_part_13".into(), "tripo_part_16".into()],
            right_arm: vec!["tripo_part_1".into(), "tripo_part_11".into()],
            head: vec!["tripo_part_7".into(), "tripo_part_5".into()],
        }
    }
}

impl GroupsCfg {
    pub fn parts(&self, group: JointGroup) -> &[String] {
        match group {
            JointGroup::LeftArm => &self.left_arm,
            JointGroup::RightArm => &self.right_arm,
            JointGroup::Head => &self.head,
        }
    }
}

/// `[slider]`: valid range for the slider axis, whole degrees.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SliderCfg {
    pub min_deg: i32,
    pub max_deg: i32,
}

impl Default for SliderCfg {
    fn default() -> Self {
        Self {
            min_deg: -90,
            max_deg: 90,
        }
    }
}

/// `[stepper]`: stepped-animator tick parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct StepperCfg {
    /// Degrees moved per applied tick; clamped into [1, 360] by the
    /// animator.
    pub step_deg: u32,
    /// Applied-tick rate; clamped into [10, 120] by the animator.
    pub tick_hz: u32,
}

impl Default for StepperCfg {
    fn default() -> Self {
        Self {
            step_deg: 1,
            tick_hz: 60,
        }
    }
}

/// `[smoothing]`: per-frame exponential blend factor toward targets.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SmoothingCfg {
    pub factor: f32,
}

impl Default for SmoothingCfg {
    fn default() -> Self {
        Self { factor: 0.14 }
    }
}

/// `[lighting]`: environment defaults, persisted alongside pose angles.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightingCfg {
    pub exposure: f32,
    pub key_light: f32,
    pub ambient: f32,
}

impl Default for LightingCfg {
    fn default() -> Self {
        Self {
            exposure: 1.35,
            key_light: 5.5,
            ambient: 1.35,
        }
    }
}

/// `[logging]`: optional log file and level for the CLI subscriber.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub groups: GroupsCfg,
    pub slider: SliderCfg,
    pub stepper: StepperCfg,
    pub smoothing: SmoothingCfg,
    pub lighting: LightingCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Slider range
        if self.slider.min_deg >= self.slider.max_deg {
            eyre::bail!("slider.min_deg must be < slider.max_deg");
        }

        // Stepper
        if self.stepper.step_deg == 0 {
            eyre::bail!("stepper.step_deg must be >= 1");
        }
        if self.stepper.tick_hz == 0 {
            eyre::bail!("stepper.tick_hz must be > 0");
        }

        // Smoothing
        if !(self.smoothing.factor > 0.0 && self.smoothing.factor <= 1.0) {
            eyre::bail!("smoothing.factor must be in (0.0, 1.0]");
        }

        // Lighting
        if self.lighting.exposure < 0.0 {
            eyre::bail!("lighting.exposure must be >= 0");
        }
        if self.lighting.key_light < 0.0 {
            eyre::bail!("lighting.key_light must be >= 0");
        }
        if self.lighting.ambient < 0.0 {
            eyre::bail!("lighting.ambient must be >= 0");
        }

        // Groups: a group may resolve to fewer parts at runtime, but an
        // empty configured list is an authoring mistake.
        for group in JointGroup::ALL {
            if self.groups.parts(group).is_empty() {
                eyre::bail!("groups.{} must list at least one part", group.name());
            }
        }

        Ok(())
    }
}
