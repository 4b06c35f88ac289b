//! Motion-library schema: named keyframe sequences plus gesture presets.
//!
//! A keyframe is a *partial* pose override: any group or axis it leaves out
//! stays wherever the last writer put it. Offsets are validated
//! non-decreasing when a file is loaded so playback can trust the ordering.

use crate::JointGroup;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Partial `{x?, y?, z?}` override for one group, degrees.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxisOverride {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

impl AxisOverride {
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.z.is_none()
    }
}

/// One timestamped partial pose.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Keyframe {
    /// Offset from play start, milliseconds.
    pub t_ms: u64,
    pub left_arm: Option<AxisOverride>,
    pub right_arm: Option<AxisOverride>,
    pub head: Option<AxisOverride>,
}

impl Keyframe {
    pub fn group(&self, group: JointGroup) -> Option<&AxisOverride> {
        match group {
            JointGroup::LeftArm => self.left_arm.as_ref(),
            JointGroup::RightArm => self.right_arm.as_ref(),
            JointGroup::Head => self.head.as_ref(),
        }
    }
}

/// What the target model should do once the last keyframe has fired.
///
/// `Hold` leaves the pose wherever the final keyframe set it; `Neutral`
/// resets the motion axes and re-derives the slider axis, same as a cancel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnComplete {
    #[default]
    Hold,
    Neutral,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MotionDef {
    #[serde(default)]
    pub on_complete: OnComplete,
    pub frames: Vec<Keyframe>,
}

impl MotionDef {
    /// Offset of the final keyframe, i.e. the nominal duration.
    pub fn duration_ms(&self) -> u64 {
        self.frames.last().map_or(0, |f| f.t_ms)
    }
}

/// Gesture preset: slider-axis goals per group, applied via the stepped
/// animator rather than the scheduler.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GestureDef {
    #[serde(default)]
    pub left_arm: i32,
    #[serde(default)]
    pub right_arm: i32,
    #[serde(default)]
    pub head: i32,
}

impl GestureDef {
    pub fn angle(&self, group: JointGroup) -> i32 {
        match group {
            JointGroup::LeftArm => self.left_arm,
            JointGroup::RightArm => self.right_arm,
            JointGroup::Head => self.head,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MotionFile {
    #[serde(default)]
    pub motions: BTreeMap<String, MotionDef>,
    #[serde(default)]
    pub gestures: BTreeMap<String, GestureDef>,
}

const BUILTIN: &str = include_str!("builtin_motions.toml");

pub fn load_motions_toml(s: &str) -> eyre::Result<MotionFile> {
    let file = toml::from_str::<MotionFile>(s)?;
    file.validate()?;
    Ok(file)
}

impl MotionFile {
    /// The library shipped with the engine: wave, greet, think, point, nod,
    /// shake, shrug, cheer, dance, stretch, bow, clap, excited, sad, neutral.
    pub fn builtin() -> eyre::Result<Self> {
        load_motions_toml(BUILTIN)
    }

    /// Merge `other` over `self`: same-named motions/gestures are replaced.
    pub fn merge(&mut self, other: Self) {
        self.motions.extend(other.motions);
        self.gestures.extend(other.gestures);
    }

    pub fn validate(&self) -> eyre::Result<()> {
        for (name, def) in &self.motions {
            if def.frames.is_empty() {
                eyre::bail!("motion '{name}' has no keyframes");
            }
            let mut prev = 0u64;
            for (i, frame) in def.frames.iter().enumerate() {
                if i > 0 && frame.t_ms < prev {
                    eyre::bail!(
                        "motion '{name}': keyframe {i} offset {}ms precedes {}ms",
                        frame.t_ms,
                        prev
                    );
                }
                prev = frame.t_ms;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_library_parses_and_validates() {
        let lib = MotionFile::builtin().expect("builtin motions must parse");
        for name in ["neutral", "wave", "greet", "think", "point", "nod", "shake", "shrug", "cheer", "dance", "stretch", "bow", "clap", "excited", "sad"] {
            assert!(lib.motions.contains_key(name), "missing builtin motion {name}");
        }
        for name in ["neutral", "wave", "point", "think"] {
            assert!(lib.gestures.contains_key(name), "missing builtin gesture {name}");
        }
    }

    #[test]
    fn builtin_nod_matches_authored_keyframes() {
        let lib = MotionFile::builtin().expect("builtin motions must parse");
        let nod = &lib.motions["nod"];
        assert_eq!(nod.frames.len(), 6);
        assert_eq!(nod.frames[1].t_ms, 280);
        assert_eq!(nod.frames[1].head.as_ref().and_then(|a| a.x), Some(-20.0));
        assert_eq!(nod.duration_ms(), 1400);
        assert_eq!(nod.frames[5].head.as_ref().and_then(|a| a.x), Some(0.0));
    }

    #[test]
    fn decreasing_offsets_rejected() {
        let bad = r#"
[motions.broken]
frames = [
  { t_ms = 500, head = { x = 1.0 } },
  { t_ms = 200, head = { x = 0.0 } },
]
"#;
        let err = load_motions_toml(bad).expect_err("must reject decreasing offsets");
        assert!(format!("{err}").contains("precedes"));
    }

    #[test]
    fn empty_motion_rejected() {
        let bad = "[motions.hollow]\nframes = []\n";
        assert!(load_motions_toml(bad).is_err());
    }
}
