//! The smoothing pass: once per render frame, blend every controlled part's
//! live orientation toward base + target with a fixed exponential factor.
//!
//! The renderer never knows which upstream produced a target, so discrete
//! stepper moves and one-shot keyframe jumps ease identically.

use crate::targets::TargetModel;
use crate::util::{deg_to_rad, lerp};
use pose_config::{GroupsCfg, JointGroup};
use pose_traits::{Orientation, Rig};

/// A part resolved against the loaded asset, with its captured base
/// orientation (the zero-reference for all animated offsets; immutable
/// after capture).
#[derive(Debug, Clone)]
pub struct ResolvedPart {
    pub name: String,
    pub base: Orientation,
}

/// Resolve each group's configured part names against the rig and capture
/// base orientations. Missing names are returned (and logged) rather than
/// treated as fatal: the group simply controls fewer parts.
pub fn resolve_groups(
    rig: &dyn Rig,
    groups: &GroupsCfg,
) -> ([Vec<ResolvedPart>; JointGroup::COUNT], Vec<String>) {
    let mut resolved: [Vec<ResolvedPart>; JointGroup::COUNT] = Default::default();
    let mut missing = Vec::new();

    for group in JointGroup::ALL {
        for name in groups.parts(group) {
            match rig.orientation(name) {
                Some(base) => resolved[group.index()].push(ResolvedPart {
                    name: name.clone(),
                    base,
                }),
                None => missing.push(name.clone()),
            }
        }
    }

    if !missing.is_empty() {
        tracing::warn!(parts = ?missing, "some configured parts were not found in the asset");
    }
    (resolved, missing)
}

#[derive(Debug, Clone, Copy)]
pub struct SmoothingRenderer {
    factor: f32,
}

impl SmoothingRenderer {
    pub fn new(factor: f32) -> Self {
        Self { factor }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// One frame's blend: `live = lerp(live, base + radians(target), factor)`
    /// per part per axis.
    pub fn apply(
        &self,
        rig: &mut dyn Rig,
        parts: &[Vec<ResolvedPart>; JointGroup::COUNT],
        targets: &TargetModel,
    ) {
        for group in JointGroup::ALL {
            let tgt = targets.get(group);
            for part in &parts[group.index()] {
                let Some(live) = rig.orientation(&part.name) else {
                    continue;
                };
                let next = Orientation::new(
                    lerp(live.x, part.base.x + deg_to_rad(tgt.x), self.factor),
                    lerp(live.y, part.base.y + deg_to_rad(tgt.y), self.factor),
                    lerp(live.z, part.base.z + deg_to_rad(tgt.z), self.factor),
                );
                let _ = rig.set_orientation(&part.name, next);
            }
        }
    }
}
