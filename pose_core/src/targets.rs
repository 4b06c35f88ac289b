//! The target model: desired orientation per joint group, in degrees.
//!
//! Pure data. The setter overwrites unconditionally; range clamping for the
//! slider axis happens in the stepped animator, and motion axes trust the
//! motion author. The smoothing pass polls this every frame.

use pose_config::{Axis, JointGroup};

/// One group's `{x, y, z}` target angles, degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisTriple {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AxisTriple {
    #[inline]
    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    #[inline]
    pub fn set(&mut self, axis: Axis, deg: f32) {
        match axis {
            Axis::X => self.x = deg,
            Axis::Y => self.y = deg,
            Axis::Z => self.z = deg,
        }
    }
}

/// Always defined for every enumerated group; never absent.
#[derive(Debug, Clone, Default)]
pub struct TargetModel {
    targets: [AxisTriple; JointGroup::COUNT],
}

impl TargetModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconditional overwrite of one axis.
    #[inline]
    pub fn set_axis(&mut self, group: JointGroup, axis: Axis, deg: f32) {
        self.targets[group.index()].set(axis, deg);
    }

    /// Current full triple for a group.
    #[inline]
    pub fn get(&self, group: JointGroup) -> AxisTriple {
        self.targets[group.index()]
    }

    /// Reset the motion-only axes (x, y) of every group to neutral.
    /// The slider axis is left untouched; callers re-derive it from the
    /// slider widgets.
    pub fn reset_motion_axes(&mut self) {
        for t in &mut self.targets {
            t.x = 0.0;
            t.y = 0.0;
        }
    }
}
