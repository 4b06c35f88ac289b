//! Per-axis write arbitration.
//!
//! For a given (group, axis) at most one of {user input, stepped animator,
//! motion scheduler} may be the authoritative writer. Every mutation path
//! claims the axis before writing; the ad hoc "cancel the other guys first"
//! calls all funnel through this table so the invariant is enforced in one
//! place instead of by convention.

use pose_config::{Axis, JointGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisOwner {
    #[default]
    Free,
    User,
    Stepper,
    Motion,
}

#[derive(Debug, Clone, Default)]
pub struct AxisOwners {
    owners: [[AxisOwner; Axis::COUNT]; JointGroup::COUNT],
}

impl AxisOwners {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn owner(&self, group: JointGroup, axis: Axis) -> AxisOwner {
        self.owners[group.index()][axis.index()]
    }

    #[inline]
    pub fn is(&self, group: JointGroup, axis: Axis, owner: AxisOwner) -> bool {
        self.owner(group, axis) == owner
    }

    /// Take ownership of an axis. The previous owner is simply displaced;
    /// callers are expected to have cancelled its driving state first.
    #[inline]
    pub fn claim(&mut self, group: JointGroup, axis: Axis, owner: AxisOwner) {
        self.owners[group.index()][axis.index()] = owner;
    }

    #[inline]
    pub fn release(&mut self, group: JointGroup, axis: Axis) {
        self.owners[group.index()][axis.index()] = AxisOwner::Free;
    }

    /// Free every axis currently held by `owner`.
    pub fn release_all_of(&mut self, owner: AxisOwner) {
        for row in &mut self.owners {
            for slot in row.iter_mut() {
                if *slot == owner {
                    *slot = AxisOwner::Free;
                }
            }
        }
    }
}
