//! The stepped animator: moves each group's slider-axis value toward a goal
//! in fixed whole-degree increments, gated to a bounded tick rate so the
//! visible motion is deterministic and independent of render-frame jitter.
//!
//! Discrete stepping (not interpolation) keeps the slider widget exactly in
//! sync with the physical target at every instant; the smoothing pass owns
//! the visual easing.

use crate::util::{clamp_i32, tick_interval_ms};
use pose_config::{JointGroup, StepperCfg};

const MIN_TICK_HZ: u32 = 10;
const MAX_TICK_HZ: u32 = 120;
const MAX_STEP_DEG: u32 = 360;

/// A step applied by one tick: the group and its new slider-axis value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedStep {
    pub group: JointGroup,
    pub value: i32,
}

#[derive(Debug, Clone)]
pub struct SteppedAnimator {
    running: [bool; JointGroup::COUNT],
    target: [i32; JointGroup::COUNT],
    step_deg: i32,
    tick_hz: u32,
    last_tick_ms: Option<u64>,
}

impl SteppedAnimator {
    pub fn new(cfg: &StepperCfg) -> Self {
        let mut s = Self {
            running: [false; JointGroup::COUNT],
            target: [0; JointGroup::COUNT],
            step_deg: 1,
            tick_hz: 60,
            last_tick_ms: None,
        };
        s.set_params(cfg.step_deg, cfg.tick_hz);
        s
    }

    /// Shared tick parameters; step is clamped into [1, 360] degrees (a
    /// full turn covers any reachable distance), rate into [10, 120] ticks
    /// per second.
    pub fn set_params(&mut self, step_deg: u32, tick_hz: u32) {
        self.step_deg = step_deg.clamp(1, MAX_STEP_DEG) as i32;
        self.tick_hz = tick_hz.clamp(MIN_TICK_HZ, MAX_TICK_HZ);
    }

    /// Record a goal (clamped into `[min_deg, max_deg]`) and start stepping.
    /// Calling this while the group is already running replaces the goal;
    /// latest call wins, nothing queues. Returns the clamped goal.
    pub fn animate_to(&mut self, group: JointGroup, target_deg: i32, min_deg: i32, max_deg: i32) -> i32 {
        let goal = clamp_i32(target_deg, min_deg, max_deg);
        self.target[group.index()] = goal;
        self.running[group.index()] = true;
        tracing::debug!(group = %group, goal, "stepper goal set");
        goal
    }

    /// Clear `running` for one group; the recorded target survives so a
    /// later `tick` has nothing to do until a new goal arrives.
    pub fn stop(&mut self, group: JointGroup) {
        self.running[group.index()] = false;
    }

    pub fn stop_all(&mut self) {
        self.running = [false; JointGroup::COUNT];
    }

    #[inline]
    pub fn is_running(&self, group: JointGroup) -> bool {
        self.running[group.index()]
    }

    #[inline]
    pub fn target(&self, group: JointGroup) -> i32 {
        self.target[group.index()]
    }

    pub fn any_running(&self) -> bool {
        self.running.iter().any(|r| *r)
    }

    /// Advance every running group by one step toward its goal.
    ///
    /// No-op (returns empty) unless `1000 / tick_hz` ms have elapsed since
    /// the last applied tick. A group whose current value already equals its
    /// goal stops without emitting a step; otherwise it moves by at most
    /// `step_deg`, clamped so the final step never overshoots.
    ///
    /// `current` is the externally visible value per group (the slider
    /// widgets); the caller writes each applied step back to the widget and
    /// the target model.
    pub fn tick(&mut self, now_ms: u64, current: &[i32; JointGroup::COUNT]) -> Vec<AppliedStep> {
        let interval = tick_interval_ms(self.tick_hz);
        if let Some(last) = self.last_tick_ms
            && now_ms.saturating_sub(last) < interval
        {
            return Vec::new();
        }
        self.last_tick_ms = Some(now_ms);

        let mut applied = Vec::new();
        for group in JointGroup::ALL {
            if !self.running[group.index()] {
                continue;
            }
            let cur = current[group.index()];
            let tgt = self.target[group.index()];
            if cur == tgt {
                self.running[group.index()] = false;
                continue;
            }
            let next = if cur < tgt {
                (cur + self.step_deg).min(tgt)
            } else {
                (cur - self.step_deg).max(tgt)
            };
            applied.push(AppliedStep { group, value: next });
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pose_config::StepperCfg;

    fn animator() -> SteppedAnimator {
        SteppedAnimator::new(&StepperCfg::default())
    }

    /// Drive ticks at the configured rate until the group settles; returns
    /// (applied-step count, final value).
    fn run_to_completion(s: &mut SteppedAnimator, group: JointGroup, start: i32) -> (u32, i32) {
        let mut current = [0i32; JointGroup::COUNT];
        current[group.index()] = start;
        let mut now = 0u64;
        let mut steps = 0u32;
        while s.is_running(group) {
            for step in s.tick(now, &current) {
                current[step.group.index()] = step.value;
                steps += 1;
            }
            now += 17; // just past the 60 Hz interval
            assert!(steps < 10_000, "animator failed to converge");
        }
        (steps, current[group.index()])
    }

    #[test]
    fn converges_exactly_without_overshoot() {
        let mut s = animator();
        s.animate_to(JointGroup::Head, 30, -90, 90);
        let (steps, end) = run_to_completion(&mut s, JointGroup::Head, 0);
        assert_eq!(end, 30);
        assert_eq!(steps, 30);
        assert!(!s.is_running(JointGroup::Head));
    }

    #[test]
    fn final_step_is_short_when_step_does_not_divide_distance() {
        let mut s = animator();
        s.set_params(4, 60);
        s.animate_to(JointGroup::LeftArm, 10, -90, 90);
        let (steps, end) = run_to_completion(&mut s, JointGroup::LeftArm, 0);
        assert_eq!(end, 10);
        // ceil(10 / 4) = 3 applied steps: 4, 8, 10
        assert_eq!(steps, 3);
    }

    #[test]
    fn goal_is_clamped_into_range() {
        let mut s = animator();
        let goal = s.animate_to(JointGroup::RightArm, 400, -90, 90);
        assert_eq!(goal, 90);
        assert_eq!(s.target(JointGroup::RightArm), 90);
        let goal = s.animate_to(JointGroup::RightArm, -400, -90, 90);
        assert_eq!(goal, -90);
    }

    #[test]
    fn replacing_goal_mid_flight_converges_to_latest_only() {
        let mut s = animator();
        let mut current = [0i32; JointGroup::COUNT];
        s.animate_to(JointGroup::Head, 20, -90, 90);
        let mut now = 0u64;
        for _ in 0..5 {
            for step in s.tick(now, &current) {
                current[step.group.index()] = step.value;
            }
            now += 17;
        }
        assert!(current[JointGroup::Head.index()] > 0);
        assert!(s.is_running(JointGroup::Head));

        s.animate_to(JointGroup::Head, -10, -90, 90);
        while s.is_running(JointGroup::Head) {
            for step in s.tick(now, &current) {
                current[step.group.index()] = step.value;
            }
            now += 17;
        }
        assert_eq!(current[JointGroup::Head.index()], -10);
    }

    #[test]
    fn tick_is_rate_gated() {
        let mut s = animator();
        let current = [0i32; JointGroup::COUNT];
        s.animate_to(JointGroup::Head, 5, -90, 90);
        assert_eq!(s.tick(0, &current).len(), 1);
        // 10ms later: under the 16ms interval at 60 Hz, nothing applies.
        assert!(s.tick(10, &current).is_empty());
        assert_eq!(s.tick(17, &current).len(), 1);
    }

    #[test]
    fn stop_clears_running_but_keeps_target() {
        let mut s = animator();
        s.animate_to(JointGroup::Head, 30, -90, 90);
        s.stop(JointGroup::Head);
        assert!(!s.is_running(JointGroup::Head));
        assert_eq!(s.target(JointGroup::Head), 30);
        let current = [0i32; JointGroup::COUNT];
        assert!(s.tick(0, &current).is_empty());
    }

    #[test]
    fn params_are_clamped() {
        let mut s = animator();
        s.set_params(0, 500);
        s.animate_to(JointGroup::Head, 2, -90, 90);
        let (steps, end) = run_to_completion(&mut s, JointGroup::Head, 0);
        assert_eq!((steps, end), (2, 2)); // step forced up to 1
    }

    #[test]
    fn oversized_step_still_converges() {
        // A step that would overflow i32 must be bounded, not truncated
        // into a negative stride.
        let mut s = SteppedAnimator::new(&StepperCfg {
            step_deg: 3_000_000_000,
            tick_hz: 60,
        });
        s.animate_to(JointGroup::Head, 30, -90, 90);
        let (steps, end) = run_to_completion(&mut s, JointGroup::Head, 0);
        assert_eq!((steps, end), (1, 30)); // one bounded step, no overshoot
        assert!(!s.is_running(JointGroup::Head));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Exactly ceil(|start - goal| / step) applied steps, no
            /// overshoot.
            #[test]
            fn converges_in_ceil_distance_over_step(
                start in -90i32..=90,
                goal in -90i32..=90,
                step in 1u32..=15,
            ) {
                let mut s = SteppedAnimator::new(&StepperCfg { step_deg: step, tick_hz: 60 });
                s.animate_to(JointGroup::Head, goal, -90, 90);
                let (steps, end) = run_to_completion(&mut s, JointGroup::Head, start);
                prop_assert_eq!(end, goal);
                let dist = (start - goal).unsigned_abs();
                prop_assert_eq!(steps, dist.div_ceil(step));
            }
        }
    }
}
