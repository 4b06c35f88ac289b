//! The motion scheduler: plays one named keyframe sequence at a time.
//!
//! Scheduling is a polled pending-set rather than a pile of timer
//! callbacks: keyframes whose offset has elapsed are handed out by
//! `poll(now_ms)` in authored order, and replacing or cancelling the run
//! drops every pending frame in one move — a stale frame can never fire
//! because nothing holds one outside the run itself.

use pose_config::{Keyframe, MotionDef, OnComplete};

#[derive(Debug)]
struct ActiveRun {
    name: String,
    def: MotionDef,
    started_ms: u64,
    next: usize,
}

/// Result of one poll: frames that came due, in offset order, plus the
/// completion behavior if the run just finished.
#[derive(Debug, Default)]
pub struct DueFrames {
    pub frames: Vec<Keyframe>,
    pub completed: Option<OnComplete>,
}

#[derive(Debug, Default)]
pub struct MotionScheduler {
    run: Option<ActiveRun>,
}

impl MotionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever was playing with a new run starting at `now_ms`.
    /// Offsets were validated non-decreasing at load time.
    pub fn start(&mut self, name: &str, def: MotionDef, now_ms: u64) {
        if let Some(old) = self.run.take() {
            tracing::debug!(old = %old.name, new = name, "motion superseded");
        }
        tracing::info!(motion = name, frames = def.frames.len(), "motion start");
        self.run = Some(ActiveRun {
            name: name.to_string(),
            def,
            started_ms: now_ms,
            next: 0,
        });
    }

    /// Drop the run and all its pending frames. Returns whether a run was
    /// actually cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.run.take() {
            Some(run) => {
                tracing::debug!(motion = %run.name, pending = run.def.frames.len() - run.next, "motion cancelled");
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.run.is_some()
    }

    pub fn active_name(&self) -> Option<&str> {
        self.run.as_ref().map(|r| r.name.as_str())
    }

    /// Hand out every keyframe whose offset has elapsed. When the last frame
    /// fires the run is finished and `completed` carries its `on_complete`.
    pub fn poll(&mut self, now_ms: u64) -> DueFrames {
        let mut due = DueFrames::default();
        let Some(run) = self.run.as_mut() else {
            return due;
        };

        let elapsed = now_ms.saturating_sub(run.started_ms);
        while run.next < run.def.frames.len() && run.def.frames[run.next].t_ms <= elapsed {
            due.frames.push(run.def.frames[run.next].clone());
            run.next += 1;
        }

        if run.next == run.def.frames.len() {
            due.completed = Some(run.def.on_complete);
            tracing::info!(motion = %run.name, "motion complete");
            self.run = None;
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pose_config::{AxisOverride, JointGroup};

    fn frame(t_ms: u64, head_x: f32) -> Keyframe {
        Keyframe {
            t_ms,
            head: Some(AxisOverride {
                x: Some(head_x),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn def(frames: Vec<Keyframe>) -> MotionDef {
        MotionDef {
            on_complete: OnComplete::Hold,
            frames,
        }
    }

    #[test]
    fn frames_fire_in_order_and_only_once() {
        let mut s = MotionScheduler::new();
        s.start("t", def(vec![frame(0, 1.0), frame(200, 2.0), frame(500, 3.0)]), 1000);

        let due = s.poll(1000);
        assert_eq!(due.frames.len(), 1);
        assert!(due.completed.is_none());

        // Nothing new before 200ms elapsed.
        assert!(s.poll(1150).frames.is_empty());

        // Advancing straight to 600ms elapsed delivers 200 and 500 in order.
        let due = s.poll(1600);
        let xs: Vec<f32> = due
            .frames
            .iter()
            .filter_map(|f| f.group(JointGroup::Head).and_then(|a| a.x))
            .collect();
        assert_eq!(xs, vec![2.0, 3.0]);
        assert_eq!(due.completed, Some(OnComplete::Hold));
        assert!(!s.is_active());
    }

    #[test]
    fn cancel_drops_all_pending_frames() {
        let mut s = MotionScheduler::new();
        s.start("t", def(vec![frame(0, 1.0), frame(400, 2.0)]), 0);
        let _ = s.poll(0);
        assert!(s.cancel());
        assert!(s.poll(10_000).frames.is_empty());
        assert!(!s.cancel());
    }

    #[test]
    fn starting_a_new_run_invalidates_the_previous_one() {
        let mut s = MotionScheduler::new();
        s.start("first", def(vec![frame(0, 1.0), frame(300, 2.0)]), 0);
        let _ = s.poll(0);

        s.start("second", def(vec![frame(0, 9.0)]), 100);
        assert_eq!(s.active_name(), Some("second"));

        // 400ms absolute would have fired first's 300ms frame; only the
        // second run's frames exist now.
        let due = s.poll(400);
        let xs: Vec<f32> = due
            .frames
            .iter()
            .filter_map(|f| f.group(JointGroup::Head).and_then(|a| a.x))
            .collect();
        assert_eq!(xs, vec![9.0]);
    }

    #[test]
    fn completion_reports_on_complete_mode() {
        let mut s = MotionScheduler::new();
        s.start(
            "t",
            MotionDef {
                on_complete: OnComplete::Neutral,
                frames: vec![frame(0, 1.0)],
            },
            0,
        );
        let due = s.poll(50);
        assert_eq!(due.completed, Some(OnComplete::Neutral));
    }
}
