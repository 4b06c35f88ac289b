//! The engine facade: owns the target model, animators, ownership table,
//! lighting state, snapshot store, and command inbox, and exposes the
//! per-frame contract (drain commands, tick, poll, smooth — strictly in
//! that order).

use std::sync::Arc;
use std::time::Instant;

use pose_config::{Axis, Config, JointGroup, MotionFile, OnComplete};
use pose_traits::{Clock, KvStore, Rig, SliderControl};

use crate::error::PoseError;
use crate::inbox::{Command, CommandInbox, CommandSender, PoseAction};
use crate::owner::{AxisOwner, AxisOwners};
use crate::scheduler::MotionScheduler;
use crate::smoothing::{ResolvedPart, SmoothingRenderer, resolve_groups};
use crate::snapshot::{self, Lighting, SliderAngles, Snapshot};
use crate::stepper::SteppedAnimator;
use crate::targets::TargetModel;

pub struct PoseEngine {
    cfg: Config,
    library: MotionFile,
    targets: TargetModel,
    stepper: SteppedAnimator,
    scheduler: MotionScheduler,
    owners: AxisOwners,
    smoother: SmoothingRenderer,
    parts: [Vec<ResolvedPart>; JointGroup::COUNT],
    sliders: [Box<dyn SliderControl>; JointGroup::COUNT],
    lighting: Lighting,
    store: Box<dyn KvStore>,
    clock: Arc<dyn Clock + Send + Sync>,
    epoch: Instant,
    inbox: CommandInbox,
}

impl core::fmt::Debug for PoseEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PoseEngine")
            .field("active_motion", &self.scheduler.active_name())
            .field("stepper_running", &self.stepper.any_running())
            .field("lighting", &self.lighting)
            .finish()
    }
}

impl PoseEngine {
    pub(crate) fn from_parts(
        cfg: Config,
        library: MotionFile,
        sliders: [Box<dyn SliderControl>; JointGroup::COUNT],
        store: Box<dyn KvStore>,
        clock: Arc<dyn Clock + Send + Sync>,
        inbox: CommandInbox,
    ) -> Self {
        let stepper = SteppedAnimator::new(&cfg.stepper);
        let smoother = SmoothingRenderer::new(cfg.smoothing.factor);
        let lighting = Lighting::from(cfg.lighting);
        let epoch = clock.now();
        Self {
            cfg,
            library,
            targets: TargetModel::new(),
            stepper,
            scheduler: MotionScheduler::new(),
            owners: AxisOwners::new(),
            smoother,
            parts: Default::default(),
            sliders,
            lighting,
            store,
            clock,
            epoch,
            inbox,
        }
    }

    /// Handle for external command sources; clone freely across threads.
    pub fn command_sender(&self) -> CommandSender {
        self.inbox.sender()
    }

    /// Resolve configured group parts against the loaded asset and capture
    /// base orientations. Returns the part names that were not found.
    pub fn bind_rig(&mut self, rig: &dyn Rig) -> Vec<String> {
        let (parts, missing) = resolve_groups(rig, &self.cfg.groups);
        self.parts = parts;
        missing
    }

    /// Apply the persisted snapshot: lighting immediately, slider angles by
    /// stepped animation from zero so the restored pose glides in instead
    /// of jumping.
    pub fn restore(&mut self) {
        let saved = snapshot::load(self.store.as_ref());
        if let Some(s) = saved {
            self.lighting = s.lighting;
        }
        for group in JointGroup::ALL {
            self.sliders[group.index()].set_value(0);
        }
        self.apply_targets_from_sliders();
        let angles = saved.map(|s| s.angles).unwrap_or_default();
        for group in JointGroup::ALL {
            let _ = self.animate_slider_to(group, angles.get(group));
        }
    }

    /// One cooperative frame: drain queued commands, tick the stepped
    /// animator, poll the motion scheduler, then run the smoothing pass.
    pub fn frame(&mut self, rig: &mut dyn Rig) {
        for command in self.inbox.drain() {
            self.dispatch(command);
        }

        let now = self.now_ms();
        self.tick_stepper(now);
        self.poll_motion(now);
        self.smoother.apply(rig, &self.parts, &self.targets);
    }

    fn dispatch(&mut self, command: Command) {
        match command {
            Command::PlayMotion(name) => {
                if let Err(e) = self.play_motion(&name) {
                    tracing::debug!(error = %e, "command ignored");
                }
            }
            Command::Gesture(name) => {
                if let Err(e) = self.apply_gesture(&name) {
                    tracing::debug!(error = %e, "command ignored");
                }
            }
            Command::Apply(actions) => self.apply_actions(&actions),
            Command::ResetPose => self.reset_pose(),
        }
    }

    fn tick_stepper(&mut self, now_ms: u64) {
        let current = self.slider_values();
        let applied = self.stepper.tick(now_ms, &current);
        for step in &applied {
            self.sliders[step.group.index()].set_value(step.value);
            self.targets
                .set_axis(step.group, Axis::SLIDER, step.value as f32);
        }
        // Groups that just settled release the slider axis.
        for group in JointGroup::ALL {
            if !self.stepper.is_running(group)
                && self.owners.is(group, Axis::SLIDER, AxisOwner::Stepper)
            {
                self.owners.release(group, Axis::SLIDER);
            }
        }
        if !applied.is_empty() {
            self.save_snapshot();
        }
    }

    fn poll_motion(&mut self, now_ms: u64) {
        let due = self.scheduler.poll(now_ms);
        for frame in &due.frames {
            for group in JointGroup::ALL {
                let Some(ov) = frame.group(group) else { continue };
                for (axis, value) in [(Axis::X, ov.x), (Axis::Y, ov.y), (Axis::Z, ov.z)] {
                    if let Some(deg) = value
                        && self.owners.is(group, axis, AxisOwner::Motion)
                    {
                        self.targets.set_axis(group, axis, deg);
                    }
                }
            }
        }
        match due.completed {
            Some(OnComplete::Hold) => self.owners.release_all_of(AxisOwner::Motion),
            Some(OnComplete::Neutral) => self.release_motion_axes(),
            None => {}
        }
    }

    /// Start a named motion. Supersedes the in-flight motion and all stepped
    /// animation; motion axes reset to neutral first, the slider axis is
    /// re-derived from the widgets (so slider state survives).
    pub fn play_motion(&mut self, name: &str) -> Result<(), PoseError> {
        let def = match self.library.motions.get(name) {
            Some(def) if !def.frames.is_empty() => def.clone(),
            _ => return Err(PoseError::UnknownMotion(name.to_string())),
        };

        self.cancel_motion();
        self.stepper.stop_all();
        self.owners.release_all_of(AxisOwner::Stepper);

        // Claim exactly the axes this motion writes.
        for frame in &def.frames {
            for group in JointGroup::ALL {
                let Some(ov) = frame.group(group) else { continue };
                for (axis, value) in [(Axis::X, ov.x), (Axis::Y, ov.y), (Axis::Z, ov.z)] {
                    if value.is_some() {
                        self.owners.claim(group, axis, AxisOwner::Motion);
                    }
                }
            }
        }

        let now = self.now_ms();
        self.scheduler.start(name, def, now);
        Ok(())
    }

    /// Cancel the in-flight motion (if any): all pending keyframes are
    /// dropped, motion-only axes return to neutral, and the slider axis is
    /// restored from the widgets.
    pub fn cancel_motion(&mut self) {
        let _ = self.scheduler.cancel();
        self.release_motion_axes();
    }

    fn release_motion_axes(&mut self) {
        self.owners.release_all_of(AxisOwner::Motion);
        self.targets.reset_motion_axes();
        self.apply_targets_from_sliders();
    }

    /// Aim a group's slider axis via the stepped animator. The goal is
    /// clamped into the widget's `[min, max]`. Returns the clamped goal.
    pub fn animate_slider_to(&mut self, group: JointGroup, target_deg: i32) -> i32 {
        let slider = &self.sliders[group.index()];
        let (min, max) = (slider.min(), slider.max());
        self.owners.claim(group, Axis::SLIDER, AxisOwner::Stepper);
        self.stepper.animate_to(group, target_deg, min, max)
    }

    /// User takes manual control of a slider (press/drag start): the active
    /// motion and this group's stepped animation both yield immediately.
    pub fn begin_user_drag(&mut self, group: JointGroup) {
        self.cancel_motion();
        self.stepper.stop(group);
        self.owners.claim(group, Axis::SLIDER, AxisOwner::User);
    }

    /// A value change from the slider widget itself. Takes the axis from a
    /// running stepped animation, so the owner table and the writer agree
    /// even without a preceding `begin_user_drag`.
    pub fn slider_input(&mut self, group: JointGroup, value: i32) {
        self.stepper.stop(group);
        self.sliders[group.index()].set_value(value);
        self.owners.claim(group, Axis::SLIDER, AxisOwner::User);
        self.targets.set_axis(group, Axis::SLIDER, value as f32);
        self.save_snapshot();
    }

    /// Apply a gesture preset: cancel the motion, then step every slider
    /// axis toward the preset's goals.
    pub fn apply_gesture(&mut self, name: &str) -> Result<(), PoseError> {
        let Some(def) = self.library.gestures.get(name).copied() else {
            return Err(PoseError::UnknownGesture(name.to_string()));
        };
        self.cancel_motion();
        for group in JointGroup::ALL {
            let _ = self.animate_slider_to(group, def.angle(group));
        }
        tracing::info!(gesture = name, "gesture applied");
        Ok(())
    }

    /// Apply a batch of command-source actions. Slider-axis actions route
    /// through the stepped animator (keeping the widgets in sync); motion
    /// axes are set directly.
    pub fn apply_actions(&mut self, actions: &[PoseAction]) {
        if actions.is_empty() {
            return;
        }
        self.cancel_motion();
        for action in actions {
            match action.axis.unwrap_or(Axis::SLIDER) {
                Axis::Z => {
                    let _ = self.animate_slider_to(action.group, action.angle.round() as i32);
                }
                axis @ (Axis::X | Axis::Y) => {
                    self.owners.claim(action.group, axis, AxisOwner::User);
                    self.targets.set_axis(action.group, axis, action.angle);
                }
            }
        }
    }

    /// Cancel the motion and glide every slider axis back to zero.
    pub fn reset_pose(&mut self) {
        self.cancel_motion();
        for group in JointGroup::ALL {
            let _ = self.animate_slider_to(group, 0);
        }
    }

    pub fn set_lighting(&mut self, lighting: Lighting) {
        self.lighting = lighting;
        self.save_snapshot();
    }

    pub fn lighting(&self) -> Lighting {
        self.lighting
    }

    pub fn targets(&self) -> &TargetModel {
        &self.targets
    }

    pub fn slider_value(&self, group: JointGroup) -> i32 {
        self.sliders[group.index()].value()
    }

    pub fn stepper_running(&self, group: JointGroup) -> bool {
        self.stepper.is_running(group)
    }

    pub fn stepper_target(&self, group: JointGroup) -> i32 {
        self.stepper.target(group)
    }

    pub fn active_motion(&self) -> Option<&str> {
        self.scheduler.active_name()
    }

    /// The record that `save_snapshot` would persist right now.
    pub fn snapshot(&self) -> Snapshot {
        let mut angles = SliderAngles::default();
        for group in JointGroup::ALL {
            angles.set(group, self.sliders[group.index()].value());
        }
        Snapshot {
            angles,
            lighting: self.lighting,
        }
    }

    fn save_snapshot(&mut self) {
        let snap = self.snapshot();
        snapshot::save(self.store.as_mut(), &snap);
    }

    fn apply_targets_from_sliders(&mut self) {
        for group in JointGroup::ALL {
            let value = self.sliders[group.index()].value();
            self.targets.set_axis(group, Axis::SLIDER, value as f32);
        }
    }

    fn slider_values(&self) -> [i32; JointGroup::COUNT] {
        let mut out = [0i32; JointGroup::COUNT];
        for group in JointGroup::ALL {
            out[group.index()] = self.sliders[group.index()].value();
        }
        out
    }

    fn now_ms(&self) -> u64 {
        self.clock.ms_since(self.epoch)
    }
}
