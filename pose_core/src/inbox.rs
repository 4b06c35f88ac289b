//! Command inbox: a bounded channel between an external command source
//! (chat backend, CLI thread, voice frontend) and the engine.
//!
//! Producers hold a cheap `CommandSender` clone and may live on any thread;
//! the engine drains the inbox at the start of each frame, so all target
//! mutation stays on the frame loop's thread.

use crossbeam_channel as xch;
use pose_config::{Axis, JointGroup};

/// One command-source action: aim a group's axis at an angle. The axis
/// defaults to the slider axis, which routes through the stepped animator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseAction {
    pub group: JointGroup,
    pub axis: Option<Axis>,
    pub angle: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Play a named keyframe motion.
    PlayMotion(String),
    /// Apply a named gesture preset via the stepped animator.
    Gesture(String),
    /// Apply a batch of direct actions.
    Apply(Vec<PoseAction>),
    /// Animate every slider axis back to zero.
    ResetPose,
}

#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: xch::Sender<Command>,
}

impl CommandSender {
    /// Non-blocking send. A full or disconnected inbox drops the command;
    /// command sources are fire-and-forget by contract.
    pub fn send(&self, command: Command) -> bool {
        match self.tx.try_send(command) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "command dropped");
                false
            }
        }
    }
}

#[derive(Debug)]
pub struct CommandInbox {
    tx: xch::Sender<Command>,
    rx: xch::Receiver<Command>,
}

impl Default for CommandInbox {
    fn default() -> Self {
        Self::new(32)
    }
}

impl CommandInbox {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = xch::bounded(capacity.max(1));
        Self { tx, rx }
    }

    pub fn sender(&self) -> CommandSender {
        CommandSender {
            tx: self.tx.clone(),
        }
    }

    /// Everything queued since the last drain, in arrival order.
    pub fn drain(&self) -> Vec<Command> {
        self.rx.try_iter().collect()
    }
}
