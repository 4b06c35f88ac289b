//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "pose", version, about = "Pose engine CLI (simulated rig)")]
pub struct Cli {
    /// Path to config TOML (typed); defaults are used when the file is absent
    #[arg(long, value_name = "FILE", default_value = "etc/pose_config.toml")]
    pub config: PathBuf,

    /// Extra motion library TOML, merged over the builtin library
    #[arg(long, value_name = "FILE")]
    pub motions: Option<PathBuf>,

    /// Directory for the persisted pose snapshot
    #[arg(long, value_name = "DIR", default_value = ".pose_state")]
    pub state_dir: PathBuf,

    /// Print the result as a JSON line instead of pretty text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Run on a manually advanced clock: frames are stepped at full speed
    /// with exact 16ms timing instead of sleeping in real time
    #[arg(long, action = ArgAction::SetTrue)]
    pub fast: bool,

    /// Abort if the pose has not settled within this many engine milliseconds
    #[arg(long, value_name = "MS", default_value_t = 30_000)]
    pub max_ms: u64,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the available motion and gesture names
    ListMotions,
    /// Play a named keyframe motion to completion
    Play {
        /// Motion name (e.g. wave, nod, shrug)
        name: String,
    },
    /// Apply a named gesture preset and settle
    Gesture {
        /// Gesture name (e.g. wave, point, think)
        name: String,
    },
    /// Aim axes directly: `group=degrees` or `group.axis=degrees`
    Set {
        /// Actions such as `head=30`, `right_arm.x=12`
        #[arg(required = true, value_name = "ACTION")]
        actions: Vec<String>,
    },
    /// Glide every slider back to zero
    Reset,
    /// Print the snapshot that restore would load, without animating
    Show,
}
