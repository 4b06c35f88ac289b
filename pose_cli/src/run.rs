//! Command execution: engine assembly, the frame loop, and result output.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use eyre::{Result, WrapErr};
use pose_config::{Config, MotionFile, motions::load_motions_toml};
use pose_core::{EngineBuilder, JointGroup, PoseAction, PoseEngine, snapshot};
use pose_rig::{FileStore, SimSlider, SimulatedRig, check_store_dir};
use pose_traits::{Clock, ManualClock, MonotonicClock};

use crate::cli::{Cli, Commands};

const FRAME: Duration = Duration::from_millis(16);
/// Consecutive idle frames required before the run counts as settled; gives
/// the smoothing pass time to close on the final targets.
const SETTLE_FRAMES: u32 = 30;

pub fn run(cli: Cli, cfg: Config) -> Result<()> {
    let mut library = MotionFile::builtin()?;
    if let Some(path) = &cli.motions {
        let text = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read motions {}", path.display()))?;
        library.merge(load_motions_toml(&text)?);
    }

    match &cli.cmd {
        Commands::ListMotions => {
            for name in library.motions.keys() {
                println!("motion  {name}");
            }
            for name in library.gestures.keys() {
                println!("gesture {name}");
            }
            return Ok(());
        }
        Commands::Show => {
            let store = FileStore::new(&cli.state_dir);
            match snapshot::load(&store) {
                Some(snap) => println!("{}", serde_json::to_string(&snap)?),
                None => println!("no snapshot"),
            }
            return Ok(());
        }
        _ => {}
    }

    check_store_dir(&cli.state_dir)?;
    let store = FileStore::new(&cli.state_dir);
    let clock: Arc<dyn Clock + Send + Sync> = if cli.fast {
        Arc::new(ManualClock::new())
    } else {
        Arc::new(MonotonicClock::new())
    };

    let slider = || SimSlider::new(cfg.slider.min_deg, cfg.slider.max_deg);
    let mut engine = EngineBuilder::new()
        .with_config(cfg.clone())
        .with_library(library)
        .with_store(store)
        .with_clock(clock.clone())
        .with_slider(JointGroup::LeftArm, slider())
        .with_slider(JointGroup::RightArm, slider())
        .with_slider(JointGroup::Head, slider())
        .build()?;

    let mut part_names: Vec<String> = Vec::new();
    for group in JointGroup::ALL {
        part_names.extend(cfg.groups.parts(group).iter().cloned());
    }
    let mut rig = SimulatedRig::with_parts(part_names);
    let _ = engine.bind_rig(&rig);
    engine.restore();

    let label = match &cli.cmd {
        Commands::Play { name } => {
            engine.play_motion(name)?;
            "play"
        }
        Commands::Gesture { name } => {
            engine.apply_gesture(name)?;
            "gesture"
        }
        Commands::Set { actions } => {
            let parsed: Vec<PoseAction> = actions
                .iter()
                .map(|s| parse_action(s))
                .collect::<Result<_>>()?;
            engine.apply_actions(&parsed);
            "set"
        }
        Commands::Reset => {
            engine.reset_pose();
            "reset"
        }
        Commands::ListMotions | Commands::Show => return Ok(()),
    };

    tracing::info!(command = label, fast = cli.fast, "run start");
    run_to_settle(&mut engine, &mut rig, clock.as_ref(), cli.max_ms)?;
    report(&cli, &engine, label);
    Ok(())
}

/// Parse `group=degrees` or `group.axis=degrees` into an action.
fn parse_action(s: &str) -> Result<PoseAction> {
    let (target, value) = s
        .split_once('=')
        .ok_or_else(|| eyre::eyre!("expected group[.axis]=degrees, got '{s}'"))?;
    let angle: f32 = value
        .trim()
        .parse()
        .wrap_err_with(|| format!("bad angle in '{s}'"))?;
    let (group, axis) = match target.split_once('.') {
        Some((g, a)) => (g.trim(), Some(a.trim().parse()?)),
        None => (target.trim(), None),
    };
    Ok(PoseAction {
        group: group.parse()?,
        axis,
        angle,
    })
}

/// Frame the engine until it reports idle for `SETTLE_FRAMES` consecutive
/// frames. The clock paces the loop; a manual clock makes this instant.
fn run_to_settle(
    engine: &mut PoseEngine,
    rig: &mut SimulatedRig,
    clock: &dyn Clock,
    max_ms: u64,
) -> Result<()> {
    let epoch = clock.now();
    let mut settle = SETTLE_FRAMES;
    loop {
        engine.frame(rig);
        if idle(engine) {
            settle -= 1;
            if settle == 0 {
                return Ok(());
            }
        } else {
            settle = SETTLE_FRAMES;
        }
        if clock.ms_since(epoch) > max_ms {
            eyre::bail!("pose did not settle within {max_ms}ms");
        }
        clock.sleep(FRAME);
    }
}

fn idle(engine: &PoseEngine) -> bool {
    engine.active_motion().is_none()
        && JointGroup::ALL.iter().all(|g| !engine.stepper_running(*g))
}

fn report(cli: &Cli, engine: &PoseEngine, label: &str) {
    let snap = engine.snapshot();
    if cli.json {
        let line = serde_json::json!({
            "ok": true,
            "command": label,
            "angles": {
                "left_arm": snap.angles.left_arm,
                "right_arm": snap.angles.right_arm,
                "head": snap.angles.head,
            },
            "lighting": {
                "exposure": snap.lighting.exposure,
                "key_light": snap.lighting.key_light,
                "ambient": snap.lighting.ambient,
            },
        });
        println!("{line}");
    } else {
        println!(
            "settled: left_arm={} right_arm={} head={}",
            snap.angles.left_arm, snap.angles.right_arm, snap.angles.head
        );
    }
}
