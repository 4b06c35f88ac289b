//! `pose`: drive the engine against the simulated rig from the command line.
//!
//! Results print to stdout (one JSON line with `--json`); logs go to stderr
//! and, when `[logging].file` is set, to a JSON-lines file.

mod cli;
mod run;

use clap::Parser;
use eyre::{Result, WrapErr};
use std::fs;
use std::path::Path;

use cli::{Cli, FILE_GUARD};
use pose_config::{Config, Logging};

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let cfg = load_config(&cli.config)?;
    init_logging(&cli, &cfg.logging);
    run::run(cli, cfg)
}

/// Read and validate the config file; an absent file means defaults.
fn load_config(path: &Path) -> Result<Config> {
    let cfg = if path.exists() {
        let text = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
        pose_config::load_toml(&text)
            .wrap_err_with(|| format!("invalid config {}", path.display()))?
    } else {
        Config::default()
    };
    cfg.validate()?;
    Ok(cfg)
}

fn init_logging(cli: &Cli, logging: &Logging) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    // CLI flag wins; the config's level fills in when the flag is at its
    // default. RUST_LOG overrides both.
    let level = if cli.log_level == "info" {
        logging.level.clone().unwrap_or_else(|| cli.log_level.clone())
    } else {
        cli.log_level.clone()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Console logs go to stderr so stdout stays parseable.
    let console = fmt::layer().with_writer(std::io::stderr);

    match &logging.file {
        Some(file) => {
            let path = Path::new(file);
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
            let name = path.file_name().map_or_else(
                || "pose.log".to_string(),
                |n| n.to_string_lossy().into_owned(),
            );
            let dir = dir.unwrap_or_else(|| Path::new("."));
            let appender = match logging.rotation.as_deref() {
                Some("daily") => tracing_appender::rolling::daily(dir, name),
                Some("hourly") => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(fmt::layer().json().with_writer(writer).with_ansi(false))
                .init();
        }
        None => {
            tracing_subscriber::registry().with(filter).with(console).init();
        }
    }
}
