use thiserror::Error;

/// Typed failures from the simulated collaborators. Everything here is
/// non-fatal to the engine; callers log and degrade.
#[derive(Debug, Error, Clone)]
pub enum RigError {
    #[error("store path is not a directory: {0}")]
    StorePath(String),
}
