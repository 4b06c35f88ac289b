use thiserror::Error;

/// Non-fatal engine errors. Unknown names are caller bugs and most call
/// sites downgrade them to a debug log; the typed variant exists so the CLI
/// can surface them when the user asked for the name explicitly.
#[derive(Debug, Error, Clone)]
pub enum PoseError {
    #[error("unknown motion: {0}")]
    UnknownMotion(String),
    #[error("unknown gesture: {0}")]
    UnknownGesture(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing snapshot store")]
    MissingStore,
    #[error("missing slider control for group '{0}'")]
    MissingSlider(&'static str),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
