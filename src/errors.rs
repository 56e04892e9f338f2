use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum PainterError {
    #[error("Painter is already running")]
    AlreadyRunning,

    #[error("Painter is not running")]
    NotRunning,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Surface allocation failed: {0}")]
    SurfaceAllocation(anyhow::Error),

    #[error("Cannot spawn render worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Render worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("Render worker exited before reporting startup")]
    WorkerLost,
}
