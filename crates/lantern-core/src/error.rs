use thiserror::Error;

/// Errors surfaced by the simulation core. None of them are fatal to a host:
/// they are logged and the offending input is skipped.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("unknown parameter `{0}`")]
    UnknownParam(String),
    #[error("invalid value `{value}` for parameter `{key}`")]
    InvalidValue { key: String, value: String },
    #[error("no simulation registered as `{0}`")]
    UnknownSimulation(String),
    #[error("viewport {width}x{height} has no usable area")]
    DegenerateViewport { width: f32, height: f32 },
}

pub type SimResult<T> = Result<T, SimError>;
