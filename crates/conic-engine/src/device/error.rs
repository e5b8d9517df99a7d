use std::fmt;

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

/// Backend failures. Never retried by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// No adapter, device or surface could be obtained at startup.
    BackendUnavailable(String),
    /// The device went away mid-session. Every compiled resource is invalid.
    DeviceLost { reason: String, message: String },
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::BackendUnavailable(why) => {
                write!(f, "graphics backend unavailable: {why}")
            }
            DeviceError::DeviceLost { reason, message } => {
                write!(f, "graphics device lost ({reason}): {message}")
            }
        }
    }
}

impl std::error::Error for DeviceError {}
