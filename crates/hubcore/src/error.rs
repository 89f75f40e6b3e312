use thiserror::Error;

use crate::types::Port;

/// Errors reported by hub devices
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HubError {
    #[error("port {0} is already claimed by another device")]
    PortInUse(Port),
    #[error("{0} is already claimed")]
    DeviceClaimed(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("motor on port {0} has no mechanical limit in the commanded direction")]
    NoStall(Port),
    #[error("menu input closed")]
    MenuClosed,
    #[error("device I/O failed: {0}")]
    Io(String),
}

pub type HubResult<T> = Result<T, HubError>;
