use std::io;

use hubcore::{HubError, Port};
use thiserror::Error;

use crate::config::Implement;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read robot config: {0}")]
    Io(#[from] io::Error),
    #[error("robot config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("port {0} is bound to more than one motor")]
    DuplicatePort(Port),
    #[error("implement {0:?} is bound more than once")]
    DuplicateImplement(Implement),
    #[error("invalid robot config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum RobotError {
    #[error(transparent)]
    Hub(#[from] HubError),
    #[error("no motor is bound for the {0:?} implement")]
    UnboundImplement(Implement),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type RobotResult<T> = Result<T, RobotError>;
