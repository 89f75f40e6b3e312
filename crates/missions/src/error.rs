use drive::RobotError;
use thiserror::Error;

use crate::menu::Slot;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MenuError {
    #[error("menu has no slots")]
    Empty,
    #[error("slot {0} appears more than once")]
    Duplicate(Slot),
    #[error("run numbers start at 1")]
    ZeroRun,
    #[error("unknown menu label {0:?}")]
    UnknownLabel(String),
    #[error("slot {0} is not on this menu")]
    NotOnMenu(Slot),
}

#[derive(Debug, Error)]
pub enum MissionError {
    #[error(transparent)]
    Robot(#[from] RobotError),
    #[error(transparent)]
    Menu(#[from] MenuError),
}

pub type MissionResult<T> = Result<T, MissionError>;
