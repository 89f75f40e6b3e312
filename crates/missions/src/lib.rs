//! Competition missions for the hub robot
//!
//! This crate provides:
//! - The rotating slot menu and the per-session state behind it
//! - A dispatcher that times each run and the whole match
//! - Season run tables built from `drive::Robot` primitives
//! - The boot and menu loop used by the binary

pub mod animation;
pub mod dispatcher;
pub mod error;
pub mod menu;
pub mod runner;
pub mod seasons;
pub mod session;

pub use dispatcher::{CumulativeTime, DispatchReport, MATCH_TIME_MS, Routine, RunOutcome, Season, dispatch};
pub use error::{MenuError, MissionError, MissionResult};
pub use menu::{Menu, Slot};
pub use runner::{boot, run_menu_loop};
pub use session::Session;
