//! Robot control on top of the hub capability traits
//!
//! This crate provides:
//! - `RobotConfig`, the serde-backed description of one robot build
//! - `Robot`, a facade that owns the drive base, implement motors and hub
//! - Battery percentage mapping and status tiers
//! - Heading tracking and bounded auto-align

pub mod battery;
pub mod config;
pub mod error;
pub mod heading;
pub mod options;
pub mod robot;

pub use battery::{BatterySample, BatteryThresholds, StatusTier, rescale};
pub use config::{Implement, ImplementBinding, MAX_IMPLEMENTS, MotorBinding, ParkGesture, RobotConfig};
pub use error::{ConfigError, RobotError, RobotResult};
pub use heading::{AlignReport, AutoAlignConfig, HeadingTracker, normalize_angle};
pub use options::{MoveOptions, TurnOptions};
pub use robot::Robot;
