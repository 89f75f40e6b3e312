//! Simulated hub hardware
//!
//! Implements the `hubcore` capability traits against a virtual clock so the
//! control program runs without firmware:
//! - Motors that move along timed segments and stall at configured end stops
//! - A differential drive base with trapezoidal profiles, wheel slip and gyro noise
//! - A state-of-charge battery feeding the voltage sensor
//! - Scripted or console-driven menu input

pub mod battery;
pub mod drivebase;
pub mod hub;
pub mod menu;
pub mod motor;
pub mod platform;
pub mod world;

pub use battery::{BatteryConfig, SimBattery};
pub use drivebase::SimDriveBase;
pub use hub::{SimClock, SimHub};
pub use menu::{ConsoleMenu, MenuSource, ScriptedMenu};
pub use motor::SimMotor;
pub use platform::{SimPlatform, SimProbe};
pub use world::{HardStop, HubEvent, Pose, SimConfig};
