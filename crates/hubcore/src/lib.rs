//! Hardware capability layer for a LEGO hub robot
//!
//! This crate provides:
//! - Shared value types (ports, directions, stop behaviour, colors, display frames)
//! - Capability traits for motors, the drive base, the hub and its clock
//! - The `Platform` trait that hands out exclusively owned device handles

pub mod error;
pub mod matrix;
pub mod traits;
pub mod types;

pub use error::*;
pub use matrix::*;
pub use traits::*;
pub use types::*;
