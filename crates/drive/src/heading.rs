//! Heading bookkeeping for turns
//!
//! The robot keeps a running target heading: every in-place turn moves the
//! target by the commanded angle, and the IMU read-back after the turn gives
//! the residual error that auto-align works against.

use serde::{Deserialize, Serialize};

/// Wrap an angle in degrees into (-180, 180]
pub fn normalize_angle(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}

/// Tuning for the corrective micro-turns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoAlignConfig {
    /// Corrective turns allowed per alignment
    pub max_iterations: u32,
    /// Residual error (deg) accepted as aligned
    pub tolerance: f64,
    /// Turn rate for corrections (deg/s)
    pub turn_rate: f64,
    /// Turn acceleration while correcting (deg/s²), raised above the drive default
    pub turn_acceleration: f64,
}

impl Default for AutoAlignConfig {
    fn default() -> Self {
        AutoAlignConfig {
            max_iterations: 3,
            tolerance: 0.5,
            turn_rate: 150.0,
            turn_acceleration: 2000.0,
        }
    }
}

/// Outcome of one bounded alignment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignReport {
    pub iterations: u32,
    /// Error (deg) left when the loop stopped
    pub residual: f64,
}

impl AlignReport {
    pub fn converged(&self, tolerance: f64) -> bool {
        self.residual.abs() <= tolerance
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingTracker {
    target: f64,
    last_error: f64,
}

impl HeadingTracker {
    pub fn new(target: f64) -> Self {
        HeadingTracker {
            target,
            last_error: 0.0,
        }
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Shift the target by a commanded rotation
    pub fn advance(&mut self, degrees: f64) {
        self.target += degrees;
    }

    /// Store and return the error between target and a measured heading
    pub fn record(&mut self, measured: f64) -> f64 {
        self.last_error = normalize_angle(self.target - measured);
        self.last_error
    }

    pub fn last_error(&self) -> f64 {
        self.last_error
    }
}
