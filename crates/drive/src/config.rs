//! Robot configuration
//!
//! One `RobotConfig` describes a robot build: geometry, port bindings and the
//! tuned motion constants. Defaults match the competition robot; a JSON file
//! can override any subset of fields.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use hubcore::{Button, Color, Direction, DriveSettings, Port};
use serde::{Deserialize, Serialize};

use crate::battery::BatteryThresholds;
use crate::error::ConfigError;
use crate::heading::AutoAlignConfig;

/// Auxiliary (non-drive) mechanism motor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Implement {
    Big,
    Small,
}

/// At most this many implement motors fit next to the drive motors
pub const MAX_IMPLEMENTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorBinding {
    pub port: Port,
    #[serde(default)]
    pub direction: Direction,
}

impl MotorBinding {
    pub fn new(port: Port, direction: Direction) -> Self {
        MotorBinding { port, direction }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImplementBinding {
    pub implement: Implement,
    pub port: Port,
    #[serde(default)]
    pub direction: Direction,
}

/// Idle gesture run by the clean slot: every motor spins this far
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkGesture {
    /// deg/s
    pub speed: f64,
    /// deg
    pub angle: f64,
}

impl Default for ParkGesture {
    fn default() -> Self {
        ParkGesture {
            speed: 999.0,
            angle: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    /// mm
    pub wheel_diameter: f64,
    /// Distance between the wheel contact points (mm)
    pub axle_track: f64,
    pub drive: DriveSettings,
    pub left_drive: MotorBinding,
    pub right_drive: MotorBinding,
    pub implements: Vec<ImplementBinding>,
    /// Default implement speed (deg/s)
    pub implement_speed: f64,
    /// Default duty limit for stall homing (%)
    pub duty_limit: u8,
    /// Hold heading with the gyro during drive moves
    pub gyro_during_moves: bool,
    pub stop_button: Button,
    pub busy_color: Color,
    pub battery: BatteryThresholds,
    pub auto_align: AutoAlignConfig,
    pub park: ParkGesture,
    /// Menu label -> multiplier applied to every turn commanded by that run
    pub turn_corrections: BTreeMap<String, f64>,
}

impl Default for RobotConfig {
    fn default() -> Self {
        RobotConfig {
            wheel_diameter: 56.0,
            axle_track: 105.0,
            drive: DriveSettings::default(),
            left_drive: MotorBinding::new(Port::A, Direction::Counterclockwise),
            right_drive: MotorBinding::new(Port::B, Direction::Clockwise),
            implements: vec![
                ImplementBinding {
                    implement: Implement::Big,
                    port: Port::E,
                    direction: Direction::Clockwise,
                },
                ImplementBinding {
                    implement: Implement::Small,
                    port: Port::F,
                    direction: Direction::Clockwise,
                },
            ],
            implement_speed: 500.0,
            duty_limit: 50,
            gyro_during_moves: true,
            stop_button: Button::Bluetooth,
            busy_color: Color::Magenta,
            battery: BatteryThresholds::default(),
            auto_align: AutoAlignConfig::default(),
            park: ParkGesture::default(),
            turn_corrections: BTreeMap::new(),
        }
    }
}

impl RobotConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: RobotConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Turn multiplier for a menu label, 1.0 when none is configured
    pub fn turn_correction(&self, label: &str) -> f64 {
        self.turn_corrections.get(label).copied().unwrap_or(1.0)
    }

    /// Set the turn multiplier for a menu label
    pub fn with_turn_correction(mut self, label: &str, factor: f64) -> Self {
        self.turn_corrections.insert(label.to_string(), factor);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.wheel_diameter > 0.0) || !(self.axle_track > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "wheel diameter ({}) and axle track ({}) must be positive",
                self.wheel_diameter, self.axle_track
            )));
        }
        self.drive.validate().map_err(ConfigError::Invalid)?;

        if self.implements.len() > MAX_IMPLEMENTS {
            return Err(ConfigError::Invalid(format!(
                "{} implements configured, at most {MAX_IMPLEMENTS} are supported",
                self.implements.len()
            )));
        }
        let mut ports = BTreeSet::new();
        let drive_ports = [self.left_drive.port, self.right_drive.port];
        for port in drive_ports.into_iter().chain(self.implements.iter().map(|b| b.port)) {
            if !ports.insert(port) {
                return Err(ConfigError::DuplicatePort(port));
            }
        }
        let mut implements = BTreeSet::new();
        for binding in &self.implements {
            if !implements.insert(binding.implement) {
                return Err(ConfigError::DuplicateImplement(binding.implement));
            }
        }

        if !(self.implement_speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "implement speed must be positive, got {}",
                self.implement_speed
            )));
        }
        if self.duty_limit == 0 || self.duty_limit > 100 {
            return Err(ConfigError::Invalid(format!("duty limit {} outside 1..=100", self.duty_limit)));
        }
        if self.battery.low_mv >= self.battery.high_mv {
            return Err(ConfigError::Invalid(format!(
                "battery low reference {} mV must be below high reference {} mV",
                self.battery.low_mv, self.battery.high_mv
            )));
        }
        let floor = self.battery.floor_percent;
        if !(0.0..100.0).contains(&floor) {
            return Err(ConfigError::Invalid(format!(
                "battery floor {floor}% outside [0, 100)"
            )));
        }
        if self.battery.critical_below > self.battery.warning_below {
            return Err(ConfigError::Invalid(
                "critical battery threshold is above the warning threshold".to_string(),
            ));
        }
        if self.auto_align.tolerance < 0.0 || !(self.auto_align.turn_rate > 0.0) {
            return Err(ConfigError::Invalid("auto-align tolerance or turn rate out of range".to_string()));
        }
        if let Some((label, factor)) = self
            .turn_corrections
            .iter()
            .find(|(_, factor)| !(**factor > 0.0) || !factor.is_finite())
        {
            return Err(ConfigError::Invalid(format!(
                "turn correction for {label} must be positive, got {factor}"
            )));
        }
        Ok(())
    }
}
