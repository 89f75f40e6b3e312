use std::fmt;

use serde::{Deserialize, Serialize};

/// Motor/sensor port on the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Port::A => "A",
            Port::B => "B",
            Port::C => "C",
            Port::D => "D",
            Port::E => "E",
            Port::F => "F",
        };
        f.write_str(name)
    }
}

/// Positive rotation direction of a motor, as seen from the shaft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Clockwise,
    Counterclockwise,
}

impl Direction {
    /// +1.0 for clockwise, -1.0 for counterclockwise
    pub fn sign(self) -> f64 {
        match self {
            Direction::Clockwise => 1.0,
            Direction::Counterclockwise => -1.0,
        }
    }
}

/// What a motor does once a commanded motion completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Stop {
    /// Let the motor spin freely
    Coast,
    /// Passively resist motion
    Brake,
    /// Actively hold the final angle
    #[default]
    Hold,
    /// Keep running at the last speed so the next command blends in
    Continue,
}

/// Colors the hub status light can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    Green,
    Yellow,
    Orange,
    Red,
    Magenta,
    Blue,
    Cyan,
    White,
}

/// Hub button that aborts the running program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Button {
    #[default]
    Center,
    Bluetooth,
    Left,
    Right,
}

/// Motion limits of a differential drive base.
///
/// Speeds are in mm/s and deg/s, accelerations in mm/s² and deg/s².
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveSettings {
    pub straight_speed: f64,
    pub straight_acceleration: f64,
    pub turn_rate: f64,
    pub turn_acceleration: f64,
    /// Torque cap for the drive motors (mNm), firmware default when unset
    pub max_torque: Option<f64>,
}

impl Default for DriveSettings {
    fn default() -> Self {
        Self {
            straight_speed: 500.0,
            straight_acceleration: 500.0,
            turn_rate: 500.0,
            turn_acceleration: 500.0,
            max_torque: None,
        }
    }
}

impl DriveSettings {
    /// Set the straight speed
    pub fn with_straight_speed(mut self, speed: f64) -> Self {
        self.straight_speed = speed;
        self
    }

    /// Set the turn rate
    pub fn with_turn_rate(mut self, rate: f64) -> Self {
        self.turn_rate = rate;
        self
    }

    /// Set the turn acceleration
    pub fn with_turn_acceleration(mut self, acceleration: f64) -> Self {
        self.turn_acceleration = acceleration;
        self
    }

    /// Check that every limit is strictly positive
    pub fn validate(&self) -> Result<(), String> {
        let limits = [
            ("straight_speed", self.straight_speed),
            ("straight_acceleration", self.straight_acceleration),
            ("turn_rate", self.turn_rate),
            ("turn_acceleration", self.turn_acceleration),
        ];
        for (name, value) in limits {
            if !(value > 0.0) || !value.is_finite() {
                return Err(format!("{name} must be positive, got {value}"));
            }
        }
        if let Some(torque) = self.max_torque {
            if !(torque > 0.0) {
                return Err(format!("max_torque must be positive, got {torque}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Clockwise.sign(), 1.0);
        assert_eq!(Direction::Counterclockwise.sign(), -1.0);
    }

    #[test]
    fn test_default_settings_validate() {
        assert!(DriveSettings::default().validate().is_ok());
    }

    #[test]
    fn test_zero_speed_rejected() {
        let settings = DriveSettings::default().with_straight_speed(0.0);
        let err = settings.validate().unwrap_err();
        assert!(err.contains("straight_speed"));
    }

    #[test]
    fn test_nan_rejected() {
        let settings = DriveSettings::default().with_turn_rate(f64::NAN);
        assert!(settings.validate().is_err());
    }
}
