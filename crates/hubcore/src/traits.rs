use crate::error::HubResult;
use crate::matrix::Matrix;
use crate::types::{Button, Color, Direction, DriveSettings, Port, Stop};

// Actuator Traits

/// A single motor with a rotation sensor.
///
/// Angles are in degrees, speeds in deg/s, both in the motor's own positive
/// direction as configured when the handle was claimed.
pub trait Motor {
    /// Rotate by `rotation_angle` at `speed`. The sign of `speed * rotation_angle`
    /// picks the direction. Returns immediately unless `wait` is set.
    fn run_angle(&mut self, speed: f64, rotation_angle: f64, then: Stop, wait: bool) -> HubResult<()>;

    /// Run at `speed` until the duty cycle needed to keep moving exceeds
    /// `duty_limit` percent. Blocks and returns the angle where it stalled.
    fn run_until_stalled(&mut self, speed: f64, then: Stop, duty_limit: u8) -> HubResult<f64>;

    fn angle(&self) -> f64;

    fn reset_angle(&mut self, angle: f64);

    fn stop(&mut self);

    /// Whether the last commanded motion has completed
    fn done(&self) -> bool;
}

/// Two drive motors plus wheel geometry, with optional gyro heading hold.
///
/// Distances in mm, angles in degrees.
pub trait DriveBase {
    type Motor: Motor;

    fn settings(&self) -> DriveSettings;

    fn set_settings(&mut self, settings: DriveSettings) -> HubResult<()>;

    /// Enable or disable gyro feedback for heading during moves
    fn use_gyro(&mut self, enabled: bool);

    fn straight(&mut self, distance: f64, then: Stop, wait: bool) -> HubResult<()>;

    fn turn(&mut self, angle: f64, then: Stop, wait: bool) -> HubResult<()>;

    fn curve(&mut self, radius: f64, angle: f64, then: Stop, wait: bool) -> HubResult<()>;

    /// Start driving at `speed` mm/s and `turn_rate` deg/s until `stop` is called
    fn drive(&mut self, speed: f64, turn_rate: f64) -> HubResult<()>;

    fn stop(&mut self);

    fn done(&self) -> bool;

    /// The left and right wheel motors, for moves outside the drive base
    fn motors_mut(&mut self) -> (&mut Self::Motor, &mut Self::Motor);
}

// Hub Traits

/// The programmable brick itself: light, display, battery, IMU and menu buttons
pub trait Hub {
    fn light_on(&mut self, color: Color);

    fn light_off(&mut self);

    fn display_number(&mut self, number: i32);

    fn display_off(&mut self);

    /// Loop `frames` on the light matrix in the background
    fn display_animate(&mut self, frames: &[Matrix], interval_ms: u64);

    /// Battery voltage in mV
    fn battery_voltage(&self) -> u32;

    /// Heading in degrees, counterclockwise negative, not wrapped
    fn heading(&self) -> f64;

    fn reset_heading(&mut self, angle: f64);

    /// Button that aborts the program instead of the default center button
    fn set_stop_button(&mut self, button: Button);

    /// Show `options` and block until the user picks one
    fn menu(&mut self, options: &[&str]) -> HubResult<String>;
}

/// Monotonic millisecond clock with a blocking wait
pub trait Clock {
    fn now_ms(&self) -> u64;

    fn wait(&self, ms: u64);
}

// Platform

/// Source of device handles. Each port can be claimed once.
pub trait Platform {
    type Motor: Motor;
    type DriveBase: DriveBase<Motor = Self::Motor>;
    type Hub: Hub;
    type Clock: Clock;

    fn motor(&mut self, port: Port, direction: Direction) -> HubResult<Self::Motor>;

    fn drive_base(
        &mut self,
        left: Self::Motor,
        right: Self::Motor,
        wheel_diameter: f64,
        axle_track: f64,
    ) -> HubResult<Self::DriveBase>;

    fn hub(&mut self) -> HubResult<Self::Hub>;

    fn clock(&self) -> Self::Clock;
}
