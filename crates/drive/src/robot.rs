//! Robot facade
//!
//! Owns every device handle for one robot build and turns motion intents
//! (mm, degrees, ms) into drive base and motor commands within the configured
//! limits. Drive moves run with gyro heading hold and put the drive settings
//! back after any per-move override.

use hubcore::{
    Clock, Color, DriveBase, DriveSettings, Hub, HubResult, Matrix, Motor, Platform, Stop,
};
use log::{debug, info, warn};

use crate::battery::{BatterySample, StatusTier};
use crate::config::{Implement, RobotConfig};
use crate::error::{RobotError, RobotResult};
use crate::heading::{AlignReport, HeadingTracker};
use crate::options::{MoveOptions, TurnOptions};

pub struct Robot<P: Platform> {
    config: RobotConfig,
    drive_base: P::DriveBase,
    implements: Vec<(Implement, P::Motor)>,
    hub: P::Hub,
    clock: P::Clock,
    heading: HeadingTracker,
    /// Multiplier on commanded turn angles for the active run
    turn_scale: f64,
}

impl<P: Platform> Robot<P> {
    /// Claim every device named in `config` from the platform
    pub fn new(platform: &mut P, config: RobotConfig) -> RobotResult<Self> {
        config.validate()?;

        let left = platform.motor(config.left_drive.port, config.left_drive.direction)?;
        let right = platform.motor(config.right_drive.port, config.right_drive.direction)?;
        let mut drive_base = platform.drive_base(left, right, config.wheel_diameter, config.axle_track)?;
        drive_base.set_settings(config.drive)?;
        drive_base.use_gyro(false);

        let mut implements = Vec::with_capacity(config.implements.len());
        for binding in &config.implements {
            let motor = platform.motor(binding.port, binding.direction)?;
            implements.push((binding.implement, motor));
        }

        let mut hub = platform.hub()?;
        hub.set_stop_button(config.stop_button);
        hub.reset_heading(0.0);

        info!(
            "robot ready: wheels {} mm, axle track {} mm, {} implement(s)",
            config.wheel_diameter,
            config.axle_track,
            implements.len()
        );

        Ok(Robot {
            drive_base,
            implements,
            hub,
            clock: platform.clock(),
            heading: HeadingTracker::new(0.0),
            turn_scale: 1.0,
            config,
        })
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    pub fn hub_mut(&mut self) -> &mut P::Hub {
        &mut self.hub
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn turn_scale(&self) -> f64 {
        self.turn_scale
    }

    /// Set the turn multiplier for the routine about to run
    pub fn set_turn_scale(&mut self, scale: f64) {
        self.turn_scale = scale;
    }

    pub fn heading(&self) -> f64 {
        self.hub.heading()
    }

    /// Heading the robot should face after every commanded turn so far
    pub fn target_heading(&self) -> f64 {
        self.heading.target()
    }

    /// Error between the tracked target and the IMU after the last blocking turn
    pub fn heading_error(&self) -> f64 {
        self.heading.last_error()
    }

    /// Zero the IMU and the tracked target
    pub fn reset_heading(&mut self) {
        self.hub.reset_heading(0.0);
        self.heading = HeadingTracker::new(0.0);
    }

    /// Run one drive base command with gyro hold and optional temporary settings
    fn with_drive<T>(
        &mut self,
        gyro: bool,
        settings: Option<DriveSettings>,
        motion: impl FnOnce(&mut P::DriveBase) -> HubResult<T>,
    ) -> RobotResult<T> {
        let saved = self.drive_base.settings();
        if let Some(settings) = settings {
            self.drive_base.set_settings(settings)?;
        }
        self.drive_base.use_gyro(gyro);
        let result = motion(&mut self.drive_base);
        self.drive_base.use_gyro(false);
        if settings.is_some() {
            self.drive_base.set_settings(saved)?;
        }
        Ok(result?)
    }

    // Drive

    /// Drive a signed distance (mm)
    pub fn drive_straight(&mut self, distance: f64, options: MoveOptions) -> RobotResult<()> {
        let settings = options
            .speed
            .map(|speed| self.drive_base.settings().with_straight_speed(speed));
        let gyro = self.config.gyro_during_moves;
        self.with_drive(gyro, settings, |db| db.straight(distance, options.then, options.wait))
    }

    /// Drive forward at `speed` (mm/s, default straight speed) for `duration_ms`, then stop
    pub fn drive_for(&mut self, duration_ms: u64, speed: Option<f64>) -> RobotResult<()> {
        let speed = speed.unwrap_or(self.config.drive.straight_speed);
        self.drive_base.use_gyro(self.config.gyro_during_moves);
        let started = self.drive_base.drive(speed, 0.0);
        if started.is_ok() {
            self.clock.wait(duration_ms);
        }
        self.drive_base.stop();
        self.drive_base.use_gyro(false);
        Ok(started?)
    }

    /// Constant-radius arc; negative angle drives backwards, negative radius bends left
    pub fn curve(&mut self, radius: f64, angle: f64, wait: bool) -> RobotResult<()> {
        let gyro = self.config.gyro_during_moves;
        self.with_drive(gyro, None, |db| db.curve(radius, angle, Stop::Hold, wait))?;
        self.heading.advance(angle * radius.signum());
        Ok(())
    }

    /// Rotate in place by `degrees` times the active turn multiplier.
    ///
    /// Returns the alignment outcome when `options.auto_align` is set. Alignment
    /// needs the turn to have finished, so it is skipped for non-blocking turns.
    pub fn turn_in_place(&mut self, degrees: f64, options: TurnOptions) -> RobotResult<Option<AlignReport>> {
        let scaled = degrees * self.turn_scale;
        let settings = options
            .speed
            .map(|rate| self.drive_base.settings().with_turn_rate(rate));
        self.with_drive(options.gyro, settings, |db| db.turn(scaled, options.then, options.wait))?;
        self.heading.advance(scaled);

        if !options.wait {
            if options.auto_align {
                debug!("skipping auto-align after a non-blocking turn");
            }
            return Ok(None);
        }

        let measured = self.hub.heading();
        let error = self.heading.record(measured);
        debug!(
            "turn {:.1} deg: heading {:.2}, target {:.2}, error {:.2}",
            scaled,
            measured,
            self.heading.target(),
            error
        );
        if options.auto_align {
            return self.align(options.gyro).map(Some);
        }
        Ok(None)
    }

    /// Apply corrective turns against the tracked heading error.
    ///
    /// Stops once the error is within tolerance or after the configured number
    /// of corrections, whichever comes first. Residual error is reported, not
    /// treated as a failure.
    pub fn align_heading(&mut self) -> RobotResult<AlignReport> {
        self.align(true)
    }

    fn align(&mut self, gyro: bool) -> RobotResult<AlignReport> {
        let align = self.config.auto_align;
        let saved = self.drive_base.settings();
        let boosted = saved
            .with_turn_rate(align.turn_rate)
            .with_turn_acceleration(align.turn_acceleration.max(saved.turn_acceleration));
        self.drive_base.set_settings(boosted)?;

        let corrected = self.correct_heading(gyro, align.max_iterations, align.tolerance);
        let restored = self.drive_base.set_settings(saved);
        let report = corrected?;
        restored?;

        if report.converged(align.tolerance) {
            debug!("aligned in {} correction(s), residual {:.2}", report.iterations, report.residual);
        } else {
            warn!(
                "heading still {:.2} deg off after {} correction(s)",
                report.residual, report.iterations
            );
        }
        Ok(report)
    }

    fn correct_heading(&mut self, gyro: bool, max_iterations: u32, tolerance: f64) -> RobotResult<AlignReport> {
        let mut error = self.heading.record(self.hub.heading());
        let mut iterations = 0;
        while iterations < max_iterations && error.abs() > tolerance {
            self.drive_base.use_gyro(gyro);
            let turned = self.drive_base.turn(error, Stop::Hold, true);
            self.drive_base.use_gyro(false);
            turned?;
            iterations += 1;
            error = self.heading.record(self.hub.heading());
        }
        Ok(AlignReport {
            iterations,
            residual: error,
        })
    }

    // Implements

    fn implement_mut(&mut self, which: Implement) -> RobotResult<&mut P::Motor> {
        self.implements
            .iter_mut()
            .find(|(id, _)| *id == which)
            .map(|(_, motor)| motor)
            .ok_or(RobotError::UnboundImplement(which))
    }

    /// Rotate an implement by a relative angle (deg)
    pub fn actuate_implement(&mut self, which: Implement, degrees: f64, options: MoveOptions) -> RobotResult<()> {
        let speed = options.speed.unwrap_or(self.config.implement_speed);
        let motor = self.implement_mut(which)?;
        motor.run_angle(speed, degrees, options.then, options.wait)?;
        Ok(())
    }

    /// Run an implement into its mechanical stop; returns the stall angle
    pub fn actuate_implement_until_stalled(&mut self, which: Implement, speed: f64, duty_limit: u8) -> RobotResult<f64> {
        let motor = self.implement_mut(which)?;
        let angle = motor.run_until_stalled(speed, Stop::Coast, duty_limit)?;
        debug!("{:?} implement stalled at {:.1} deg", which, angle);
        Ok(angle)
    }

    /// Home an implement with the configured speed and duty limit
    pub fn home_implement(&mut self, which: Implement) -> RobotResult<f64> {
        let (speed, duty_limit) = (self.config.implement_speed, self.config.duty_limit);
        self.actuate_implement_until_stalled(which, speed, duty_limit)
    }

    pub fn implement_angle(&mut self, which: Implement) -> RobotResult<f64> {
        Ok(self.implement_mut(which)?.angle())
    }

    /// Spin every motor through the park gesture. All but the last return
    /// immediately, so the call blocks for roughly one gesture.
    pub fn park_all_motors(&mut self) -> RobotResult<()> {
        let park = self.config.park;
        self.drive_base.stop();
        let (left, right) = self.drive_base.motors_mut();
        let mut motors: Vec<&mut P::Motor> = vec![left, right];
        motors.extend(self.implements.iter_mut().map(|(_, motor)| motor));

        let last = motors.len() - 1;
        for (i, motor) in motors.into_iter().enumerate() {
            motor.run_angle(park.speed, park.angle, Stop::Coast, i == last)?;
        }
        info!("parked {} motors", last + 1);
        Ok(())
    }

    // Status

    pub fn set_status_light(&mut self, color: Color) {
        self.hub.light_off();
        self.hub.light_on(color);
    }

    pub fn display_number(&mut self, number: i32) {
        self.hub.display_off();
        self.hub.display_number(number);
    }

    /// Busy color plus a looping matrix animation
    pub fn show_busy(&mut self, frames: &[Matrix], interval_ms: u64) {
        let busy = self.config.busy_color;
        self.set_status_light(busy);
        self.hub.display_animate(frames, interval_ms);
    }

    /// Read the battery, log it and show its tier color
    pub fn sample_battery_percent(&mut self) -> BatterySample {
        let voltage = self.hub.battery_voltage();
        let sample = self.config.battery.sample(voltage);
        info!("Battery %: {:.1}, Voltage: {} mV", sample.percent, sample.voltage_mv);
        match sample.tier {
            StatusTier::Normal => {}
            StatusTier::Warning => warn!(
                "Battery is below {:.0}%, please charge!",
                self.config.battery.warning_below
            ),
            StatusTier::Critical => warn!("EMERGENCY: BATTERY LOW!"),
        }
        self.set_status_light(sample.color);
        sample
    }
}
