//! Simulated differential drive
//!
//! Moves are committed to the world pose when they are issued; the clock only
//! advances for blocking calls. Each move runs a trapezoidal speed profile to
//! size its duration and spins the wheel motors by the matching angle.
//! Without the gyro, turns lose a fraction of their rotation to wheel slip.

use std::f64::consts::PI;

use hubcore::{DriveBase, DriveSettings, HubError, HubResult, Motor, Stop};
use log::{debug, warn};

use crate::motor::SimMotor;
use crate::world::{Shared, World};

/// Time (ms) to cover `distance` starting and ending at rest
pub fn profile_duration_ms(distance: f64, speed: f64, acceleration: f64) -> f64 {
    let d = distance.abs();
    if d == 0.0 || speed <= 0.0 || acceleration <= 0.0 {
        return 0.0;
    }
    if d >= speed * speed / acceleration {
        // accelerate, cruise, decelerate
        (d / speed + speed / acceleration) * 1000.0
    } else {
        // triangular profile, never reaches cruise speed
        2.0 * (d / acceleration).sqrt() * 1000.0
    }
}

#[derive(Debug, Clone, Copy)]
struct Cruise {
    speed: f64,
    turn_rate: f64,
    since_ms: f64,
}

#[derive(Debug)]
pub struct SimDriveBase {
    world: Shared,
    left: SimMotor,
    right: SimMotor,
    wheel_diameter: f64,
    axle_track: f64,
    settings: DriveSettings,
    gyro: bool,
    busy_until: f64,
    cruise: Option<Cruise>,
}

impl SimDriveBase {
    pub(crate) fn new(
        world: Shared,
        left: SimMotor,
        right: SimMotor,
        wheel_diameter: f64,
        axle_track: f64,
    ) -> HubResult<Self> {
        if !(wheel_diameter > 0.0) || !(axle_track > 0.0) {
            return Err(HubError::InvalidArgument(format!(
                "wheel diameter {wheel_diameter} and axle track {axle_track} must be positive"
            )));
        }
        debug!(
            "drive base on {} ({:?}) / {} ({:?})",
            left.port(),
            left.direction(),
            right.port(),
            right.direction()
        );
        let now = world.borrow().time_ms;
        Ok(SimDriveBase {
            world,
            left,
            right,
            wheel_diameter,
            axle_track,
            settings: DriveSettings::default(),
            gyro: false,
            busy_until: now,
            cruise: None,
        })
    }

    fn now(&self) -> f64 {
        self.world.borrow().time_ms
    }

    /// Wheel rotation (deg) for a linear travel (mm)
    fn wheel_degrees(&self, travel: f64) -> f64 {
        travel / (PI * self.wheel_diameter) * 360.0
    }

    /// Fold an open-ended `drive` into the pose up to now
    fn settle_cruise(&mut self) {
        let Some(cruise) = self.cruise.take() else {
            return;
        };
        let now = self.now();
        let seconds = (now - cruise.since_ms).max(0.0) / 1000.0;
        let travel = cruise.speed * seconds;
        let rotation = cruise.turn_rate * seconds;
        {
            let mut world = self.world.borrow_mut();
            let mid = world.heading + rotation / 2.0;
            world.position += World::facing(mid) * travel;
            world.heading += rotation;
        }
        let spin = self.axle_track * rotation / self.wheel_diameter;
        let travel_deg = self.wheel_degrees(travel);
        self.left.begin(travel_deg + spin, 0.0, false);
        self.right.begin(travel_deg - spin, 0.0, false);
        self.busy_until = now;
    }

    /// Rotation that actually happens for a commanded one
    fn realised_rotation(&self, commanded: f64) -> f64 {
        let mut world = self.world.borrow_mut();
        let noise = world.config.gyro_noise;
        let slip = world.config.turn_slip;
        if self.gyro {
            commanded + world.noise(noise)
        } else {
            commanded * (1.0 - slip) + world.noise(noise * 2.0)
        }
    }

    fn finish(&mut self, left_deg: f64, right_deg: f64, duration: f64, then: Stop, wait: bool) {
        self.left.set_stop(then);
        self.right.set_stop(then);
        self.left.begin(left_deg, duration, false);
        self.right.begin(right_deg, duration, false);
        self.busy_until = self.now() + duration;
        if wait {
            let until = self.busy_until;
            self.world.borrow_mut().advance_to(until);
        }
    }
}

fn check_finite(name: &str, values: &[f64]) -> HubResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(HubError::InvalidArgument(format!("{name}{values:?}")))
    }
}

impl DriveBase for SimDriveBase {
    type Motor = SimMotor;

    fn settings(&self) -> DriveSettings {
        self.settings
    }

    fn set_settings(&mut self, settings: DriveSettings) -> HubResult<()> {
        settings.validate().map_err(HubError::InvalidArgument)?;
        self.settings = settings;
        Ok(())
    }

    fn use_gyro(&mut self, enabled: bool) {
        self.gyro = enabled;
    }

    fn straight(&mut self, distance: f64, then: Stop, wait: bool) -> HubResult<()> {
        check_finite("straight", &[distance])?;
        self.settle_cruise();
        let duration = profile_duration_ms(
            distance,
            self.settings.straight_speed,
            self.settings.straight_acceleration,
        );
        {
            let mut world = self.world.borrow_mut();
            let facing = World::facing(world.heading);
            world.position += facing * distance;
        }
        let wheel = self.wheel_degrees(distance);
        self.finish(wheel, wheel, duration, then, wait);
        Ok(())
    }

    fn turn(&mut self, angle: f64, then: Stop, wait: bool) -> HubResult<()> {
        check_finite("turn", &[angle])?;
        self.settle_cruise();
        let duration = profile_duration_ms(angle, self.settings.turn_rate, self.settings.turn_acceleration);
        let actual = self.realised_rotation(angle);
        self.world.borrow_mut().heading += actual;
        debug!("turn: commanded {:.2} deg, realised {:.2} deg", angle, actual);

        let spin = self.axle_track * angle / self.wheel_diameter;
        self.finish(spin, -spin, duration, then, wait);
        Ok(())
    }

    fn curve(&mut self, radius: f64, angle: f64, then: Stop, wait: bool) -> HubResult<()> {
        check_finite("curve", &[radius, angle])?;
        self.settle_cruise();
        let arc = radius.abs() * angle.abs().to_radians();
        let duration = profile_duration_ms(arc, self.settings.straight_speed, self.settings.straight_acceleration);

        // negative angle drives backwards, negative radius bends left
        let direction = angle.signum();
        let rotation = self.realised_rotation(angle * radius.signum());
        let chord = 2.0 * radius.abs() * (rotation.abs().to_radians() / 2.0).sin();
        {
            let mut world = self.world.borrow_mut();
            let mid = world.heading + rotation / 2.0;
            world.position += World::facing(mid) * chord * direction;
            world.heading += rotation;
        }

        let half = self.axle_track / 2.0;
        let outer = self.wheel_degrees((radius.abs() + half) * angle.abs().to_radians()) * direction;
        let inner = self.wheel_degrees((radius.abs() - half) * angle.abs().to_radians()) * direction;
        if radius >= 0.0 {
            self.finish(outer, inner, duration, then, wait);
        } else {
            self.finish(inner, outer, duration, then, wait);
        }
        Ok(())
    }

    fn drive(&mut self, speed: f64, turn_rate: f64) -> HubResult<()> {
        check_finite("drive", &[speed, turn_rate])?;
        self.settle_cruise();
        if speed.abs() > self.settings.straight_speed * 2.0 {
            warn!("drive speed {speed} mm/s is well above the configured {}", self.settings.straight_speed);
        }
        let now = self.now();
        self.cruise = Some(Cruise {
            speed,
            turn_rate,
            since_ms: now,
        });
        self.busy_until = f64::INFINITY;
        Ok(())
    }

    fn stop(&mut self) {
        self.settle_cruise();
        self.busy_until = self.now();
        self.left.stop();
        self.right.stop();
    }

    fn done(&self) -> bool {
        self.cruise.is_none() && self.now() >= self.busy_until
    }

    fn motors_mut(&mut self) -> (&mut SimMotor, &mut SimMotor) {
        (&mut self.left, &mut self.right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::SimConfig;
    use approx::assert_abs_diff_eq;
    use hubcore::{Direction, Port};

    fn drive_base(config: SimConfig) -> (Shared, SimDriveBase) {
        let world = World::shared(config);
        let left = SimMotor::new(world.clone(), Port::A, Direction::Counterclockwise);
        let right = SimMotor::new(world.clone(), Port::B, Direction::Clockwise);
        let db = SimDriveBase::new(world.clone(), left, right, 56.0, 105.0).unwrap();
        (world, db)
    }

    fn quiet() -> SimConfig {
        SimConfig {
            gyro_noise: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_profile_trapezoid() {
        // 1000 mm at 500 mm/s, 500 mm/s²: 2 s cruise-equivalent + 1 s ramps
        assert_abs_diff_eq!(profile_duration_ms(1000.0, 500.0, 500.0), 3000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_profile_triangle() {
        // 125 mm never reaches 500 mm/s: 2 * sqrt(125 / 500) s
        assert_abs_diff_eq!(profile_duration_ms(125.0, 500.0, 500.0), 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_profile_sign_independent() {
        assert_eq!(
            profile_duration_ms(-350.0, 500.0, 500.0),
            profile_duration_ms(350.0, 500.0, 500.0)
        );
    }

    #[test]
    fn test_straight_moves_forward() {
        let (world, mut db) = drive_base(quiet());
        db.straight(350.0, Stop::Hold, true).unwrap();
        let pose = world.borrow().pose();
        assert_abs_diff_eq!(pose.x, 350.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pose.y, 0.0, epsilon = 1e-9);
        assert!(db.done());
    }

    #[test]
    fn test_non_blocking_straight_leaves_clock() {
        let (world, mut db) = drive_base(quiet());
        db.straight(350.0, Stop::Hold, false).unwrap();
        assert_eq!(world.borrow().time_ms, 0.0);
        assert!(!db.done());
    }

    #[test]
    fn test_gyro_turn_is_exact_without_noise() {
        let (world, mut db) = drive_base(quiet());
        db.use_gyro(true);
        db.turn(45.0, Stop::Hold, true).unwrap();
        assert_abs_diff_eq!(world.borrow().heading, 45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_turn_without_gyro_slips() {
        let (world, mut db) = drive_base(quiet());
        db.turn(90.0, Stop::Hold, true).unwrap();
        assert_abs_diff_eq!(world.borrow().heading, 90.0 * 0.96, epsilon = 1e-9);
    }

    #[test]
    fn test_turn_spins_wheels_opposite() {
        let (_world, mut db) = drive_base(quiet());
        db.turn(90.0, Stop::Hold, true).unwrap();
        let (left, right) = db.motors_mut();
        assert!(left.angle() > 0.0);
        assert_abs_diff_eq!(left.angle(), -right.angle(), epsilon = 1e-9);
    }

    #[test]
    fn test_cruise_settles_on_stop() {
        let (world, mut db) = drive_base(quiet());
        db.drive(200.0, 0.0).unwrap();
        assert!(!db.done());
        world.borrow_mut().advance_to(3000.0);
        db.stop();
        assert_abs_diff_eq!(world.borrow().pose().x, 600.0, epsilon = 1e-9);
        assert!(db.done());
    }

    #[test]
    fn test_curve_quarter_circle() {
        let (world, mut db) = drive_base(quiet());
        db.use_gyro(true);
        db.curve(100.0, 90.0, Stop::Hold, true).unwrap();
        let pose = world.borrow().pose();
        assert_abs_diff_eq!(pose.heading, 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pose.x, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pose.y, -100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_curve_backwards_reverses_heading() {
        let (world, mut db) = drive_base(quiet());
        db.use_gyro(true);
        db.curve(100.0, -90.0, Stop::Hold, true).unwrap();
        let pose = world.borrow().pose();
        assert_abs_diff_eq!(pose.heading, -90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pose.x, -100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pose.y, -100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_bad_settings() {
        let (_world, mut db) = drive_base(quiet());
        let bad = DriveSettings::default().with_turn_rate(-5.0);
        assert!(db.set_settings(bad).is_err());
        assert_eq!(db.settings(), DriveSettings::default());
    }
}
