//! Shared simulation state
//!
//! Every simulated handle holds a reference to one `World`: the virtual clock,
//! the true robot pose, the battery and a log of what the hub showed.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::Path;
use std::rc::Rc;

use hubcore::{Button, Color, Port, Stop};
use nalgebra::{Rotation2, Vector2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::battery::{BatteryConfig, SimBattery};

pub(crate) type Shared = Rc<RefCell<World>>;

/// Mechanical end stop on an implement motor, in degrees from power-on
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HardStop {
    pub port: Port,
    pub min: f64,
    pub max: f64,
}

/// Tuning for the simulated hub
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for slip and gyro noise
    pub seed: u64,
    /// Fraction of commanded rotation lost to wheel slip when the gyro is off
    pub turn_slip: f64,
    /// Largest random heading error (deg) left after a turn
    pub gyro_noise: f64,
    /// Motor speed ceiling (deg/s)
    pub max_motor_speed: f64,
    /// Time to detect a stall at 100% duty limit (ms)
    pub stall_detect_ms: f64,
    pub hard_stops: Vec<HardStop>,
    pub battery: BatteryConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            seed: 7,
            turn_slip: 0.04,
            gyro_noise: 0.3,
            max_motor_speed: 1000.0,
            stall_detect_ms: 200.0,
            hard_stops: vec![
                HardStop { port: Port::E, min: -180.0, max: 180.0 },
                HardStop { port: Port::F, min: -120.0, max: 120.0 },
            ],
            battery: BatteryConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(io::Error::from)
    }
}

/// Something the hub displayed, in order
#[derive(Debug, Clone, PartialEq)]
pub enum HubEvent {
    Light(Option<Color>),
    Number(i32),
    DisplayOff,
    Animation { frames: usize, interval_ms: u64 },
    StopButton(Button),
}

/// True planar pose of the robot: mm and degrees, clockwise positive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

#[derive(Debug)]
pub(crate) struct World {
    pub time_ms: f64,
    pub heading: f64,
    pub position: Vector2<f64>,
    pub battery: SimBattery,
    pub claimed: BTreeSet<Port>,
    /// What each motor does after its latest command
    pub stop_modes: BTreeMap<Port, Stop>,
    pub hub_claimed: bool,
    pub light: Option<Color>,
    pub events: Vec<HubEvent>,
    pub rng: StdRng,
    pub config: SimConfig,
}

impl World {
    pub fn new(config: SimConfig) -> Self {
        World {
            time_ms: 0.0,
            heading: 0.0,
            position: Vector2::zeros(),
            battery: SimBattery::new(config.battery),
            claimed: BTreeSet::new(),
            stop_modes: BTreeMap::new(),
            hub_claimed: false,
            light: None,
            events: Vec::new(),
            rng: StdRng::seed_from_u64(config.seed),
            config,
        }
    }

    pub fn shared(config: SimConfig) -> Shared {
        Rc::new(RefCell::new(World::new(config)))
    }

    /// Move the clock forward to `t_ms`; idle draw covers the gap
    pub fn advance_to(&mut self, t_ms: f64) {
        if t_ms > self.time_ms {
            self.battery.discharge(0, t_ms - self.time_ms);
            self.time_ms = t_ms;
        }
    }

    /// Unit vector the robot faces at `heading` degrees
    pub fn facing(heading: f64) -> Vector2<f64> {
        Rotation2::new(-heading.to_radians()) * Vector2::x()
    }

    /// Uniform noise in `[-amplitude, amplitude]`
    pub fn noise(&mut self, amplitude: f64) -> f64 {
        if amplitude > 0.0 {
            self.rng.gen_range(-amplitude..=amplitude)
        } else {
            0.0
        }
    }

    pub fn hard_stop(&self, port: Port) -> Option<(f64, f64)> {
        self.config
            .hard_stops
            .iter()
            .find(|stop| stop.port == port)
            .map(|stop| (stop.min, stop.max))
    }

    pub fn record(&mut self, event: HubEvent) {
        self.events.push(event);
    }

    pub fn pose(&self) -> Pose {
        Pose {
            x: self.position.x,
            y: self.position.y,
            heading: self.heading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_facing_quarter_turn() {
        let ahead = World::facing(0.0);
        assert_abs_diff_eq!(ahead.x, 1.0, epsilon = 1e-12);
        let right = World::facing(90.0);
        assert_abs_diff_eq!(right.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(right.y, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_clock_never_moves_backwards() {
        let mut world = World::new(SimConfig::default());
        world.advance_to(500.0);
        world.advance_to(100.0);
        assert_eq!(world.time_ms, 500.0);
    }

    #[test]
    fn test_blocking_motor_hour_draws_idle_and_motor() {
        let mut world = World::new(SimConfig::default());
        let before = world.battery.state_of_charge();
        world.battery.discharge(1, 3_600_000.0);
        world.advance_to(3_600_000.0);
        // 300 mA motor on top of 70 mA idle, out of 2100 mAh
        assert_abs_diff_eq!(before - world.battery.state_of_charge(), 370.0 / 2100.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_noise_is_exact() {
        let mut world = World::new(SimConfig::default());
        assert_eq!(world.noise(0.0), 0.0);
        let n = world.noise(0.5);
        assert!(n.abs() <= 0.5);
    }
}
