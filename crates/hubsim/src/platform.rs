use hubcore::{Color, Direction, HubError, HubResult, Platform, Port, Stop};
use log::{debug, info};

use crate::drivebase::SimDriveBase;
use crate::hub::{SimClock, SimHub};
use crate::menu::{MenuSource, ScriptedMenu};
use crate::motor::SimMotor;
use crate::world::{HubEvent, Pose, Shared, SimConfig, World};

/// Desktop stand-in for the hub firmware
pub struct SimPlatform {
    world: Shared,
    menu: Option<Box<dyn MenuSource>>,
}

impl SimPlatform {
    /// Platform whose menu closes immediately
    pub fn new(config: SimConfig) -> Self {
        info!("simulated hub, seed {}", config.seed);
        SimPlatform {
            world: World::shared(config),
            menu: Some(Box::new(ScriptedMenu::default())),
        }
    }

    /// Set where menu picks come from
    pub fn with_menu(mut self, menu: impl MenuSource + 'static) -> Self {
        self.menu = Some(Box::new(menu));
        self
    }

    /// Read-only view of the world for logging and tests
    pub fn probe(&self) -> SimProbe {
        SimProbe {
            world: self.world.clone(),
        }
    }
}

impl Platform for SimPlatform {
    type Motor = SimMotor;
    type DriveBase = SimDriveBase;
    type Hub = SimHub;
    type Clock = SimClock;

    fn motor(&mut self, port: Port, direction: Direction) -> HubResult<SimMotor> {
        if !self.world.borrow_mut().claimed.insert(port) {
            return Err(HubError::PortInUse(port));
        }
        debug!("claimed motor on port {} ({:?})", port, direction);
        Ok(SimMotor::new(self.world.clone(), port, direction))
    }

    fn drive_base(
        &mut self,
        left: SimMotor,
        right: SimMotor,
        wheel_diameter: f64,
        axle_track: f64,
    ) -> HubResult<SimDriveBase> {
        SimDriveBase::new(self.world.clone(), left, right, wheel_diameter, axle_track)
    }

    fn hub(&mut self) -> HubResult<SimHub> {
        let menu = self
            .menu
            .take()
            .ok_or_else(|| HubError::DeviceClaimed("hub".to_string()))?;
        self.world.borrow_mut().hub_claimed = true;
        Ok(SimHub::new(self.world.clone(), menu))
    }

    fn clock(&self) -> SimClock {
        SimClock::new(self.world.clone())
    }
}

/// Shared handle onto the simulated world
#[derive(Clone)]
pub struct SimProbe {
    world: Shared,
}

impl SimProbe {
    pub fn time_ms(&self) -> f64 {
        self.world.borrow().time_ms
    }

    pub fn pose(&self) -> Pose {
        self.world.borrow().pose()
    }

    pub fn light(&self) -> Option<Color> {
        self.world.borrow().light
    }

    pub fn events(&self) -> Vec<HubEvent> {
        self.world.borrow().events.clone()
    }

    pub fn battery_mv(&self) -> u32 {
        self.world.borrow().battery.voltage_mv()
    }

    pub fn state_of_charge(&self) -> f64 {
        self.world.borrow().battery.state_of_charge()
    }

    /// Pin the battery reading, `None` returns to the charge model
    pub fn force_battery_mv(&self, voltage_mv: Option<u32>) {
        self.world.borrow_mut().battery.force_voltage(voltage_mv);
    }

    pub fn hub_claimed(&self) -> bool {
        self.world.borrow().hub_claimed
    }

    pub fn claimed_ports(&self) -> Vec<Port> {
        self.world.borrow().claimed.iter().copied().collect()
    }

    /// Stop behaviour of the latest command on `port`
    pub fn stop_mode(&self, port: Port) -> Option<Stop> {
        self.world.borrow().stop_modes.get(&port).copied()
    }

    /// Turn every future rotation error into a fixed slip fraction
    pub fn set_turn_slip(&self, slip: f64) {
        self.world.borrow_mut().config.turn_slip = slip;
    }

    pub fn set_gyro_noise(&self, noise: f64) {
        self.world.borrow_mut().config.gyro_noise = noise;
    }
}
