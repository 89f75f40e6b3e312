use hubcore::{Button, Clock, Color, Hub, HubResult, Matrix};
use log::debug;

use crate::menu::MenuSource;
use crate::world::{HubEvent, Shared};

/// Simulated hub: records what it shows and reads the world's heading and battery
pub struct SimHub {
    world: Shared,
    menu: Box<dyn MenuSource>,
    heading_offset: f64,
}

impl SimHub {
    pub(crate) fn new(world: Shared, menu: Box<dyn MenuSource>) -> Self {
        SimHub {
            world,
            menu,
            heading_offset: 0.0,
        }
    }
}

impl Hub for SimHub {
    fn light_on(&mut self, color: Color) {
        let mut world = self.world.borrow_mut();
        world.light = Some(color);
        world.record(HubEvent::Light(Some(color)));
    }

    fn light_off(&mut self) {
        let mut world = self.world.borrow_mut();
        world.light = None;
        world.record(HubEvent::Light(None));
    }

    fn display_number(&mut self, number: i32) {
        self.world.borrow_mut().record(HubEvent::Number(number));
    }

    fn display_off(&mut self) {
        self.world.borrow_mut().record(HubEvent::DisplayOff);
    }

    fn display_animate(&mut self, frames: &[Matrix], interval_ms: u64) {
        self.world.borrow_mut().record(HubEvent::Animation {
            frames: frames.len(),
            interval_ms,
        });
    }

    fn battery_voltage(&self) -> u32 {
        self.world.borrow().battery.voltage_mv()
    }

    fn heading(&self) -> f64 {
        self.world.borrow().heading - self.heading_offset
    }

    fn reset_heading(&mut self, angle: f64) {
        self.heading_offset = self.world.borrow().heading - angle;
    }

    fn set_stop_button(&mut self, button: Button) {
        self.world.borrow_mut().record(HubEvent::StopButton(button));
    }

    fn menu(&mut self, options: &[&str]) -> HubResult<String> {
        let pick = self.menu.choose(options)?;
        debug!("menu {:?} -> {}", options, pick);
        Ok(pick)
    }
}

/// Virtual clock shared with the other simulated handles
#[derive(Clone)]
pub struct SimClock {
    world: Shared,
}

impl SimClock {
    pub(crate) fn new(world: Shared) -> Self {
        SimClock { world }
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u64 {
        self.world.borrow().time_ms as u64
    }

    fn wait(&self, ms: u64) {
        let mut world = self.world.borrow_mut();
        let until = world.time_ms + ms as f64;
        world.advance_to(until);
    }
}
