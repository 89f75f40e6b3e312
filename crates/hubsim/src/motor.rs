use hubcore::{Direction, HubError, HubResult, Motor, Port, Stop};
use log::debug;

use crate::world::Shared;

/// Linear move of the shaft between two angles over a time window
#[derive(Debug, Clone, Copy)]
struct Segment {
    from: f64,
    to: f64,
    start_ms: f64,
    end_ms: f64,
}

impl Segment {
    fn rest(angle: f64, now: f64) -> Self {
        Segment {
            from: angle,
            to: angle,
            start_ms: now,
            end_ms: now,
        }
    }

    fn at(&self, t_ms: f64) -> f64 {
        if t_ms >= self.end_ms || self.end_ms <= self.start_ms {
            self.to
        } else if t_ms <= self.start_ms {
            self.from
        } else {
            let progress = (t_ms - self.start_ms) / (self.end_ms - self.start_ms);
            self.from + (self.to - self.from) * progress
        }
    }
}

/// Simulated motor. Motion is resolved against the shared clock, so a
/// non-blocking command keeps "moving" while other handles advance time.
#[derive(Debug)]
pub struct SimMotor {
    world: Shared,
    port: Port,
    direction: Direction,
    segment: Segment,
    /// Physical angle that reads as zero after `reset_angle`
    zero: f64,
}

impl SimMotor {
    pub(crate) fn new(world: Shared, port: Port, direction: Direction) -> Self {
        let now = world.borrow().time_ms;
        SimMotor {
            world,
            port,
            direction,
            segment: Segment::rest(0.0, now),
            zero: 0.0,
        }
    }

    pub fn port(&self) -> Port {
        self.port
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Record what the shaft does once the current command completes
    pub(crate) fn set_stop(&self, then: Stop) {
        self.world.borrow_mut().stop_modes.insert(self.port, then);
    }

    fn now(&self) -> f64 {
        self.world.borrow().time_ms
    }

    fn physical_angle(&self) -> f64 {
        self.segment.at(self.now())
    }

    /// Start a relative move of `delta` degrees lasting `duration_ms`, clipped
    /// at the end stops. Returns the completion time.
    pub(crate) fn begin(&mut self, delta: f64, duration_ms: f64, wait: bool) -> f64 {
        let now = self.now();
        let from = self.physical_angle();
        let mut to = from + delta;
        let mut duration = duration_ms.max(0.0);

        if let Some((min, max)) = self.world.borrow().hard_stop(self.port) {
            let clipped = to.clamp(min, max);
            if delta != 0.0 && clipped != to {
                duration *= ((clipped - from) / delta).abs();
            }
            to = clipped;
        }

        self.segment = Segment {
            from,
            to,
            start_ms: now,
            end_ms: now + duration,
        };

        let mut world = self.world.borrow_mut();
        world.battery.discharge(1, duration);
        if wait {
            world.advance_to(self.segment.end_ms);
        }
        self.segment.end_ms
    }
}

impl Motor for SimMotor {
    fn run_angle(&mut self, speed: f64, rotation_angle: f64, then: Stop, wait: bool) -> HubResult<()> {
        if !speed.is_finite() || !rotation_angle.is_finite() {
            return Err(HubError::InvalidArgument(format!(
                "run_angle({speed}, {rotation_angle}) on port {}",
                self.port
            )));
        }
        self.set_stop(then);
        if speed == 0.0 || rotation_angle == 0.0 {
            return Ok(());
        }

        let max_speed = self.world.borrow().config.max_motor_speed;
        let rate = speed.abs().min(max_speed);
        let delta = rotation_angle.abs() * (speed * rotation_angle).signum();
        let duration = rotation_angle.abs() / rate * 1000.0;

        debug!("motor {}: run_angle {:.1} deg at {:.0} deg/s", self.port, delta, rate);
        self.begin(delta, duration, wait);
        Ok(())
    }

    fn run_until_stalled(&mut self, speed: f64, then: Stop, duty_limit: u8) -> HubResult<f64> {
        if duty_limit == 0 || duty_limit > 100 {
            return Err(HubError::InvalidArgument(format!(
                "duty limit {duty_limit} outside 1..=100"
            )));
        }
        if speed == 0.0 || !speed.is_finite() {
            return Err(HubError::InvalidArgument(format!(
                "run_until_stalled needs a nonzero speed, got {speed}"
            )));
        }
        self.set_stop(then);

        let (limit, max_speed, detect_ms) = {
            let world = self.world.borrow();
            let limit = world
                .hard_stop(self.port)
                .map(|(min, max)| if speed > 0.0 { max } else { min });
            (limit, world.config.max_motor_speed, world.config.stall_detect_ms)
        };
        let limit = limit.ok_or(HubError::NoStall(self.port))?;

        let from = self.physical_angle();
        let rate = speed.abs().min(max_speed);
        let travel = limit - from;
        // already pushing against the stop in the commanded direction
        let travel = if travel * speed < 0.0 { 0.0 } else { travel };
        let duration = travel.abs() / rate * 1000.0 + detect_ms * f64::from(duty_limit) / 100.0;

        self.segment = Segment {
            from,
            to: from + travel,
            start_ms: self.now(),
            end_ms: self.now() + duration,
        };
        {
            let mut world = self.world.borrow_mut();
            world.battery.discharge(1, duration);
            world.advance_to(self.segment.end_ms);
        }

        debug!("motor {}: stalled at {:.1} deg", self.port, self.angle());
        Ok(self.angle())
    }

    fn angle(&self) -> f64 {
        self.physical_angle() - self.zero
    }

    fn reset_angle(&mut self, angle: f64) {
        self.zero = self.physical_angle() - angle;
    }

    fn stop(&mut self) {
        let now = self.now();
        self.segment = Segment::rest(self.segment.at(now), now);
    }

    fn done(&self) -> bool {
        self.now() >= self.segment.end_ms
    }
}
