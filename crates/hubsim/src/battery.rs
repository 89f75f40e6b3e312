//! Hub battery model
//!
//! A two-cell Li-ion pack tracked by state of charge. Open-circuit voltage
//! follows a piecewise Hermite curve through three anchors; charge is drawn by
//! an idle baseline plus a fixed current per moving motor.

use serde::{Deserialize, Serialize};

/// Battery parameters for the simulated hub
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryConfig {
    /// State of charge at power-on (0.0 to 1.0)
    pub initial_soc: f64,
    pub rated_capacity_mah: f64,
    /// Draw with every motor idle (mA)
    pub idle_current_ma: f64,
    /// Additional draw per moving motor (mA)
    pub motor_current_ma: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        BatteryConfig {
            initial_soc: 0.9,
            rated_capacity_mah: 2100.0,
            idle_current_ma: 70.0,
            motor_current_ma: 300.0,
        }
    }
}

/// Pack open-circuit voltage (V) for a state of charge
pub fn pack_ocv_from_soc(soc: f64) -> f64 {
    let s = soc.clamp(0.0, 1.0);

    const X0: f64 = 0.0;
    const X1: f64 = 0.5;
    const X2: f64 = 1.0;

    const Y0: f64 = 6.80;
    const Y1: f64 = 7.45;
    const Y2: f64 = 8.30;

    // slopes at the anchors, V per unit SoC
    const M0: f64 = 2.40;
    const M1: f64 = 1.10;
    const M2: f64 = 2.20;

    let (x0, x1, y0, y1, m0, m1) = if s <= X1 {
        (X0, X1, Y0, Y1, M0, M1)
    } else {
        (X1, X2, Y1, Y2, M1, M2)
    };

    let h = x1 - x0;
    let t = (s - x0) / h;
    let t2 = t * t;
    let t3 = t2 * t;

    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    h00 * y0 + h10 * h * m0 + h01 * y1 + h11 * h * m1
}

#[derive(Debug, Clone)]
pub struct SimBattery {
    config: BatteryConfig,
    state_of_charge: f64,
    forced_voltage_mv: Option<u32>,
}

impl SimBattery {
    pub fn new(config: BatteryConfig) -> Self {
        SimBattery {
            state_of_charge: config.initial_soc.clamp(0.0, 1.0),
            config,
            forced_voltage_mv: None,
        }
    }

    pub fn state_of_charge(&self) -> f64 {
        self.state_of_charge
    }

    /// Remove the charge used by `motors` moving for `duration_ms`, or the idle
    /// draw when `motors` is zero. Motor draw does not include idle current;
    /// the world clock charges that separately for every elapsed interval.
    pub fn discharge(&mut self, motors: usize, duration_ms: f64) {
        if duration_ms <= 0.0 {
            return;
        }
        let current_ma = if motors == 0 {
            self.config.idle_current_ma
        } else {
            self.config.motor_current_ma * motors as f64
        };
        let used_mah = current_ma * duration_ms / 3_600_000.0;
        self.state_of_charge = (self.state_of_charge - used_mah / self.config.rated_capacity_mah).max(0.0);
    }

    /// Pin the reported voltage regardless of charge (`None` releases it)
    pub fn force_voltage(&mut self, voltage_mv: Option<u32>) {
        self.forced_voltage_mv = voltage_mv;
    }

    pub fn voltage_mv(&self) -> u32 {
        match self.forced_voltage_mv {
            Some(mv) => mv,
            None => (pack_ocv_from_soc(self.state_of_charge) * 1000.0).round() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_ocv_hits_anchors() {
        assert_abs_diff_eq!(pack_ocv_from_soc(0.0), 6.80, epsilon = 1e-9);
        assert_abs_diff_eq!(pack_ocv_from_soc(0.5), 7.45, epsilon = 1e-9);
        assert_abs_diff_eq!(pack_ocv_from_soc(1.0), 8.30, epsilon = 1e-9);
    }

    #[test]
    fn test_ocv_monotonic() {
        let mut prev = pack_ocv_from_soc(0.0);
        for i in 1..=100 {
            let v = pack_ocv_from_soc(i as f64 / 100.0);
            assert!(v >= prev, "OCV dropped at soc {}", i);
            prev = v;
        }
    }

    #[test]
    fn test_motor_draw_exceeds_idle() {
        let mut idle = SimBattery::new(BatteryConfig::default());
        let mut busy = SimBattery::new(BatteryConfig::default());
        idle.discharge(0, 60_000.0);
        busy.discharge(2, 60_000.0);
        assert!(busy.state_of_charge() < idle.state_of_charge());
        assert!(idle.state_of_charge() < 0.9);
    }

    #[test]
    fn test_motor_draw_excludes_idle() {
        let mut battery = SimBattery::new(BatteryConfig::default());
        let before = battery.state_of_charge();
        // one motor for an hour: 300 mA out of 2100 mAh
        battery.discharge(1, 3_600_000.0);
        assert_abs_diff_eq!(before - battery.state_of_charge(), 300.0 / 2100.0, epsilon = 1e-12);
    }

    #[test]
    fn test_forced_voltage() {
        let mut battery = SimBattery::new(BatteryConfig::default());
        battery.force_voltage(Some(7250));
        assert_eq!(battery.voltage_mv(), 7250);
        battery.force_voltage(None);
        assert!(battery.voltage_mv() > 7500);
    }
}
