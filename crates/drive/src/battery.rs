//! Battery percentage and status tiers
//!
//! The hub reports pack voltage in mV. It is mapped onto a percentage by
//! clamped linear interpolation between two reference voltages, and the
//! percentage picks one of three status colors.

use hubcore::Color;
use serde::{Deserialize, Serialize};

/// Clamped linear map of `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// The magnitude of `value` is mapped and its sign reapplied, so negative
/// inputs land in `[-out_max, -out_min]`.
pub fn rescale(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    let sign = if value < 0.0 { -1.0 } else { 1.0 };
    if in_max <= in_min {
        return sign * out_min;
    }
    let magnitude = value.abs().max(in_min).min(in_max);
    let scaled = out_min + (magnitude - in_min) * (out_max - out_min) / (in_max - in_min);
    sign * scaled.max(out_min).min(out_max)
}

/// Battery health bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusTier {
    Normal,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryThresholds {
    /// Voltage that reads as empty (mV)
    pub low_mv: u32,
    /// Voltage that reads as full (mV)
    pub high_mv: u32,
    /// Smallest percentage ever reported
    pub floor_percent: f64,
    /// Below this percentage the tier is at least `Warning`
    pub warning_below: f64,
    /// Below this percentage the tier is `Critical`
    pub critical_below: f64,
    pub normal_color: Color,
    pub warning_color: Color,
    pub critical_color: Color,
}

impl Default for BatteryThresholds {
    fn default() -> Self {
        BatteryThresholds {
            low_mv: 7000,
            high_mv: 8000,
            floor_percent: 1.0,
            warning_below: 70.0,
            critical_below: 40.0,
            normal_color: Color::Green,
            warning_color: Color::Yellow,
            critical_color: Color::Red,
        }
    }
}

/// One reading of the battery
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatterySample {
    pub voltage_mv: u32,
    pub percent: f64,
    pub tier: StatusTier,
    pub color: Color,
}

impl BatteryThresholds {
    pub fn percent(&self, voltage_mv: u32) -> f64 {
        rescale(
            f64::from(voltage_mv),
            f64::from(self.low_mv),
            f64::from(self.high_mv),
            self.floor_percent,
            100.0,
        )
    }

    pub fn tier(&self, percent: f64) -> StatusTier {
        if percent >= self.warning_below {
            StatusTier::Normal
        } else if percent >= self.critical_below {
            StatusTier::Warning
        } else {
            StatusTier::Critical
        }
    }

    pub fn color(&self, tier: StatusTier) -> Color {
        match tier {
            StatusTier::Normal => self.normal_color,
            StatusTier::Warning => self.warning_color,
            StatusTier::Critical => self.critical_color,
        }
    }

    pub fn sample(&self, voltage_mv: u32) -> BatterySample {
        let percent = self.percent(voltage_mv);
        let tier = self.tier(percent);
        BatterySample {
            voltage_mv,
            percent,
            tier,
            color: self.color(tier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rescale_clamps_low() {
        assert_eq!(rescale(6500.0, 7000.0, 8000.0, 1.0, 100.0), 1.0);
        assert_eq!(rescale(7000.0, 7000.0, 8000.0, 1.0, 100.0), 1.0);
    }

    #[test]
    fn test_rescale_clamps_high() {
        assert_eq!(rescale(8000.0, 7000.0, 8000.0, 1.0, 100.0), 100.0);
        assert_eq!(rescale(9100.0, 7000.0, 8000.0, 1.0, 100.0), 100.0);
    }

    #[test]
    fn test_rescale_midway() {
        assert_abs_diff_eq!(rescale(7500.0, 7000.0, 8000.0, 1.0, 100.0), 50.5, epsilon = 1e-9);
    }

    #[test]
    fn test_rescale_zero_floor() {
        assert_eq!(rescale(6900.0, 7000.0, 8000.0, 0.0, 100.0), 0.0);
        assert_abs_diff_eq!(rescale(7500.0, 7000.0, 8000.0, 0.0, 100.0), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rescale_preserves_sign() {
        assert_abs_diff_eq!(rescale(-7500.0, 7000.0, 8000.0, 1.0, 100.0), -50.5, epsilon = 1e-9);
        assert_eq!(rescale(-9000.0, 7000.0, 8000.0, 1.0, 100.0), -100.0);
    }

    #[test]
    fn test_rescale_monotonic() {
        let mut prev = f64::NEG_INFINITY;
        for mv in (6500..=8500).step_by(25) {
            let pct = rescale(mv as f64, 7000.0, 8000.0, 1.0, 100.0);
            assert!(pct >= prev);
            assert!((1.0..=100.0).contains(&pct));
            prev = pct;
        }
    }

    #[test]
    fn test_rescale_degenerate_range() {
        assert_eq!(rescale(7500.0, 8000.0, 8000.0, 1.0, 100.0), 1.0);
    }

    #[test]
    fn test_tiers_at_boundaries() {
        let t = BatteryThresholds::default();
        assert_eq!(t.tier(100.0), StatusTier::Normal);
        assert_eq!(t.tier(70.0), StatusTier::Normal);
        assert_eq!(t.tier(69.99), StatusTier::Warning);
        assert_eq!(t.tier(40.0), StatusTier::Warning);
        assert_eq!(t.tier(39.99), StatusTier::Critical);
        assert_eq!(t.tier(1.0), StatusTier::Critical);
    }

    #[test]
    fn test_sample_colors() {
        let t = BatteryThresholds::default();
        assert_eq!(t.sample(8200).color, Color::Green);
        assert_eq!(t.sample(7550).color, Color::Yellow);
        assert_eq!(t.sample(7100).color, Color::Red);
        assert_eq!(t.sample(6000).percent, 1.0);
    }
}
