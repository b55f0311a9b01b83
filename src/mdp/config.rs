//! Configuration for the value-iteration solver.

use super::error::MdpError;

/// Solver parameters.
///
/// Controls discounting, the convergence tolerance, the travel cost model,
/// and the safety limits that keep a malformed problem from looping forever.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Discount factor applied to the value of the next state, in (0, 1).
    pub discount: f64,
    /// Sweeps stop once the largest value change drops below this.
    pub epsilon: f64,
    /// Cost charged per unit of distance travelled (0 = free movement).
    pub cost_per_distance_unit: f64,
    /// Maximum number of sweeps before giving up with `NonConvergence`.
    pub max_sweeps: usize,
    /// Allowed deviation from 1 of each origin's probability row.
    pub probability_tolerance: f64,
}

impl SolverConfig {
    /// Checks every parameter, failing on the first invalid one.
    pub fn validate(&self) -> Result<(), MdpError> {
        if !(self.discount > 0.0 && self.discount < 1.0) {
            return Err(MdpError::InvalidDiscount(self.discount));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(MdpError::InvalidEpsilon(self.epsilon));
        }
        if !self.cost_per_distance_unit.is_finite() {
            return Err(MdpError::InvalidCost(self.cost_per_distance_unit));
        }
        if self.max_sweeps == 0 {
            return Err(MdpError::InvalidSweepLimit);
        }
        if !(self.probability_tolerance.is_finite() && self.probability_tolerance >= 0.0) {
            return Err(MdpError::InvalidTolerance(self.probability_tolerance));
        }
        Ok(())
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            discount: 0.95,
            epsilon: 1e-5,
            cost_per_distance_unit: 5.0,
            max_sweeps: 100_000,
            probability_tolerance: 1e-6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = SolverConfig::default();
        assert_eq!(cfg.discount, 0.95);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn discount_bounds_are_exclusive() {
        for discount in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            let cfg = SolverConfig {
                discount,
                ..SolverConfig::default()
            };
            assert!(matches!(cfg.validate(), Err(MdpError::InvalidDiscount(_))));
        }
    }

    #[test]
    fn epsilon_must_be_positive() {
        for epsilon in [0.0, -1e-3, f64::INFINITY] {
            let cfg = SolverConfig {
                epsilon,
                ..SolverConfig::default()
            };
            assert!(matches!(cfg.validate(), Err(MdpError::InvalidEpsilon(_))));
        }
    }

    #[test]
    fn cost_and_sweep_limit_checked() {
        let cfg = SolverConfig {
            cost_per_distance_unit: f64::NAN,
            ..SolverConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(MdpError::InvalidCost(_))));

        let cfg = SolverConfig {
            max_sweeps: 0,
            ..SolverConfig::default()
        };
        assert_eq!(cfg.validate(), Err(MdpError::InvalidSweepLimit));
    }

    #[test]
    fn tolerance_must_be_finite_and_non_negative() {
        for probability_tolerance in [f64::NAN, -1.0, f64::INFINITY] {
            let cfg = SolverConfig {
                probability_tolerance,
                ..SolverConfig::default()
            };
            assert!(matches!(cfg.validate(), Err(MdpError::InvalidTolerance(_))));
        }
        let exact = SolverConfig {
            probability_tolerance: 0.0,
            ..SolverConfig::default()
        };
        assert!(exact.validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_uses_defaults() {
        let cfg: SolverConfig =
            serde_json::from_str(r#"{"discount": 0.8, "cost_per_distance_unit": 0.0}"#).unwrap();
        assert_eq!(cfg.discount, 0.8);
        assert_eq!(cfg.cost_per_distance_unit, 0.0);
        assert_eq!(cfg.max_sweeps, SolverConfig::default().max_sweeps);
    }
}
