//! Option Greeks
//!
//! First and second order sensitivities used for dealer exposure.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The sensitivities the engine aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Greek {
    /// dV/dS
    Delta,
    /// d²V/dS²
    Gamma,
    /// d²V/dSdσ
    Vanna,
    /// d²V/dSdt
    Charm,
}

impl Greek {
    pub const ALL: [Greek; 4] = [Greek::Delta, Greek::Gamma, Greek::Vanna, Greek::Charm];

    /// Gamma, vanna and charm are scaled to a 1% spot move; delta is not
    pub fn is_gamma_family(&self) -> bool {
        !matches!(self, Greek::Delta)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Greek::Delta => "Delta",
            Greek::Gamma => "Gamma",
            Greek::Vanna => "Vanna",
            Greek::Charm => "Charm",
        }
    }
}

impl fmt::Display for Greek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-contract sensitivities
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GreekSet {
    /// Delta: dV/dS (sensitivity to spot)
    pub delta: f64,
    /// Gamma: d²V/dS² (sensitivity of delta to spot)
    pub gamma: f64,
    /// Vanna: d²V/dSdσ (sensitivity of delta to vol)
    pub vanna: f64,
    /// Charm: d(delta)/dt, per year of calendar time
    pub charm: f64,
}

impl GreekSet {
    pub fn new(delta: f64, gamma: f64, vanna: f64, charm: f64) -> Self {
        Self {
            delta,
            gamma,
            vanna,
            charm,
        }
    }

    pub fn get(&self, greek: Greek) -> f64 {
        match greek {
            Greek::Delta => self.delta,
            Greek::Gamma => self.gamma,
            Greek::Vanna => self.vanna,
            Greek::Charm => self.charm,
        }
    }

    /// All values finite (no NaN/inf leaked out of the pricing model)
    pub fn is_finite(&self) -> bool {
        Greek::ALL.iter().all(|g| self.get(*g).is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_by_greek() {
        let g = GreekSet::new(0.5, 0.02, -0.1, 0.3);
        assert_eq!(g.get(Greek::Delta), 0.5);
        assert_eq!(g.get(Greek::Gamma), 0.02);
        assert_eq!(g.get(Greek::Vanna), -0.1);
        assert_eq!(g.get(Greek::Charm), 0.3);
        assert!(g.is_finite());
        assert!(!GreekSet::new(f64::NAN, 0.0, 0.0, 0.0).is_finite());
    }

    #[test]
    fn test_gamma_family() {
        assert!(!Greek::Delta.is_gamma_family());
        assert!(Greek::Gamma.is_gamma_family());
        assert!(Greek::Vanna.is_gamma_family());
        assert!(Greek::Charm.is_gamma_family());
    }
}
