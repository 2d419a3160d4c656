//! KeyLevelAnalyzer - derives every key level from one ladder

use super::{
    call_wall, gamma_flip, highest_open_interest_strike, max_gamma_strike, max_pain, put_wall,
    KeyLevels,
};
use crate::exposure::StrikeExposure;

/// Runs every level finder over a strike ladder
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyLevelAnalyzer;

impl KeyLevelAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Key levels for `ladder`, `None` when the ladder is empty
    pub fn analyze(&self, ladder: &[StrikeExposure], spot: f64) -> Option<KeyLevels> {
        let levels = KeyLevels {
            gamma_flip: gamma_flip(ladder, spot),
            max_pain: max_pain(ladder, spot)?,
            call_wall: call_wall(ladder, spot)?,
            put_wall: put_wall(ladder, spot)?,
            max_gamma_strike: max_gamma_strike(ladder, spot)?,
            highest_open_interest_strike: highest_open_interest_strike(ladder, spot)?,
        };

        tracing::debug!(
            "Key levels at spot {:.2}: flip={:?} max_pain={} call_wall={} put_wall={}",
            spot,
            levels.gamma_flip,
            levels.max_pain,
            levels.call_wall,
            levels.put_wall
        );
        Some(levels)
    }
}

/// Shorthand for [`KeyLevelAnalyzer::analyze`]
pub fn analyze_levels(ladder: &[StrikeExposure], spot: f64) -> Option<KeyLevels> {
    KeyLevelAnalyzer::new().analyze(ladder, spot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ladder_has_no_levels() {
        assert_eq!(analyze_levels(&[], 100.0), None);
    }

    #[test]
    fn test_levels_are_ladder_strikes() {
        let mut ladder = Vec::new();
        for (strike, calls, puts, gamma) in [
            (95.0, 100, 600, -20.0),
            (100.0, 300, 300, 5.0),
            (105.0, 700, 50, 30.0),
        ] {
            let mut row = StrikeExposure::empty(strike);
            row.open_interest_calls = calls;
            row.open_interest_puts = puts;
            row.net.gamma = gamma;
            ladder.push(row);
        }

        let levels = analyze_levels(&ladder, 100.0).unwrap();
        let strikes = [95.0, 100.0, 105.0];
        assert!(strikes.contains(&levels.max_pain));
        assert_eq!(levels.call_wall, 105.0);
        assert_eq!(levels.put_wall, 95.0);
        assert_eq!(levels.max_gamma_strike, 105.0);
        assert_eq!(levels.highest_open_interest_strike, 105.0);

        // Cumulative: -20, -15, +15 -> flip halfway between 100 and 105
        let flip = levels.gamma_flip.unwrap();
        assert!((flip - 102.5).abs() < 1e-12);
    }
}
