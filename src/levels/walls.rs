//! Open-interest walls and gamma concentration

use super::beats;
use crate::exposure::StrikeExposure;

/// Strike with the highest score under the shared tie rule
fn best_strike<F>(ladder: &[StrikeExposure], spot: f64, score: F) -> Option<f64>
where
    F: Fn(&StrikeExposure) -> f64,
{
    ladder
        .iter()
        .map(|row| (score(row), row.strike))
        .fold(None, |best, candidate| match best {
            Some(b) if !beats(candidate, b, spot) => Some(b),
            _ => Some(candidate),
        })
        .map(|(_, strike)| strike)
}

/// Strike with the largest call open interest
pub fn call_wall(ladder: &[StrikeExposure], spot: f64) -> Option<f64> {
    best_strike(ladder, spot, |row| row.open_interest_calls as f64)
}

/// Strike with the largest put open interest
pub fn put_wall(ladder: &[StrikeExposure], spot: f64) -> Option<f64> {
    best_strike(ladder, spot, |row| row.open_interest_puts as f64)
}

/// Strike with the largest absolute net gamma exposure
pub fn max_gamma_strike(ladder: &[StrikeExposure], spot: f64) -> Option<f64> {
    best_strike(ladder, spot, |row| row.net.gamma.abs())
}

/// Strike with the largest combined open interest
pub fn highest_open_interest_strike(ladder: &[StrikeExposure], spot: f64) -> Option<f64> {
    best_strike(ladder, spot, |row| row.total_open_interest() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(strike: f64, calls: u64, puts: u64, net_gamma: f64) -> StrikeExposure {
        let mut r = StrikeExposure::empty(strike);
        r.open_interest_calls = calls;
        r.open_interest_puts = puts;
        r.net.gamma = net_gamma;
        r
    }

    #[test]
    fn test_walls() {
        let ladder = vec![
            row(90.0, 10, 900, -5.0),
            row(100.0, 400, 400, 2.0),
            row(110.0, 800, 20, 40.0),
        ];
        assert_eq!(call_wall(&ladder, 100.0), Some(110.0));
        assert_eq!(put_wall(&ladder, 100.0), Some(90.0));
        assert_eq!(max_gamma_strike(&ladder, 100.0), Some(110.0));
        assert_eq!(highest_open_interest_strike(&ladder, 100.0), Some(90.0));
    }

    #[test]
    fn test_max_gamma_uses_magnitude() {
        let ladder = vec![row(95.0, 0, 0, -50.0), row(105.0, 0, 0, 10.0)];
        assert_eq!(max_gamma_strike(&ladder, 100.0), Some(95.0));
    }

    #[test]
    fn test_wall_ties() {
        let ladder = vec![row(90.0, 500, 0, 0.0), row(98.0, 500, 0, 0.0), row(102.0, 500, 0, 0.0)];
        // 98 and 102 are both 2 away from 100: lower wins
        assert_eq!(call_wall(&ladder, 100.0), Some(98.0));
        assert_eq!(call_wall(&ladder, 101.0), Some(102.0));
        assert_eq!(call_wall(&[], 100.0), None);
    }
}
