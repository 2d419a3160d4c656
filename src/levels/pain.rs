//! Max pain

use super::beats;
use crate::core::OptionType;
use crate::exposure::StrikeExposure;

/// Total intrinsic value paid to holders if the underlying settles at `settle`
pub fn holder_payout(ladder: &[StrikeExposure], settle: f64) -> f64 {
    ladder
        .iter()
        .map(|row| {
            row.open_interest_calls as f64 * OptionType::Call.intrinsic(settle, row.strike)
                + row.open_interest_puts as f64 * OptionType::Put.intrinsic(settle, row.strike)
        })
        .sum()
}

/// Ladder strike at which option holders collect the least
///
/// Only ladder strikes are candidates. `None` for an empty ladder.
pub fn max_pain(ladder: &[StrikeExposure], spot: f64) -> Option<f64> {
    let mut best: Option<(f64, f64)> = None;

    for row in ladder {
        // Negated so the shared "higher wins" rule picks the minimum
        let candidate = (-holder_payout(ladder, row.strike), row.strike);
        best = match best {
            Some(b) if !beats(candidate, b, spot) => Some(b),
            _ => Some(candidate),
        };
    }

    best.map(|(_, strike)| strike)
}
