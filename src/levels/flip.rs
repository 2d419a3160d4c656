//! Gamma flip: zero crossing of cumulative net gamma

use crate::exposure::StrikeExposure;

/// Price at which cumulative net gamma (summed ascending by strike) changes
/// sign
///
/// Between two strikes the crossing is linearly interpolated. If the
/// cumulative value is exactly zero at strikes between the two opposite-signed
/// values, the first such strike is the flip. With several crossings, the one
/// nearest `spot` is returned (lower on a tie). `None` without a crossing.
pub fn gamma_flip(ladder: &[StrikeExposure], spot: f64) -> Option<f64> {
    let mut cumulative = 0.0;
    // (strike, cumulative) of the last nonzero point, and the first zero after it
    let mut last_nonzero: Option<(f64, f64)> = None;
    let mut first_zero: Option<f64> = None;
    let mut best: Option<f64> = None;

    for row in ladder {
        cumulative += row.net.gamma;

        if cumulative == 0.0 {
            if last_nonzero.is_some() && first_zero.is_none() {
                first_zero = Some(row.strike);
            }
            continue;
        }

        if let Some((prev_strike, prev_value)) = last_nonzero {
            if prev_value.signum() != cumulative.signum() {
                let crossing = match first_zero {
                    Some(zero_strike) => zero_strike,
                    None => interpolate(prev_strike, prev_value, row.strike, cumulative),
                };
                best = match best {
                    Some(b) if (b - spot).abs() <= (crossing - spot).abs() => Some(b),
                    _ => Some(crossing),
                };
            }
        }

        last_nonzero = Some((row.strike, cumulative));
        first_zero = None;
    }

    best
}

/// Zero of the line through (k0, v0) and (k1, v1)
fn interpolate(k0: f64, v0: f64, k1: f64, v1: f64) -> f64 {
    k0 + (k1 - k0) * (-v0) / (v1 - v0)
}
