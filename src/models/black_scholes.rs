//! Black-Scholes Model
//!
//! Closed-form sensitivities for European options:
//! - Delta, gamma, vanna and charm
//! - Continuous dividend yield (zero for the usual exposure work)
//!
//! Every value is a deterministic function of its inputs; there is no state.

use std::f64::consts::PI;

use statrs::distribution::{ContinuousCDF, Normal};

use crate::core::{ExclusionReason, ExposureError, ExposureResult, GreekSet, OptionType};

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    Normal::standard().cdf(x)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Black-Scholes d1 parameter
pub fn d1(spot: f64, strike: f64, rate: f64, div: f64, vol: f64, time: f64) -> f64 {
    ((spot / strike).ln() + (rate - div + 0.5 * vol * vol) * time) / (vol * time.sqrt())
}

/// Black-Scholes Greeks
///
/// `time` is in years, `vol` annualized. Rejects non-positive vol, spot or
/// strike and negative time with [`ExposureError::InvalidContract`].
pub fn greeks(
    spot: f64,
    strike: f64,
    rate: f64,
    div: f64,
    vol: f64,
    time: f64,
    option_type: OptionType,
) -> ExposureResult<GreekSet> {
    let describe = || format!("{} K={} T={:.6}", option_type.label(), strike, time);

    if !vol.is_finite() || vol <= 0.0 {
        return Err(ExposureError::invalid_contract(
            describe(),
            ExclusionReason::NonPositiveVolatility,
        ));
    }
    if !strike.is_finite() || strike <= 0.0 {
        return Err(ExposureError::invalid_contract(
            describe(),
            ExclusionReason::NonPositiveStrike,
        ));
    }
    if !time.is_finite() || time < 0.0 {
        return Err(ExposureError::invalid_contract(describe(), ExclusionReason::Expired));
    }
    if !spot.is_finite() || spot <= 0.0 {
        return Err(ExposureError::invalid_input(format!(
            "spot must be positive, got {}",
            spot
        )));
    }

    if time == 0.0 {
        // At expiry only the intrinsic delta survives
        let delta = match option_type {
            OptionType::Call => {
                if spot > strike {
                    1.0
                } else {
                    0.0
                }
            }
            OptionType::Put => {
                if spot < strike {
                    -1.0
                } else {
                    0.0
                }
            }
        };
        return Ok(GreekSet::new(delta, 0.0, 0.0, 0.0));
    }

    let sqrt_t = time.sqrt();
    let d1 = d1(spot, strike, rate, div, vol, time);
    let d2 = d1 - vol * sqrt_t;
    let pdf_d1 = norm_pdf(d1);
    let div_factor = (-div * time).exp();

    // Delta
    let delta = match option_type {
        OptionType::Call => div_factor * norm_cdf(d1),
        OptionType::Put => div_factor * (norm_cdf(d1) - 1.0),
    };

    // Gamma (same for call and put)
    let gamma = div_factor * pdf_d1 / (spot * vol * sqrt_t);

    // Vanna: d(delta)/d(vol) = d(vega)/d(spot)
    let vanna = -div_factor * pdf_d1 * d2 / vol;

    // Charm: -d(delta)/d(T), per year of calendar time
    let decay = div_factor * pdf_d1 * (2.0 * (rate - div) * time - d2 * vol * sqrt_t)
        / (2.0 * time * vol * sqrt_t);
    let charm = match option_type {
        OptionType::Call => div * div_factor * norm_cdf(d1) - decay,
        OptionType::Put => -div * div_factor * norm_cdf(-d1) - decay,
    };

    Ok(GreekSet::new(delta, gamma, vanna, charm))
}
