//! Per-contract Greeks for a chain snapshot

use std::collections::HashSet;

use rayon::prelude::*;

use super::{ChainGreeks, ExcludedContract, PricedContract, PricingConfig};
use crate::core::{ExclusionReason, ExposureError, ExposureResult, OptionContract, Underlying};
use crate::models::black_scholes;

/// Applies Black-Scholes to every contract of a chain
///
/// Stateless apart from its configuration, so one calculator can be shared
/// across threads and requests.
#[derive(Debug, Clone, Default)]
pub struct GreeksCalculator {
    config: PricingConfig,
}

impl GreeksCalculator {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Price every valid contract and report the rest
    ///
    /// `priced` and `excluded` both keep the input order. Fails only when
    /// the underlying itself is unusable.
    pub fn compute(
        &self,
        underlying: &Underlying,
        contracts: &[OptionContract],
    ) -> ExposureResult<ChainGreeks> {
        underlying.validate()?;

        // Duplicate detection depends on order, so it runs before the fan-out.
        // Only contracts that pass every other check claim a key.
        let mut seen = HashSet::with_capacity(contracts.len());
        let screened: Vec<Option<ExclusionReason>> = contracts
            .iter()
            .map(|c| {
                let reason = self.screen(underlying, c);
                if reason.is_none() && !seen.insert(c.key()) {
                    return Some(ExclusionReason::Duplicate);
                }
                reason
            })
            .collect();

        let outcomes: Vec<ExposureResult<Result<PricedContract, ExcludedContract>>> = contracts
            .par_iter()
            .zip(screened.par_iter())
            .map(|(contract, screened)| match screened {
                Some(reason) => Ok(Err(ExcludedContract {
                    contract: contract.clone(),
                    reason: *reason,
                })),
                None => match self.price(underlying, contract) {
                    Ok(priced) => Ok(Ok(priced)),
                    Err(ExposureError::InvalidContract { reason, .. }) => Ok(Err(ExcludedContract {
                        contract: contract.clone(),
                        reason,
                    })),
                    Err(e) => Err(e),
                },
            })
            .collect();

        let mut result = ChainGreeks::default();
        for outcome in outcomes {
            match outcome? {
                Ok(priced) => result.priced.push(priced),
                Err(excluded) => {
                    tracing::debug!(
                        "Excluding {}: {}",
                        excluded.contract.describe(),
                        excluded.reason
                    );
                    result.excluded.push(excluded);
                }
            }
        }

        tracing::debug!(
            "Priced {} of {} contracts for {}",
            result.priced.len(),
            contracts.len(),
            underlying.symbol
        );
        Ok(result)
    }

    /// Price a single contract against the underlying
    ///
    /// Contract faults come back as [`ExposureError::InvalidContract`] with
    /// the exclusion reason; a bad spot as [`ExposureError::InvalidInput`].
    pub fn price(
        &self,
        underlying: &Underlying,
        contract: &OptionContract,
    ) -> ExposureResult<PricedContract> {
        let time = self.time_to_expiry(underlying, contract);

        let greeks = black_scholes::greeks(
            underlying.spot,
            contract.strike,
            self.config.risk_free_rate,
            self.config.dividend_yield,
            contract.implied_vol,
            time,
            contract.option_type,
        )
        .map_err(|e| match e {
            ExposureError::InvalidContract { reason, .. } => {
                ExposureError::invalid_contract(contract.describe(), reason)
            }
            other => other,
        })?;

        Ok(PricedContract {
            contract: contract.clone(),
            time_to_expiry: time,
            greeks,
        })
    }

    fn time_to_expiry(&self, underlying: &Underlying, contract: &OptionContract) -> f64 {
        contract.time_to_expiry(
            underlying.as_of,
            self.config.expiry_close_hour_utc,
            self.config.days_per_year,
        )
    }

    /// Checks that do not need pricing, in reporting order
    fn screen(&self, underlying: &Underlying, contract: &OptionContract) -> Option<ExclusionReason> {
        if !contract.symbol.eq_ignore_ascii_case(&underlying.symbol) {
            return Some(ExclusionReason::SymbolMismatch);
        }
        if contract.open_interest.is_none() {
            return Some(ExclusionReason::MissingOpenInterest);
        }
        if contract.volume.is_none() {
            return Some(ExclusionReason::MissingVolume);
        }
        if contract.multiplier == 0 {
            return Some(ExclusionReason::ZeroMultiplier);
        }
        if !contract.implied_vol.is_finite() || contract.implied_vol <= 0.0 {
            return Some(ExclusionReason::NonPositiveVolatility);
        }
        if !contract.strike.is_finite() || contract.strike <= 0.0 {
            return Some(ExclusionReason::NonPositiveStrike);
        }
        if self.time_to_expiry(underlying, contract) < 0.0 {
            return Some(ExclusionReason::Expired);
        }
        None
    }
}
