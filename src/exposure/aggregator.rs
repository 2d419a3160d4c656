//! Strike ladder aggregation

use std::collections::BTreeMap;

use chrono::NaiveDate;
use ordered_float::OrderedFloat;

use super::{ExposureConfig, ExposureWeighting, GreekExposure, PricedContract, StrikeExposure};
use crate::core::OptionType;

/// Scale for gamma-family exposure: value of a 1% spot move
pub const ONE_PERCENT_MOVE: f64 = 0.01;

/// Sums weighted Greeks into per-strike call, put and net exposure
#[derive(Debug, Clone, Default)]
pub struct ExposureAggregator {
    config: ExposureConfig,
}

impl ExposureAggregator {
    pub fn new(config: ExposureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExposureConfig {
        &self.config
    }

    /// Exposure of one contract, before any dealer sign is applied
    pub fn contract_exposure(&self, priced: &PricedContract, spot: f64) -> GreekExposure {
        let contract = &priced.contract;
        let weight = match self.config.weighting {
            ExposureWeighting::OpenInterest => contract.open_interest,
            ExposureWeighting::Volume => contract.volume,
        }
        .unwrap_or(0) as f64;

        let notional = weight * contract.multiplier as f64;
        let scale = notional * spot * spot * ONE_PERCENT_MOVE;

        GreekExposure {
            delta: priced.greeks.delta * notional,
            gamma: priced.greeks.gamma * scale,
            vanna: priced.greeks.vanna * scale,
            charm: priced.greeks.charm * scale,
        }
    }

    /// One ladder row per distinct strike, ascending
    pub fn aggregate(&self, priced: &[PricedContract], spot: f64) -> Vec<StrikeExposure> {
        let mut ordered: Vec<&PricedContract> = priced.iter().collect();
        ordered.sort_by(|a, b| {
            a.contract
                .strike
                .total_cmp(&b.contract.strike)
                .then(a.contract.expiry.cmp(&b.contract.expiry))
                .then(a.contract.option_type.cmp(&b.contract.option_type))
        });

        let mut rows: BTreeMap<OrderedFloat<f64>, StrikeExposure> = BTreeMap::new();
        for p in ordered {
            let strike = p.contract.strike;
            let row = rows
                .entry(OrderedFloat(strike))
                .or_insert_with(|| StrikeExposure::empty(strike));
            let exposure = self.contract_exposure(p, spot);
            let open_interest = p.contract.open_interest.unwrap_or(0);
            let volume = p.contract.volume.unwrap_or(0);

            match p.contract.option_type {
                OptionType::Call => {
                    row.call += exposure;
                    row.open_interest_calls += open_interest;
                    row.volume_calls += volume;
                }
                OptionType::Put => {
                    row.put += exposure;
                    row.open_interest_puts += open_interest;
                    row.volume_puts += volume;
                }
            }
        }

        rows.into_values()
            .map(|mut row| {
                row.net = self.net(&row.call, &row.put);
                row
            })
            .collect()
    }

    /// One ladder per expiry, earliest first
    pub fn aggregate_by_expiry(
        &self,
        priced: &[PricedContract],
        spot: f64,
    ) -> BTreeMap<NaiveDate, Vec<StrikeExposure>> {
        let mut by_expiry: BTreeMap<NaiveDate, Vec<PricedContract>> = BTreeMap::new();
        for p in priced {
            by_expiry.entry(p.contract.expiry).or_default().push(p.clone());
        }

        by_expiry
            .into_iter()
            .map(|(expiry, contracts)| (expiry, self.aggregate(&contracts, spot)))
            .collect()
    }

    /// Dealer net of the two sides
    fn net(&self, call: &GreekExposure, put: &GreekExposure) -> GreekExposure {
        let (call_sign, put_sign) = self.config.dealer_positioning.signs();
        GreekExposure {
            // Deltas already carry the side's sign
            delta: call.delta + put.delta,
            gamma: call_sign * call.gamma + put_sign * put.gamma,
            vanna: call_sign * call.vanna + put_sign * put.vanna,
            charm: call_sign * call.charm + put_sign * put.charm,
        }
    }
}

/// Combine ladders by summing rows with equal strikes
pub fn merge_ladders<I>(ladders: I) -> Vec<StrikeExposure>
where
    I: IntoIterator<Item = Vec<StrikeExposure>>,
{
    let mut rows: BTreeMap<OrderedFloat<f64>, StrikeExposure> = BTreeMap::new();
    for ladder in ladders {
        for row in ladder {
            rows.entry(OrderedFloat(row.strike))
                .and_modify(|existing| existing.absorb(&row))
                .or_insert(row);
        }
    }
    rows.into_values().collect()
}
