//! ExposureEngine - runs the full pipeline for one or many requests
//!
//! chain → Greeks → strike ladder → key levels → regime → recommendation

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::core::{days_to_expiry, ExposureError, ExposureResult, OptionContract, Underlying};
use crate::data::MarketDataProvider;
use crate::exposure::{
    ExcludedContract, ExposureAggregator, ExposureTotals, GreeksCalculator, StrikeExposure,
};
use crate::levels::{KeyLevelAnalyzer, KeyLevels};
use crate::signals::{Recommendation, RecommendationGenerator, Regime};

/// Which expiries a request covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpirySelection {
    /// First listed expiry that has not closed yet
    Nearest,
    /// One specific expiry
    On(NaiveDate),
    /// Every listed expiry that has not closed yet
    All,
}

/// One ticker to analyse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub symbol: String,
    pub expiry: ExpirySelection,
}

impl AnalysisRequest {
    pub fn new(symbol: impl Into<String>, expiry: ExpirySelection) -> Self {
        Self {
            symbol: symbol.into(),
            expiry,
        }
    }

    pub fn nearest(symbol: impl Into<String>) -> Self {
        Self::new(symbol, ExpirySelection::Nearest)
    }
}

/// Everything the presentation layer needs for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureReport {
    pub underlying: Underlying,
    /// Expiries included, ascending
    pub expiries: Vec<NaiveDate>,
    /// Regime of the nearest included expiry
    pub regime: Regime,
    /// Strike ladder across all included expiries
    pub ladder: Vec<StrikeExposure>,
    /// Per-expiry ladders when more than one expiry is included
    pub expiry_ladders: BTreeMap<NaiveDate, Vec<StrikeExposure>>,
    pub totals: ExposureTotals,
    /// `None` when no contract survived validation
    pub key_levels: Option<KeyLevels>,
    pub recommendation: Recommendation,
    /// Contracts left out, with reasons
    pub excluded: Vec<ExcludedContract>,
}

impl ExposureReport {
    /// Key levels, or [`ExposureError::EmptyChain`] for an empty ladder
    pub fn key_levels(&self) -> ExposureResult<&KeyLevels> {
        self.key_levels
            .as_ref()
            .ok_or_else(|| ExposureError::empty_chain(self.underlying.symbol.clone()))
    }

    pub fn is_empty(&self) -> bool {
        self.ladder.is_empty()
    }
}

/// Pipeline facade
///
/// Holds configuration only; every call is independent.
#[derive(Debug, Clone, Default)]
pub struct ExposureEngine {
    config: EngineConfig,
    calculator: GreeksCalculator,
    aggregator: ExposureAggregator,
    analyzer: KeyLevelAnalyzer,
    generator: RecommendationGenerator,
}

impl ExposureEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            calculator: GreeksCalculator::new(config.pricing.clone()),
            aggregator: ExposureAggregator::new(config.exposure.clone()),
            analyzer: KeyLevelAnalyzer::new(),
            generator: RecommendationGenerator::new(config.recommendation.clone()),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyse contracts already in hand
    ///
    /// `expiries` must be non-empty; the nearest one sets the regime.
    /// Contracts on any other expiry are ignored.
    pub fn analyze(
        &self,
        underlying: &Underlying,
        expiries: &[NaiveDate],
        contracts: &[OptionContract],
    ) -> ExposureResult<ExposureReport> {
        underlying.validate()?;

        let mut expiries = expiries.to_vec();
        expiries.sort();
        expiries.dedup();

        let nearest = *expiries
            .first()
            .ok_or_else(|| ExposureError::empty_chain(underlying.symbol.clone()))?;
        let (regime, days) = Regime::for_expiry(
            nearest,
            underlying.as_of,
            self.config.pricing.expiry_close_hour_utc,
        )?;

        let selected: Vec<OptionContract> = contracts
            .iter()
            .filter(|c| expiries.binary_search(&c.expiry).is_ok())
            .cloned()
            .collect();
        if selected.len() < contracts.len() {
            tracing::debug!(
                "{}: ignoring {} contracts outside the requested expiries",
                underlying.symbol,
                contracts.len() - selected.len()
            );
        }

        let greeks = self.calculator.compute(underlying, &selected)?;
        let ladder = self.aggregator.aggregate(&greeks.priced, underlying.spot);
        let expiry_ladders = if expiries.len() > 1 {
            self.aggregator
                .aggregate_by_expiry(&greeks.priced, underlying.spot)
        } else {
            BTreeMap::new()
        };

        if ladder.is_empty() {
            tracing::warn!("{}", ExposureError::empty_chain(underlying.symbol.clone()));
        }

        let totals = ExposureTotals::from_ladder(&ladder);
        let key_levels = self.analyzer.analyze(&ladder, underlying.spot);
        let recommendation = self.generator.generate(
            regime,
            days,
            underlying.spot,
            &totals,
            key_levels.as_ref(),
        );

        tracing::info!(
            "{}: {} strikes, {} excluded, regime {}, bias {}",
            underlying.symbol,
            ladder.len(),
            greeks.excluded.len(),
            regime,
            recommendation.bias.label()
        );

        Ok(ExposureReport {
            underlying: underlying.clone(),
            expiries,
            regime,
            ladder,
            expiry_ladders,
            totals,
            key_levels,
            recommendation,
            excluded: greeks.excluded,
        })
    }

    /// Fetch and analyse one request
    pub fn analyze_request(
        &self,
        provider: &dyn MarketDataProvider,
        request: &AnalysisRequest,
    ) -> ExposureResult<ExposureReport> {
        let symbol = request.symbol.as_str();
        let underlying = provider.get_spot(symbol)?;
        let expiries = self.select_expiries(provider, &underlying, request.expiry)?;

        let mut contracts = Vec::new();
        for &expiry in &expiries {
            contracts.extend(provider.get_option_chain(symbol, expiry)?);
        }
        tracing::debug!(
            "{} from {}: {} contracts over {} expiries",
            symbol,
            provider.name(),
            contracts.len(),
            expiries.len()
        );

        self.analyze(&underlying, &expiries, &contracts)
    }

    /// Analyse many tickers concurrently
    ///
    /// Results keep request order; one ticker failing leaves the others intact.
    pub fn analyze_many(
        &self,
        provider: &dyn MarketDataProvider,
        requests: &[AnalysisRequest],
    ) -> Vec<(String, ExposureResult<ExposureReport>)> {
        requests
            .par_iter()
            .map(|request| {
                let result = self.analyze_request(provider, request);
                if let Err(e) = &result {
                    tracing::warn!("Analysis failed for {}: {}", request.symbol, e);
                }
                (request.symbol.clone(), result)
            })
            .collect()
    }

    fn select_expiries(
        &self,
        provider: &dyn MarketDataProvider,
        underlying: &Underlying,
        selection: ExpirySelection,
    ) -> ExposureResult<Vec<NaiveDate>> {
        if let ExpirySelection::On(expiry) = selection {
            return Ok(vec![expiry]);
        }

        let close_hour = self.config.pricing.expiry_close_hour_utc;
        let mut open: Vec<NaiveDate> = provider
            .list_expiries(&underlying.symbol)?
            .into_iter()
            .filter(|&e| days_to_expiry(e, underlying.as_of, close_hour) >= 0)
            .collect();
        open.sort();

        if open.is_empty() {
            return Err(ExposureError::empty_chain(underlying.symbol.clone()));
        }
        if selection == ExpirySelection::Nearest {
            open.truncate(1);
        }
        Ok(open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChainSnapshot, OptionType};
    use crate::data::SnapshotProvider;
    use crate::models::black_scholes;
    use crate::signals::Bias;
    use chrono::{TimeZone, Utc};

    fn as_of() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 21, 20, 0, 0).unwrap()
    }

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 20).unwrap()
    }

    /// Spot 100, strikes 95/105, 100 OI on every contract, 30 days, 20% vol
    fn two_strike_chain(symbol: &str) -> (Underlying, Vec<OptionContract>) {
        let underlying = Underlying::new(symbol, 100.0, as_of()).unwrap();
        let mut contracts = Vec::new();
        for strike in [95.0, 105.0] {
            for option_type in [OptionType::Call, OptionType::Put] {
                contracts.push(
                    OptionContract::new(symbol, expiry(), strike, option_type, 0.2)
                        .with_open_interest(100)
                        .with_volume(25),
                );
            }
        }
        (underlying, contracts)
    }

    fn snapshot(symbol: &str, spot: f64) -> ChainSnapshot {
        let underlying = Underlying::new(symbol, spot, as_of()).unwrap();
        let mut snap = ChainSnapshot::new(underlying);
        let expired = NaiveDate::from_ymd_opt(2025, 5, 16).unwrap();
        let weekly = NaiveDate::from_ymd_opt(2025, 5, 23).unwrap();
        for expiry in [expired, weekly, expiry()] {
            for (i, offset) in [-0.05, 0.0, 0.05].iter().enumerate() {
                let strike = (spot * (1.0 + offset)).round();
                let oi = 100 * (i as u64 + 1);
                snap.add_contract(
                    OptionContract::new(symbol, expiry, strike, OptionType::Call, 0.22)
                        .with_open_interest(oi)
                        .with_volume(10),
                );
                snap.add_contract(
                    OptionContract::new(symbol, expiry, strike, OptionType::Put, 0.25)
                        .with_open_interest(400 - oi)
                        .with_volume(10),
                );
            }
        }
        snap
    }

    #[test]
    fn test_end_to_end_two_strikes() {
        let (underlying, contracts) = two_strike_chain("SPY");
        let engine = ExposureEngine::default();
        let report = engine.analyze(&underlying, &[expiry()], &contracts).unwrap();

        assert_eq!(report.regime, Regime::Monthly);
        assert_eq!(report.recommendation.days_to_expiry, 30);
        assert_eq!(report.ladder.len(), 2);
        assert!(report.excluded.is_empty());

        let t = 30.0 / 365.0;
        for row in &report.ladder {
            let gamma = black_scholes::greeks(100.0, row.strike, 0.0, 0.0, 0.2, t, OptionType::Call)
                .unwrap()
                .gamma;
            let expected = gamma * 100.0 * 100.0 * 100.0 * 100.0 * 0.01;
            assert!((row.call.gamma - expected).abs() < 1e-9 * expected);
            assert!((row.put.gamma - expected).abs() < 1e-9 * expected);
            assert_eq!(row.net.gamma, 0.0);
        }

        let levels = report.key_levels().unwrap();
        assert_eq!(levels.gamma_flip, None);
        // Payout is 1000 at both strikes; equidistant from spot, so the lower wins
        assert_eq!(levels.max_pain, 95.0);
        assert_eq!(report.totals.put_call_ratio, Some(1.0));
        assert!((report.recommendation.support_level - 95.0).abs() < 1e-9);
        assert!((report.recommendation.resistance_level - 105.0).abs() < 1e-9);
    }

    #[test]
    fn test_idempotent_output() {
        let (underlying, contracts) = two_strike_chain("SPY");
        let engine = ExposureEngine::default();

        let a = engine.analyze(&underlying, &[expiry()], &contracts).unwrap();
        let b = engine.analyze(&underlying, &[expiry()], &contracts).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_zero_vol_is_reported_not_fatal() {
        let (underlying, mut contracts) = two_strike_chain("SPY");
        let engine = ExposureEngine::default();
        let baseline = engine.analyze(&underlying, &[expiry()], &contracts).unwrap();

        contracts.push(
            OptionContract::new("SPY", expiry(), 100.0, OptionType::Call, 0.0)
                .with_open_interest(5_000)
                .with_volume(5),
        );
        let report = engine.analyze(&underlying, &[expiry()], &contracts).unwrap();

        assert_eq!(report.excluded.len(), 1);
        assert_eq!(report.ladder, baseline.ladder);
        assert_eq!(report.key_levels, baseline.key_levels);
    }

    #[test]
    fn test_contracts_outside_expiries_are_ignored() {
        let (underlying, contracts) = two_strike_chain("SPY");
        let engine = ExposureEngine::default();
        let baseline = engine.analyze(&underlying, &[expiry()], &contracts).unwrap();

        let mut mixed = contracts.clone();
        let later = NaiveDate::from_ymd_opt(2025, 7, 18).unwrap();
        mixed.push(
            OptionContract::new("SPY", later, 100.0, OptionType::Put, 0.2)
                .with_open_interest(9_000)
                .with_volume(50),
        );
        let report = engine.analyze(&underlying, &[expiry()], &mixed).unwrap();

        assert_eq!(report.ladder, baseline.ladder);
        assert!(report.excluded.is_empty());
    }

    #[test]
    fn test_non_positive_spot_fails_request() {
        let mut snap = snapshot("SPY", 500.0);
        snap.underlying.spot = -5.0;
        let provider = SnapshotProvider::from_snapshots([snap]);

        let result =
            ExposureEngine::default().analyze_request(&provider, &AnalysisRequest::nearest("SPY"));
        assert!(matches!(result, Err(ExposureError::InvalidInput(_))));
    }

    #[test]
    fn test_empty_chain() {
        let underlying = Underlying::new("SPY", 100.0, as_of()).unwrap();
        let engine = ExposureEngine::default();
        let report = engine.analyze(&underlying, &[expiry()], &[]).unwrap();

        assert!(report.is_empty());
        assert_eq!(report.key_levels, None);
        assert!(matches!(
            report.key_levels(),
            Err(ExposureError::EmptyChain { .. })
        ));
        assert_eq!(report.recommendation.bias, Bias::Neutral);

        assert!(engine.analyze(&underlying, &[], &[]).is_err());
    }

    #[test]
    fn test_expired_expiry_is_invalid_regime() {
        let (underlying, contracts) = two_strike_chain("SPY");
        let past = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let result = ExposureEngine::default().analyze(&underlying, &[past], &contracts);
        assert!(matches!(result, Err(ExposureError::InvalidRegimeInput { .. })));
    }

    #[test]
    fn test_expiry_selection() {
        let provider = SnapshotProvider::from_snapshots([snapshot("SPY", 500.0)]);
        let engine = ExposureEngine::default();
        let weekly = NaiveDate::from_ymd_opt(2025, 5, 23).unwrap();

        // Expired listing is skipped
        let nearest = engine
            .analyze_request(&provider, &AnalysisRequest::nearest("SPY"))
            .unwrap();
        assert_eq!(nearest.expiries, vec![weekly]);
        assert_eq!(nearest.regime, Regime::Weekly);
        assert!(nearest.expiry_ladders.is_empty());

        let all = engine
            .analyze_request(&provider, &AnalysisRequest::new("SPY", ExpirySelection::All))
            .unwrap();
        assert_eq!(all.expiries, vec![weekly, expiry()]);
        assert_eq!(all.expiry_ladders.len(), 2);
        assert_eq!(all.regime, Regime::Weekly);
        let total_oi: u64 = all.ladder.iter().map(|r| r.total_open_interest()).sum();
        assert_eq!(total_oi, 2 * 3 * 400);

        let on = engine
            .analyze_request(&provider, &AnalysisRequest::new("SPY", ExpirySelection::On(expiry())))
            .unwrap();
        assert_eq!(on.regime, Regime::Monthly);
    }

    #[test]
    fn test_batch_isolates_failures() {
        let provider =
            SnapshotProvider::from_snapshots([snapshot("SPY", 500.0), snapshot("QQQ", 440.0)]);
        let engine = ExposureEngine::default();

        let requests = vec![
            AnalysisRequest::nearest("SPY"),
            AnalysisRequest::nearest("NOPE"),
            AnalysisRequest::nearest("QQQ"),
        ];
        let results = engine.analyze_many(&provider, &requests);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, "SPY");
        assert!(results[1].1.as_ref().unwrap_err().is_provider_failure());

        let alone = engine
            .analyze_request(&provider, &AnalysisRequest::nearest("QQQ"))
            .unwrap();
        assert_eq!(results[2].1.as_ref().unwrap(), &alone);
        assert!(results[0].1.is_ok());
    }
}
