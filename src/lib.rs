//! # Dealer Exposure - Options Positioning Engine
//!
//! Turns an option-chain snapshot into the numbers a dealer-positioning
//! dashboard draws: per-strike Greek exposure, key levels, an expiry regime
//! and a structured recommendation.
//!
//! ## Overview
//!
//! The pipeline is deterministic end to end:
//! - **Black-Scholes**: closed-form delta, gamma, vanna and charm per contract
//! - **Greeks calculator**: prices the chain in parallel, reports bad contracts
//! - **Aggregator**: open-interest (or volume) weighted exposure per strike
//! - **Key levels**: gamma flip, max pain, call/put walls
//! - **Regime + recommendation**: 0DTE / weekly / monthly / LEAPS rule table
//!
//! Running it twice on the same snapshot yields byte-identical output.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dealer_exposure::prelude::*;
//!
//! let config = EngineConfig::default();
//! let provider = YahooProvider::new(&config.provider).unwrap();
//! let engine = ExposureEngine::new(config);
//!
//! let report = engine
//!     .analyze_request(&provider, &AnalysisRequest::nearest("SPY"))
//!     .unwrap();
//!
//! for row in &report.ladder {
//!     println!("{:>8.2} {:>14.0}", row.strike, row.net.gamma);
//! }
//! for line in report.recommendation.lines() {
//!     println!("- {}", line);
//! }
//! ```
//!
//! ## What This Engine Does NOT Do
//!
//! - Calibrate volatility surfaces (implied vol is taken per contract)
//! - Route orders or backtest
//! - Persist anything beyond the snapshot it is handed

pub mod config;
pub mod core;
pub mod data;
pub mod engine;
pub mod exposure;
pub mod levels;
pub mod logging;
pub mod models;
pub mod signals;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        ChainSnapshot, ExclusionReason, ExposureError, ExposureResult, Greek, GreekSet,
        OptionContract, OptionType, Underlying,
    };

    // Configuration
    pub use crate::config::EngineConfig;
    pub use crate::exposure::{
        DealerPositioning, ExposureConfig, ExposureWeighting, PricingConfig,
    };
    pub use crate::signals::RecommendationConfig;

    // Market data
    pub use crate::data::{MarketDataProvider, ProviderConfig, SnapshotProvider, YahooProvider};

    // Pipeline stages
    pub use crate::exposure::{
        merge_ladders, ChainGreeks, ExposureAggregator, ExposureTotals, GreekExposure,
        GreeksCalculator, PricedContract, StrikeExposure,
    };
    pub use crate::levels::{analyze_levels, KeyLevelAnalyzer, KeyLevelKind, KeyLevels};
    pub use crate::models::{greeks as bs_greeks, norm_cdf, norm_pdf};
    pub use crate::signals::{
        Bias, Recommendation, RecommendationGenerator, Regime, Statement,
    };

    // Engine
    pub use crate::engine::{AnalysisRequest, ExpirySelection, ExposureEngine, ExposureReport};
}

// Re-export main types at crate root
pub use crate::core::{ExposureError, ExposureResult};
pub use crate::engine::{AnalysisRequest, ExposureEngine, ExposureReport};
