//! Configuration for Greek computation and exposure aggregation

use serde::{Deserialize, Serialize};

/// Market inputs shared by every contract in a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Continuously compounded risk-free rate
    /// Default: 0.0
    pub risk_free_rate: f64,

    /// Continuous dividend yield of the underlying
    /// Default: 0.0
    pub dividend_yield: f64,

    /// Day count for converting time to expiry into years
    /// Default: 365.0
    pub days_per_year: f64,

    /// Hour (UTC) at which a contract stops trading on its expiry date
    /// Default: 20 (16:00 New York during daylight saving time)
    pub expiry_close_hour_utc: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.0,
            dividend_yield: 0.0,
            days_per_year: 365.0,
            expiry_close_hour_utc: 20,
        }
    }
}

/// Quantity each contract's Greeks are weighted by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExposureWeighting {
    /// Outstanding contracts (positioning)
    #[default]
    OpenInterest,
    /// Contracts traded today (flow)
    Volume,
}

impl ExposureWeighting {
    pub fn label(&self) -> &'static str {
        match self {
            ExposureWeighting::OpenInterest => "Open Interest",
            ExposureWeighting::Volume => "Traded Volume",
        }
    }
}

/// Assumed dealer position on each side, which sets how call and put
/// gamma/vanna/charm combine into the net curve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealerPositioning {
    /// Customers sell calls and buy puts: net = call - put
    #[default]
    LongCallsShortPuts,
    /// Customers buy calls and sell puts: net = put - call
    ShortCallsLongPuts,
    /// Dealers short every option: net = -(call + put)
    ShortAll,
    /// Dealers long every option: net = call + put
    LongAll,
}

impl DealerPositioning {
    /// (call sign, put sign)
    pub fn signs(&self) -> (f64, f64) {
        match self {
            DealerPositioning::LongCallsShortPuts => (1.0, -1.0),
            DealerPositioning::ShortCallsLongPuts => (-1.0, 1.0),
            DealerPositioning::ShortAll => (-1.0, -1.0),
            DealerPositioning::LongAll => (1.0, 1.0),
        }
    }
}

/// Configuration for the exposure aggregator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposureConfig {
    /// Open interest or volume weighting
    pub weighting: ExposureWeighting,
    /// Dealer sign convention for gamma, vanna and charm
    pub dealer_positioning: DealerPositioning,
}

impl ExposureConfig {
    /// Flow view: weight by today's traded volume
    pub fn volume_weighted() -> Self {
        Self {
            weighting: ExposureWeighting::Volume,
            ..Default::default()
        }
    }

    /// Dealers assumed short every option
    pub fn dealer_short() -> Self {
        Self {
            dealer_positioning: DealerPositioning::ShortAll,
            ..Default::default()
        }
    }
}
