//! Option contract definitions
//!
//! The underlying snapshot and the per-strike/expiry/type contracts that make
//! up a chain.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{ExposureError, ExposureResult};

/// Default contract multiplier for equity and index options
pub const DEFAULT_MULTIPLIER: u32 = 100;

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Intrinsic value at given spot
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

/// Underlying snapshot for one analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Underlying {
    /// Ticker symbol (e.g., "SPY", "SPX")
    pub symbol: String,
    /// Spot price
    pub spot: f64,
    /// Time the snapshot was taken
    pub as_of: DateTime<Utc>,
}

impl Underlying {
    pub fn new(symbol: impl Into<String>, spot: f64, as_of: DateTime<Utc>) -> ExposureResult<Self> {
        let underlying = Self {
            symbol: symbol.into(),
            spot,
            as_of,
        };
        underlying.validate()?;
        Ok(underlying)
    }

    /// Reject a non-positive or non-finite spot
    ///
    /// Needed for values built without [`Underlying::new`], e.g. deserialized.
    pub fn validate(&self) -> ExposureResult<()> {
        if !self.spot.is_finite() || self.spot <= 0.0 {
            return Err(ExposureError::invalid_input(format!(
                "spot for {} must be positive, got {}",
                self.symbol, self.spot
            )));
        }
        Ok(())
    }
}

/// Why a contract was left out of aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExclusionReason {
    /// Implied volatility is zero, negative or not a number
    NonPositiveVolatility,
    /// Expiry lies before the as-of time
    Expired,
    /// No open interest reported
    MissingOpenInterest,
    /// No traded volume reported
    MissingVolume,
    /// Strike is zero, negative or not a number
    NonPositiveStrike,
    /// Multiplier of zero
    ZeroMultiplier,
    /// Contract belongs to another underlying
    SymbolMismatch,
    /// Same (symbol, expiry, strike, type) already seen earlier in the chain
    Duplicate,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ExclusionReason::NonPositiveVolatility => "implied volatility must be positive",
            ExclusionReason::Expired => "contract expired before as-of time",
            ExclusionReason::MissingOpenInterest => "open interest missing",
            ExclusionReason::MissingVolume => "volume missing",
            ExclusionReason::NonPositiveStrike => "strike must be positive",
            ExclusionReason::ZeroMultiplier => "contract multiplier must be positive",
            ExclusionReason::SymbolMismatch => "contract symbol does not match underlying",
            ExclusionReason::Duplicate => "duplicate strike/expiry/type",
        };
        f.write_str(text)
    }
}

/// Option contract with the chain snapshot fields needed for
/// exposure analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Underlying symbol
    pub symbol: String,
    /// Expiration date
    pub expiry: NaiveDate,
    /// Strike price
    pub strike: f64,
    /// Option type (Call/Put)
    pub option_type: OptionType,
    /// Open interest, `None` when the feed did not report it
    pub open_interest: Option<u64>,
    /// Traded volume, `None` when the feed did not report it
    pub volume: Option<u64>,
    /// Implied volatility (annualized, decimal)
    pub implied_vol: f64,
    /// Contract multiplier
    #[serde(default = "default_multiplier")]
    pub multiplier: u32,
    /// Contract symbol (exchange-specific)
    #[serde(default)]
    pub contract_symbol: Option<String>,
}

fn default_multiplier() -> u32 {
    DEFAULT_MULTIPLIER
}

impl OptionContract {
    pub fn new(
        symbol: impl Into<String>,
        expiry: NaiveDate,
        strike: f64,
        option_type: OptionType,
        implied_vol: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            expiry,
            strike,
            option_type,
            open_interest: None,
            volume: None,
            implied_vol,
            multiplier: DEFAULT_MULTIPLIER,
            contract_symbol: None,
        }
    }

    pub fn with_open_interest(mut self, open_interest: u64) -> Self {
        self.open_interest = Some(open_interest);
        self
    }

    pub fn with_volume(mut self, volume: u64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Key used for the chain uniqueness invariant, symbol case-folded
    pub fn key(&self) -> ContractKey {
        ContractKey {
            symbol: self.symbol.to_ascii_uppercase(),
            expiry: self.expiry,
            strike_bits: self.strike.to_bits(),
            option_type: self.option_type,
        }
    }

    /// Human-readable identifier, e.g. "SPY 2025-06-20 500 call"
    pub fn describe(&self) -> String {
        match &self.contract_symbol {
            Some(s) => s.clone(),
            None => format!(
                "{} {} {} {}",
                self.symbol,
                self.expiry,
                self.strike,
                self.option_type.label()
            ),
        }
    }

    /// Time to expiry in years from `as_of`, negative once expired
    pub fn time_to_expiry(&self, as_of: DateTime<Utc>, close_hour_utc: u32, days_per_year: f64) -> f64 {
        let remaining = expiry_close(self.expiry, close_hour_utc) - as_of;
        remaining.num_seconds() as f64 / (days_per_year * SECONDS_PER_DAY)
    }
}

/// Identity of a contract within a chain
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractKey {
    pub symbol: String,
    pub expiry: NaiveDate,
    pub strike_bits: u64,
    pub option_type: OptionType,
}

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Instant at which contracts expiring on `expiry` stop trading
pub fn expiry_close(expiry: NaiveDate, close_hour_utc: u32) -> DateTime<Utc> {
    let close = NaiveTime::from_hms_opt(close_hour_utc.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    expiry.and_time(close).and_utc()
}

/// Whole days from `as_of` until the expiry close, floored
pub fn days_to_expiry(expiry: NaiveDate, as_of: DateTime<Utc>, close_hour_utc: u32) -> i64 {
    let remaining: Duration = expiry_close(expiry, close_hour_utc) - as_of;
    remaining.num_seconds().div_euclid(SECONDS_PER_DAY as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 20).unwrap()
    }

    #[test]
    fn test_option_type() {
        assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
    }

    #[test]
    fn test_underlying_rejects_bad_spot() {
        let now = Utc::now();
        assert!(Underlying::new("SPY", 0.0, now).is_err());
        assert!(Underlying::new("SPY", -1.0, now).is_err());
        assert!(Underlying::new("SPY", f64::NAN, now).is_err());
        assert!(Underlying::new("SPY", 500.0, now).is_ok());
    }

    #[test]
    fn test_time_to_expiry() {
        let opt = OptionContract::new("QQQ", expiry(), 500.0, OptionType::Call, 0.2);
        let as_of = Utc.with_ymd_and_hms(2025, 5, 21, 20, 0, 0).unwrap();

        // Exactly 30 days before the 20:00 UTC close
        let tte = opt.time_to_expiry(as_of, 20, 365.0);
        assert!((tte - 30.0 / 365.0).abs() < 1e-12);
    }

    #[test]
    fn test_days_to_expiry_floors() {
        // Same morning as expiry: less than a day left
        let morning = Utc.with_ymd_and_hms(2025, 6, 20, 14, 30, 0).unwrap();
        assert_eq!(days_to_expiry(expiry(), morning, 20), 0);

        // One day and a bit
        let day_before = Utc.with_ymd_and_hms(2025, 6, 19, 14, 30, 0).unwrap();
        assert_eq!(days_to_expiry(expiry(), day_before, 20), 1);

        // After the close the count goes negative
        let after_close = Utc.with_ymd_and_hms(2025, 6, 20, 21, 0, 0).unwrap();
        assert_eq!(days_to_expiry(expiry(), after_close, 20), -1);
    }

    #[test]
    fn test_contract_key_distinguishes_type() {
        let call = OptionContract::new("SPY", expiry(), 500.0, OptionType::Call, 0.2);
        let put = OptionContract::new("SPY", expiry(), 500.0, OptionType::Put, 0.2);
        assert_ne!(call.key(), put.key());
        assert_eq!(call.key(), call.clone().with_open_interest(5).key());
    }

    #[test]
    fn test_contract_key_ignores_symbol_case() {
        let upper = OptionContract::new("SPY", expiry(), 500.0, OptionType::Call, 0.2);
        let lower = OptionContract::new("spy", expiry(), 500.0, OptionType::Call, 0.2);
        assert_eq!(upper.key(), lower.key());
    }
}
