//! Market data collaborator

use chrono::NaiveDate;

use crate::core::{ExposureResult, OptionContract, Underlying};

/// Source of spot prices and option chains
///
/// Implementations make one attempt per call; retry policy belongs to the
/// caller. Failures surface as [`crate::core::ExposureError::ProviderUnavailable`].
pub trait MarketDataProvider: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Current spot for `symbol`
    fn get_spot(&self, symbol: &str) -> ExposureResult<Underlying>;

    /// Every listed contract of `symbol` expiring on `expiry`
    fn get_option_chain(&self, symbol: &str, expiry: NaiveDate)
        -> ExposureResult<Vec<OptionContract>>;

    /// Listed expiries, ascending
    fn list_expiries(&self, symbol: &str) -> ExposureResult<Vec<NaiveDate>>;
}
