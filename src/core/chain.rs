//! Option chain snapshots
//!
//! An underlying plus every listed contract, across all expiries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::option::{OptionContract, Underlying};

/// In-memory chain snapshot for one underlying
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    /// Underlying at snapshot time
    pub underlying: Underlying,
    /// All contracts, any expiry
    pub contracts: Vec<OptionContract>,
}

impl ChainSnapshot {
    pub fn new(underlying: Underlying) -> Self {
        Self {
            underlying,
            contracts: Vec::new(),
        }
    }

    /// Add a contract
    pub fn add_contract(&mut self, contract: OptionContract) {
        self.contracts.push(contract);
    }

    /// Distinct expiries, ascending
    pub fn expiries(&self) -> Vec<NaiveDate> {
        let mut expiries: Vec<NaiveDate> = self.contracts.iter().map(|c| c.expiry).collect();
        expiries.sort();
        expiries.dedup();
        expiries
    }

    /// Contracts for one expiry, in snapshot order
    pub fn contracts_for(&self, expiry: NaiveDate) -> Vec<OptionContract> {
        self.contracts
            .iter()
            .filter(|c| c.expiry == expiry)
            .cloned()
            .collect()
    }

    /// Distinct strikes, ascending
    pub fn strikes(&self) -> Vec<f64> {
        let mut strikes: Vec<f64> = self.contracts.iter().map(|c| c.strike).collect();
        strikes.sort_by(|a, b| a.total_cmp(b));
        strikes.dedup();
        strikes
    }

    /// Total number of contracts
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionType;
    use chrono::Utc;

    #[test]
    fn test_expiries_and_strikes() {
        let underlying = Underlying::new("SPY", 500.0, Utc::now()).unwrap();
        let near = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
        let far = NaiveDate::from_ymd_opt(2025, 7, 18).unwrap();

        let mut snapshot = ChainSnapshot::new(underlying);
        snapshot.add_contract(OptionContract::new("SPY", far, 505.0, OptionType::Call, 0.2));
        snapshot.add_contract(OptionContract::new("SPY", near, 495.0, OptionType::Put, 0.2));
        snapshot.add_contract(OptionContract::new("SPY", near, 505.0, OptionType::Call, 0.2));

        assert_eq!(snapshot.expiries(), vec![near, far]);
        assert_eq!(snapshot.strikes(), vec![495.0, 505.0]);
        assert_eq!(snapshot.contracts_for(near).len(), 2);
        assert_eq!(snapshot.len(), 3);
    }
}
