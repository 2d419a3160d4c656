//! In-memory chain snapshots
//!
//! Serves previously captured chains, for offline analysis and tests.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::MarketDataProvider;
use crate::core::{ChainSnapshot, ExposureError, ExposureResult, OptionContract, Underlying};

/// Provider backed by snapshots held in memory, keyed by upper-case symbol
#[derive(Debug, Clone, Default)]
pub struct SnapshotProvider {
    snapshots: BTreeMap<String, ChainSnapshot>,
}

/// On-disk layout: a single snapshot or a list of them
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Many(Vec<ChainSnapshot>),
    One(ChainSnapshot),
}

impl SnapshotProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshots(snapshots: impl IntoIterator<Item = ChainSnapshot>) -> Self {
        let mut provider = Self::new();
        for snapshot in snapshots {
            provider.insert(snapshot);
        }
        provider
    }

    /// Load snapshots from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> ExposureResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let file: SnapshotFile = serde_json::from_str(&contents)?;

        let snapshots = match file {
            SnapshotFile::Many(list) => list,
            SnapshotFile::One(single) => vec![single],
        };
        for snapshot in &snapshots {
            snapshot.underlying.validate()?;
        }
        tracing::info!("Loaded {} snapshot(s) from {:?}", snapshots.len(), path);
        Ok(Self::from_snapshots(snapshots))
    }

    /// Add or replace the snapshot for its symbol
    pub fn insert(&mut self, snapshot: ChainSnapshot) {
        let key = snapshot.underlying.symbol.to_ascii_uppercase();
        self.snapshots.insert(key, snapshot);
    }

    /// Symbols held, sorted
    pub fn symbols(&self) -> Vec<String> {
        self.snapshots.keys().cloned().collect()
    }

    fn snapshot(&self, symbol: &str) -> ExposureResult<&ChainSnapshot> {
        self.snapshots
            .get(&symbol.to_ascii_uppercase())
            .ok_or_else(|| ExposureError::provider_unavailable(symbol, "no snapshot loaded"))
    }
}

impl MarketDataProvider for SnapshotProvider {
    fn name(&self) -> &str {
        "snapshot"
    }

    fn get_spot(&self, symbol: &str) -> ExposureResult<Underlying> {
        Ok(self.snapshot(symbol)?.underlying.clone())
    }

    fn get_option_chain(
        &self,
        symbol: &str,
        expiry: NaiveDate,
    ) -> ExposureResult<Vec<OptionContract>> {
        Ok(self.snapshot(symbol)?.contracts_for(expiry))
    }

    fn list_expiries(&self, symbol: &str) -> ExposureResult<Vec<NaiveDate>> {
        Ok(self.snapshot(symbol)?.expiries())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionType;
    use chrono::{TimeZone, Utc};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn snapshot(symbol: &str, spot: f64) -> ChainSnapshot {
        let as_of = Utc.with_ymd_and_hms(2025, 6, 2, 15, 0, 0).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
        let mut snap = ChainSnapshot::new(Underlying::new(symbol, spot, as_of).unwrap());
        snap.add_contract(
            OptionContract::new(symbol, expiry, spot, OptionType::Call, 0.2)
                .with_open_interest(10)
                .with_volume(1),
        );
        snap
    }

    #[test]
    fn test_serves_snapshot() {
        let provider = SnapshotProvider::from_snapshots([snapshot("SPY", 500.0)]);

        assert_eq!(provider.get_spot("spy").unwrap().spot, 500.0);
        let expiries = provider.list_expiries("SPY").unwrap();
        assert_eq!(expiries.len(), 1);
        assert_eq!(provider.get_option_chain("SPY", expiries[0]).unwrap().len(), 1);
        assert!(provider
            .get_option_chain("SPY", NaiveDate::from_ymd_opt(2025, 7, 18).unwrap())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_unknown_symbol() {
        let provider = SnapshotProvider::new();
        let err = provider.get_spot("QQQ").unwrap_err();
        assert!(err.is_provider_failure());
    }

    #[test]
    fn test_load_from_json_file() {
        let snapshots = vec![snapshot("SPY", 500.0), snapshot("QQQ", 440.0)];
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&snapshots).unwrap().as_bytes())
            .unwrap();

        let provider = SnapshotProvider::from_json_file(file.path()).unwrap();
        assert_eq!(provider.symbols(), vec!["QQQ".to_string(), "SPY".to_string()]);
        assert_eq!(provider.get_spot("QQQ").unwrap(), snapshots[1].underlying);
    }

    #[test]
    fn test_load_single_snapshot() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&snapshot("IWM", 210.0)).unwrap().as_bytes())
            .unwrap();

        let provider = SnapshotProvider::from_json_file(file.path()).unwrap();
        assert_eq!(provider.symbols(), vec!["IWM".to_string()]);
    }

    #[test]
    fn test_rejects_non_positive_spot() {
        let mut bad = snapshot("SPY", 500.0);
        bad.underlying.spot = -5.0;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&bad).unwrap().as_bytes())
            .unwrap();

        let result = SnapshotProvider::from_json_file(file.path());
        assert!(matches!(result, Err(ExposureError::InvalidInput(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = SnapshotProvider::from_json_file(dir.path().join("missing.json"));
        assert!(matches!(result, Err(ExposureError::IO(_))));
    }
}
