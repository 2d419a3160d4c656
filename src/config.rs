//! Engine configuration
//!
//! Every section has a `Default`; a JSON file may override any subset of
//! fields.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{ExposureError, ExposureResult};
use crate::data::ProviderConfig;
use crate::exposure::{DealerPositioning, ExposureConfig, ExposureWeighting, PricingConfig};
use crate::signals::RecommendationConfig;

/// Configuration for the whole pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rate, dividend yield and day count
    pub pricing: PricingConfig,
    /// Weighting and dealer sign convention
    pub exposure: ExposureConfig,
    /// Support/resistance offsets
    pub recommendation: RecommendationConfig,
    /// HTTP settings for live data
    pub provider: ProviderConfig,
}

impl EngineConfig {
    /// Flow view: weight exposure by traded volume
    pub fn flow() -> Self {
        Self {
            exposure: ExposureConfig::volume_weighted(),
            ..Default::default()
        }
    }

    /// Dealers assumed short every option
    pub fn dealer_short() -> Self {
        Self {
            exposure: ExposureConfig::dealer_short(),
            ..Default::default()
        }
    }

    /// Preset by name: "default", "flow" or "dealer-short"
    pub fn preset(name: &str) -> ExposureResult<Self> {
        match name.to_lowercase().as_str() {
            "default" => Ok(Self::default()),
            "flow" => Ok(Self::flow()),
            "dealer-short" => Ok(Self::dealer_short()),
            other => Err(ExposureError::config(format!("unknown preset: {}", other))),
        }
    }

    /// Load from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> ExposureResult<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that make pricing meaningless
    pub fn validate(&self) -> ExposureResult<()> {
        if !(self.pricing.days_per_year > 0.0) {
            return Err(ExposureError::config("days_per_year must be positive"));
        }
        if self.pricing.expiry_close_hour_utc > 23 {
            return Err(ExposureError::config("expiry_close_hour_utc must be 0-23"));
        }
        let r = &self.recommendation;
        let offsets = [
            r.zero_dte_offset,
            r.weekly_offset,
            r.monthly_offset,
            r.leaps_offset,
            r.hedging_band,
        ];
        if offsets.iter().any(|o| !(0.0..1.0).contains(o)) {
            return Err(ExposureError::config("recommendation offsets must be in [0, 1)"));
        }
        Ok(())
    }

    /// One-line summary for logs
    pub fn describe(&self) -> String {
        let convention = match self.exposure.dealer_positioning {
            DealerPositioning::LongCallsShortPuts => "long calls / short puts",
            DealerPositioning::ShortCallsLongPuts => "short calls / long puts",
            DealerPositioning::ShortAll => "short all",
            DealerPositioning::LongAll => "long all",
        };
        let weighting = match self.exposure.weighting {
            ExposureWeighting::OpenInterest => "OI",
            ExposureWeighting::Volume => "volume",
        };
        format!(
            "r={} q={} weighting={} dealers={}",
            self.pricing.risk_free_rate, self.pricing.dividend_yield, weighting, convention
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_presets() {
        assert_eq!(EngineConfig::preset("default").unwrap(), EngineConfig::default());
        assert_eq!(
            EngineConfig::preset("FLOW").unwrap().exposure.weighting,
            ExposureWeighting::Volume
        );
        assert_eq!(
            EngineConfig::preset("dealer-short").unwrap().exposure.dealer_positioning,
            DealerPositioning::ShortAll
        );
        assert!(EngineConfig::preset("yolo").is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "pricing": {{"risk_free_rate": 0.045, "dividend_yield": 0.013,
                             "days_per_year": 365.0, "expiry_close_hour_utc": 21}},
                "exposure": {{"weighting": "Volume", "dealer_positioning": "ShortAll"}}
            }}"#
        )
        .unwrap();

        let config = EngineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.pricing.risk_free_rate, 0.045);
        assert_eq!(config.pricing.expiry_close_hour_utc, 21);
        assert_eq!(config.exposure.weighting, ExposureWeighting::Volume);
        assert_eq!(config.recommendation, RecommendationConfig::default());
        assert_eq!(config.provider, ProviderConfig::default());
    }

    #[test]
    fn test_rejects_invalid() {
        let mut config = EngineConfig::default();
        config.pricing.days_per_year = 0.0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.recommendation.weekly_offset = 1.5;
        assert!(config.validate().is_err());

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            EngineConfig::from_json_file(file.path()),
            Err(ExposureError::Serialization(_))
        ));
    }
}
