//! Expiry regime classification

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{days_to_expiry, ExposureError, ExposureResult};

/// Time-to-expiry regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Regime {
    /// Expires today
    ZeroDte,
    /// 1 to 7 days
    Weekly,
    /// 8 to 30 days
    Monthly,
    /// More than 30 days
    Leaps,
}

impl Regime {
    /// Classify whole days to expiry
    pub fn from_days(days: i64) -> ExposureResult<Self> {
        match days {
            d if d < 0 => Err(ExposureError::InvalidRegimeInput { days }),
            0 => Ok(Regime::ZeroDte),
            1..=7 => Ok(Regime::Weekly),
            8..=30 => Ok(Regime::Monthly),
            _ => Ok(Regime::Leaps),
        }
    }

    /// Classify an expiry seen from `as_of`, returning the day count as well
    pub fn for_expiry(
        expiry: NaiveDate,
        as_of: DateTime<Utc>,
        close_hour_utc: u32,
    ) -> ExposureResult<(Self, i64)> {
        let days = days_to_expiry(expiry, as_of, close_hour_utc);
        Ok((Self::from_days(days)?, days))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Regime::ZeroDte => "0DTE",
            Regime::Weekly => "Weekly",
            Regime::Monthly => "Monthly",
            Regime::Leaps => "LEAPS",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_boundaries() {
        assert_eq!(Regime::from_days(0).unwrap(), Regime::ZeroDte);
        assert_eq!(Regime::from_days(1).unwrap(), Regime::Weekly);
        assert_eq!(Regime::from_days(7).unwrap(), Regime::Weekly);
        assert_eq!(Regime::from_days(8).unwrap(), Regime::Monthly);
        assert_eq!(Regime::from_days(30).unwrap(), Regime::Monthly);
        assert_eq!(Regime::from_days(31).unwrap(), Regime::Leaps);
        assert_eq!(Regime::from_days(400).unwrap(), Regime::Leaps);
    }

    #[test]
    fn test_negative_days_rejected() {
        assert!(matches!(
            Regime::from_days(-1),
            Err(ExposureError::InvalidRegimeInput { days: -1 })
        ));
    }

    #[test]
    fn test_for_expiry() {
        let expiry = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();

        let same_day = Utc.with_ymd_and_hms(2025, 6, 20, 15, 0, 0).unwrap();
        assert_eq!(Regime::for_expiry(expiry, same_day, 20).unwrap(), (Regime::ZeroDte, 0));

        let month_out = Utc.with_ymd_and_hms(2025, 5, 21, 20, 0, 0).unwrap();
        assert_eq!(Regime::for_expiry(expiry, month_out, 20).unwrap(), (Regime::Monthly, 30));

        let after = Utc.with_ymd_and_hms(2025, 6, 21, 15, 0, 0).unwrap();
        assert!(Regime::for_expiry(expiry, after, 20).is_err());
    }
}
