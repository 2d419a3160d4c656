//! Greek Exposure by Strike
//!
//! Turns a chain snapshot into dealer exposure curves.
//!
//! Two stages:
//! 1. **Greeks calculator**: price every valid contract (parallel, stateless),
//!    report every excluded one with a reason
//! 2. **Aggregator**: weight each Greek by open interest (or volume) and the
//!    contract multiplier, then sum per strike for calls, puts and net
//!
//! Conventions:
//! - Delta exposure is in contract-equivalents: `Σ delta × weight × multiplier`
//! - Gamma, vanna and charm are per 1% spot move:
//!   `Σ greek × weight × multiplier × spot² × 0.01`

mod aggregator;
mod calculator;
mod config;

pub use aggregator::*;
pub use calculator::*;
pub use config::*;

use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::core::{ExclusionReason, Greek, GreekSet, OptionContract};

/// A contract with the Greeks computed for one (spot, as-of) snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedContract {
    pub contract: OptionContract,
    /// Years to expiry used for pricing
    pub time_to_expiry: f64,
    pub greeks: GreekSet,
}

/// A contract left out of aggregation, and why
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedContract {
    pub contract: OptionContract,
    pub reason: ExclusionReason,
}

/// Output of the Greeks calculator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainGreeks {
    pub priced: Vec<PricedContract>,
    pub excluded: Vec<ExcludedContract>,
}

impl ChainGreeks {
    pub fn is_empty(&self) -> bool {
        self.priced.is_empty()
    }
}

/// Exposure value per Greek
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GreekExposure {
    pub delta: f64,
    pub gamma: f64,
    pub vanna: f64,
    pub charm: f64,
}

impl GreekExposure {
    pub fn get(&self, greek: Greek) -> f64 {
        match greek {
            Greek::Delta => self.delta,
            Greek::Gamma => self.gamma,
            Greek::Vanna => self.vanna,
            Greek::Charm => self.charm,
        }
    }
}

impl Add for GreekExposure {
    type Output = GreekExposure;

    fn add(self, other: GreekExposure) -> GreekExposure {
        GreekExposure {
            delta: self.delta + other.delta,
            gamma: self.gamma + other.gamma,
            vanna: self.vanna + other.vanna,
            charm: self.charm + other.charm,
        }
    }
}

impl AddAssign for GreekExposure {
    fn add_assign(&mut self, other: GreekExposure) {
        *self = *self + other;
    }
}

/// One row of the strike ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrikeExposure {
    /// Strike price
    pub strike: f64,
    /// Summed call-side exposure
    pub call: GreekExposure,
    /// Summed put-side exposure
    pub put: GreekExposure,
    /// Dealer net exposure
    pub net: GreekExposure,
    /// Call open interest at this strike
    pub open_interest_calls: u64,
    /// Put open interest at this strike
    pub open_interest_puts: u64,
    /// Call volume at this strike
    pub volume_calls: u64,
    /// Put volume at this strike
    pub volume_puts: u64,
}

impl StrikeExposure {
    pub fn empty(strike: f64) -> Self {
        Self {
            strike,
            call: GreekExposure::default(),
            put: GreekExposure::default(),
            net: GreekExposure::default(),
            open_interest_calls: 0,
            open_interest_puts: 0,
            volume_calls: 0,
            volume_puts: 0,
        }
    }

    /// Calls plus puts open interest
    pub fn total_open_interest(&self) -> u64 {
        self.open_interest_calls + self.open_interest_puts
    }

    /// Calls plus puts volume
    pub fn total_volume(&self) -> u64 {
        self.volume_calls + self.volume_puts
    }

    /// Add another row for the same strike
    pub fn absorb(&mut self, other: &StrikeExposure) {
        self.call += other.call;
        self.put += other.put;
        self.net += other.net;
        self.open_interest_calls += other.open_interest_calls;
        self.open_interest_puts += other.open_interest_puts;
        self.volume_calls += other.volume_calls;
        self.volume_puts += other.volume_puts;
    }
}

/// Ladder-wide sums
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExposureTotals {
    pub call: GreekExposure,
    pub put: GreekExposure,
    pub net: GreekExposure,
    pub open_interest_calls: u64,
    pub open_interest_puts: u64,
    pub volume_calls: u64,
    pub volume_puts: u64,
    /// Put OI / call OI, `None` without call open interest
    pub put_call_ratio: Option<f64>,
}

impl ExposureTotals {
    pub fn from_ladder(ladder: &[StrikeExposure]) -> Self {
        let mut totals = ladder.iter().fold(ExposureTotals::default(), |mut acc, row| {
            acc.call += row.call;
            acc.put += row.put;
            acc.net += row.net;
            acc.open_interest_calls += row.open_interest_calls;
            acc.open_interest_puts += row.open_interest_puts;
            acc.volume_calls += row.volume_calls;
            acc.volume_puts += row.volume_puts;
            acc
        });

        totals.put_call_ratio = if totals.open_interest_calls > 0 {
            Some(totals.open_interest_puts as f64 / totals.open_interest_calls as f64)
        } else {
            None
        };
        totals
    }
}
