//! Key Levels from the Strike Ladder
//!
//! Reduces a per-strike exposure ladder to a handful of prices that dealer
//! hedging tends to respect:
//! - **Gamma flip**: where cumulative net gamma changes sign
//! - **Max pain**: strike minimising the total payout to option holders
//! - **Call / put wall**: largest call / put open interest
//! - **Max gamma**: largest absolute net gamma
//! - **Highest open interest**: largest calls + puts open interest
//!
//! Every level except the flip is an existing ladder strike. Ties go to the
//! strike closer to spot, then to the lower strike.

mod analyzer;
mod flip;
mod pain;
mod walls;

pub use analyzer::*;
pub use flip::*;
pub use pain::*;
pub use walls::*;

use serde::{Deserialize, Serialize};

/// Kind of key level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyLevelKind {
    GammaFlip,
    MaxPain,
    CallWall,
    PutWall,
    MaxGamma,
    HighestOpenInterest,
}

impl KeyLevelKind {
    /// Label for display
    pub fn label(&self) -> &'static str {
        match self {
            KeyLevelKind::GammaFlip => "Gamma Flip",
            KeyLevelKind::MaxPain => "Max Pain",
            KeyLevelKind::CallWall => "Call Wall",
            KeyLevelKind::PutWall => "Put Wall",
            KeyLevelKind::MaxGamma => "Max Gamma",
            KeyLevelKind::HighestOpenInterest => "Highest OI",
        }
    }
}

/// Levels derived from one ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyLevels {
    /// Interpolated price where cumulative net gamma changes sign
    pub gamma_flip: Option<f64>,
    pub max_pain: f64,
    pub call_wall: f64,
    pub put_wall: f64,
    pub max_gamma_strike: f64,
    pub highest_open_interest_strike: f64,
}

impl KeyLevels {
    pub fn get(&self, kind: KeyLevelKind) -> Option<f64> {
        match kind {
            KeyLevelKind::GammaFlip => self.gamma_flip,
            KeyLevelKind::MaxPain => Some(self.max_pain),
            KeyLevelKind::CallWall => Some(self.call_wall),
            KeyLevelKind::PutWall => Some(self.put_wall),
            KeyLevelKind::MaxGamma => Some(self.max_gamma_strike),
            KeyLevelKind::HighestOpenInterest => Some(self.highest_open_interest_strike),
        }
    }

    /// Present levels in a fixed order
    pub fn entries(&self) -> Vec<(KeyLevelKind, f64)> {
        [
            KeyLevelKind::GammaFlip,
            KeyLevelKind::MaxPain,
            KeyLevelKind::CallWall,
            KeyLevelKind::PutWall,
            KeyLevelKind::MaxGamma,
            KeyLevelKind::HighestOpenInterest,
        ]
        .into_iter()
        .filter_map(|kind| self.get(kind).map(|price| (kind, price)))
        .collect()
    }
}

/// True when `candidate` beats `best` under the shared tie rule
///
/// Higher score wins; equal scores go to the strike closer to spot, then to
/// the lower strike.
pub(crate) fn beats(candidate: (f64, f64), best: (f64, f64), spot: f64) -> bool {
    let (score, strike) = candidate;
    let (best_score, best_strike) = best;

    score
        .total_cmp(&best_score)
        .then_with(|| (best_strike - spot).abs().total_cmp(&(strike - spot).abs()))
        .then_with(|| best_strike.total_cmp(&strike))
        .is_gt()
}
