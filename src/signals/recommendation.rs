//! Recommendation generator
//!
//! A fixed rule table over (regime, sign of net gamma, sign of net delta).
//! The narrative is a list of typed statements; each renders through one
//! template, so identical inputs always produce identical text.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Regime;
use crate::exposure::ExposureTotals;
use crate::levels::{KeyLevelKind, KeyLevels};

/// Sign of an aggregate exposure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExposureSign {
    Positive,
    Negative,
    Flat,
}

impl ExposureSign {
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            ExposureSign::Positive
        } else if value < 0.0 {
            ExposureSign::Negative
        } else {
            ExposureSign::Flat
        }
    }
}

/// Directional bias from total net delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

impl Bias {
    pub fn from_delta(sign: ExposureSign) -> Self {
        match sign {
            ExposureSign::Positive => Bias::Bullish,
            ExposureSign::Negative => Bias::Bearish,
            ExposureSign::Flat => Bias::Neutral,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Bias::Bullish => "Bullish",
            Bias::Bearish => "Bearish",
            Bias::Neutral => "Neutral",
        }
    }
}

/// Expected dealer behaviour for a regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegimeNote {
    AggressiveGammaHedging,
    PinningNearOpenInterest,
    SharpMovesThroughWalls,
    GammaDominatesPriceAction,
    FrequentDeltaAdjustment,
    MeanReversionToOpenInterest,
    VannaCharmSignificant,
    VolatilityAdjustment,
    DriftTowardMaxPain,
    DeltaHedgingPrimary,
    GradualAdjustment,
    SurfaceRepricing,
}

impl RegimeNote {
    /// Notes that always apply to a regime, in display order
    pub fn for_regime(regime: Regime) -> [RegimeNote; 3] {
        match regime {
            Regime::ZeroDte => [
                RegimeNote::AggressiveGammaHedging,
                RegimeNote::PinningNearOpenInterest,
                RegimeNote::SharpMovesThroughWalls,
            ],
            Regime::Weekly => [
                RegimeNote::GammaDominatesPriceAction,
                RegimeNote::FrequentDeltaAdjustment,
                RegimeNote::MeanReversionToOpenInterest,
            ],
            Regime::Monthly => [
                RegimeNote::VannaCharmSignificant,
                RegimeNote::VolatilityAdjustment,
                RegimeNote::DriftTowardMaxPain,
            ],
            Regime::Leaps => [
                RegimeNote::DeltaHedgingPrimary,
                RegimeNote::GradualAdjustment,
                RegimeNote::SurfaceRepricing,
            ],
        }
    }

    fn text(&self) -> &'static str {
        match self {
            RegimeNote::AggressiveGammaHedging => "Market makers will aggressively hedge gamma exposure",
            RegimeNote::PinningNearOpenInterest => "Expect pinning behavior near high open interest strikes",
            RegimeNote::SharpMovesThroughWalls => "Potential for sharp moves if price breaks through gamma walls",
            RegimeNote::GammaDominatesPriceAction => "Gamma exposure will dominate price action",
            RegimeNote::FrequentDeltaAdjustment => "Market makers will adjust delta hedges more frequently",
            RegimeNote::MeanReversionToOpenInterest => "Expect mean-reversion toward high open interest strikes",
            RegimeNote::VannaCharmSignificant => "Vanna and charm effects become more significant",
            RegimeNote::VolatilityAdjustment => "Market makers will adjust for volatility changes",
            RegimeNote::DriftTowardMaxPain => "Expect gradual moves toward max pain",
            RegimeNote::DeltaHedgingPrimary => "Delta hedging is the primary concern for market makers",
            RegimeNote::GradualAdjustment => "Expect more gradual adjustments to positions",
            RegimeNote::SurfaceRepricing => "Volatility surface changes will impact pricing",
        }
    }
}

/// What dealer gamma implies for realised volatility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolatilityOutlook {
    /// Long gamma: hedging sells rallies and buys dips
    Dampened,
    /// Short gamma: hedging chases the move
    Amplified,
    /// No net gamma to hedge
    Unchanged,
}

impl VolatilityOutlook {
    pub fn from_gamma(sign: ExposureSign) -> Self {
        match sign {
            ExposureSign::Positive => VolatilityOutlook::Dampened,
            ExposureSign::Negative => VolatilityOutlook::Amplified,
            ExposureSign::Flat => VolatilityOutlook::Unchanged,
        }
    }
}

/// Suggested approach for a (gamma, delta) combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tactic {
    BuyDipsTowardSupport,
    SellRalliesTowardResistance,
    FadeRangeExtremes,
    FollowBreakoutsHigher,
    FollowBreakdownsLower,
    OwnConvexity,
    WaitForConfirmation,
}

impl Tactic {
    pub fn select(gamma: ExposureSign, delta: ExposureSign) -> Self {
        use ExposureSign::*;
        match (gamma, delta) {
            (Positive, Positive) => Tactic::BuyDipsTowardSupport,
            (Positive, Negative) => Tactic::SellRalliesTowardResistance,
            (Positive, Flat) => Tactic::FadeRangeExtremes,
            (Negative, Positive) => Tactic::FollowBreakoutsHigher,
            (Negative, Negative) => Tactic::FollowBreakdownsLower,
            (Negative, Flat) => Tactic::OwnConvexity,
            (Flat, _) => Tactic::WaitForConfirmation,
        }
    }

    fn text(&self) -> &'static str {
        match self {
            Tactic::BuyDipsTowardSupport => "Buy dips toward support; dealer hedging absorbs selling",
            Tactic::SellRalliesTowardResistance => "Sell rallies toward resistance; dealer hedging caps upside",
            Tactic::FadeRangeExtremes => "Fade moves to the range extremes",
            Tactic::FollowBreakoutsHigher => "Follow breakouts above resistance; hedging adds to upside momentum",
            Tactic::FollowBreakdownsLower => "Follow breakdowns below support; hedging adds to downside momentum",
            Tactic::OwnConvexity => "Own convexity; expect outsized moves in either direction",
            Tactic::WaitForConfirmation => "Monitor gamma exposure changes near key levels before committing",
        }
    }
}

/// Preferred side of the volatility skew
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Skew {
    Call,
    Put,
}

/// One line of the recommendation narrative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Regime { regime: Regime, note: RegimeNote },
    GammaPosture { sign: ExposureSign, per_one_percent: f64 },
    DeltaPosture { sign: ExposureSign, contracts: f64 },
    Volatility(VolatilityOutlook),
    KeyLevel { kind: KeyLevelKind, price: f64 },
    SupportResistance { support: f64, resistance: f64 },
    HedgingFlows { lower: f64, upper: f64 },
    Tactic(Tactic),
    SkewPreference(Skew),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Regime { regime, note } => write!(f, "{}: {}", regime, note.text()),
            Statement::GammaPosture {
                sign,
                per_one_percent,
            } => {
                let label = match sign {
                    ExposureSign::Positive => "Positive",
                    ExposureSign::Negative => "Negative",
                    ExposureSign::Flat => "Flat",
                };
                write!(f, "Gamma exposure: {} (${:.2} per 1% move)", label, per_one_percent.abs())
            }
            Statement::DeltaPosture { sign, contracts } => {
                let label = match sign {
                    ExposureSign::Positive => "Long",
                    ExposureSign::Negative => "Short",
                    ExposureSign::Flat => "Flat",
                };
                write!(f, "Delta exposure: {} ({:.2} contracts)", label, contracts.abs())
            }
            Statement::Volatility(outlook) => {
                let text = match outlook {
                    VolatilityOutlook::Dampened => "Dealer hedging should dampen volatility",
                    VolatilityOutlook::Amplified => "Dealer hedging should amplify volatility",
                    VolatilityOutlook::Unchanged => "Dealer hedging is balanced; no volatility tilt",
                };
                f.write_str(text)
            }
            Statement::KeyLevel { kind, price } => write!(f, "{}: ${:.2}", kind.label(), price),
            Statement::SupportResistance {
                support,
                resistance,
            } => write!(f, "Key levels: ${:.2} (support), ${:.2} (resistance)", support, resistance),
            Statement::HedgingFlows { lower, upper } => {
                write!(f, "Watch for delta hedging flows at ${:.2} and ${:.2}", lower, upper)
            }
            Statement::Tactic(tactic) => f.write_str(tactic.text()),
            Statement::SkewPreference(skew) => match skew {
                Skew::Call => f.write_str("Consider call skew strategies"),
                Skew::Put => f.write_str("Consider put skew strategies"),
            },
        }
    }
}

/// Offsets used for the support/resistance band and the hedging-flow band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Default: 0.01
    pub zero_dte_offset: f64,
    /// Default: 0.03
    pub weekly_offset: f64,
    /// Default: 0.05
    pub monthly_offset: f64,
    /// Default: 0.10
    pub leaps_offset: f64,
    /// Half-width of the hedging-flow band
    /// Default: 0.02
    pub hedging_band: f64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            zero_dte_offset: 0.01,
            weekly_offset: 0.03,
            monthly_offset: 0.05,
            leaps_offset: 0.10,
            hedging_band: 0.02,
        }
    }
}

impl RecommendationConfig {
    pub fn offset(&self, regime: Regime) -> f64 {
        match regime {
            Regime::ZeroDte => self.zero_dte_offset,
            Regime::Weekly => self.weekly_offset,
            Regime::Monthly => self.monthly_offset,
            Regime::Leaps => self.leaps_offset,
        }
    }
}

/// Structured recommendation for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub regime: Regime,
    pub days_to_expiry: i64,
    pub bias: Bias,
    pub support_level: f64,
    pub resistance_level: f64,
    pub narrative: Vec<Statement>,
}

impl Recommendation {
    /// Rendered narrative, one line per statement
    pub fn lines(&self) -> Vec<String> {
        self.narrative.iter().map(|s| s.to_string()).collect()
    }
}

/// Maps regime, levels and net exposures to a [`Recommendation`]
#[derive(Debug, Clone, Default)]
pub struct RecommendationGenerator {
    config: RecommendationConfig,
}

impl RecommendationGenerator {
    pub fn new(config: RecommendationConfig) -> Self {
        Self { config }
    }

    pub fn generate(
        &self,
        regime: Regime,
        days_to_expiry: i64,
        spot: f64,
        totals: &ExposureTotals,
        levels: Option<&KeyLevels>,
    ) -> Recommendation {
        let gamma = ExposureSign::of(totals.net.gamma);
        let delta = ExposureSign::of(totals.net.delta);

        let offset = self.config.offset(regime);
        let support_level = spot * (1.0 - offset);
        let resistance_level = spot * (1.0 + offset);

        let mut narrative: Vec<Statement> = RegimeNote::for_regime(regime)
            .into_iter()
            .map(|note| Statement::Regime { regime, note })
            .collect();

        narrative.push(Statement::GammaPosture {
            sign: gamma,
            per_one_percent: totals.net.gamma,
        });
        narrative.push(Statement::DeltaPosture {
            sign: delta,
            contracts: totals.net.delta,
        });
        narrative.push(Statement::Volatility(VolatilityOutlook::from_gamma(gamma)));

        if let Some(levels) = levels {
            narrative.extend(
                levels
                    .entries()
                    .into_iter()
                    .map(|(kind, price)| Statement::KeyLevel { kind, price }),
            );
        }

        narrative.push(Statement::SupportResistance {
            support: support_level,
            resistance: resistance_level,
        });
        narrative.push(Statement::HedgingFlows {
            lower: spot * (1.0 - self.config.hedging_band),
            upper: spot * (1.0 + self.config.hedging_band),
        });
        narrative.push(Statement::Tactic(Tactic::select(gamma, delta)));
        narrative.push(Statement::SkewPreference(if delta == ExposureSign::Positive {
            Skew::Call
        } else {
            Skew::Put
        }));

        Recommendation {
            regime,
            days_to_expiry,
            bias: Bias::from_delta(delta),
            support_level,
            resistance_level,
            narrative,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(gamma: f64, delta: f64) -> ExposureTotals {
        let mut t = ExposureTotals::default();
        t.net.gamma = gamma;
        t.net.delta = delta;
        t
    }

    #[test]
    fn test_offsets_by_regime() {
        let gen = RecommendationGenerator::default();
        let cases = [
            (Regime::ZeroDte, 99.0, 101.0),
            (Regime::Weekly, 97.0, 103.0),
            (Regime::Monthly, 95.0, 105.0),
            (Regime::Leaps, 90.0, 110.0),
        ];
        for (regime, support, resistance) in cases {
            let rec = gen.generate(regime, 0, 100.0, &totals(1.0, 1.0), None);
            assert!((rec.support_level - support).abs() < 1e-9);
            assert!((rec.resistance_level - resistance).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bias_and_tactic_follow_signs() {
        let gen = RecommendationGenerator::default();

        let rec = gen.generate(Regime::Weekly, 3, 100.0, &totals(5.0, -2.0), None);
        assert_eq!(rec.bias, Bias::Bearish);
        assert!(rec
            .narrative
            .contains(&Statement::Tactic(Tactic::SellRalliesTowardResistance)));
        assert!(rec.narrative.contains(&Statement::SkewPreference(Skew::Put)));
        assert!(rec
            .narrative
            .contains(&Statement::Volatility(VolatilityOutlook::Dampened)));

        let rec = gen.generate(Regime::Weekly, 3, 100.0, &totals(-5.0, 2.0), None);
        assert_eq!(rec.bias, Bias::Bullish);
        assert!(rec
            .narrative
            .contains(&Statement::Tactic(Tactic::FollowBreakoutsHigher)));
        assert!(rec.narrative.contains(&Statement::SkewPreference(Skew::Call)));

        let rec = gen.generate(Regime::Weekly, 3, 100.0, &totals(0.0, 0.0), None);
        assert_eq!(rec.bias, Bias::Neutral);
        assert!(rec
            .narrative
            .contains(&Statement::Tactic(Tactic::WaitForConfirmation)));
    }

    #[test]
    fn test_narrative_includes_levels() {
        let levels = KeyLevels {
            gamma_flip: Some(101.5),
            max_pain: 100.0,
            call_wall: 105.0,
            put_wall: 95.0,
            max_gamma_strike: 100.0,
            highest_open_interest_strike: 100.0,
        };
        let rec = RecommendationGenerator::default().generate(
            Regime::ZeroDte,
            0,
            100.0,
            &totals(1.0, 1.0),
            Some(&levels),
        );

        let lines = rec.lines();
        assert_eq!(lines[0], "0DTE: Market makers will aggressively hedge gamma exposure");
        assert!(lines.contains(&"Gamma Flip: $101.50".to_string()));
        assert!(lines.contains(&"Key levels: $99.00 (support), $101.00 (resistance)".to_string()));
        assert!(lines.contains(&"Watch for delta hedging flows at $98.00 and $102.00".to_string()));
    }

    #[test]
    fn test_deterministic() {
        let gen = RecommendationGenerator::default();
        let a = gen.generate(Regime::Monthly, 12, 432.1, &totals(-3.2, 7.7), None);
        let b = gen.generate(Regime::Monthly, 12, 432.1, &totals(-3.2, 7.7), None);
        assert_eq!(a, b);
        assert_eq!(a.lines(), b.lines());
    }
}
