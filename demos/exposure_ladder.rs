//! Example: Exposure ladder for a synthetic chain
//!
//! Run with: cargo run --example exposure_ladder

use chrono::{Duration, Utc};
use dealer_exposure::prelude::*;

fn main() {
    // Synthetic chain: strikes 480..520 around spot 500, one expiry 5 days out
    let spot = 500.0;
    let as_of = Utc::now();
    let expiry = (as_of + Duration::days(5)).date_naive();
    let underlying = Underlying::new("SPY", spot, as_of).unwrap();

    let mut contracts = Vec::new();
    for i in 0..9 {
        let strike = 480.0 + 5.0 * i as f64;
        let moneyness: f64 = (strike - spot) / spot;

        // Put skew: vol rises below spot
        let vol = 0.18 - 0.6 * moneyness.min(0.0) + 0.2 * moneyness.max(0.0);

        // Calls stacked above spot, puts below
        let call_oi = (2_000.0 * (1.0 + 20.0 * moneyness.max(0.0))) as u64;
        let put_oi = (2_000.0 * (1.0 + 30.0 * (-moneyness).max(0.0))) as u64;

        contracts.push(
            OptionContract::new("SPY", expiry, strike, OptionType::Call, vol)
                .with_open_interest(call_oi)
                .with_volume(call_oi / 4),
        );
        contracts.push(
            OptionContract::new("SPY", expiry, strike, OptionType::Put, vol)
                .with_open_interest(put_oi)
                .with_volume(put_oi / 4),
        );
    }

    // One bad quote to show exclusion reporting
    contracts.push(
        OptionContract::new("SPY", expiry, 500.0, OptionType::Call, 0.0)
            .with_open_interest(10)
            .with_volume(1),
    );

    let engine = ExposureEngine::default();
    let report = match engine.analyze(&underlying, &[expiry], &contracts) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Analysis failed: {}", e);
            return;
        }
    };

    println!("Exposure Ladder ({}, spot ${:.2}, expiry {})", report.regime, spot, expiry);
    println!("{}", "=".repeat(72));
    println!(
        "{:>8} {:>14} {:>16} {:>14} {:>14}",
        "Strike", "Net Delta", "Net Gamma/1%", "Net Vanna", "Net Charm"
    );
    for row in &report.ladder {
        println!(
            "{:>8.0} {:>14.0} {:>16.0} {:>14.0} {:>14.0}",
            row.strike, row.net.delta, row.net.gamma, row.net.vanna, row.net.charm
        );
    }

    for excluded in &report.excluded {
        println!("\nExcluded {}: {}", excluded.contract.describe(), excluded.reason);
    }

    if let Ok(levels) = report.key_levels() {
        println!("\nKey Levels:");
        for (kind, price) in levels.entries() {
            println!("  {:<12} {:.2}", kind.label(), price);
        }
    }

    println!("\nRecommendation ({}):", report.recommendation.bias.label());
    for line in report.recommendation.lines() {
        println!("  - {}", line);
    }
}
