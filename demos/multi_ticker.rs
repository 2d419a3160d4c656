//! Example: Aggregated exposure for several tickers from Yahoo Finance
//!
//! Run with: cargo run --example multi_ticker
//!
//! Requires network access. A failing ticker does not stop the others.

use dealer_exposure::logging::{init_logging, LogFormat};
use dealer_exposure::prelude::*;

fn main() {
    let _ = init_logging(LogFormat::Compact, "info");

    let config = EngineConfig::default();
    let provider = match YahooProvider::new(&config.provider) {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!("Could not create provider: {}", e);
            return;
        }
    };
    let engine = ExposureEngine::new(config);

    let requests: Vec<AnalysisRequest> = ["SPY", "QQQ", "IWM"]
        .into_iter()
        .map(|symbol| AnalysisRequest::new(symbol, ExpirySelection::All))
        .collect();

    for (symbol, result) in engine.analyze_many(&provider, &requests) {
        match result {
            Ok(report) => {
                let totals = &report.totals;
                println!(
                    "{:<5} spot {:>9.2} | {} expiries | net gamma {:>14.0} per 1% | net delta {:>12.0} | {}",
                    symbol,
                    report.underlying.spot,
                    report.expiries.len(),
                    totals.net.gamma,
                    totals.net.delta,
                    report.recommendation.bias.label()
                );
                if let Some(levels) = &report.key_levels {
                    println!(
                        "      flip {} | max pain {:.0} | call wall {:.0} | put wall {:.0} | highest OI {:.0}",
                        levels
                            .gamma_flip
                            .map(|f| format!("{:.2}", f))
                            .unwrap_or_else(|| "none".to_string()),
                        levels.max_pain,
                        levels.call_wall,
                        levels.put_wall,
                        levels.highest_open_interest_strike
                    );
                }
            }
            Err(e) => println!("{:<5} failed: {}", symbol, e),
        }
    }
}
