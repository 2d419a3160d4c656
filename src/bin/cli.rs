//! Dealer Exposure CLI
//!
//! Prints strike ladders, key levels and recommendations for one or more
//! tickers, from Yahoo Finance or a saved snapshot file.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use dealer_exposure::logging::{init_logging, LogFormat};
use dealer_exposure::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "dealer-exposure")]
#[command(about = "Dealer gamma/delta/vanna/charm exposure, key levels and positioning notes")]
#[command(version)]
struct Cli {
    /// Tickers to analyse
    #[arg(default_values_t = ["SPY".to_string(), "QQQ".to_string(), "IWM".to_string()])]
    tickers: Vec<String>,

    /// Analyse one expiry (YYYY-MM-DD) instead of the nearest
    #[arg(short, long, conflicts_with = "all_expiries")]
    expiry: Option<NaiveDate>,

    /// Aggregate every open expiry
    #[arg(long)]
    all_expiries: bool,

    /// Read chains from a snapshot JSON file instead of Yahoo Finance
    #[arg(short, long, env = "DEALER_EXPOSURE_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Engine configuration JSON
    #[arg(short, long, env = "DEALER_EXPOSURE_CONFIG")]
    config: Option<PathBuf>,

    /// Named preset when no config file is given
    #[arg(long, default_value = "default")]
    preset: String,

    /// Report output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Log format: pretty, json or compact
    #[arg(long, default_value = "compact")]
    log_format: LogFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable tables
    Text,
    /// One JSON document with every report
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_format, "warn") {
        eprintln!("{}", e);
    }

    match run(&cli) {
        Ok(all_ok) if all_ok => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(2),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every ticker succeeded
fn run(cli: &Cli) -> ExposureResult<bool> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::preset(&cli.preset)?,
    };
    tracing::info!("Engine config: {}", config.describe());

    let provider: Box<dyn MarketDataProvider> = match &cli.snapshot {
        Some(path) => Box::new(SnapshotProvider::from_json_file(path)?),
        None => Box::new(YahooProvider::new(&config.provider)?),
    };

    let selection = if cli.all_expiries {
        ExpirySelection::All
    } else if let Some(expiry) = cli.expiry {
        ExpirySelection::On(expiry)
    } else {
        ExpirySelection::Nearest
    };
    let requests: Vec<AnalysisRequest> = cli
        .tickers
        .iter()
        .map(|t| AnalysisRequest::new(t.to_ascii_uppercase(), selection))
        .collect();

    let engine = ExposureEngine::new(config);
    let results = engine.analyze_many(provider.as_ref(), &requests);
    let all_ok = results.iter().all(|(_, r)| r.is_ok());

    match cli.format {
        OutputFormat::Json => print_json(&results)?,
        OutputFormat::Text => {
            for (symbol, result) in &results {
                match result {
                    Ok(report) => print_report(report),
                    Err(e) => println!("{}: {}\n", symbol, e),
                }
            }
        }
    }

    Ok(all_ok)
}

fn print_json(results: &[(String, ExposureResult<ExposureReport>)]) -> ExposureResult<()> {
    let entries: Vec<serde_json::Value> = results
        .iter()
        .map(|(symbol, result)| match result {
            Ok(report) => serde_json::json!({ "symbol": symbol, "report": report }),
            Err(e) => serde_json::json!({ "symbol": symbol, "error": e.to_string() }),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

fn print_report(report: &ExposureReport) {
    let u = &report.underlying;
    let expiries: Vec<String> = report.expiries.iter().map(|e| e.to_string()).collect();

    println!("{} - ${:.2} as of {}", u.symbol, u.spot, u.as_of.format("%Y-%m-%d %H:%M UTC"));
    println!(
        "Expiries: {} | Regime: {} ({} days)",
        expiries.join(", "),
        report.regime,
        report.recommendation.days_to_expiry
    );
    println!("{}", "=".repeat(98));
    let mut header = format!("{:>10}", "Strike");
    for greek in Greek::ALL {
        let title = if greek.is_gamma_family() {
            format!("Net {}/1%", greek)
        } else {
            format!("Net {}", greek)
        };
        header.push_str(&format!(" {:>16}", title));
    }
    println!("{} {:>9} {:>9}", header, "Call OI", "Put OI");

    for row in &report.ladder {
        let mut line = format!("{:>10.2}", row.strike);
        for greek in Greek::ALL {
            line.push_str(&format!(" {:>16.0}", row.net.get(greek)));
        }
        println!("{} {:>9} {:>9}", line, row.open_interest_calls, row.open_interest_puts);
    }

    let totals = &report.totals;
    println!("{}", "-".repeat(98));
    println!(
        "Totals: delta {:.1} | gamma {:.0} per 1% | P/C OI ratio {}",
        totals.net.delta,
        totals.net.gamma,
        totals
            .put_call_ratio
            .map(|r| format!("{:.2}", r))
            .unwrap_or_else(|| "n/a".to_string())
    );
    if !report.excluded.is_empty() {
        println!("Excluded contracts: {}", report.excluded.len());
    }

    println!("\nBias: {}", report.recommendation.bias.label());
    for line in report.recommendation.lines() {
        println!("  - {}", line);
    }
    println!();
}
