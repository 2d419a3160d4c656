//! Yahoo Finance data fetcher
//!
//! Spot quotes and option chains for ETFs and cash indices through Yahoo
//! Finance's unofficial API. Index tickers are mapped to Yahoo's `^` symbols.
//!
//! Note: Yahoo Finance data is delayed ~15 minutes and intended for personal use.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::MarketDataProvider;
use crate::core::{
    ExposureError, ExposureResult, OptionContract, OptionType, Underlying, DEFAULT_MULTIPLIER,
};

/// Cash indices Yahoo lists under a caret symbol
const INDEX_SYMBOLS: [&str; 4] = ["SPX", "NDX", "RUT", "VIX"];

/// HTTP settings for the Yahoo provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Default: "https://query1.finance.yahoo.com/v7/finance"
    pub base_url: String,
    /// Whole-request timeout
    /// Default: 10
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com/v7/finance".to_string(),
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
        }
    }
}

/// Yahoo Finance API client
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new(config: &ProviderConfig) -> ExposureResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ExposureError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET `url` and decode the JSON body
    fn fetch<T: DeserializeOwned>(&self, symbol: &str, url: &str) -> ExposureResult<T> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| ExposureError::provider_unavailable(symbol, e.to_string()))?;

        response.json().map_err(|e| decode_error(symbol, e))
    }
}

/// Body reads share the request timeout, so a stalled read is a transport
/// failure rather than bad data
fn decode_error(symbol: &str, e: reqwest::Error) -> ExposureError {
    if e.is_timeout() || e.is_body() || e.is_request() || e.is_connect() {
        ExposureError::provider_unavailable(symbol, e.to_string())
    } else {
        ExposureError::data(format!("Failed to parse response for {}: {}", symbol, e))
    }
}

impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    fn get_spot(&self, symbol: &str) -> ExposureResult<Underlying> {
        let url = format!("{}/quote?symbols={}", self.base_url, yahoo_symbol(symbol));
        let response: YahooQuoteResponse = self.fetch(symbol, &url)?;
        spot_from_response(symbol, response)
    }

    fn get_option_chain(
        &self,
        symbol: &str,
        expiry: NaiveDate,
    ) -> ExposureResult<Vec<OptionContract>> {
        // Yahoo keys expiries by midnight UTC
        let expiry_ts = expiry.and_time(NaiveTime::MIN).and_utc().timestamp();
        let url = format!(
            "{}/options/{}?date={}",
            self.base_url,
            yahoo_symbol(symbol),
            expiry_ts
        );
        let response: YahooOptionsResponse = self.fetch(symbol, &url)?;
        let contracts = chain_from_response(symbol, expiry, response)?;

        tracing::info!("Fetched {} contracts for {} {}", contracts.len(), symbol, expiry);
        Ok(contracts)
    }

    fn list_expiries(&self, symbol: &str) -> ExposureResult<Vec<NaiveDate>> {
        let url = format!("{}/options/{}", self.base_url, yahoo_symbol(symbol));
        let response: YahooOptionsResponse = self.fetch(symbol, &url)?;
        expiries_from_response(symbol, response)
    }
}

/// Yahoo's symbol for a ticker ("SPX" -> "^SPX")
pub fn yahoo_symbol(symbol: &str) -> String {
    let upper = symbol.trim().to_ascii_uppercase();
    if INDEX_SYMBOLS.contains(&upper.as_str()) {
        format!("^{}", upper)
    } else {
        upper
    }
}

fn spot_from_response(symbol: &str, response: YahooQuoteResponse) -> ExposureResult<Underlying> {
    let quote = response
        .quote_response
        .result
        .into_iter()
        .next()
        .ok_or_else(|| ExposureError::data(format!("No quote data returned for {}", symbol)))?;

    let as_of = quote
        .regular_market_time
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .unwrap_or_else(Utc::now);

    Underlying::new(symbol, quote.regular_market_price, as_of)
}

fn expiries_from_response(
    symbol: &str,
    response: YahooOptionsResponse,
) -> ExposureResult<Vec<NaiveDate>> {
    let chain = response
        .option_chain
        .result
        .into_iter()
        .next()
        .ok_or_else(|| ExposureError::data(format!("No options data returned for {}", symbol)))?;

    let mut expiries: Vec<NaiveDate> = chain
        .expiration_dates
        .iter()
        .filter_map(|&ts| DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()))
        .collect();
    expiries.sort();
    expiries.dedup();
    Ok(expiries)
}

fn chain_from_response(
    symbol: &str,
    expiry: NaiveDate,
    response: YahooOptionsResponse,
) -> ExposureResult<Vec<OptionContract>> {
    let chain = response
        .option_chain
        .result
        .into_iter()
        .next()
        .ok_or_else(|| ExposureError::data(format!("No options data returned for {}", symbol)))?;

    let mut contracts = Vec::new();
    if let Some(options) = chain.options.first() {
        let calls = options.calls.iter().map(|d| (d, OptionType::Call));
        let puts = options.puts.iter().map(|d| (d, OptionType::Put));
        contracts.extend(
            calls
                .chain(puts)
                .filter_map(|(data, option_type)| convert_contract(data, symbol, expiry, option_type)),
        );
    }
    Ok(contracts)
}

/// Convert Yahoo option data to a contract; rows without a strike are dropped
fn convert_contract(
    data: &YahooOptionData,
    symbol: &str,
    expiry: NaiveDate,
    option_type: OptionType,
) -> Option<OptionContract> {
    let strike = data.strike?;

    Some(OptionContract {
        symbol: symbol.to_string(),
        expiry,
        strike,
        option_type,
        open_interest: data.open_interest.and_then(|v| u64::try_from(v).ok()),
        volume: data.volume.and_then(|v| u64::try_from(v).ok()),
        // Missing IV is priced as zero and excluded downstream
        implied_vol: data.implied_volatility.unwrap_or(0.0),
        multiplier: DEFAULT_MULTIPLIER,
        contract_symbol: data.contract_symbol.clone(),
    })
}

// Yahoo Finance API response structures

#[derive(Debug, Deserialize)]
struct YahooQuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: YahooQuoteResult,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteResult {
    result: Vec<YahooQuoteData>,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteData {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: f64,
    #[serde(rename = "regularMarketTime")]
    regular_market_time: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionsResponse {
    #[serde(rename = "optionChain")]
    option_chain: YahooOptionChain,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChain {
    result: Vec<YahooOptionChainData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChainData {
    #[serde(rename = "expirationDates", default)]
    expiration_dates: Vec<i64>,
    #[serde(default)]
    options: Vec<YahooOptions>,
}

#[derive(Debug, Deserialize)]
struct YahooOptions {
    #[serde(default)]
    calls: Vec<YahooOptionData>,
    #[serde(default)]
    puts: Vec<YahooOptionData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionData {
    #[serde(rename = "contractSymbol")]
    contract_symbol: Option<String>,
    strike: Option<f64>,
    volume: Option<i64>,
    #[serde(rename = "openInterest")]
    open_interest: Option<i64>,
    #[serde(rename = "impliedVolatility")]
    implied_volatility: Option<f64>,
}
