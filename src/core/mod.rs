//! Core data types for the exposure engine
//!
//! Defines fundamental types:
//! - Underlying: spot snapshot for one request
//! - OptionContract: strike, expiry, type, open interest, volume, IV
//! - GreekSet: per-contract sensitivities
//! - ChainSnapshot: one underlying plus its contracts

pub mod chain;
pub mod error;
pub mod greeks;
pub mod option;

pub use chain::*;
pub use error::*;
pub use greeks::*;
pub use option::*;
