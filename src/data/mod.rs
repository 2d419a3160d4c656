//! Market data
//!
//! Handles:
//! - The provider trait the engine fetches through
//! - Yahoo Finance API for ETFs and cash indices
//! - In-memory snapshots loaded from JSON

pub mod provider;
pub mod snapshot;
pub mod yahoo;

pub use provider::*;
pub use snapshot::*;
pub use yahoo::*;
