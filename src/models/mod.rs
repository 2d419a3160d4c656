//! Pricing Models
//!
//! Implements:
//! - Black-Scholes closed-form Greeks (delta, gamma, vanna, charm)

pub mod black_scholes;

pub use black_scholes::*;
