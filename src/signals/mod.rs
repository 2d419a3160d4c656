//! Trading Signals
//!
//! - **Regime**: days to expiry bucketed into 0DTE / weekly / monthly / LEAPS
//! - **Recommendation**: deterministic rule table over regime and the signs of
//!   net gamma and net delta

mod recommendation;
mod regime;

pub use recommendation::*;
pub use regime::*;
