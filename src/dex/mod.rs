//! Vether pool integration: swap math, snapshots and contract reads.

pub mod calc;
pub mod client;
pub mod state;

pub use calc::{Quote, calc_swap_output, calc_swap_output_with_fee, quote, quote_units};
pub use client::VetherClient;
pub use state::{MarketSnapshot, RawPoolStats};
