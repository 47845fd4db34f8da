//! Swap quoting for the Vether ETH pool.
//!
//! The core is pure: [`dex::calc`] quotes constant-product trades on
//! 18-decimal fixed-point amounts and [`slippage`] grades the resulting rate
//! against the market. [`store`] and [`aggregator`] wire those into a
//! message-driven view model fed by periodic contract reads.

pub mod aggregator;
pub mod config;
pub mod dex;
pub mod errors;
pub mod models;
pub mod slippage;
pub mod store;
pub mod trade;
pub mod units;
pub mod utils;
