//! Shared data structures used throughout the application.

use ethers::types::U256;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::errors::AppError;

/// Asset held by the pool. Selling one buys the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Asset {
    #[default]
    Eth,
    #[serde(rename = "veth")]
    Vether,
}

impl Asset {
    pub fn counter(self) -> Self {
        match self {
            Asset::Eth => Asset::Vether,
            Asset::Vether => Asset::Eth,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Asset::Eth => "ETH",
            Asset::Vether => "VETH",
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Asset {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eth" => Ok(Asset::Eth),
            "veth" | "vether" => Ok(Asset::Vether),
            other => Err(AppError::invalid(format!("unknown asset {other:?}"))),
        }
    }
}

/// Pool holdings oriented for a single trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReservePair {
    pub reserve_in: U256,
    pub reserve_out: U256,
}

impl ReservePair {
    pub fn new(reserve_in: U256, reserve_out: U256) -> Self {
        Self {
            reserve_in,
            reserve_out,
        }
    }

    /// Either side empty; any quote against it is zero.
    pub fn is_degenerate(&self) -> bool {
        self.reserve_in.is_zero() || self.reserve_out.is_zero()
    }
}

/// Raw pool holdings in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolReserves {
    pub eth: U256,
    pub vether: U256,
}

impl PoolReserves {
    pub fn new(eth: U256, vether: U256) -> Self {
        Self { eth, vether }
    }

    /// Reserves seen by a trader selling `sell`.
    pub fn oriented(&self, sell: Asset) -> ReservePair {
        match sell {
            Asset::Eth => ReservePair::new(self.eth, self.vether),
            Asset::Vether => ReservePair::new(self.vether, self.eth),
        }
    }
}

/// Amount of `sell` offered to the pool, in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeRequest {
    pub amount_in: U256,
    pub sell: Asset,
}

impl TradeRequest {
    pub fn new(amount_in: U256, sell: Asset) -> Self {
        Self { amount_in, sell }
    }
}

/// Pool statistics read from the pools contract.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PoolData {
    #[serde(skip)]
    pub reserves: PoolReserves,
    pub eth: String,
    pub veth: String,
    /// Spot value of one VETH in ETH as reported by the pool.
    pub price: String,
    pub volume: String,
    pub fees: String,
    pub tx_count: u64,
    /// Pool ROI in percent.
    pub roi: f64,
}

/// Reference market prices.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MarketData {
    /// VETH price in ETH; the slippage reference rate.
    pub price_eth: f64,
}
