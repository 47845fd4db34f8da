use crate::dex::calc::ratio;
use crate::models::{MarketData, PoolData, PoolReserves};
use crate::units;
use ethers::types::U256;

/// Raw pool statistics as returned by the pools contract, all in wei except
/// `tx_count` and `roi_raw` (ROI scaled by 100, where 10_000 means break-even).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawPoolStats {
    pub eth: U256,
    pub vether: U256,
    pub volume: U256,
    pub fees: U256,
    pub tx_count: U256,
    /// `calcValueInAsset(1 VETH, ETH)`.
    pub value_of_one: U256,
    pub roi_raw: U256,
}

/// Immutable snapshot of every read that feeds the swap view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarketSnapshot {
    pub pool: PoolData,
    pub market: MarketData,
}

impl MarketSnapshot {
    /// Combine pools contract stats and the Uniswap pair reserves into one view.
    pub fn new(stats: &RawPoolStats, pair_vether: U256, pair_eth: U256) -> Self {
        Self {
            pool: pool_data(stats),
            market: MarketData {
                price_eth: reference_rate(pair_vether, pair_eth),
            },
        }
    }
}

/// Human-readable pool view from raw contract values.
pub fn pool_data(stats: &RawPoolStats) -> PoolData {
    PoolData {
        reserves: PoolReserves::new(stats.eth, stats.vether),
        eth: units::format_wei(stats.eth),
        veth: units::format_wei(stats.vether),
        price: units::format_wei(stats.value_of_one),
        volume: units::format_wei(stats.volume),
        fees: units::format_wei(stats.fees),
        tx_count: stats.tx_count.low_u64(),
        roi: roi_percent(stats.roi_raw),
    }
}

/// Pool ROI as a percentage gain; the contract reports 10_000 for 100%.
pub fn roi_percent(roi_raw: U256) -> f64 {
    (roi_raw.low_u128() as f64 / 100.0) - 100.0
}

/// VETH price in ETH from pair reserves; zero for an empty pair.
pub fn reference_rate(pair_vether: U256, pair_eth: U256) -> f64 {
    ratio(pair_eth, pair_vether)
}
