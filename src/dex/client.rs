use crate::dex::state::{MarketSnapshot, RawPoolStats};
use crate::errors::{AppError, Result};
use crate::units;
use ethers::{
    contract::abigen,
    providers::{Http, Provider},
    types::{Address, H160, U256},
};
use std::sync::Arc;
use tracing::debug;

abigen!(
    VetherPools,
    r"[
        function poolData(address pool) view returns (address poolAddress, uint256 genesis, uint256 vether, uint256 asset, uint256 vetherStaked, uint256 assetStaked, uint256 stakerCount, uint256 poolUnits, uint256 fees, uint256 volume, uint256 txCount)
        function calcValueInAsset(uint256 amount, address pool) view returns (uint256)
        function getPoolROI(address pool) view returns (uint256)
    ]",
);

abigen!(
    UniswapPair,
    r"[
        function getReserves() view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast)
    ]",
);

/// The pools contract keys the ETH pool by the zero address.
pub const ETH: Address = H160([0u8; 20]);

/// Read handle for the Vether pools contract and its Uniswap reference pair.
#[derive(Clone)]
pub struct VetherClient {
    pools: VetherPools<Provider<Http>>,
    pair: UniswapPair<Provider<Http>>,
}

impl VetherClient {
    pub async fn new(rpc_url: &str, pools_addr: Address, pair_addr: Address) -> Result<Self> {
        let provider = Arc::new(
            Provider::<Http>::try_from(rpc_url)
                .map_err(|e| AppError::Config(format!("invalid RPC_URL {rpc_url:?}: {e}")))?,
        );
        let pools = VetherPools::new(pools_addr, provider.clone());
        let pair = UniswapPair::new(pair_addr, provider);
        pools.get_pool_roi(ETH).call().await?; // sanity-check
        Ok(Self { pools, pair })
    }

    /// Stats of the ETH pool.
    pub async fn pool_stats(&self) -> Result<RawPoolStats> {
        let (_pool, _genesis, vether, asset, _vs, _as, _stakers, _units, fees, volume, tx_count) =
            self.pools.pool_data(ETH).call().await?;
        let value_of_one = self
            .pools
            .calc_value_in_asset(units::wad(), ETH)
            .call()
            .await?;
        let roi_raw = self.pools.get_pool_roi(ETH).call().await?;

        Ok(RawPoolStats {
            eth: asset,
            vether,
            volume,
            fees,
            tx_count,
            value_of_one,
            roi_raw,
        })
    }

    /// `(vether, eth)` reserves of the Uniswap pair, in wei.
    pub async fn pair_reserves(&self) -> Result<(U256, U256)> {
        let (reserve0, reserve1, _ts) = self.pair.get_reserves().call().await?;
        Ok((U256::from(reserve0), U256::from(reserve1)))
    }

    /// Every read the swap view needs, in one snapshot.
    pub async fn snapshot(&self) -> Result<MarketSnapshot> {
        let stats = self.pool_stats().await?;
        let (pair_vether, pair_eth) = self.pair_reserves().await?;
        let snap = MarketSnapshot::new(&stats, pair_vether, pair_eth);
        debug!(
            eth = %snap.pool.eth,
            veth = %snap.pool.veth,
            price_eth = snap.market.price_eth,
            "[POOL] snapshot"
        );
        Ok(snap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eth_pool_is_zero_address() {
        assert_eq!(ETH, Address::zero());
    }

    #[tokio::test]
    async fn rejects_malformed_rpc_url() {
        let res = VetherClient::new("not a url", Address::zero(), Address::zero()).await;
        assert!(matches!(res, Err(AppError::Config(_))));
    }
}
