//! Configuration loader and application settings.

use crate::dex::calc::BPS_DENOMINATOR;
use crate::errors::{AppError, Result};
use crate::models::Asset;
use ethers::types::Address;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Rinkeby,
}

impl Network {
    /// `TESTNET=TRUE` selects Rinkeby, anything else mainnet.
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some("TRUE") => Network::Rinkeby,
            _ => Network::Mainnet,
        }
    }

    /// Uniswap VETH/ETH pair used as the market reference, if deployed.
    pub fn default_pair_address(self) -> Option<&'static str> {
        match self {
            Network::Mainnet => Some("0x03e008804c5bf70e20b5a0b7233cf2687ccd2a96"),
            Network::Rinkeby => None,
        }
    }

    pub fn explorer_url(self) -> &'static str {
        match self {
            Network::Mainnet => "https://etherscan.io/",
            Network::Rinkeby => "https://rinkeby.etherscan.io/",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => f.write_str("mainnet"),
            Network::Rinkeby => f.write_str("rinkeby"),
        }
    }
}

/// Consolidated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP endpoint of an Ethereum node.
    pub rpc_url: String,
    pub network: Network,
    /// Vether pools contract.
    pub pools_address: Address,
    /// Uniswap pair giving the reference rate.
    pub pair_address: Address,
    pub refresh_secs: u64,
    /// Swap fee assumed by quotes, in basis points.
    pub fee_bps: u32,
    /// Side and amount of a trade to price on startup.
    pub trade_side: Asset,
    pub trade_amount: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let rpc_url = get("RPC_URL").ok_or_else(|| {
            AppError::Config("Set RPC_URL env var to your Ethereum node HTTP endpoint".into())
        })?;
        let network = Network::from_flag(get("TESTNET").as_deref());

        let pools_raw = get("POOLS_ADDRESS").ok_or_else(|| {
            AppError::Config("Set POOLS_ADDRESS env var to the Vether pools contract".into())
        })?;
        let pools_address = parse_address("POOLS_ADDRESS", &pools_raw)?;

        let pair_raw = get("UNISWAP_PAIR_ADDRESS")
            .or_else(|| network.default_pair_address().map(str::to_string))
            .ok_or_else(|| {
                AppError::Config(format!(
                    "Set UNISWAP_PAIR_ADDRESS env var; no default pair on {network}"
                ))
            })?;
        let pair_address = parse_address("UNISWAP_PAIR_ADDRESS", &pair_raw)?;

        let refresh_secs: u64 = parse_or("REFRESH_SECS", get("REFRESH_SECS"), 5)?;
        if refresh_secs == 0 {
            return Err(AppError::Config("REFRESH_SECS must be at least 1".into()));
        }

        let fee_bps: u32 = parse_or("SWAP_FEE_BPS", get("SWAP_FEE_BPS"), 0)?;
        if fee_bps > BPS_DENOMINATOR {
            return Err(AppError::Config(format!(
                "SWAP_FEE_BPS must be at most {BPS_DENOMINATOR}, got {fee_bps}"
            )));
        }

        let trade_side = match get("TRADE_SIDE") {
            Some(raw) => raw
                .parse::<Asset>()
                .map_err(|e| AppError::Config(format!("TRADE_SIDE: {e}")))?,
            None => Asset::Eth,
        };

        Ok(Self {
            rpc_url,
            network,
            pools_address,
            pair_address,
            refresh_secs,
            fee_bps,
            trade_side,
            trade_amount: get("TRADE_AMOUNT"),
        })
    }
}

fn parse_address(key: &str, raw: &str) -> Result<Address> {
    raw.trim()
        .parse()
        .map_err(|e| AppError::Config(format!("{key} is not an address ({raw:?}): {e}")))
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match raw {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} must be a number ({v:?}): {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const POOLS: &str = "0x1111111111111111111111111111111111111111";

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_for_mainnet() {
        let cfg = load(&[("RPC_URL", "http://localhost:8545"), ("POOLS_ADDRESS", POOLS)]).unwrap();
        assert_eq!(cfg.network, Network::Mainnet);
        assert_eq!(cfg.refresh_secs, 5);
        assert_eq!(cfg.fee_bps, 0);
        assert_eq!(cfg.trade_side, Asset::Eth);
        assert!(cfg.trade_amount.is_none());
        assert_eq!(
            cfg.pair_address,
            "0x03e008804c5bf70e20b5a0b7233cf2687ccd2a96".parse::<Address>().unwrap()
        );
    }

    #[test]
    fn requires_rpc_and_pools() {
        assert!(matches!(load(&[("POOLS_ADDRESS", POOLS)]), Err(AppError::Config(_))));
        assert!(matches!(
            load(&[("RPC_URL", "http://localhost:8545")]),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn testnet_needs_explicit_pair() {
        let base = [
            ("RPC_URL", "http://localhost:8545"),
            ("POOLS_ADDRESS", POOLS),
            ("TESTNET", "TRUE"),
        ];
        assert!(matches!(load(&base), Err(AppError::Config(_))));

        let mut with_pair = base.to_vec();
        with_pair.push(("UNISWAP_PAIR_ADDRESS", POOLS));
        let cfg = load(&with_pair).unwrap();
        assert_eq!(cfg.network, Network::Rinkeby);
        assert_eq!(cfg.network.explorer_url(), "https://rinkeby.etherscan.io/");
    }

    #[test]
    fn parses_trade_and_fee_settings() {
        let cfg = load(&[
            ("RPC_URL", "http://localhost:8545"),
            ("POOLS_ADDRESS", POOLS),
            ("REFRESH_SECS", "15"),
            ("SWAP_FEE_BPS", "30"),
            ("TRADE_SIDE", "VETH"),
            ("TRADE_AMOUNT", "2.5"),
        ])
        .unwrap();
        assert_eq!(cfg.refresh_secs, 15);
        assert_eq!(cfg.fee_bps, 30);
        assert_eq!(cfg.trade_side, Asset::Vether);
        assert_eq!(cfg.trade_amount.as_deref(), Some("2.5"));
    }

    #[test]
    fn rejects_bad_values() {
        let with = |key: &'static str, value: &'static str| {
            load(&[
                ("RPC_URL", "http://localhost:8545"),
                ("POOLS_ADDRESS", POOLS),
                (key, value),
            ])
        };
        assert!(matches!(with("REFRESH_SECS", "0"), Err(AppError::Config(_))));
        assert!(matches!(with("REFRESH_SECS", "soon"), Err(AppError::Config(_))));
        assert!(matches!(with("SWAP_FEE_BPS", "10001"), Err(AppError::Config(_))));
        assert!(matches!(with("TRADE_SIDE", "btc"), Err(AppError::Config(_))));
        assert!(matches!(with("POOLS_ADDRESS", "0x12"), Err(AppError::Config(_))));
    }
}
