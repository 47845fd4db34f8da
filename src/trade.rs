//! Quote a trade and measure its slippage against the market rate.

use crate::dex::calc::{Quote, quote, ratio};
use crate::errors::Result;
use crate::models::{Asset, PoolReserves, TradeRequest};
use crate::slippage::{SlippageResult, classify};
use serde::Serialize;

/// Everything the swap form shows for one input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradeView {
    pub sell: Asset,
    pub quote: Quote,
    /// ETH paid or received per VETH, whichever side is sold.
    pub trade_rate: f64,
    pub slippage: SlippageResult,
}

/// Quote `request` against `pool` and classify it against `reference_rate`
/// (VETH price in ETH).
pub fn evaluate(
    request: &TradeRequest,
    pool: &PoolReserves,
    reference_rate: f64,
    fee_bps: u32,
) -> Result<TradeView> {
    let quote = quote(request, pool, fee_bps)?;
    let trade_rate = match request.sell {
        Asset::Eth => ratio(quote.amount_in, quote.amount_out),
        Asset::Vether => ratio(quote.amount_out, quote.amount_in),
    };
    // An empty trade has no price to compare.
    let slippage = if quote.amount_in.is_zero() || quote.amount_out.is_zero() {
        SlippageResult::none(reference_rate)
    } else {
        classify(trade_rate, reference_rate)?
    };

    tracing::debug!(
        sell = %request.sell,
        trade_rate,
        deviation_percent = slippage.deviation_percent,
        tier = ?slippage.tier,
        "[TRADE] evaluated"
    );

    Ok(TradeView {
        sell: request.sell,
        quote,
        trade_rate,
        slippage,
    })
}
