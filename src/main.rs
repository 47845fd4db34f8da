use anyhow::Result;
use std::time::Duration;
use vether_swap::{
    aggregator::{IntervalClock, spawn_refresher},
    config::AppConfig,
    dex::VetherClient,
    errors::AppError,
    store::{Msg, SwapState, spawn_store},
    units, utils,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let config = AppConfig::from_env()?;
    tracing::info!(
        network = %config.network,
        pools = %format!("{}address/{:?}", config.network.explorer_url(), config.pools_address),
        pair = ?config.pair_address,
        refresh_secs = config.refresh_secs,
        fee_bps = config.fee_bps,
        "[INIT] vether-swap starting"
    );

    let client =
        VetherClient::new(&config.rpc_url, config.pools_address, config.pair_address).await?;
    let initial = client.snapshot().await?;
    tracing::info!(
        eth = %initial.pool.eth,
        veth = %initial.pool.veth,
        price_eth = initial.market.price_eth,
        roi = initial.pool.roi,
        "[INIT] pool loaded"
    );

    let seed = SwapState {
        pool: initial.pool,
        market: initial.market,
        fee_bps: config.fee_bps,
        ..Default::default()
    };
    let (msg_tx, mut state_rx, store_task) = spawn_store(seed, 64);

    let refresher = spawn_refresher(
        client,
        IntervalClock::new(Duration::from_secs(config.refresh_secs)),
        msg_tx.clone(),
    );

    if let Some(amount) = config.trade_amount.clone() {
        msg_tx
            .send(Msg::InputChanged {
                sell: config.trade_side,
                amount,
            })
            .await
            .map_err(|_| AppError::ChannelClosed("store"))?;
    }

    // Report every published state
    let reporter = tokio::spawn(async move {
        while state_rx.changed().await.is_ok() {
            let state = state_rx.borrow_and_update().clone();
            report(&state);
        }
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("[SHUTDOWN] stopping refresher");
    refresher.abort();
    drop(msg_tx);
    let (store_res, reporter_res) = futures::join!(store_task, reporter);
    if let Err(e) = store_res {
        tracing::warn!(error = %e, "[SHUTDOWN] store task failed");
    }
    if let Err(e) = reporter_res {
        tracing::warn!(error = %e, "[SHUTDOWN] reporter task failed");
    }
    Ok(())
}

fn report(state: &SwapState) {
    if let Some(reason) = &state.rejection {
        tracing::warn!(reason = %reason, "[TRADE] input rejected");
        return;
    }
    let Some(trade) = state.trade else {
        tracing::info!(
            eth = %state.pool.eth,
            veth = %state.pool.veth,
            price_eth = state.market.price_eth,
            "[POOL] no trade entered"
        );
        return;
    };

    tracing::info!(
        sell = %trade.sell,
        amount_in = %units::format_wei(trade.quote.amount_in),
        amount_out = %state.amount_calculated,
        receive = %trade.sell.counter(),
        trade_rate = %units::prettify(trade.trade_rate),
        market_rate = %units::prettify(state.market.price_eth),
        slippage = %format!("{:.2}%", trade.slippage.deviation_percent),
        tier = ?trade.slippage.tier,
        can_submit = state.can_submit(),
        "[TRADE] quote"
    );
    if trade.slippage.warning {
        tracing::warn!("[TRADE] due to trade size the price is affected by high slippage");
    }
    match state.to_json() {
        Ok(json) => tracing::debug!(%json, "[TRADE] view"),
        Err(e) => tracing::warn!(error = %e, "[TRADE] failed to render view"),
    }
}
