//! Swap form state.
//!
//! State is an immutable value. Every change arrives as a [`Msg`], goes
//! through the pure [`reduce`] function and the result is published on a
//! `watch` channel for whoever renders it.

use crate::dex::calc::BPS_DENOMINATOR;
use crate::errors::{AppError, Result};
use crate::models::{Asset, MarketData, PoolData, TradeRequest};
use crate::trade::{TradeView, evaluate};
use crate::units;
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

/// Wallet facts that gate the submit buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AccountGate {
    pub connected: bool,
    /// VETH allowance covers the balance; required to sell VETH.
    pub approved: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SwapState {
    pub pool: PoolData,
    pub market: MarketData,
    pub account: AccountGate,
    pub fee_bps: u32,
    pub sell: Asset,
    /// Amount typed by the user. Always blank or a valid decimal.
    pub amount: String,
    /// Counter amount the pool would return, formatted.
    pub amount_calculated: String,
    pub trade: Option<TradeView>,
    /// Why the last message was refused, if it was.
    pub rejection: Option<String>,
}

impl SwapState {
    /// Whether the submit action for the current side may be enabled.
    pub fn can_submit(&self) -> bool {
        let has_amount = self
            .trade
            .map(|t| !t.quote.amount_in.is_zero())
            .unwrap_or(false);
        let allowed = match self.sell {
            Asset::Eth => true,
            Asset::Vether => self.account.approved,
        };
        self.account.connected && has_amount && allowed
    }

    /// JSON rendering for the presentation layer.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    PoolUpdated(PoolData),
    MarketUpdated(MarketData),
    AccountUpdated { connected: bool, approved: bool },
    InputChanged { sell: Asset, amount: String },
    FeeChanged(u32),
}

/// Apply `msg` to `state`, returning the next state.
///
/// Pool, market and fee changes reprice the current input. An invalid amount
/// or fee is refused with `InvalidInput` and `state` stays authoritative.
pub fn reduce(state: &SwapState, msg: Msg) -> Result<SwapState> {
    let mut next = state.clone();
    next.rejection = None;

    match msg {
        Msg::PoolUpdated(pool) => next.pool = pool,
        Msg::MarketUpdated(market) => next.market = market,
        Msg::AccountUpdated {
            connected,
            approved,
        } => {
            next.account = AccountGate {
                connected,
                approved,
            };
            return Ok(next);
        }
        Msg::InputChanged { sell, amount } => {
            next.sell = sell;
            next.amount = amount.trim().to_string();
        }
        Msg::FeeChanged(fee_bps) => {
            if fee_bps > BPS_DENOMINATOR {
                return Err(AppError::invalid(format!(
                    "fee of {fee_bps} bps exceeds 100%"
                )));
            }
            next.fee_bps = fee_bps;
        }
    }

    reprice(next)
}

fn reprice(mut state: SwapState) -> Result<SwapState> {
    if state.amount.is_empty() {
        state.amount_calculated.clear();
        state.trade = None;
        return Ok(state);
    }

    let amount_in = units::to_wei(&state.amount)?;
    let view = evaluate(
        &TradeRequest::new(amount_in, state.sell),
        &state.pool.reserves,
        state.market.price_eth,
        state.fee_bps,
    )?;
    state.amount_calculated = units::format_wei(view.quote.amount_out);
    state.trade = Some(view);
    Ok(state)
}

/// Owner of the current state; publishes every accepted change.
pub struct Store {
    state: SwapState,
    tx: watch::Sender<SwapState>,
}

impl Store {
    pub fn new(initial: SwapState) -> (Self, watch::Receiver<SwapState>) {
        let (tx, rx) = watch::channel(initial.clone());
        (Self { state: initial, tx }, rx)
    }

    pub fn state(&self) -> &SwapState {
        &self.state
    }

    /// Reduce one message. A refused message republishes the previous state
    /// with `rejection` set and returns the error.
    pub fn dispatch(&mut self, msg: Msg) -> Result<()> {
        match reduce(&self.state, msg) {
            Ok(next) => {
                self.state = next;
                self.tx.send_replace(self.state.clone());
                Ok(())
            }
            Err(e) => {
                let mut refused = self.state.clone();
                refused.rejection = Some(e.to_string());
                self.tx.send_replace(refused);
                Err(e)
            }
        }
    }

    /// Drain `rx` until every sender is gone.
    pub async fn run(mut self, mut rx: mpsc::Receiver<Msg>) {
        while let Some(msg) = rx.recv().await {
            debug!(?msg, "[STORE] message");
            if let Err(e) = self.dispatch(msg) {
                warn!(error = %e, "[STORE] message rejected");
            }
        }
        debug!("[STORE] all senders dropped, stopping");
    }
}

/// Spawn the store loop; returns the message sender and the state receiver.
pub fn spawn_store(
    initial: SwapState,
    buffer: usize,
) -> (
    mpsc::Sender<Msg>,
    watch::Receiver<SwapState>,
    tokio::task::JoinHandle<()>,
) {
    let (msg_tx, msg_rx) = mpsc::channel(buffer);
    let (store, state_rx) = Store::new(initial);
    let handle = tokio::spawn(store.run(msg_rx));
    (msg_tx, state_rx, handle)
}
