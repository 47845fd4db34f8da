//! Periodic refresh of pool and market reads into the swap store.

use crate::dex::{MarketSnapshot, VetherClient};
use crate::errors::Result;
use crate::store::Msg;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Source of refresh ticks. Returns `false` once no more ticks will come.
pub trait Clock: Send + 'static {
    fn tick(&mut self) -> impl Future<Output = bool> + Send;
}

/// Wall-clock ticks on a fixed period; the first tick fires immediately.
pub struct IntervalClock {
    interval: Interval,
}

impl IntervalClock {
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

impl Clock for IntervalClock {
    async fn tick(&mut self) -> bool {
        self.interval.tick().await;
        true
    }
}

/// Anything that can produce a fresh [`MarketSnapshot`].
pub trait SnapshotSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<MarketSnapshot>> + Send;
}

impl SnapshotSource for VetherClient {
    async fn fetch(&self) -> Result<MarketSnapshot> {
        self.snapshot().await
    }
}

/// Spawn the refresh loop: on every tick fetch a snapshot and forward it to
/// the store. Fetch failures are logged and retried on the next tick; the
/// loop ends when the clock stops or the store goes away.
pub fn spawn_refresher<S, C>(
    source: S,
    mut clock: C,
    tx: mpsc::Sender<Msg>,
) -> tokio::task::JoinHandle<()>
where
    S: SnapshotSource,
    C: Clock,
{
    tokio::spawn(async move {
        let mut ticks: u64 = 0;
        let mut failures: u64 = 0;

        while clock.tick().await {
            ticks += 1;
            match source.fetch().await {
                Ok(snap) => {
                    failures = 0;
                    let sent = tx.send(Msg::PoolUpdated(snap.pool)).await.is_ok()
                        && tx.send(Msg::MarketUpdated(snap.market)).await.is_ok();
                    if !sent {
                        debug!(ticks, "[POOL] store closed, stopping refresher");
                        return;
                    }
                }
                Err(e) => {
                    failures += 1;
                    warn!(error = %e, failures, "[POOL] failed to refresh snapshot");
                }
            }
            if ticks % 12 == 0 {
                info!(ticks, failures, "[HEARTBEAT] refresher alive");
            }
        }
        debug!(ticks, "[POOL] clock stopped, refresher done");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::models::{MarketData, PoolData};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Ticks only when the test says so.
    struct ManualClock(mpsc::Receiver<()>);

    impl Clock for ManualClock {
        async fn tick(&mut self) -> bool {
            self.0.recv().await.is_some()
        }
    }

    /// Fails every `fail_every`-th call, otherwise reports the call number as the price.
    struct CountingSource {
        calls: Arc<AtomicUsize>,
        fail_every: usize,
    }

    impl SnapshotSource for CountingSource {
        async fn fetch(&self) -> Result<MarketSnapshot> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_every > 0 && n % self.fail_every == 0 {
                return Err(AppError::Config("rpc down".into()));
            }
            Ok(MarketSnapshot {
                pool: PoolData {
                    tx_count: n as u64,
                    ..Default::default()
                },
                market: MarketData {
                    price_eth: n as f64,
                },
            })
        }
    }

    fn source(fail_every: usize) -> (CountingSource, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            CountingSource {
                calls: calls.clone(),
                fail_every,
            },
            calls,
        )
    }

    #[tokio::test]
    async fn forwards_snapshots_per_tick_and_skips_failures() {
        let (src, calls) = source(2);
        let (tick_tx, tick_rx) = mpsc::channel(4);
        let (msg_tx, mut msg_rx) = mpsc::channel(16);
        let handle = spawn_refresher(src, ManualClock(tick_rx), msg_tx);

        for _ in 0..3 {
            tick_tx.send(()).await.unwrap();
        }
        drop(tick_tx);
        handle.await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let mut msgs = Vec::new();
        while let Ok(m) = msg_rx.try_recv() {
            msgs.push(m);
        }
        // calls 1 and 3 succeed, call 2 fails
        assert_eq!(msgs.len(), 4);
        assert_eq!(msgs[1], Msg::MarketUpdated(MarketData { price_eth: 1.0 }));
        assert_eq!(msgs[3], Msg::MarketUpdated(MarketData { price_eth: 3.0 }));
    }

    #[tokio::test]
    async fn stops_when_store_is_gone() {
        let (src, calls) = source(0);
        let (tick_tx, tick_rx) = mpsc::channel(4);
        let (msg_tx, msg_rx) = mpsc::channel(16);
        drop(msg_rx);
        let handle = spawn_refresher(src, ManualClock(tick_rx), msg_tx);

        tick_tx.send(()).await.unwrap();
        handle.await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_clock_fires_on_period() {
        let (src, calls) = source(0);
        let (msg_tx, mut msg_rx) = mpsc::channel(64);
        let handle = spawn_refresher(src, IntervalClock::new(Duration::from_secs(5)), msg_tx);

        // ticks at 0s, 5s and 10s
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        handle.abort();
        let mut received = 0;
        while msg_rx.recv().await.is_some() {
            received += 1;
        }
        assert_eq!(received, 6);
    }
}
