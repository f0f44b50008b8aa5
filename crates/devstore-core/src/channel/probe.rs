// ── TCP probe channel ──
//
// A channel that declares itself ready the first time a TCP connection to
// its endpoint succeeds. Probing runs on a background task that stops once
// the endpoint answered or the channel is dropped.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, trace};

use super::{ApiChannel, Readiness, ReadinessSignal};

/// Channel whose readiness is "a TCP connect to `addr` succeeded".
#[derive(Debug)]
pub struct TcpProbeChannel {
    name: String,
    addr: SocketAddr,
    signal: ReadinessSignal,
    cancel: CancellationToken,
}

impl TcpProbeChannel {
    /// Start probing `addr` every `interval`. Must be called from within a
    /// tokio runtime.
    pub fn spawn(addr: SocketAddr, interval: Duration) -> Self {
        let signal = ReadinessSignal::new();
        let cancel = CancellationToken::new();
        let name = format!("tcp://{addr}");

        tokio::spawn(probe_task(
            name.clone(),
            addr,
            interval,
            signal.clone(),
            cancel.clone(),
        ));

        Self {
            name,
            addr,
            signal,
            cancel,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn signal(&self) -> &ReadinessSignal {
        &self.signal
    }

    /// Stop the background probe. Readiness keeps its last value.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for TcpProbeChannel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl ApiChannel for TcpProbeChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn readiness(&self) -> watch::Receiver<Readiness> {
        self.signal.subscribe()
    }
}

// ── Background task ──────────────────────────────────────────────

async fn probe_task(
    name: String,
    addr: SocketAddr,
    interval: Duration,
    signal: ReadinessSignal,
    cancel: CancellationToken,
) {
    // `interval` panics on zero.
    let period = interval.max(Duration::from_millis(1));
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                match tokio::time::timeout(period, TcpStream::connect(addr)).await {
                    Ok(Ok(_stream)) => {
                        info!(channel = %name, "endpoint accepted connection");
                        signal.mark_ready();
                        break;
                    }
                    Ok(Err(e)) => trace!(channel = %name, error = %e, "probe failed"),
                    Err(_) => trace!(channel = %name, "probe timed out"),
                }
            }
        }
    }
}
