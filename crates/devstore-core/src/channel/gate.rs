// ── Availability gate ──
//
// Bounded wait for a channel to report ready. The gate never probes and
// never writes readiness; it suspends on the channel's `watch` receiver
// until the value is `Ready`, the deadline passes, or the caller cancels.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{ApiChannel, Readiness, TimeUnit};
use crate::error::ChannelError;

/// Guards calls on an [`ApiChannel`] behind a bounded readiness wait.
#[derive(Debug, Clone)]
pub struct AvailabilityGate<C> {
    channel: C,
    cancel: Option<CancellationToken>,
}

impl<C: ApiChannel> AvailabilityGate<C> {
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            cancel: None,
        }
    }

    /// Abort pending waits with [`ChannelError::Cancelled`] once `token`
    /// is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Wait up to `amount` of `unit` for the channel to become ready.
    ///
    /// Returns immediately when the channel is already ready, regardless of
    /// the amount. Safe to call any number of times and from any number of
    /// tasks concurrently.
    pub async fn wait_for_available(&self, amount: u64, unit: TimeUnit) -> Result<(), ChannelError> {
        self.wait_for(unit.to_duration(amount)).await
    }

    /// [`wait_for_available`](Self::wait_for_available) with a `Duration`.
    pub async fn wait_for(&self, limit: Duration) -> Result<(), ChannelError> {
        wait_until_ready(
            self.channel.name(),
            self.channel.readiness(),
            limit,
            self.cancel.as_ref(),
        )
        .await
    }
}

/// Gate-less waiting directly on any channel.
pub trait ApiChannelExt: ApiChannel {
    /// Wait up to `amount` of `unit` for this channel to become ready.
    fn wait_for_api_available(
        &self,
        amount: u64,
        unit: TimeUnit,
    ) -> impl Future<Output = Result<(), ChannelError>> + Send + '_ {
        wait_until_ready(self.name(), self.readiness(), unit.to_duration(amount), None)
    }
}

impl<C: ApiChannel + ?Sized> ApiChannelExt for C {}

async fn wait_until_ready(
    channel: &str,
    mut readiness: watch::Receiver<Readiness>,
    limit: Duration,
    cancel: Option<&CancellationToken>,
) -> Result<(), ChannelError> {
    if readiness.borrow_and_update().is_ready() {
        return Ok(());
    }

    debug!(channel, ?limit, "waiting for API channel");
    let started = Instant::now();

    let ready = async {
        // A dropped sender can never report ready; sit out the deadline.
        let closed = readiness.wait_for(|state| state.is_ready()).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    };
    let cancelled = async {
        match cancel {
            Some(token) => token.cancelled().await,
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        biased;
        () = cancelled => {
            debug!(channel, waited = ?started.elapsed(), "wait for API channel cancelled");
            Err(ChannelError::Cancelled { channel: channel.to_owned() })
        }
        outcome = tokio::time::timeout(limit, ready) => match outcome {
            Ok(()) => {
                debug!(channel, waited = ?started.elapsed(), "API channel available");
                Ok(())
            }
            Err(_) => {
                let waited = started.elapsed();
                warn!(channel, ?waited, "API channel not available before deadline");
                Err(ChannelError::ApiNotAvailable { channel: channel.to_owned(), waited })
            }
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::channel::SignalChannel;

    #[tokio::test(start_paused = true)]
    async fn ready_channel_returns_immediately_with_zero_wait() {
        let channel = SignalChannel::new("device-management");
        channel.signal().mark_ready();
        let gate = AvailabilityGate::new(channel);

        let started = Instant::now();
        gate.wait_for_available(0, TimeUnit::Seconds).await.unwrap();
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn never_ready_channel_times_out_at_deadline() {
        let gate = AvailabilityGate::new(SignalChannel::new("asset-management"));

        let started = Instant::now();
        let err = gate
            .wait_for_available(100, TimeUnit::Milliseconds)
            .await
            .unwrap_err();
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_millis(100), "returned early: {elapsed:?}");
        assert!(elapsed < Duration::from_millis(150), "returned late: {elapsed:?}");
        match err {
            ChannelError::ApiNotAvailable { channel, waited } => {
                assert_eq!(channel, "asset-management");
                assert!(waited >= Duration::from_millis(100));
            }
            other @ ChannelError::Cancelled { .. } => panic!("unexpected: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn zero_wait_on_unready_channel_times_out() {
        let gate = AvailabilityGate::new(SignalChannel::new("event-store"));
        let err = gate.wait_for(Duration::ZERO).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test(start_paused = true)]
    async fn becomes_ready_before_deadline() {
        let channel = SignalChannel::new("device-management");
        let signal = channel.signal().clone();
        let gate = AvailabilityGate::new(channel);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(40)).await;
            signal.mark_ready();
        });

        let started = Instant::now();
        gate.wait_for_available(5, TimeUnit::Seconds).await.unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(40) && elapsed < Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn marking_ready_wakes_pending_waiter() {
        let channel = SignalChannel::new("device-management");
        let signal = channel.signal().clone();
        let gate = AvailabilityGate::new(channel);

        let mut wait = tokio_test::task::spawn(gate.wait_for(Duration::from_secs(1)));
        tokio_test::assert_pending!(wait.poll());
        signal.mark_ready();
        assert!(wait.is_woken());
        tokio_test::assert_ready_ok!(wait.poll());
    }

    #[tokio::test(start_paused = true)]
    async fn all_waiters_are_released_together() {
        let channel = SignalChannel::new("device-management");
        let signal = channel.signal().clone();
        let gate = Arc::new(AvailabilityGate::new(channel));

        let first = tokio::spawn({
            let gate = Arc::clone(&gate);
            async move { gate.wait_for_available(10, TimeUnit::Seconds).await }
        });
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = tokio::spawn({
            let gate = Arc::clone(&gate);
            async move { gate.wait_for_available(10, TimeUnit::Seconds).await }
        });
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert!(!first.is_finished());
        assert!(!second.is_finished());
        signal.mark_ready();

        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_waits_after_ready_are_immediate() {
        let channel = SignalChannel::new("device-management");
        channel.signal().mark_ready();
        let gate = AvailabilityGate::new(channel);

        for _ in 0..3 {
            let started = Instant::now();
            gate.wait_for(Duration::from_secs(1)).await.unwrap();
            assert_eq!(started.elapsed(), Duration::ZERO);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_is_distinct_from_timeout() {
        let token = CancellationToken::new();
        let gate = AvailabilityGate::new(SignalChannel::new("device-management"))
            .with_cancellation(token.clone());

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        let started = Instant::now();
        let err = gate.wait_for_available(1, TimeUnit::Minutes).await.unwrap_err();
        assert_eq!(
            err,
            ChannelError::Cancelled {
                channel: "device-management".into()
            }
        );
        assert!(!err.is_retryable());
        assert!(started.elapsed() < Duration::from_millis(20));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_signal_still_waits_out_deadline() {
        let channel = SignalChannel::new("orphan");
        let rx = channel.readiness();
        drop(channel);

        let started = Instant::now();
        let err = wait_until_ready("orphan", rx, Duration::from_millis(30), None)
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test(start_paused = true)]
    async fn gate_accepts_borrowed_and_shared_channels() {
        let channel = SignalChannel::new("device-management");
        channel.signal().mark_ready();
        AvailabilityGate::new(&channel)
            .wait_for(Duration::ZERO)
            .await
            .unwrap();

        let shared = Arc::new(channel);
        AvailabilityGate::new(Arc::clone(&shared))
            .wait_for(Duration::ZERO)
            .await
            .unwrap();
        shared
            .wait_for_api_available(0, TimeUnit::Milliseconds)
            .await
            .unwrap();
    }
}
