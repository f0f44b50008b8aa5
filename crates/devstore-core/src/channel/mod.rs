// ── Remote API channels ──
//
// A channel's readiness is a single shared `watch` value. Channel
// implementations own the writer half (`ReadinessSignal`) and drive it from
// whatever probing they do; the availability gate only observes it, so
// every waiter is released together when the value flips to `Ready`.

mod gate;
mod probe;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

pub use gate::{ApiChannelExt, AvailabilityGate};
pub use probe::TcpProbeChannel;

// ── Readiness ───────────────────────────────────────────────────────

/// Last known readiness of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Readiness {
    #[default]
    Unknown,
    Ready,
}

impl Readiness {
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Writer half of a channel's readiness state.
///
/// Cheaply cloneable; all clones drive the same underlying value.
#[derive(Debug, Clone)]
pub struct ReadinessSignal {
    tx: Arc<watch::Sender<Readiness>>,
}

impl ReadinessSignal {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Readiness::Unknown);
        Self { tx: Arc::new(tx) }
    }

    /// Flip to `Ready`, waking every waiter. No-op when already ready.
    pub fn mark_ready(&self) {
        self.set(Readiness::Ready);
    }

    /// Return to `Unknown`, e.g. after the underlying connection dropped.
    pub fn reset(&self) {
        self.set(Readiness::Unknown);
    }

    pub fn current(&self) -> Readiness {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Readiness> {
        self.tx.subscribe()
    }

    fn set(&self, next: Readiness) {
        // `send_if_modified` updates the value even with zero receivers.
        self.tx.send_if_modified(|state| {
            if *state == next {
                false
            } else {
                *state = next;
                true
            }
        });
    }
}

impl Default for ReadinessSignal {
    fn default() -> Self {
        Self::new()
    }
}

// ── ApiChannel ──────────────────────────────────────────────────────

/// A logical connection to a remote API whose readiness can be observed.
pub trait ApiChannel: Send + Sync {
    /// Identity used in logs and in [`ChannelError`](crate::ChannelError).
    fn name(&self) -> &str;

    /// A fresh receiver of the channel's readiness.
    fn readiness(&self) -> watch::Receiver<Readiness>;
}

impl<C: ApiChannel + ?Sized> ApiChannel for Arc<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn readiness(&self) -> watch::Receiver<Readiness> {
        (**self).readiness()
    }
}

impl<C: ApiChannel + ?Sized> ApiChannel for &C {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn readiness(&self) -> watch::Receiver<Readiness> {
        (**self).readiness()
    }
}

/// A channel whose readiness is signalled externally through a
/// [`ReadinessSignal`], e.g. by a transport's connect callback.
#[derive(Debug, Clone)]
pub struct SignalChannel {
    name: String,
    signal: ReadinessSignal,
}

impl SignalChannel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signal: ReadinessSignal::new(),
        }
    }

    pub fn signal(&self) -> &ReadinessSignal {
        &self.signal
    }
}

impl ApiChannel for SignalChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn readiness(&self) -> watch::Receiver<Readiness> {
        self.signal.subscribe()
    }
}

// ── TimeUnit ────────────────────────────────────────────────────────

/// Unit of the amount passed to
/// [`AvailabilityGate::wait_for_available`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum TimeUnit {
    #[strum(to_string = "nanoseconds", serialize = "ns")]
    Nanoseconds,
    #[strum(to_string = "microseconds", serialize = "us")]
    Microseconds,
    #[strum(to_string = "milliseconds", serialize = "ms")]
    Milliseconds,
    #[strum(to_string = "seconds", serialize = "s")]
    Seconds,
    #[strum(to_string = "minutes", serialize = "m")]
    Minutes,
    #[strum(to_string = "hours", serialize = "h")]
    Hours,
    #[strum(to_string = "days", serialize = "d")]
    Days,
}

impl TimeUnit {
    /// Convert `amount` of this unit into a `Duration`, saturating on overflow.
    pub fn to_duration(self, amount: u64) -> Duration {
        match self {
            Self::Nanoseconds => Duration::from_nanos(amount),
            Self::Microseconds => Duration::from_micros(amount),
            Self::Milliseconds => Duration::from_millis(amount),
            Self::Seconds => Duration::from_secs(amount),
            Self::Minutes => Duration::from_secs(amount.saturating_mul(60)),
            Self::Hours => Duration::from_secs(amount.saturating_mul(3_600)),
            Self::Days => Duration::from_secs(amount.saturating_mul(86_400)),
        }
    }
}
