//! Drift-tolerant countdown to a target instant.
//!
//! The remaining time is recomputed from the wall clock on every tick
//! rather than decremented, so late or missed ticks self-correct instead
//! of accumulating drift.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Observer for progress output. The core never renders anything itself;
/// the CLI hangs a spinner off this, tests record the calls.
pub trait ProgressSink {
    fn on_tick(&self, remaining_seconds: i64);
    fn on_event(&self, description: &str);
}

/// How a countdown ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownOutcome {
    Completed,
    Cancelled,
}

/// Handle used to cancel a countdown from elsewhere (e.g. a Ctrl-C task).
#[derive(Clone)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Idempotent; later calls are no-ops.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Token a countdown polls for cancellation.
pub struct CancelToken {
    rx: watch::Receiver<bool>,
    // Keeps `never()` tokens from observing a closed channel.
    _keep_alive: Option<watch::Sender<bool>>,
}

impl CancelToken {
    /// A token that can never fire, for callers that don't need one.
    pub fn never() -> Self {
        let (tx, rx) = watch::channel(false);
        CancelToken {
            rx,
            _keep_alive: Some(tx),
        }
    }

    /// Resolves once the paired handle cancels. If every handle has been
    /// dropped without cancelling, pends forever.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Create a linked cancel handle/token pair.
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (
        CancelHandle { tx },
        CancelToken {
            rx,
            _keep_alive: None,
        },
    )
}

/// Suspends the caller until a target instant passes.
pub struct Countdown {
    target: DateTime<Utc>,
    period: StdDuration,
}

impl Countdown {
    pub fn new(target: DateTime<Utc>) -> Self {
        Countdown {
            target,
            period: StdDuration::from_secs(1),
        }
    }

    /// Override the tick period. Tests use short periods; callers get the
    /// one-second default.
    pub fn with_period(mut self, period: StdDuration) -> Self {
        self.period = period;
        self
    }

    /// Wait until the target passes, reporting the remaining whole seconds
    /// on each tick. Resolves immediately, with no ticks, if the target is
    /// already in the past. Resolves exactly once; the ticker is dropped on
    /// return and nothing fires afterwards. Each call owns an independent
    /// ticker, so concurrent waits share no state.
    pub async fn wait<S: ProgressSink>(
        &self,
        sink: &S,
        cancel: &mut CancelToken,
    ) -> CountdownOutcome {
        if self.remaining_seconds() <= 0 {
            return CountdownOutcome::Completed;
        }

        let mut ticker =
            tokio::time::interval_at(tokio::time::Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let remaining = self.remaining_seconds();
                    if remaining <= 0 {
                        return CountdownOutcome::Completed;
                    }
                    sink.on_tick(remaining);
                }
                _ = cancel.cancelled() => {
                    return CountdownOutcome::Cancelled;
                }
            }
        }
    }

    fn remaining_seconds(&self) -> i64 {
        (self.target - Utc::now()).num_seconds()
    }
}
