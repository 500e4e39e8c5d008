//! Graceful shutdown
//!
//! A cloneable latch shared by the HTTP server and the event log task,
//! plus the coordinator that drains them within a deadline.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};

/// One-way latch: once tripped it stays tripped.
#[derive(Clone)]
pub struct ShutdownSignal {
    latch: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (latch, _) = watch::channel(false);
        Self {
            latch: Arc::new(latch),
        }
    }

    pub fn is_triggered(&self) -> bool {
        *self.latch.borrow()
    }

    pub fn trigger(&self) {
        let tripped = self.latch.send_if_modified(|down| !std::mem::replace(down, true));
        if tripped {
            info!("Shutdown signal triggered");
        }
    }

    /// Resolves once `trigger` has been called, including calls made
    /// before this future was created.
    pub async fn wait(&self) {
        let mut rx = self.latch.subscribe();
        // the sender lives in `self`, so the channel cannot close here
        let _ = rx.wait_for(|down| *down).await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
async fn os_signal() -> Option<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
        (Ok(mut term), Ok(mut int)) => tokio::select! {
            _ = term.recv() => Some("SIGTERM"),
            _ = int.recv() => Some("SIGINT"),
        },
        _ => {
            warn!("Unix signal handlers unavailable, falling back to Ctrl+C");
            ctrl_c().await
        }
    }
}

#[cfg(not(unix))]
async fn os_signal() -> Option<&'static str> {
    ctrl_c().await
}

async fn ctrl_c() -> Option<&'static str> {
    match tokio::signal::ctrl_c().await {
        Ok(()) => Some("Ctrl+C"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            None
        }
    }
}

/// Owns the process-wide signal and the drain deadline.
pub struct ShutdownCoordinator {
    signal: ShutdownSignal,
    deadline: Duration,
}

impl ShutdownCoordinator {
    pub fn new(deadline_secs: u64) -> Self {
        Self {
            signal: ShutdownSignal::new(),
            deadline: Duration::from_secs(deadline_secs),
        }
    }

    pub fn signal(&self) -> ShutdownSignal {
        self.signal.clone()
    }

    /// Trip the signal on the first SIGTERM / SIGINT.
    pub fn start_signal_listener(&self) {
        let signal = self.signal.clone();
        tokio::spawn(async move {
            if let Some(name) = os_signal().await {
                info!(signal = name, "Received shutdown request");
                signal.trigger();
            }
        });
    }

    /// Wait for the signal, then run `drain` under the deadline.
    /// Returns `false` when the drain did not finish in time.
    pub async fn shutdown_with_cleanup<F, Fut>(&self, drain: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        self.signal.wait().await;
        let secs = self.deadline.as_secs();
        info!(deadline_secs = secs, "Draining");

        let finished = tokio::time::timeout(self.deadline, drain()).await.is_ok();
        if finished {
            info!("Graceful shutdown completed");
        } else {
            warn!(deadline_secs = secs, "Drain exceeded the shutdown deadline");
        }
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn wait_returns_after_trigger() {
        let signal = ShutdownSignal::new();
        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.wait().await })
        };
        signal.trigger();
        tokio::time::timeout(Duration::from_millis(200), waiter)
            .await
            .expect("waiter did not finish")
            .unwrap();
    }

    #[tokio::test]
    async fn late_waiters_see_an_earlier_trigger() {
        let signal = ShutdownSignal::new();
        signal.trigger();
        signal.trigger();
        assert!(signal.is_triggered());
        tokio::time::timeout(Duration::from_millis(50), signal.wait())
            .await
            .expect("already-triggered wait blocked");
    }

    #[tokio::test]
    async fn slow_drain_is_reported() {
        let coordinator = ShutdownCoordinator::new(0);
        coordinator.signal().trigger();
        let finished = coordinator
            .shutdown_with_cleanup(|| async {
                tokio::time::sleep(Duration::from_millis(50)).await;
            })
            .await;
        assert!(!finished);
    }
}
