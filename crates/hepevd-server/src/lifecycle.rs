//! Two-state lifecycle of the serve loop.
//!
//! [`Lifecycle`] is `Stopped` until a serve loop claims it, and goes back
//! to `Stopped` once that loop has returned. A stop request is delivered
//! through a [`Notify`] permit, so it is not lost if it arrives before the
//! serve loop starts waiting for it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tracing::{debug, warn};

/// Observable state of the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No listener is bound.
    Stopped,
    /// A serve loop owns the listener.
    Listening,
}

#[derive(Debug, Default)]
enum Phase {
    #[default]
    Stopped,
    Listening {
        shutdown: Arc<Notify>,
        stop_requested: bool,
    },
}

/// Start/stop controller shared between the serve loop and `/quit`.
#[derive(Debug, Default)]
pub struct Lifecycle {
    phase: Mutex<Phase>,
}

impl Lifecycle {
    /// Create a controller in the `Stopped` state.
    pub const fn new() -> Self {
        Self {
            phase: Mutex::new(Phase::Stopped),
        }
    }

    fn phase(&self) -> MutexGuard<'_, Phase> {
        self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state.
    pub fn state(&self) -> LifecycleState {
        match *self.phase() {
            Phase::Stopped => LifecycleState::Stopped,
            Phase::Listening { .. } => LifecycleState::Listening,
        }
    }

    /// Claim the lifecycle for a new serve loop.
    ///
    /// Returns `None` if another serve loop is already listening. The
    /// returned guard puts the lifecycle back to `Stopped` when dropped.
    pub fn begin(&self) -> Option<ListeningGuard<'_>> {
        let mut phase = self.phase();
        if matches!(*phase, Phase::Listening { .. }) {
            return None;
        }

        let shutdown = Arc::new(Notify::new());
        *phase = Phase::Listening {
            shutdown: Arc::clone(&shutdown),
            stop_requested: false,
        };
        drop(phase);

        debug!("Lifecycle: Stopped -> Listening");
        Some(ListeningGuard {
            lifecycle: self,
            shutdown,
        })
    }

    /// Ask the running serve loop to stop.
    ///
    /// Returns `true` if this call delivered the stop signal. Calling it
    /// while stopped, or a second time before the loop has exited, does
    /// nothing and returns `false`.
    pub fn stop(&self) -> bool {
        let mut phase = self.phase();
        match &mut *phase {
            Phase::Listening {
                shutdown,
                stop_requested,
            } if !*stop_requested => {
                *stop_requested = true;
                shutdown.notify_one();
                debug!("Lifecycle: stop requested");
                true
            }
            Phase::Listening { .. } => {
                warn!("Stop already requested, waiting for the server to close");
                false
            }
            Phase::Stopped => {
                debug!("Stop requested while stopped, ignoring");
                false
            }
        }
    }

    fn finish(&self) {
        *self.phase() = Phase::Stopped;
        debug!("Lifecycle: Listening -> Stopped");
    }
}

/// Held by a serve loop for as long as it owns the listener.
#[derive(Debug)]
pub struct ListeningGuard<'a> {
    lifecycle: &'a Lifecycle,
    shutdown: Arc<Notify>,
}

impl ListeningGuard<'_> {
    /// A future that completes once [`Lifecycle::stop`] has been called.
    pub fn shutdown_signal(&self) -> impl Future<Output = ()> + Send + 'static {
        let shutdown = Arc::clone(&self.shutdown);
        async move { shutdown.notified().await }
    }
}

impl Drop for ListeningGuard<'_> {
    fn drop(&mut self) {
        self.lifecycle.finish();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::time::Duration;

    use super::*;

    #[test]
    fn starts_stopped() {
        assert_eq!(Lifecycle::new().state(), LifecycleState::Stopped);
    }

    #[test]
    fn begin_then_drop_round_trips() {
        let lifecycle = Lifecycle::new();
        let guard = lifecycle.begin();
        assert!(guard.is_some());
        assert_eq!(lifecycle.state(), LifecycleState::Listening);

        drop(guard);
        assert_eq!(lifecycle.state(), LifecycleState::Stopped);
    }

    #[test]
    fn second_begin_is_rejected_while_listening() {
        let lifecycle = Lifecycle::new();
        let _guard = lifecycle.begin();
        assert!(lifecycle.begin().is_none());
    }

    #[test]
    fn restart_after_stop_is_allowed() {
        let lifecycle = Lifecycle::new();
        drop(lifecycle.begin());
        assert!(lifecycle.begin().is_some());
    }

    #[test]
    fn stop_while_stopped_is_a_no_op() {
        let lifecycle = Lifecycle::new();
        assert!(!lifecycle.stop());
        assert!(!lifecycle.stop());
        assert_eq!(lifecycle.state(), LifecycleState::Stopped);
    }

    #[test]
    fn only_the_first_stop_is_delivered() {
        let lifecycle = Lifecycle::new();
        let _guard = lifecycle.begin();
        assert!(lifecycle.stop());
        assert!(!lifecycle.stop());
        assert_eq!(lifecycle.state(), LifecycleState::Listening);
    }

    #[tokio::test]
    async fn stop_before_wait_is_not_lost() {
        let lifecycle = Lifecycle::new();
        let guard = lifecycle.begin().unwrap();
        let signal = guard.shutdown_signal();

        assert!(lifecycle.stop());
        let fired = tokio::time::timeout(Duration::from_secs(1), signal).await;
        assert!(fired.is_ok());
    }

    #[tokio::test]
    async fn stop_from_another_task_wakes_the_waiter() {
        let lifecycle = Arc::new(Lifecycle::new());
        let guard = lifecycle.begin().unwrap();
        let waiter = tokio::spawn(guard.shutdown_signal());

        let stopper = Arc::clone(&lifecycle);
        let delivered = tokio::spawn(async move { stopper.stop() }).await.unwrap();
        assert!(delivered);

        let fired = tokio::time::timeout(Duration::from_secs(1), waiter).await;
        assert!(matches!(fired, Ok(Ok(()))));

        drop(guard);
        assert_eq!(lifecycle.state(), LifecycleState::Stopped);
    }
}
