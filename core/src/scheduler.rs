//! Periodic sweep tasks and one-shot unsuppress timers.
//!
//! The tracker itself is synchronous; these tasks just drive its sweep
//! methods on fixed intervals. Intervals are configured in game ticks
//! (1 tick = 50ms).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use hashbrown::HashMap;
use tokio::task::JoinHandle;

use crate::host::EntityId;
use crate::store::EntityStateStore;
use crate::tracker::PathTracker;

/// Milliseconds per game tick.
pub const TICK_MS: u64 = 50;

/// One-shot unsuppress timers, keyed by entity identity.
///
/// A dismount schedules a sleep task that clears the suppression field
/// when the window elapses; cleanup cancels the pending task so it can
/// never touch a reused identity. Suppression checks compare
/// timestamps anyway, so outside a tokio runtime scheduling degrades
/// to a no-op and expiry falls to the reconciliation sweep.
#[derive(Debug, Default)]
pub struct UnsuppressTimers {
    tasks: Mutex<HashMap<EntityId, JoinHandle<()>>>,
}

impl UnsuppressTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the unsuppress for `id` after `delay_ms`. Replaces any
    /// pending timer for the same identity.
    pub fn schedule(&self, id: EntityId, delay_ms: u64, store: Arc<EntityStateStore>) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let task = runtime.spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            // No-op if the record was removed first
            store.clear_suppression(id);
        });
        let mut tasks = self.tasks.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = tasks.insert(id, task) {
            previous.abort();
        }
    }

    /// Cancel any pending timer for this identity. Cleanup wins over
    /// pending timers.
    pub fn cancel(&self, id: EntityId) {
        let mut tasks = self.tasks.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(task) = tasks.remove(&id) {
            task.abort();
        }
    }

    pub fn cancel_all(&self) {
        let mut tasks = self.tasks.lock().unwrap_or_else(|p| p.into_inner());
        for (_, task) in tasks.drain() {
            task.abort();
        }
    }
}

impl Drop for UnsuppressTimers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

/// Fixed-interval sweep tasks over a shared tracker.
pub struct Scheduler {
    tasks: Vec<JoinHandle<()>>,
}

impl Scheduler {
    /// Spawn the reconciliation, effect-refresh, and player sweeps.
    /// Cadences are read from the tracker's settings at start time.
    pub fn start(tracker: Arc<PathTracker>) -> Self {
        let (cleanup_ticks, refresh_ticks) = tracker.sweep_intervals();
        let cleanup_period = Duration::from_millis(cleanup_ticks * TICK_MS);
        let refresh_period = Duration::from_millis(refresh_ticks * TICK_MS);

        let mut tasks = Vec::with_capacity(3);

        let t = Arc::clone(&tracker);
        tasks.push(tokio::spawn(async move {
            let mut interval = tokio::time::interval(cleanup_period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            interval.tick().await; // first tick completes immediately
            loop {
                interval.tick().await;
                t.reconcile_sweep();
            }
        }));

        let t = Arc::clone(&tracker);
        tasks.push(tokio::spawn(async move {
            let mut interval = tokio::time::interval(refresh_period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            interval.tick().await;
            loop {
                interval.tick().await;
                t.refresh_sweep();
            }
        }));

        let t = tracker;
        tasks.push(tokio::spawn(async move {
            let mut interval = tokio::time::interval(refresh_period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            interval.tick().await;
            loop {
                interval.tick().await;
                t.player_sweep();
            }
        }));

        tracing::info!(
            "[SCHEDULER] Sweeps started (cleanup every {cleanup_ticks} ticks, refresh every {refresh_ticks} ticks)"
        );
        Self { tasks }
    }

    pub fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
