//! Path tracking state machine.
//!
//! Per entity the machine is in one of three states: off path, on path
//! (member of the store's on-path set, carrying the managed effect),
//! or suppressed (dismount grace — all path-status updates ignored
//! until the window elapses).
//!
//! Event-driven updates arrive through [`crate::events::EventAdapter`];
//! the periodic sweeps ([`reconcile_sweep`](PathTracker::reconcile_sweep),
//! [`refresh_sweep`](PathTracker::refresh_sweep),
//! [`player_sweep`](PathTracker::player_sweep)) run on fixed intervals
//! and restore correctness regardless of any single missed event.

use std::sync::Arc;

use chrono::Duration;

use crate::config::{SettingsHandle, TrackingSettings};
use crate::detector;
use crate::host::{Clock, EffectApplier, EntityId, EntitySnapshot, HostWorld, Location};
use crate::scheduler::UnsuppressTimers;
use crate::store::EntityStateStore;


pub struct PathTracker {
    store: Arc<EntityStateStore>,
    world: Arc<dyn HostWorld>,
    effects: Arc<dyn EffectApplier>,
    clock: Arc<dyn Clock>,
    settings: SettingsHandle,
    unsuppress_timers: UnsuppressTimers,
}

impl PathTracker {
    pub fn new(
        world: Arc<dyn HostWorld>,
        effects: Arc<dyn EffectApplier>,
        clock: Arc<dyn Clock>,
        settings: SettingsHandle,
    ) -> Self {
        Self {
            store: Arc::new(EntityStateStore::new()),
            world,
            effects,
            clock,
            settings,
            unsuppress_timers: UnsuppressTimers::new(),
        }
    }

    fn with_settings<R>(&self, f: impl FnOnce(&TrackingSettings) -> R) -> R {
        f(&self.settings.read().unwrap_or_else(|p| p.into_inner()))
    }

    fn is_suppressed(&self, id: EntityId) -> bool {
        let now = self.clock.now();
        self.store.suppressed_until(id).is_some_and(|until| until > now)
    }

    /// Record a new position. Returns false (nothing further to do)
    /// while suppressed, in/under water, or when the entity has not
    /// crossed a block boundary since the last update.
    pub fn update_position(&self, snapshot: &EntitySnapshot, location: &Location) -> bool {
        if self.is_suppressed(snapshot.id) {
            return false;
        }
        if detector::is_in_water(self.world.as_ref(), snapshot, location) {
            return false;
        }
        let block = location.block_pos();
        if self.store.last_block_pos(snapshot.id) == Some(block) {
            return false;
        }
        self.store.set_last_block_pos(snapshot.id, block);
        true
    }

    /// Evaluate near-path status at a location and transition.
    pub fn update_path_status(&self, snapshot: &EntitySnapshot, location: &Location) {
        let near = self.with_settings(|s| {
            detector::is_near_path(self.world.as_ref(), s, location)
        });
        if near {
            self.handle_on_path(snapshot);
        } else {
            self.handle_off_path(snapshot);
        }
    }

    /// Convenience: evaluate status at the snapshot's own location.
    pub fn check_path_status(&self, snapshot: &EntitySnapshot) {
        self.update_path_status(snapshot, &snapshot.location);
    }

    /// Confirmed near a path block: stamp the observation, join the
    /// on-path set, apply/refresh the effect. Entities whose category
    /// is disabled (or players currently riding) are demoted instead.
    pub fn handle_on_path(&self, snapshot: &EntitySnapshot) {
        let id = snapshot.id;
        if self.is_suppressed(id) {
            return;
        }
        if !self.qualifies(snapshot) {
            self.remove_from_path(id);
            return;
        }
        self.store.set_last_on_path_at(id, self.clock.now());
        if self.store.mark_on_path(id) {
            tracing::debug!("[TRACKER] {} ({:?}) entered path", id, snapshot.kind);
        }
        self.apply_speed_effect(snapshot);
    }

    /// Not near a path block: remove only once the grace period since
    /// the last confirmed observation has elapsed, so brief gaps (jump
    /// arcs) keep the boost.
    pub fn handle_off_path(&self, snapshot: &EntitySnapshot) {
        let id = snapshot.id;
        if self.is_suppressed(id) {
            return;
        }
        if !self.within_grace(id) {
            self.remove_from_path(id);
        }
    }

    fn within_grace(&self, id: EntityId) -> bool {
        let Some(last) = self.store.last_on_path_at(id) else {
            return false;
        };
        let elapsed = self.clock.now().signed_duration_since(last).num_milliseconds();
        elapsed <= self.with_settings(|s| s.grace_period_ms)
    }

    /// Idempotent demotion: the effect-removal side effect fires only
    /// if the entity was actually in the on-path set.
    pub fn remove_from_path(&self, id: EntityId) {
        if self.store.unmark_on_path(id) {
            self.effects.remove(id);
            self.store.clear_last_on_path_at(id);
            tracing::debug!("[TRACKER] {} left path", id);
        }
    }

    /// Dismount: open the suppression window, strip the boost now, and
    /// schedule the one-shot unsuppress.
    pub fn handle_dismount(&self, snapshot: &EntitySnapshot) {
        let id = snapshot.id;
        let window_ms = self.with_settings(|s| s.dismount_suppression_ms);
        let until = self.clock.now() + Duration::milliseconds(window_ms);
        self.store.set_suppressed_until(id, until);
        self.remove_from_path(id);
        self.unsuppress_timers
            .schedule(id, window_ms.max(0) as u64, Arc::clone(&self.store));
        tracing::debug!("[TRACKER] {} dismounted, suppressed for {}ms", id, window_ms);
    }

    /// Unconditional full removal: record, on-path membership, pending
    /// unsuppress timer, and the effect itself. Idempotent. Triggered
    /// by death, despawn, disconnect, world change, or chunk unload.
    pub fn cleanup_entity(&self, id: EntityId) {
        self.unsuppress_timers.cancel(id);
        self.effects.remove(id);
        self.store.remove(id);
    }

    /// Whether the entity currently carries the managed boost.
    /// Teleports are denied while this holds.
    pub fn is_on_path(&self, id: EntityId) -> bool {
        self.store.is_on_path(id)
    }

    /// Category gating, re-checked on every apply and refresh: players
    /// need player speed enabled and must be on foot; mounts need
    /// mount speed enabled.
    fn qualifies(&self, snapshot: &EntitySnapshot) -> bool {
        self.with_settings(|s| {
            if !s.category_enabled(snapshot.kind) {
                return false;
            }
            !(snapshot.kind == crate::host::EntityKind::Player && snapshot.in_vehicle)
        })
    }

    /// Re-apply the effect only when absent or about to run out, so
    /// the boost never visibly flickers between refresh cycles while
    /// avoiding a write every tick.
    fn apply_speed_effect(&self, snapshot: &EntitySnapshot) {
        let (level, duration, threshold) = self.with_settings(|s| {
            (
                s.speed_level_for(snapshot.kind),
                s.effect_duration_ticks,
                s.refresh_threshold_ticks,
            )
        });
        let needs_apply = match self.effects.current(snapshot.id) {
            None => true,
            Some(effect) => effect.remaining_ticks < threshold || effect.level != level,
        };
        if needs_apply {
            self.effects.apply(snapshot.id, level, duration);
        }
    }

    /// Strip everything and forget all state. Used on config reload
    /// and shutdown so no stale boost survives a change.
    pub fn reset(&self) {
        self.unsuppress_timers.cancel_all();
        for id in self.store.clear() {
            self.effects.remove(id);
        }
        tracing::info!("[TRACKER] State reset, all boosts stripped");
    }

    // ─────────────────────────────────────────────────────────────────
    // Periodic sweeps (driven by the Scheduler)
    // ─────────────────────────────────────────────────────────────────

    /// (cleanup, refresh) sweep cadences in ticks, for the scheduler.
    pub fn sweep_intervals(&self) -> (u64, u64) {
        self.with_settings(|s| (s.cleanup_interval_ticks, s.refresh_interval_ticks))
    }

    /// Reconciliation: purge identities whose entity is gone or
    /// invalid, force-remove entities that drifted off path past the
    /// grace period, and expire stale suppression windows.
    pub fn reconcile_sweep(&self) {
        for id in self.store.on_path_ids() {
            let Some(snapshot) = self.world.entity(id) else {
                self.store.remove(id);
                continue;
            };
            if !snapshot.valid {
                self.store.remove(id);
                continue;
            }
            if self.is_suppressed(id) {
                continue;
            }
            let near = self.with_settings(|s| {
                detector::is_near_path(self.world.as_ref(), s, &snapshot.location)
            });
            if !near && !self.within_grace(id) {
                self.remove_from_path(id);
            }
        }
        self.store.expire_suppressions(self.clock.now());
    }

    /// Effect refresh: re-validate gating for everything on path and
    /// re-apply per the refresh policy. Disabling a category deboosts
    /// already-boosted entities within one sweep.
    pub fn refresh_sweep(&self) {
        for id in self.store.on_path_ids() {
            let Some(snapshot) = self.world.entity(id) else {
                continue; // reconcile will purge it
            };
            if !snapshot.valid || self.is_suppressed(id) {
                continue;
            }
            if !self.qualifies(&snapshot) {
                self.remove_from_path(id);
                continue;
            }
            self.apply_speed_effect(&snapshot);
        }
    }

    /// Tick-driven poll over connected players (and their mounts).
    /// Movement events under-fire for stationary-but-qualifying
    /// positions, e.g. standing still on a path block after a
    /// teleport; this guarantees eventual correctness.
    pub fn player_sweep(&self) {
        for player in self.world.online_players() {
            let near = self.with_settings(|s| {
                detector::is_near_path(self.world.as_ref(), s, &player.location)
            });
            if near && !player.in_vehicle {
                self.handle_on_path(&player);
            } else {
                self.handle_off_path(&player);
            }

            if let Some(vehicle_id) = player.vehicle
                && let Some(mount) = self.world.entity(vehicle_id)
                && mount.kind.is_mount()
            {
                let near = self.with_settings(|s| {
                    detector::is_near_path(self.world.as_ref(), s, &mount.location)
                });
                if near {
                    self.handle_on_path(&mount);
                } else {
                    self.handle_off_path(&mount);
                }
            }
        }
    }
}
