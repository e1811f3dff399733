//! Concurrent entity state store.
//!
//! Exclusively owns all tracked-entity records plus the on-path
//! identity set. The tracker and the sweeps go through these
//! operations only; nothing holds a record across calls. Every
//! operation is atomic with respect to a single identity; iteration
//! works on an identity snapshot and tolerates concurrent removal
//! (skip-on-miss).

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDateTime;
use hashbrown::{HashMap, HashSet};

use crate::host::{BlockPos, EntityId};

/// Per-entity tracked state. The on-path flag itself lives in the
/// store's identity set, mirroring how membership drives the sweeps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackedEntity {
    /// Last integer block coordinate recorded; suppresses redundant
    /// spatial scans on sub-block movement.
    pub last_block_pos: Option<BlockPos>,
    /// Last confirmed "near path" observation; drives the grace period.
    pub last_on_path_at: Option<NaiveDateTime>,
    /// While in the future, all path-status updates are ignored.
    pub suppressed_until: Option<NaiveDateTime>,
}

#[derive(Debug, Default)]
pub struct EntityStateStore {
    records: RwLock<HashMap<EntityId, TrackedEntity>>,
    on_path: RwLock<HashSet<EntityId>>,
}

// A poisoned lock only happens if a holder panicked mid-operation;
// record mutations are single-field writes, so recovering the inner
// value is always safe here.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|p| p.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|p| p.into_inner())
}

impl EntityStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone of the record for this identity, if tracked.
    pub fn record(&self, id: EntityId) -> Option<TrackedEntity> {
        read(&self.records).get(&id).cloned()
    }

    /// Upsert-style mutation of a single record.
    pub fn update<F: FnOnce(&mut TrackedEntity)>(&self, id: EntityId, f: F) {
        f(write(&self.records).entry(id).or_default());
    }

    pub fn last_block_pos(&self, id: EntityId) -> Option<BlockPos> {
        read(&self.records).get(&id).and_then(|r| r.last_block_pos)
    }

    pub fn set_last_block_pos(&self, id: EntityId, pos: BlockPos) {
        self.update(id, |r| r.last_block_pos = Some(pos));
    }

    pub fn last_on_path_at(&self, id: EntityId) -> Option<NaiveDateTime> {
        read(&self.records).get(&id).and_then(|r| r.last_on_path_at)
    }

    pub fn set_last_on_path_at(&self, id: EntityId, at: NaiveDateTime) {
        self.update(id, |r| r.last_on_path_at = Some(at));
    }

    pub fn clear_last_on_path_at(&self, id: EntityId) {
        if let Some(record) = write(&self.records).get_mut(&id) {
            record.last_on_path_at = None;
        }
    }

    pub fn suppressed_until(&self, id: EntityId) -> Option<NaiveDateTime> {
        read(&self.records).get(&id).and_then(|r| r.suppressed_until)
    }

    pub fn set_suppressed_until(&self, id: EntityId, until: NaiveDateTime) {
        self.update(id, |r| r.suppressed_until = Some(until));
    }

    /// Clear any suppression on this identity. No-op if the record was
    /// removed first (a late unsuppress timer is harmless).
    pub fn clear_suppression(&self, id: EntityId) {
        if let Some(record) = write(&self.records).get_mut(&id) {
            record.suppressed_until = None;
        }
    }

    /// Clear every suppression whose window has elapsed.
    pub fn expire_suppressions(&self, now: NaiveDateTime) {
        for record in write(&self.records).values_mut() {
            if record.suppressed_until.is_some_and(|until| until <= now) {
                record.suppressed_until = None;
            }
        }
    }

    /// Add to the on-path set. Returns true if newly added.
    pub fn mark_on_path(&self, id: EntityId) -> bool {
        write(&self.on_path).insert(id)
    }

    /// Remove from the on-path set. Returns true if it was present.
    pub fn unmark_on_path(&self, id: EntityId) -> bool {
        write(&self.on_path).remove(&id)
    }

    pub fn is_on_path(&self, id: EntityId) -> bool {
        read(&self.on_path).contains(&id)
    }

    /// Snapshot of the on-path identities for sweep iteration.
    pub fn on_path_ids(&self) -> Vec<EntityId> {
        read(&self.on_path).iter().copied().collect()
    }

    /// Snapshot of every tracked identity.
    pub fn tracked_ids(&self) -> Vec<EntityId> {
        read(&self.records).keys().copied().collect()
    }

    /// Full removal of an identity: record plus on-path membership.
    /// Returns true if it was on path.
    pub fn remove(&self, id: EntityId) -> bool {
        write(&self.records).remove(&id);
        write(&self.on_path).remove(&id)
    }

    /// Drop all state. Returns the identities that were on path so the
    /// caller can strip their effects.
    pub fn clear(&self) -> Vec<EntityId> {
        let was_on_path: Vec<EntityId> = {
            let mut on_path = write(&self.on_path);
            let ids = on_path.iter().copied().collect();
            on_path.clear();
            ids
        };
        write(&self.records).clear();
        was_on_path
    }

    pub fn is_empty(&self) -> bool {
        read(&self.records).is_empty() && read(&self.on_path).is_empty()
    }
}
