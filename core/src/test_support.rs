//! Shared fakes for unit tests: an in-memory world, a manually
//! advanced clock, and an effect applier that records every call.

use std::sync::{Mutex, RwLock};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use hashbrown::HashMap;

use crate::host::{
    AppliedEffect, BlockKind, BlockPos, Clock, EffectApplier, EntityId, EntityKind,
    EntitySnapshot, HostWorld, Location, WorldId,
};

/// Fixed, arbitrary test epoch.
pub(crate) fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

#[derive(Debug, Default)]
pub(crate) struct FakeWorld {
    blocks: RwLock<HashMap<(WorldId, BlockPos), BlockKind>>,
    entities: RwLock<HashMap<EntityId, EntitySnapshot>>,
}

impl FakeWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_block(&self, world: WorldId, pos: BlockPos, kind: BlockKind) {
        self.blocks.write().unwrap().insert((world, pos), kind);
    }

    pub fn clear_block(&self, world: WorldId, pos: BlockPos) {
        self.blocks.write().unwrap().remove(&(world, pos));
    }

    pub fn put_entity(&self, snapshot: EntitySnapshot) {
        self.entities.write().unwrap().insert(snapshot.id, snapshot);
    }

    pub fn remove_entity(&self, id: EntityId) {
        self.entities.write().unwrap().remove(&id);
    }

    pub fn invalidate_entity(&self, id: EntityId) {
        if let Some(snapshot) = self.entities.write().unwrap().get_mut(&id) {
            snapshot.valid = false;
        }
    }
}

impl HostWorld for FakeWorld {
    fn block_at(&self, world: WorldId, pos: BlockPos) -> Option<BlockKind> {
        self.blocks.read().unwrap().get(&(world, pos)).copied()
    }

    fn entity(&self, id: EntityId) -> Option<EntitySnapshot> {
        self.entities.read().unwrap().get(&id).cloned()
    }

    fn online_players(&self) -> Vec<EntitySnapshot> {
        self.entities
            .read()
            .unwrap()
            .values()
            .filter(|e| e.kind == EntityKind::Player && e.valid)
            .cloned()
            .collect()
    }
}

#[derive(Debug)]
pub(crate) struct FakeClock(Mutex<NaiveDateTime>);

impl FakeClock {
    pub fn new() -> Self {
        Self(Mutex::new(base_time()))
    }

    pub fn advance_ms(&self, ms: i64) {
        let mut now = self.0.lock().unwrap();
        *now += Duration::milliseconds(ms);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> NaiveDateTime {
        *self.0.lock().unwrap()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EffectOp {
    Apply(EntityId, u8, u32),
    Remove(EntityId),
}

/// Effect applier that keeps the applied state and a full op log.
#[derive(Debug, Default)]
pub(crate) struct RecordingEffects {
    active: Mutex<HashMap<EntityId, AppliedEffect>>,
    log: Mutex<Vec<EffectOp>>,
}

impl RecordingEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_effect(&self, id: EntityId) -> bool {
        self.active.lock().unwrap().contains_key(&id)
    }

    /// Simulate duration decay on the host side.
    pub fn set_remaining(&self, id: EntityId, ticks: u32) {
        if let Some(effect) = self.active.lock().unwrap().get_mut(&id) {
            effect.remaining_ticks = ticks;
        }
    }

    pub fn ops(&self) -> Vec<EffectOp> {
        self.log.lock().unwrap().clone()
    }

    pub fn apply_count(&self, id: EntityId) -> usize {
        self.ops()
            .iter()
            .filter(|op| matches!(op, EffectOp::Apply(target, _, _) if *target == id))
            .count()
    }
}

impl EffectApplier for RecordingEffects {
    fn apply(&self, entity: EntityId, level: u8, duration_ticks: u32) {
        self.active.lock().unwrap().insert(
            entity,
            AppliedEffect {
                level,
                remaining_ticks: duration_ticks,
            },
        );
        self.log
            .lock()
            .unwrap()
            .push(EffectOp::Apply(entity, level, duration_ticks));
    }

    fn remove(&self, entity: EntityId) {
        self.active.lock().unwrap().remove(&entity);
        self.log.lock().unwrap().push(EffectOp::Remove(entity));
    }

    fn current(&self, entity: EntityId) -> Option<AppliedEffect> {
        self.active.lock().unwrap().get(&entity).copied()
    }
}
