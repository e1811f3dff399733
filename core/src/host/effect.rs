//! Status effect application boundary.

use super::world::EntityId;

/// The managed speed effect as currently present on an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedEffect {
    /// Speed tier (1..=10).
    pub level: u8,
    /// Remaining duration in game ticks.
    pub remaining_ticks: u32,
}

/// Applies and removes the managed speed effect on the host.
///
/// Implementations must be total: applying to or removing from an
/// entity that no longer exists is a harmless no-op.
pub trait EffectApplier: Send + Sync {
    /// Apply (or replace) the effect at `level` for `duration_ticks`.
    fn apply(&self, entity: EntityId, level: u8, duration_ticks: u32);

    /// Remove the managed effect if present.
    fn remove(&self, entity: EntityId);

    /// The managed effect currently on the entity, if any.
    fn current(&self, entity: EntityId) -> Option<AppliedEffect>;
}
