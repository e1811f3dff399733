//! Translates host events into tracker calls.

use std::sync::Arc;

use crate::host::EntityId;
use crate::tracker::PathTracker;

use super::HostEvent;

pub struct EventAdapter {
    tracker: Arc<PathTracker>,
}

impl EventAdapter {
    pub fn new(tracker: Arc<PathTracker>) -> Self {
        Self { tracker }
    }

    /// Dispatch one host event. Per-entity events arrive in host
    /// delivery order; no cross-entity ordering is assumed.
    pub fn handle(&self, event: HostEvent) {
        match event {
            HostEvent::Spawn { entity } => {
                if !entity.kind.is_mount() {
                    return;
                }
                // Identity reuse: drop any state left under this id
                self.tracker.cleanup_entity(entity.id);
                if entity.valid {
                    self.tracker.check_path_status(&entity);
                }
            }
            HostEvent::Move { entity, to } => {
                if !self.tracker.update_position(&entity, &to) {
                    return;
                }
                self.tracker.update_path_status(&entity, &to);
            }
            HostEvent::Dismount { entity } => {
                if entity.kind.is_mount() {
                    self.tracker.handle_dismount(&entity);
                }
            }
            HostEvent::Death { entity } => {
                self.tracker.cleanup_entity(entity);
            }
            HostEvent::ChunkUnload { entities } => {
                for id in entities {
                    self.tracker.cleanup_entity(id);
                }
            }
            HostEvent::Join { entity } | HostEvent::WorldChange { entity } => {
                // Fresh start, then an immediate status check so a
                // player standing on a path is boosted without waiting
                // for a move event
                self.tracker.cleanup_entity(entity.id);
                if entity.valid {
                    self.tracker.check_path_status(&entity);
                }
            }
            HostEvent::Quit { entity } => {
                self.tracker.cleanup_entity(entity);
            }
        }
    }

    /// Teleport gate: deny while the entity is on path, preventing
    /// mount-path-skip exploits.
    pub fn on_teleport_attempt(&self, entity: EntityId) -> bool {
        let allow = !self.tracker.is_on_path(entity);
        if !allow {
            tracing::debug!("[EVENTS] Denied teleport for on-path entity {entity}");
        }
        allow
    }
}
