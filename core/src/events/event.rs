//! Inbound host events, decoupled from any engine's event-bus types.

use crate::host::{EntityId, EntitySnapshot, Location};

/// Things the host engine tells us about. These represent "something
/// happened to a trackable entity" at a higher level than the engine's
/// raw callbacks; the adapter translates them into tracker calls.
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// A supported entity spawned (or re-spawned with a reused id).
    Spawn { entity: EntitySnapshot },
    /// An entity moved. `to` is the destination the host reports,
    /// which may differ from the snapshot's (stale) location.
    Move { entity: EntitySnapshot, to: Location },
    /// A rider left this mount.
    Dismount { entity: EntitySnapshot },
    /// The entity died or despawned.
    Death { entity: EntityId },
    /// A chunk unloaded with these tracked entities inside.
    ChunkUnload { entities: Vec<EntityId> },
    /// A player switched worlds.
    WorldChange { entity: EntitySnapshot },
    /// A player connected.
    Join { entity: EntitySnapshot },
    /// A player disconnected.
    Quit { entity: EntityId },
}
