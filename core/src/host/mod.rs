//! Host engine boundary.
//!
//! The tracker never talks to a game engine directly. Everything it
//! needs from the host — block lookups, entity snapshots, effect
//! application, wall-clock time — comes in through the traits defined
//! here, so the core stays testable with fakes.

pub mod clock;
pub mod effect;
pub mod world;

pub use clock::{Clock, SystemClock};
pub use effect::{AppliedEffect, EffectApplier};
pub use world::{
    BlockKind, BlockKindParseError, BlockPos, EntityId, EntityKind, EntitySnapshot, HostWorld,
    Location, WorldId,
};
