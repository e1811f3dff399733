pub mod commands;
pub mod config;
pub mod detector;
pub mod events;
pub mod host;
pub mod scheduler;
pub mod store;
pub mod tracker;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenience
pub use config::{ConfigError, SettingsHandle, TrackingSettings};
pub use events::{EventAdapter, HostEvent};
pub use host::{
    AppliedEffect, BlockKind, BlockPos, Clock, EffectApplier, EntityId, EntityKind,
    EntitySnapshot, HostWorld, Location, SystemClock, WorldId,
};
pub use scheduler::Scheduler;
pub use store::{EntityStateStore, TrackedEntity};
pub use tracker::PathTracker;
