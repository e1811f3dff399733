//! Near-path spatial detection.
//!
//! Pure reads of world state at call time; no memoization. The world
//! can mutate between calls — staleness is bounded by the refresh
//! interval, which re-evaluates everything anyway.

use crate::config::TrackingSettings;
use crate::host::{BlockKind, EntitySnapshot, HostWorld, Location};

/// Whether the location qualifies as "near" a path block.
///
/// Scans horizontal offsets in `[-radius, radius]²` and vertical
/// offsets `1..=depth` blocks below the query point, returning true on
/// the first configured path block found. An unavailable world or
/// chunk (block lookup yields `None`) contributes false, never an
/// error.
pub fn is_near_path(
    world: &dyn HostWorld,
    settings: &TrackingSettings,
    location: &Location,
) -> bool {
    if settings.path_blocks.is_empty() {
        return false;
    }

    let base = location.block_pos();
    let radius = settings.scan_radius;
    let depth = settings.scan_depth;

    for dx in -radius..=radius {
        for dz in -radius..=radius {
            for dy in 1..=depth {
                let pos = base.offset(dx, -dy, dz);
                if let Some(kind) = world.block_at(location.world, pos)
                    && settings.path_blocks.contains(&kind)
                {
                    return true;
                }
            }
        }
    }

    false
}

/// Whether the entity is in or under water at this location. Water
/// disables tracking entirely (no speed boost for swimming mounts).
pub fn is_in_water(
    world: &dyn HostWorld,
    snapshot: &EntitySnapshot,
    location: &Location,
) -> bool {
    if snapshot.in_water {
        return true;
    }
    let base = location.block_pos();
    world.block_at(location.world, base) == Some(BlockKind::Water)
        || world.block_at(location.world, base.offset(0, 1, 0)) == Some(BlockKind::Water)
}
