//! World geometry and entity snapshot types.

use std::fmt;
use std::str::FromStr;

/// Stable unique identity of a tracked entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifies one world/dimension on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WorldId(pub u32);

/// Integer block coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

/// A continuous position within one world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub world: WorldId,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Location {
    pub fn new(world: WorldId, x: f64, y: f64, z: f64) -> Self {
        Self { world, x, y, z }
    }

    /// The integer block coordinate containing this location.
    pub fn block_pos(&self) -> BlockPos {
        BlockPos::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }
}

macro_rules! block_kinds {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Terrain block material, the fixed set the tracker knows about.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum BlockKind {
            $($variant),+
        }

        impl BlockKind {
            /// Canonical SCREAMING_CASE name, as used in config files.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }

        impl FromStr for BlockKind {
            type Err = BlockKindParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)+
                    _ => Err(BlockKindParseError(s.to_string())),
                }
            }
        }
    };
}

block_kinds! {
    Air => "AIR",
    Cobblestone => "COBBLESTONE",
    Dirt => "DIRT",
    DirtPath => "DIRT_PATH",
    GrassBlock => "GRASS_BLOCK",
    Gravel => "GRAVEL",
    MudBricks => "MUD_BRICKS",
    PackedMud => "PACKED_MUD",
    Sand => "SAND",
    Sandstone => "SANDSTONE",
    SmoothSandstone => "SMOOTH_SANDSTONE",
    Stone => "STONE",
    StoneBricks => "STONE_BRICKS",
    Water => "WATER",
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown block name in a config entry or command argument.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown block name {0:?}")]
pub struct BlockKindParseError(pub String);

/// Kind of entity the tracker manages. Players plus the fixed set of
/// rideable mounts; nothing else enters the state store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Horse,
    Mule,
    Donkey,
    Camel,
    Llama,
    TraderLlama,
}

impl EntityKind {
    /// True for the rideable mount kinds.
    pub fn is_mount(&self) -> bool {
        !matches!(self, Self::Player)
    }
}

/// Point-in-time view of an entity, handed to the tracker by the host.
/// Never cached across calls; the host is the source of truth.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    pub location: Location,
    /// False once the host considers the entity dead or despawned.
    pub valid: bool,
    /// True while the entity is riding something.
    pub in_vehicle: bool,
    /// The mount this entity is riding, if any.
    pub vehicle: Option<EntityId>,
    /// Host-reported in-water flag (supplements the block scan).
    pub in_water: bool,
}

impl EntitySnapshot {
    pub fn new(id: EntityId, kind: EntityKind, location: Location) -> Self {
        Self {
            id,
            kind,
            location,
            valid: true,
            in_vehicle: false,
            vehicle: None,
            in_water: false,
        }
    }
}

/// Read-only view of the host world. All lookups are total: an
/// unloaded chunk or missing entity yields `None`, never an error.
pub trait HostWorld: Send + Sync {
    /// Block material at a position, or `None` if the world/chunk is
    /// not available.
    fn block_at(&self, world: WorldId, pos: BlockPos) -> Option<BlockKind>;

    /// Current snapshot of an entity, or `None` if it no longer exists.
    fn entity(&self, id: EntityId) -> Option<EntitySnapshot>;

    /// Snapshots of all currently connected players.
    fn online_players(&self) -> Vec<EntitySnapshot>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_pos_floors_negative_coordinates() {
        let loc = Location::new(WorldId(0), -0.5, 64.9, 10.0);
        assert_eq!(loc.block_pos(), BlockPos::new(-1, 64, 10));
    }

    #[test]
    fn block_kind_parses_canonical_names() {
        assert_eq!("DIRT_PATH".parse::<BlockKind>(), Ok(BlockKind::DirtPath));
        assert_eq!("GRAVEL".parse::<BlockKind>(), Ok(BlockKind::Gravel));
        assert!("dirt_path".parse::<BlockKind>().is_err());
        assert!("NOT_A_BLOCK".parse::<BlockKind>().is_err());
    }

    #[test]
    fn mount_kinds() {
        assert!(!EntityKind::Player.is_mount());
        assert!(EntityKind::Horse.is_mount());
        assert!(EntityKind::TraderLlama.is_mount());
    }
}
