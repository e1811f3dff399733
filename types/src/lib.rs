//! Shared configuration types for swiftpath.
//!
//! These are the persisted (TOML) shapes consumed by `swiftpath-core`.
//! Runtime resolution (block-name parsing, level clamping) lives in the
//! core crate; this crate stays serde-only so every front end can share
//! the same config schema.

use serde::{Deserialize, Serialize};

/// Lowest allowed speed tier.
pub const MIN_SPEED_LEVEL: u8 = 1;
/// Highest allowed speed tier.
pub const MAX_SPEED_LEVEL: u8 = 10;

/// Persisted tracker configuration.
///
/// All fields have defaults so a partially-written config file still
/// loads; unknown block names are dropped at resolution time, never
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    /// Apply the speed effect to players on foot.
    pub enable_player_speed: bool,
    /// Apply the speed effect to supported mounts.
    pub enable_mount_speed: bool,
    /// Speed tier for players (clamped to 1..=10 at resolution).
    pub player_speed_level: u8,
    /// Speed tier for mounts (clamped to 1..=10 at resolution).
    pub mount_speed_level: u8,
    /// SCREAMING_CASE block names that qualify as path blocks.
    pub path_blocks: Vec<String>,
    /// How long an entity keeps its boost after leaving a path zone.
    pub grace_period_ms: u64,
    /// Horizontal scan radius around the query column.
    pub scan_radius: i32,
    /// How many blocks below the entity the scan reaches.
    pub scan_depth: i32,
    /// Reconciliation sweep cadence, in game ticks.
    pub cleanup_interval_ticks: u64,
    /// Effect refresh sweep cadence, in game ticks.
    pub refresh_interval_ticks: u64,
    /// Remaining effect duration below which the effect is re-applied.
    pub refresh_threshold_ticks: u32,
    /// Duration of each applied effect, in game ticks.
    pub effect_duration_ticks: u32,
    /// Path tracking is disabled for this long after a dismount.
    pub dismount_suppression_ms: u64,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            enable_player_speed: true,
            enable_mount_speed: true,
            player_speed_level: 1,
            mount_speed_level: 1,
            path_blocks: vec!["DIRT_PATH".to_string(), "GRAVEL".to_string()],
            grace_period_ms: 200,
            scan_radius: 1,
            scan_depth: 5,
            cleanup_interval_ticks: 4,
            refresh_interval_ticks: 4,
            refresh_threshold_ticks: 10,
            effect_duration_ticks: 40,
            dismount_suppression_ms: 5000,
        }
    }
}

impl SpeedConfig {
    /// Clamp a configured speed level into the supported tier range.
    pub fn clamp_level(level: u8) -> u8 {
        level.clamp(MIN_SPEED_LEVEL, MAX_SPEED_LEVEL)
    }
}
