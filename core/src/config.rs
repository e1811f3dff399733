//! Configuration loading and runtime resolution.
//!
//! The persisted shape (`SpeedConfig`, in swiftpath-types) is what
//! lands on disk via confy. At load time it is resolved into
//! `TrackingSettings`: block names parsed into the fixed `BlockKind`
//! set, speed levels clamped. A block name that fails to parse is
//! dropped with a warning — one bad entry never fails the whole load.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use hashbrown::HashSet;

use swiftpath_types::SpeedConfig;

use crate::host::{BlockKind, EntityKind};

/// App name used for the default confy config location.
pub const APP_NAME: &str = "swiftpath";

/// Shared read-mostly settings handle. Commands swap the contents on
/// reload; the tracker and sweeps only ever read.
pub type SettingsHandle = Arc<RwLock<TrackingSettings>>;

/// Runtime-resolved tracker settings.
#[derive(Debug, Clone)]
pub struct TrackingSettings {
    pub enable_player_speed: bool,
    pub enable_mount_speed: bool,
    pub player_speed_level: u8,
    pub mount_speed_level: u8,
    pub path_blocks: HashSet<BlockKind>,
    pub grace_period_ms: i64,
    pub scan_radius: i32,
    pub scan_depth: i32,
    pub cleanup_interval_ticks: u64,
    pub refresh_interval_ticks: u64,
    pub refresh_threshold_ticks: u32,
    pub effect_duration_ticks: u32,
    pub dismount_suppression_ms: i64,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self::resolve(&SpeedConfig::default())
    }
}

impl TrackingSettings {
    /// Resolve a persisted config into runtime settings. Invalid block
    /// names are dropped with a warning; levels are clamped to 1..=10.
    pub fn resolve(config: &SpeedConfig) -> Self {
        let mut path_blocks = HashSet::new();
        for name in &config.path_blocks {
            match name.parse::<BlockKind>() {
                Ok(kind) => {
                    path_blocks.insert(kind);
                }
                Err(_) => {
                    tracing::warn!("[CONFIG] Dropping unknown path block name {name:?}");
                }
            }
        }

        Self {
            enable_player_speed: config.enable_player_speed,
            enable_mount_speed: config.enable_mount_speed,
            player_speed_level: SpeedConfig::clamp_level(config.player_speed_level),
            mount_speed_level: SpeedConfig::clamp_level(config.mount_speed_level),
            path_blocks,
            grace_period_ms: config.grace_period_ms as i64,
            scan_radius: config.scan_radius.max(0),
            scan_depth: config.scan_depth.max(1),
            cleanup_interval_ticks: config.cleanup_interval_ticks.max(1),
            refresh_interval_ticks: config.refresh_interval_ticks.max(1),
            refresh_threshold_ticks: config.refresh_threshold_ticks,
            effect_duration_ticks: config.effect_duration_ticks,
            dismount_suppression_ms: config.dismount_suppression_ms as i64,
        }
    }

    /// The normalized persisted form (block names sorted for stable
    /// files, levels already clamped).
    pub fn to_config(&self) -> SpeedConfig {
        let mut path_blocks: Vec<String> =
            self.path_blocks.iter().map(|b| b.name().to_string()).collect();
        path_blocks.sort();

        SpeedConfig {
            enable_player_speed: self.enable_player_speed,
            enable_mount_speed: self.enable_mount_speed,
            player_speed_level: self.player_speed_level,
            mount_speed_level: self.mount_speed_level,
            path_blocks,
            grace_period_ms: self.grace_period_ms as u64,
            scan_radius: self.scan_radius,
            scan_depth: self.scan_depth,
            cleanup_interval_ticks: self.cleanup_interval_ticks,
            refresh_interval_ticks: self.refresh_interval_ticks,
            refresh_threshold_ticks: self.refresh_threshold_ticks,
            effect_duration_ticks: self.effect_duration_ticks,
            dismount_suppression_ms: self.dismount_suppression_ms as u64,
        }
    }

    /// Whether the speed category for this entity kind is enabled.
    pub fn category_enabled(&self, kind: EntityKind) -> bool {
        if kind.is_mount() {
            self.enable_mount_speed
        } else {
            self.enable_player_speed
        }
    }

    /// Configured speed tier for this entity kind.
    pub fn speed_level_for(&self, kind: EntityKind) -> u8 {
        if kind.is_mount() {
            self.mount_speed_level
        } else {
            self.player_speed_level
        }
    }
}

/// Build a shared handle from a persisted config.
pub fn settings_handle(config: &SpeedConfig) -> SettingsHandle {
    Arc::new(RwLock::new(TrackingSettings::resolve(config)))
}

/// Load the persisted config from the default confy location.
pub fn load() -> Result<SpeedConfig, ConfigError> {
    confy::load(APP_NAME, None).map_err(ConfigError::Load)
}

/// Persist a config to the default confy location.
pub fn store(config: &SpeedConfig) -> Result<(), ConfigError> {
    confy::store(APP_NAME, None, config).map_err(ConfigError::Store)
}

/// Load the persisted config from an explicit path.
pub fn load_from(path: &Path) -> Result<SpeedConfig, ConfigError> {
    confy::load_path(path).map_err(ConfigError::Load)
}

/// Persist a config to an explicit path.
pub fn store_at(path: &Path, config: &SpeedConfig) -> Result<(), ConfigError> {
    confy::store_path(path, config).map_err(ConfigError::Store)
}

/// Default on-disk location of the config file.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_NAME).join(format!("{APP_NAME}.toml")))
}

/// Errors surfaced by config load/store. Per-entry block-name failures
/// are recovered at resolution and never appear here.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(#[source] confy::ConfyError),
    #[error("failed to persist config: {0}")]
    Store(#[source] confy::ConfyError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_drops_invalid_block_names() {
        let config = SpeedConfig {
            path_blocks: vec![
                "DIRT_PATH".to_string(),
                "NOT_A_BLOCK".to_string(),
                "GRAVEL".to_string(),
            ],
            ..SpeedConfig::default()
        };
        let settings = TrackingSettings::resolve(&config);
        assert_eq!(settings.path_blocks.len(), 2);
        assert!(settings.path_blocks.contains(&BlockKind::DirtPath));
        assert!(settings.path_blocks.contains(&BlockKind::Gravel));
    }

    #[test]
    fn resolve_clamps_levels_and_intervals() {
        let config = SpeedConfig {
            player_speed_level: 0,
            mount_speed_level: 42,
            scan_depth: 0,
            cleanup_interval_ticks: 0,
            ..SpeedConfig::default()
        };
        let settings = TrackingSettings::resolve(&config);
        assert_eq!(settings.player_speed_level, 1);
        assert_eq!(settings.mount_speed_level, 10);
        assert_eq!(settings.scan_depth, 1);
        assert_eq!(settings.cleanup_interval_ticks, 1);
    }

    #[test]
    fn to_config_sorts_block_names() {
        let config = SpeedConfig {
            path_blocks: vec!["GRAVEL".to_string(), "DIRT_PATH".to_string()],
            ..SpeedConfig::default()
        };
        let settings = TrackingSettings::resolve(&config);
        assert_eq!(settings.to_config().path_blocks, vec!["DIRT_PATH", "GRAVEL"]);
    }

    #[test]
    fn store_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swiftpath.toml");
        let config = SpeedConfig {
            enable_mount_speed: false,
            path_blocks: vec!["DIRT_PATH".to_string()],
            ..SpeedConfig::default()
        };
        store_at(&path, &config).unwrap();
        let back = load_from(&path).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn category_helpers() {
        let settings = TrackingSettings::resolve(&SpeedConfig {
            enable_mount_speed: false,
            player_speed_level: 3,
            mount_speed_level: 2,
            ..SpeedConfig::default()
        });
        assert!(settings.category_enabled(EntityKind::Player));
        assert!(!settings.category_enabled(EntityKind::Horse));
        assert_eq!(settings.speed_level_for(EntityKind::Player), 3);
        assert_eq!(settings.speed_level_for(EntityKind::Camel), 2);
    }
}
