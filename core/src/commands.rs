//! Administrative command surface: `reload`, `add <block>`,
//! `remove <block>`, `list`.
//!
//! Handlers return user-facing strings; the only surfaced failure is
//! input validation (unknown block name), reported with no state
//! mutation. Every config mutation persists the normalized form and
//! fully resets the tracker so no stale boost survives the change.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{self, SettingsHandle, TrackingSettings};
use crate::host::BlockKind;
use crate::tracker::PathTracker;

pub struct CommandContext {
    pub settings: SettingsHandle,
    /// Live tracker to reset after config changes; `None` for offline
    /// front ends that only edit the file.
    pub tracker: Option<Arc<PathTracker>>,
    /// Explicit config file location; defaults to the confy path.
    pub config_path: Option<PathBuf>,
}

impl CommandContext {
    fn write_settings(&self, f: impl FnOnce(&mut TrackingSettings)) {
        let mut guard = self.settings.write().unwrap_or_else(|p| p.into_inner());
        f(&mut guard);
    }

    fn read_settings<R>(&self, f: impl FnOnce(&TrackingSettings) -> R) -> R {
        f(&self.settings.read().unwrap_or_else(|p| p.into_inner()))
    }

    fn persist(&self) -> Result<(), String> {
        let config = self.read_settings(|s| s.to_config());
        let result = match &self.config_path {
            Some(path) => config::store_at(path, &config),
            None => config::store(&config),
        };
        result.map_err(|e| e.to_string())
    }

    fn reset_tracker(&self) {
        if let Some(tracker) = &self.tracker {
            tracker.reset();
        }
    }
}

/// Reload the config from disk, swap the live settings, and reset all
/// tracked state. The normalized form is written back.
pub fn reload(ctx: &CommandContext) -> Result<String, String> {
    let config = match &ctx.config_path {
        Some(path) => config::load_from(path),
        None => config::load(),
    }
    .map_err(|e| e.to_string())?;

    let resolved = TrackingSettings::resolve(&config);
    ctx.write_settings(|s| *s = resolved);
    ctx.reset_tracker();
    ctx.persist()?;
    tracing::info!("[COMMANDS] Config reloaded");
    Ok("Config reloaded.".to_string())
}

/// Add a block to the path set. Unknown names are rejected without
/// mutating anything.
pub fn add_block(ctx: &CommandContext, name: &str) -> Result<String, String> {
    let kind: BlockKind = name
        .to_uppercase()
        .parse()
        .map_err(|_| format!("{name:?} is not a valid block."))?;

    let mut added = false;
    ctx.write_settings(|s| added = s.path_blocks.insert(kind));
    if !added {
        return Ok(format!("{kind} was already a path block."));
    }
    ctx.persist()?;
    ctx.reset_tracker();
    Ok(format!("Added {kind} to path blocks."))
}

/// Remove a block from the path set.
pub fn remove_block(ctx: &CommandContext, name: &str) -> Result<String, String> {
    let kind: BlockKind = name
        .to_uppercase()
        .parse()
        .map_err(|_| format!("{name:?} is not a valid block."))?;

    let mut removed = false;
    ctx.write_settings(|s| removed = s.path_blocks.remove(&kind));
    if !removed {
        return Ok(format!("{kind} was not in path blocks."));
    }
    ctx.persist()?;
    ctx.reset_tracker();
    Ok(format!("Removed {kind} from path blocks."))
}

/// List the configured path blocks.
pub fn list_blocks(ctx: &CommandContext) -> String {
    let mut names: Vec<&'static str> =
        ctx.read_settings(|s| s.path_blocks.iter().map(|b| b.name()).collect());
    if names.is_empty() {
        return "No path blocks are currently set.".to_string();
    }
    names.sort();
    format!("Current path blocks: {}", names.join(", "))
}
