//! Settings file management with atomic writes and backup support.
//!
//! This module persists shortcut customizations between sessions. Key
//! features:
//!
//! - **Atomic writes**: Uses temp-file-then-rename to prevent corruption
//! - **Automatic backups**: Every save backs up the previous settings first
//! - **Rollback safety**: Failed transactions leave the original file untouched
//! - **Missing file is empty**: A first run simply has no customizations
//!
//! # Example
//!
//! ```no_run
//! use shortcut_editor::config::SettingsStore;
//! use shortcut_editor::core::{ActionRegistry, AssignmentEngine};
//!
//! let store = SettingsStore::new("/home/user/.config/shortcut-editor/shortcuts.conf".into())?;
//! let mut engine = AssignmentEngine::new(ActionRegistry::new("app"));
//!
//! engine.apply_customizations(&store.load()?);
//! engine.clear_history();
//!
//! // ... user edits ...
//! store.save(engine.registry())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod customization;
pub mod error;
pub mod transaction;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::core::parser::{parse_manifest, ActionDecl};
use crate::core::registry::ActionRegistry;
use crate::core::types::{ActionId, Shortcut};

pub use customization::{parse_customizations, serialize_customizations};
pub use error::ConfigError;
pub use transaction::SettingsTransaction;

/// Settings file name used when none is given
pub const DEFAULT_SETTINGS_PATH: &str = "~/.config/shortcut-editor/shortcuts.conf";

/// Manages the persisted customization record.
///
/// Reads are plain; writes go through `SettingsTransaction` so that a
/// backup exists before anything is replaced.
#[derive(Debug)]
pub struct SettingsStore {
    settings_path: PathBuf,
    backup_dir: PathBuf,
}

impl SettingsStore {
    /// Creates a store for the given settings file.
    ///
    /// The file itself may not exist yet. Its parent directory and a
    /// sibling `backups/` directory are created on demand,
    /// e.g. `~/.config/shortcut-editor/shortcuts.conf` →
    /// `~/.config/shortcut-editor/backups/`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::BackupDirNotWritable` if the backup directory
    /// cannot be created or is read-only.
    pub fn new(settings_path: PathBuf) -> Result<Self, ConfigError> {
        let backup_dir = settings_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .join("backups");

        if !backup_dir.exists() {
            fs::create_dir_all(&backup_dir).map_err(|_| ConfigError::BackupDirNotWritable(backup_dir.clone()))?;
        }

        if backup_dir.metadata()?.permissions().readonly() {
            return Err(ConfigError::BackupDirNotWritable(backup_dir));
        }

        if settings_path.read_link().is_ok() {
            tracing::warn!(path = %settings_path.display(), "settings file is a symlink");
        }

        Ok(Self {
            settings_path,
            backup_dir,
        })
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Raw settings content; a missing file reads as empty.
    pub fn read_settings(&self) -> Result<String, ConfigError> {
        match fs::read_to_string(&self.settings_path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Parsed customizations in file order.
    pub fn load(&self) -> Result<Vec<(ActionId, Shortcut)>, ConfigError> {
        let entries = parse_customizations(&self.read_settings()?)?;
        tracing::debug!(count = entries.len(), path = %self.settings_path.display(), "loaded customizations");
        Ok(entries)
    }

    /// Writes the customizations of `registry`, backing up the old file first.
    pub fn save(&self, registry: &ActionRegistry) -> Result<(), ConfigError> {
        let mut content = serialize_customizations(registry);
        content.push('\n');

        SettingsTransaction::begin(self)?.commit(&content)?;
        tracing::info!(path = %self.settings_path.display(), "saved shortcut settings");
        Ok(())
    }

    /// Copies the current settings into the backup directory.
    ///
    /// Returns `None` when there is no settings file to back up yet.
    pub(crate) fn create_timestamped_backup(&self) -> Result<Option<PathBuf>, ConfigError> {
        if !self.settings_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.settings_path)?;

        // YYYY-MM-DD_HHMMSS
        let timestamp = Local::now().format("%Y-%m-%d_%H%M%S");

        let original_name = self
            .settings_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ConfigError::BackupFailed(format!("{} has no file name", self.settings_path.display())))?;

        let backup_path = self.backup_dir.join(format!("{}.{}", original_name, timestamp));
        fs::write(&backup_path, &content).map_err(|e| ConfigError::BackupFailed(e.to_string()))?;

        tracing::info!(backup = %backup_path.display(), "created settings backup");
        Ok(Some(backup_path))
    }

    /// Backups of this settings file, oldest first.
    pub fn list_backups(&self) -> Result<Vec<PathBuf>, ConfigError> {
        let Some(prefix) = self
            .settings_path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| format!("{}.", name))
        else {
            return Ok(Vec::new());
        };

        let mut backups: Vec<PathBuf> = fs::read_dir(&self.backup_dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix))
            })
            .collect();

        // Timestamps sort lexicographically
        backups.sort();
        Ok(backups)
    }
}

/// Reads and parses an action manifest file.
pub fn load_manifest(path: &Path) -> Result<Vec<ActionDecl>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    Ok(parse_manifest(&content)?)
}

#[cfg(test)]
mod tests;
