// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Settings transaction management with automatic backups
//!
//! Provides atomic write operations for the settings file.

use atomic_write_file::AtomicWriteFile;
use std::{fs, io::Write, path::Path, path::PathBuf};

use crate::config::{ConfigError, SettingsStore};

/// Atomic settings transaction with automatic backup.
///
/// - **Atomic**: Changes are all-or-nothing (atomic file operations)
/// - **Consistent**: The settings file is never half-written
/// - **Durable**: Backup created before any modifications
///
/// # Lifecycle
///
/// 1. `begin()` - Creates a timestamped backup immediately (if a file exists)
/// 2. Caller prepares new content (in memory)
/// 3. `commit()` - Writes atomically or `rollback()` - Restores original
///
/// # Example
///
/// ```no_run
/// use shortcut_editor::config::{SettingsStore, SettingsTransaction};
/// use std::path::PathBuf;
///
/// let store = SettingsStore::new(PathBuf::from("shortcuts.conf"))?;
/// let tx = SettingsTransaction::begin(&store)?;
///
/// match tx.commit("app.File.General.New;Ctrl+M;;\n") {
///     Ok(()) => println!("Settings saved"),
///     Err(e) => eprintln!("Commit failed: {}", e),
/// }
/// # Ok::<(), shortcut_editor::config::ConfigError>(())
/// ```
pub struct SettingsTransaction<'a> {
    store: &'a SettingsStore,
    /// `None` when the settings file did not exist at `begin()`
    backup_path: Option<PathBuf>,
}

impl<'a> SettingsTransaction<'a> {
    /// Begins a new transaction by creating a timestamped backup.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing settings cannot be read or the
    /// backup cannot be written. Nothing has been modified in that case.
    pub fn begin(store: &'a SettingsStore) -> Result<Self, ConfigError> {
        // Rollback point
        let backup_path = store.create_timestamped_backup()?;

        Ok(Self { store, backup_path })
    }

    pub fn backup_path(&self) -> Option<&Path> {
        self.backup_path.as_deref()
    }

    /// Commits the transaction by atomically writing new content.
    ///
    /// Consumes the transaction, preventing accidental double-commits. On
    /// error the original file is untouched.
    pub fn commit(self, new_content: &str) -> Result<(), ConfigError> {
        write_atomically(self.store.path(), new_content)
    }

    /// Restores the settings file to its state at `begin()`.
    ///
    /// If no settings file existed then, the file is removed again.
    pub fn rollback(&self) -> Result<(), ConfigError> {
        match &self.backup_path {
            Some(backup_path) => {
                let backup_content = fs::read_to_string(backup_path)?;
                write_atomically(self.store.path(), &backup_content)?;
            }
            None => {
                if self.store.path().exists() {
                    fs::remove_file(self.store.path())?;
                }
            }
        }

        tracing::info!(path = %self.store.path().display(), "rolled back settings");
        Ok(())
    }
}

fn write_atomically(path: &Path, content: &str) -> Result<(), ConfigError> {
    let mut file = AtomicWriteFile::options()
        .open(path)
        .map_err(|e| ConfigError::WriteFailed(format!("Failed to open for atomic write: {}", e)))?;

    file.write_all(content.as_bytes())
        .map_err(|e| ConfigError::WriteFailed(format!("Failed to write content: {}", e)))?;

    file.commit()
        .map_err(|e| ConfigError::WriteFailed(format!("Failed to commit atomic write: {}", e)))?;

    Ok(())
}
