//! Backup manager for safe cleanup operations.
//!
//! Before any file modification the original content is copied into a
//! timestamped `.codesweep-backup/` directory, so a failed batch can be
//! rolled back. Backups are flat name-mangled copies to avoid recreating
//! nested directory structures.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const BACKUP_DIR: &str = ".codesweep-backup";

#[derive(Debug)]
pub struct BackupManager {
    backup_dir: PathBuf,
    // original path -> backup path
    manifest: BTreeMap<PathBuf, PathBuf>,
}

impl BackupManager {
    pub fn new(root: &Path) -> Self {
        let timestamp = chrono::Local::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        Self {
            backup_dir: root.join(BACKUP_DIR).join(timestamp),
            manifest: BTreeMap::new(),
        }
    }

    /// Snapshot a file before modifying it. Idempotent per path.
    pub fn backup(&mut self, file: &Path) -> Result<bool> {
        if self.manifest.contains_key(file) {
            return Ok(true);
        }
        if !file.exists() {
            tracing::debug!(file = %file.display(), "skipping backup, file does not exist");
            return Ok(false);
        }

        std::fs::create_dir_all(&self.backup_dir)
            .with_context(|| format!("create backup dir {}", self.backup_dir.display()))?;

        // Mangle path: /foo/bar/baz.py -> foo__bar__baz.py
        let safe_name: String = file
            .to_string_lossy()
            .chars()
            .map(|c| if c == '/' || c == '\\' || c == ':' { '_' } else { c })
            .collect::<String>()
            .trim_start_matches('_')
            .to_string();
        let backup_path = self.backup_dir.join(safe_name);

        std::fs::copy(file, &backup_path)
            .with_context(|| format!("backup {} to {}", file.display(), backup_path.display()))?;
        self.manifest.insert(file.to_path_buf(), backup_path);
        Ok(true)
    }

    /// Restore a single file from its backup.
    pub fn restore(&self, file: &Path) -> Result<()> {
        let backup_path = self
            .manifest
            .get(file)
            .with_context(|| format!("no backup recorded for {}", file.display()))?;
        std::fs::copy(backup_path, file)
            .with_context(|| format!("restore {}", file.display()))?;
        tracing::info!(file = %file.display(), "restored from backup");
        Ok(())
    }

    /// Roll back every backed-up file. Returns (restored, failed).
    pub fn restore_all(&self) -> (usize, usize) {
        let mut restored = 0;
        let mut failed = 0;
        for file in self.manifest.keys() {
            match self.restore(file) {
                Ok(()) => restored += 1,
                Err(e) => {
                    tracing::error!(file = %file.display(), "restore failed: {e:#}");
                    failed += 1;
                }
            }
        }
        (restored, failed)
    }

    /// Remove the backup directory after a fully successful cleanup.
    pub fn cleanup(&self) {
        if self.backup_dir.exists() {
            if let Err(e) = std::fs::remove_dir_all(&self.backup_dir) {
                // Non-critical, leftovers can be removed manually
                tracing::warn!("could not remove backup dir: {e}");
            }
        }
        // Drop the parent .codesweep-backup dir too once nothing is left in it
        if let Some(parent) = self.backup_dir.parent() {
            let _ = std::fs::remove_dir(parent);
        }
    }

    pub fn backed_up_count(&self) -> usize {
        self.manifest.len()
    }
}
