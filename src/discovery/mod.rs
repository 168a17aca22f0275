//! File discovery: recursive walk of the project root honoring the
//! include/exclude/ignore globs. Hidden files and symlinks are skipped and
//! results are sorted so scans are deterministic.

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};

use crate::config::SweepConfig;

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    builder.build().context("build glob set")
}

/// Discover all candidate files under the config root.
pub fn discover_files(config: &SweepConfig) -> Result<Vec<PathBuf>> {
    let include = build_globset(&config.include)?;
    let mut excluded: Vec<String> = config.exclude.clone();
    excluded.extend(config.ignore_patterns.iter().cloned());
    let exclude = build_globset(&excluded)?;

    let mut files = Vec::new();
    walk(&config.root_dir, &config.root_dir, &include, &exclude, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(
    dir: &Path,
    root: &Path,
    include: &GlobSet,
    exclude: &GlobSet,
    files: &mut Vec<PathBuf>,
) -> Result<()> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), "cannot read directory: {e}");
            return Ok(());
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("cannot read directory entry: {e}");
                continue;
            }
        };
        let path = entry.path();

        // Hidden files and directories are never scanned
        if let Some(name) = path.file_name() {
            if name.to_string_lossy().starts_with('.') {
                continue;
            }
        }

        let rel = path.strip_prefix(root).unwrap_or(&path);
        if exclude.is_match(rel) {
            continue;
        }

        let meta = match std::fs::symlink_metadata(&path) {
            Ok(meta) => meta,
            Err(_) => continue,
        };
        if meta.file_type().is_symlink() {
            continue;
        }

        if meta.is_dir() {
            walk(&path, root, include, exclude, files)?;
        } else if include.is_match(rel) {
            files.push(path);
        }
    }
    Ok(())
}

/// Keep only files whose extension is in `extensions` (given with or without
/// the leading dot).
pub fn filter_by_extensions(files: &[PathBuf], extensions: &[&str]) -> Vec<PathBuf> {
    let wanted: Vec<String> = extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
        .collect();
    files
        .iter()
        .filter(|f| {
            f.extension()
                .map(|ext| wanted.iter().any(|w| ext.to_string_lossy().eq_ignore_ascii_case(w)))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}
