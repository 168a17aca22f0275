//! Embedding API for tools that want scan results without the CLI.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::commands::{run_scan, ScanOptions};
use crate::report::{Confidence, ScanReport};

#[derive(Debug, Default, Clone)]
pub struct ScanProjectOptions {
    /// Restrict to a single scanner family, e.g. "python" or "docs".
    pub only: Option<String>,
    /// Drop issues below this confidence. Issues without a confidence
    /// attached always pass the filter.
    pub min_confidence: Option<Confidence>,
    pub config_file: Option<PathBuf>,
}

/// Scan a project and return a report with root-relative paths.
pub fn scan_project(dir: &Path, options: &ScanProjectOptions) -> Result<ScanReport> {
    let scan_options = ScanOptions {
        only: options.only.clone(),
        config_file: options.config_file.clone(),
    };
    let mut report = run_scan(dir, &scan_options)?.relative();

    if let Some(min) = options.min_confidence {
        report
            .issues
            .retain(|i| i.confidence.map_or(true, |c| c.rank() >= min.rank()));
    }
    Ok(report)
}
