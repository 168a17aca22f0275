//! Configuration loading for codesweep.
//!
//! Configuration merges three layers: built-in defaults, an optional
//! `.codesweeprc.json` in the project root, and patterns from
//! `.codesweepignore`. Invalid JSON falls back to defaults with a warning;
//! individually invalid fields are dropped rather than aborting the scan.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ignore;

/// Config file name looked up in the scanned project root.
pub const CONFIG_FILE: &str = ".codesweeprc.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SweepConfig {
    #[serde(skip)]
    pub root_dir: PathBuf,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// User-specified entry points, in addition to auto-detected ones.
    pub entry_points: Vec<String>,
    pub scanners: ScannerToggles,
    pub thresholds: Thresholds,
    pub ignore_patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerToggles {
    pub python: bool,
    pub javascript: bool,
    pub markdown: bool,
    pub config: bool,
    pub css: bool,
}

impl Default for ScannerToggles {
    fn default() -> Self {
        Self {
            python: true,
            javascript: true,
            markdown: true,
            config: true,
            css: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Thresholds {
    pub max_file_lines: usize,
    pub max_exports: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_file_lines: 500,
            max_exports: 10,
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            include: vec!["**/*".to_string()],
            exclude: vec![
                "**/node_modules/**".to_string(),
                "**/.venv/**".to_string(),
                "**/__pycache__/**".to_string(),
                "**/dist/**".to_string(),
                "**/build/**".to_string(),
                "**/target/**".to_string(),
                "**/.git/**".to_string(),
                "**/coverage/**".to_string(),
                "**/*.min.js".to_string(),
                "**/*.map".to_string(),
            ],
            entry_points: Vec::new(),
            scanners: ScannerToggles::default(),
            thresholds: Thresholds::default(),
            ignore_patterns: Vec::new(),
        }
    }
}

/// Validate a parsed config object, removing invalid fields in place and
/// returning a description of each problem found.
fn validate_fields(raw: &mut serde_json::Value) -> Vec<String> {
    let mut errors = Vec::new();
    let Some(obj) = raw.as_object_mut() else {
        return vec!["config root must be a JSON object".to_string()];
    };

    let mut drop_keys = Vec::new();
    for key in ["include", "exclude", "entryPoints", "ignorePatterns"] {
        if let Some(v) = obj.get(key) {
            let ok = v.as_array().map_or(false, |a| a.iter().all(|e| e.is_string()));
            if !ok {
                errors.push(format!("\"{key}\" must be an array of strings"));
                drop_keys.push(key.to_string());
            }
        }
    }
    if let Some(v) = obj.get("scanners") {
        if !v.is_object() {
            errors.push("\"scanners\" must be an object with boolean values".to_string());
            drop_keys.push("scanners".to_string());
        }
    }
    if let Some(v) = obj.get("thresholds") {
        match v.as_object() {
            None => {
                errors.push("\"thresholds\" must be an object".to_string());
                drop_keys.push("thresholds".to_string());
            }
            Some(t) => {
                for key in ["maxFileLines", "maxExports"] {
                    if let Some(n) = t.get(key) {
                        if !n.as_u64().map_or(false, |n| n >= 1) {
                            errors.push(format!("\"thresholds.{key}\" must be a positive number"));
                            drop_keys.push("thresholds".to_string());
                        }
                    }
                }
            }
        }
    }
    for key in drop_keys {
        obj.remove(&key);
    }
    errors
}

/// Load the effective configuration for a project root.
///
/// `config_file` overrides the default `.codesweeprc.json` lookup path.
pub fn load_config(root: &Path, config_file: Option<&Path>) -> SweepConfig {
    let path = config_file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.join(CONFIG_FILE));

    let mut config = if path.exists() {
        match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<serde_json::Value>(&text) {
                Ok(mut raw) => {
                    let errors = validate_fields(&mut raw);
                    for e in &errors {
                        tracing::warn!("config: {e}");
                    }
                    if !errors.is_empty() {
                        tracing::warn!("invalid fields will be ignored, defaults used instead");
                    }
                    merge_over_defaults(raw)
                }
                Err(e) => {
                    tracing::warn!("invalid JSON in {}: {e}", path.display());
                    tracing::warn!("falling back to default config");
                    SweepConfig::default()
                }
            },
            Err(e) => {
                tracing::warn!("cannot read {}: {e}", path.display());
                SweepConfig::default()
            }
        }
    } else {
        SweepConfig::default()
    };

    config.root_dir = root.to_path_buf();
    config
        .ignore_patterns
        .extend(ignore::load_ignore_patterns(root));
    config
}

/// Deserialize a validated config object on top of the defaults.
fn merge_over_defaults(raw: serde_json::Value) -> SweepConfig {
    match serde_json::from_value::<SweepConfig>(raw) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("config deserialization failed: {e}, using defaults");
            SweepConfig::default()
        }
    }
}

/// Default config body written by `codesweep init`.
pub fn generate_default_config() -> String {
    let defaults = SweepConfig::default();
    let subset = serde_json::json!({
        "include": defaults.include,
        "exclude": defaults.exclude,
        "scanners": defaults.scanners,
        "thresholds": defaults.thresholds,
    });
    // Defaults serialize cleanly; fall back to an empty object if not
    serde_json::to_string_pretty(&subset).unwrap_or_else(|_| "{}".to_string())
}
