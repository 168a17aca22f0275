//! Scan report types and the on-disk report cache.
//!
//! Every scanner produces [`Issue`]s; the orchestrator collects them into a
//! [`ScanReport`] which is rendered by a reporter and cached as JSON in the
//! project root so `codesweep report` can re-render it later.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the cached report, written into the scanned project root.
pub const CACHE_FILE: &str = ".codesweep-report.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueCategory {
    DeadFile,
    StaleReference,
    UnusedDependency,
    UnusedExport,
    DocDrift,
    Modularity,
}

impl IssueCategory {
    /// Order in which categories appear in rendered reports.
    pub const ORDER: [IssueCategory; 6] = [
        IssueCategory::DeadFile,
        IssueCategory::StaleReference,
        IssueCategory::UnusedDependency,
        IssueCategory::UnusedExport,
        IssueCategory::DocDrift,
        IssueCategory::Modularity,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            IssueCategory::DeadFile => "DEAD FILES",
            IssueCategory::StaleReference => "STALE REFERENCES",
            IssueCategory::UnusedDependency => "UNUSED DEPENDENCIES",
            IssueCategory::UnusedExport => "UNUSED EXPORTS",
            IssueCategory::DocDrift => "DOCUMENTATION DRIFT",
            IssueCategory::Modularity => "MODULARITY ISSUES",
        }
    }

    /// Parse the CLI spelling used by `report --detail`.
    pub fn from_cli_name(name: &str) -> Option<Self> {
        match name {
            "dead-files" | "dead-file" => Some(IssueCategory::DeadFile),
            "stale-refs" | "stale-reference" => Some(IssueCategory::StaleReference),
            "unused-deps" | "unused-dependency" => Some(IssueCategory::UnusedDependency),
            "unused-exports" | "unused-export" => Some(IssueCategory::UnusedExport),
            "doc-drift" => Some(IssueCategory::DocDrift),
            "modularity" => Some(IssueCategory::Modularity),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn marker(&self) -> &'static str {
        match self {
            Severity::Error => "X",
            Severity::Warning => "!",
            Severity::Info => "i",
        }
    }
}

/// How certain a detection is. Consumers use this to prioritize fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn rank(&self) -> u8 {
        match self {
            Confidence::High => 3,
            Confidence::Medium => 2,
            Confidence::Low => 1,
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            Confidence::High => "[HIGH]",
            Confidence::Medium => "[MED]",
            Confidence::Low => "[LOW]",
        }
    }
}

/// What `codesweep clean` should do about an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Delete,
    Update,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixKind {
    RemoveImport,
    RemoveLink,
    RemoveDependency,
    Custom,
}

/// For `update` actions, the concrete edit the cleaner should perform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fix {
    pub kind: FixKind,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub replacement: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub category: IssueCategory,
    pub severity: Severity,
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub line: Option<usize>,
    pub message: String,
    pub action: Action,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fix: Option<Fix>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub confidence: Option<Confidence>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<String>,
    /// Import route from an entry point, when the file is reachable.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub trace: Option<Vec<PathBuf>>,
}

impl Issue {
    pub fn new(
        category: IssueCategory,
        severity: Severity,
        file: impl Into<PathBuf>,
        message: impl Into<String>,
        action: Action,
    ) -> Self {
        Self {
            category,
            severity,
            file: file.into(),
            line: None,
            message: message.into(),
            action,
            fix: None,
            confidence: None,
            reason: None,
            trace: None,
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    pub files_scanned: usize,
    pub dead_files: usize,
    pub stale_refs: usize,
    pub unused_deps: usize,
    pub unused_exports: usize,
    pub doc_drift: usize,
    pub modularity_issues: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub timestamp: String,
    pub root_dir: PathBuf,
    pub duration_ms: u64,
    pub scanners: Vec<String>,
    pub issues: Vec<Issue>,
    pub stats: ScanStats,
}

impl ScanReport {
    /// Count issues at a given severity.
    pub fn count_severity(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Copy of the report with every path rewritten relative to the root.
    /// Keeps cached reports and JSON output portable across machines.
    pub fn relative(&self) -> ScanReport {
        let rel =
            |p: &Path| -> PathBuf { p.strip_prefix(&self.root_dir).unwrap_or(p).to_path_buf() };
        let mut out = self.clone();
        for issue in &mut out.issues {
            issue.file = rel(&issue.file);
            if let Some(trace) = &mut issue.trace {
                *trace = trace.iter().map(|p| rel(p)).collect();
            }
        }
        out
    }

    /// Persist the report next to the scanned project for `codesweep report`.
    pub fn save_cache(&self) -> Result<()> {
        let path = self.root_dir.join(CACHE_FILE);
        let text = serde_json::to_string_pretty(self).context("serialize scan report")?;
        std::fs::write(&path, text)
            .with_context(|| format!("write report cache {}", path.display()))?;
        Ok(())
    }

    /// Load a previously cached report, if any.
    pub fn load_cached(root: &Path) -> Result<Option<ScanReport>> {
        let path = root.join(CACHE_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("read report cache {}", path.display()))?;
        let report = serde_json::from_str(&text)
            .with_context(|| format!("parse report cache {}", path.display()))?;
        Ok(Some(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_rewrites_issue_and_trace_paths() {
        let mut report = ScanReport {
            timestamp: "2026-01-01 00:00:00".to_string(),
            root_dir: PathBuf::from("/project"),
            duration_ms: 5,
            scanners: vec!["python".to_string()],
            issues: vec![Issue::new(
                IssueCategory::DeadFile,
                Severity::Warning,
                "/project/app/dead.py",
                "File is not imported by any other file and not an entry point",
                Action::Delete,
            )],
            stats: ScanStats::default(),
        };
        report.issues[0].trace = Some(vec![PathBuf::from("/project/main.py")]);

        let rel = report.relative();
        assert_eq!(rel.issues[0].file, PathBuf::from("app/dead.py"));
        assert_eq!(rel.issues[0].trace.as_ref().unwrap()[0], PathBuf::from("main.py"));
    }

    #[test]
    fn issue_serializes_with_kebab_case_category() {
        let issue = Issue::new(
            IssueCategory::StaleReference,
            Severity::Error,
            "a.py",
            "broken",
            Action::Update,
        );
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["category"], "stale-reference");
        assert_eq!(json["severity"], "error");
        // Optional fields are omitted entirely
        assert!(json.get("confidence").is_none());
    }

    #[test]
    fn category_cli_names_round_trip() {
        assert_eq!(
            IssueCategory::from_cli_name("unused-exports"),
            Some(IssueCategory::UnusedExport)
        );
        assert_eq!(IssueCategory::from_cli_name("bogus"), None);
    }
}
