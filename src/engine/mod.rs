//! Scan orchestration: discovery, scanner plugins, graph passes, report
//! assembly.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::SweepConfig;
use crate::discovery::{discover_files, filter_by_extensions};
use crate::graph::DependencyGraph;
use crate::report::{
    Action, Confidence, Issue, IssueCategory, ScanReport, ScanStats, Severity,
};
use crate::resolver::normalize;
use crate::scanners::{
    ConfigScanner, CssScanner, JavaScriptScanner, MarkdownScanner, PythonScanner, Resolution,
    Scanner, SymbolKind,
};

/// Well-known entry point file names, auto-detected during the graph pass.
pub const KNOWN_ENTRY_POINTS: &[&str] = &[
    // Python
    "main.py", "app.py", "server.py", "wsgi.py", "asgi.py", "manage.py", "cli.py",
    "__main__.py", "setup.py",
    // JavaScript/TypeScript
    "index.js", "index.ts", "index.tsx", "main.js", "main.ts", "app.js", "app.ts",
    "server.js", "server.ts", "cli.js", "cli.ts",
];

/// Only these count as code for orphan detection; docs and config files are
/// legitimately never imported.
const CODE_EXTENSIONS: &[&str] = &["py", "js", "jsx", "ts", "tsx", "mjs", "cjs"];

static BARREL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^index\.(js|jsx|ts|tsx)$").expect("valid regex"));
static TEST_FILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(test|spec)\.(js|jsx|ts|tsx)$").expect("valid regex"));

pub struct ScanOrchestrator {
    plugins: Vec<Box<dyn Scanner>>,
    graph: DependencyGraph,
}

impl ScanOrchestrator {
    pub fn new(config: &SweepConfig) -> Self {
        let mut plugins: Vec<Box<dyn Scanner>> = Vec::new();
        if config.scanners.python {
            plugins.push(Box::new(PythonScanner));
        }
        if config.scanners.javascript {
            plugins.push(Box::new(JavaScriptScanner));
        }
        if config.scanners.markdown {
            plugins.push(Box::new(MarkdownScanner));
        }
        if config.scanners.config {
            plugins.push(Box::new(ConfigScanner));
        }
        if config.scanners.css {
            plugins.push(Box::new(CssScanner));
        }
        Self {
            plugins,
            graph: DependencyGraph::new(),
        }
    }

    /// Run the full pipeline and assemble a report. `only` restricts the run
    /// to a single scanner, accepting the aliases the CLI documents.
    pub fn scan(&mut self, config: &SweepConfig, only: Option<&str>) -> Result<ScanReport> {
        let started = Instant::now();

        let all_files = discover_files(config)?;
        tracing::info!("found {} files", all_files.len());

        let active: Vec<&dyn Scanner> = match only {
            Some(alias) => {
                let wanted = resolve_scanner_alias(alias);
                self.plugins
                    .iter()
                    .map(|p| p.as_ref())
                    .filter(|p| wanted.contains(&p.name()))
                    .collect()
            }
            None => self.plugins.iter().map(|p| p.as_ref()).collect(),
        };

        let mut issues: Vec<Issue> = Vec::new();
        let mut scanner_names = Vec::new();

        for plugin in &active {
            let plugin_files = filter_by_extensions(&all_files, plugin.extensions());
            scanner_names.push(plugin.name().to_string());
            if plugin_files.is_empty() && plugin.name() != "config" {
                tracing::debug!("no {} files found", plugin.name());
                continue;
            }
            tracing::debug!("scanning {} {} files", plugin_files.len(), plugin.name());
            let result = plugin.scan(&plugin_files, &all_files, config)?;

            for file in &result.files {
                self.graph.add_file(file.clone());
            }
            for export in result.exports {
                self.graph.add_export(export.file.clone(), export);
            }
            for import in result.imports {
                if let Resolution::Local(target) = &import.resolved {
                    self.graph.add_edge(import.file.clone(), target.clone());
                }
                self.graph.add_import(import.file.clone(), import);
            }
            issues.extend(result.issues);
        }

        self.detect_entry_points(config, &all_files);
        self.graph_passes(&mut issues);

        let stats = self.graph.stats();
        tracing::info!(
            "graph: {} files, {} edges, {} entry points",
            stats.total_files,
            stats.total_edges,
            stats.entry_points
        );

        let issues_stats = count_stats(&issues, all_files.len());
        Ok(ScanReport {
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            root_dir: config.root_dir.clone(),
            duration_ms: started.elapsed().as_millis() as u64,
            scanners: scanner_names,
            issues,
            stats: issues_stats,
        })
    }

    fn detect_entry_points(&mut self, config: &SweepConfig, all_files: &[PathBuf]) {
        for file in all_files {
            if let Some(name) = file.file_name().map(|n| n.to_string_lossy().to_string()) {
                if KNOWN_ENTRY_POINTS.contains(&name.as_str()) {
                    self.graph.mark_entry_point(file.clone());
                }
            }
        }
        for ep in &config.entry_points {
            let resolved = normalize(&config.root_dir.join(ep));
            self.graph.mark_entry_point(resolved);
        }
    }

    fn graph_passes(&self, issues: &mut Vec<Issue>) {
        // Dead files: orphaned code files only
        for file in self.graph.orphaned_files() {
            let is_code = file
                .extension()
                .map_or(false, |e| CODE_EXTENSIONS.iter().any(|x| e == *x));
            if !is_code {
                continue;
            }
            issues.push(Issue::new(
                IssueCategory::DeadFile,
                Severity::Warning,
                file,
                "File is not imported by any other file and not an entry point",
                Action::Delete,
            ));
        }

        issues.extend(self.graph.broken_imports());

        // Unused exports, tagged with confidence so consumers can filter.
        for unused in self.graph.unused_exports() {
            let basename = unused
                .file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let path_str = unused.file.to_string_lossy().replace('\\', "/");
            let symbol = &unused.symbol;

            let (confidence, reason) = if BARREL_RE.is_match(&basename) {
                (
                    Confidence::Low,
                    "Barrel file re-exports are intentional API surface".to_string(),
                )
            } else if TEST_FILE_RE.is_match(&basename)
                || path_str.contains("/__tests__/")
                || path_str.contains("/tests/")
                || path_str.contains("/test/")
            {
                (
                    Confidence::Low,
                    "Test helper, not expected to be imported by production code".to_string(),
                )
            } else if symbol.kind == SymbolKind::Type {
                (
                    Confidence::Medium,
                    format!(
                        "Type export '{}' may be consumed via declaration merging or inference",
                        symbol.name
                    ),
                )
            } else if unused.total_exports == 1 {
                (
                    Confidence::High,
                    "Only export in this file; the entire file may be dead code".to_string(),
                )
            } else {
                (
                    Confidence::High,
                    format!(
                        "Export '{}' is not imported by any other file in the project",
                        symbol.name
                    ),
                )
            };

            let severity = if confidence == Confidence::High {
                Severity::Warning
            } else {
                Severity::Info
            };

            let trace = self.graph.trace_route(&unused.file);
            let mut issue = Issue::new(
                IssueCategory::UnusedExport,
                severity,
                unused.file.clone(),
                format!(
                    "Export '{}' ({}) is never imported",
                    symbol.name,
                    symbol.kind.label()
                ),
                Action::Skip,
            );
            issue.line = symbol.line;
            issue.confidence = Some(confidence);
            issue.reason = Some(reason);
            issue.trace = (!trace.is_empty()).then_some(trace);
            issues.push(issue);
        }
    }
}

/// Map CLI aliases to scanner names.
fn resolve_scanner_alias(alias: &str) -> Vec<&'static str> {
    match alias {
        "python" | "py" => vec!["python"],
        "javascript" | "js" | "ts" => vec!["javascript"],
        "docs" | "markdown" | "md" => vec!["markdown"],
        "css" => vec!["css"],
        "config" => vec!["config"],
        _ => Vec::new(),
    }
}

fn count_stats(issues: &[Issue], files_scanned: usize) -> ScanStats {
    let count =
        |cat: IssueCategory| issues.iter().filter(|i| i.category == cat).count();
    ScanStats {
        files_scanned,
        dead_files: count(IssueCategory::DeadFile),
        stale_refs: count(IssueCategory::StaleReference),
        unused_deps: count(IssueCategory::UnusedDependency),
        unused_exports: count(IssueCategory::UnusedExport),
        doc_drift: count(IssueCategory::DocDrift),
        modularity_issues: count(IssueCategory::Modularity),
    }
}
