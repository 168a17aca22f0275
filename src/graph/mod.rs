//! Project dependency graph: files are nodes, resolved imports are edges.
//! Orphan detection flood-fills from entry points (BFS); trace routes walk
//! depth-first so the reporter can show how a file is reached.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};

use crate::report::{Action, Fix, FixKind, Issue, IssueCategory, Severity};
use crate::scanners::{ExportedSymbol, ImportedSymbol, Resolution};

#[derive(Debug, Default)]
struct FileNode {
    exports: Vec<ExportedSymbol>,
    imports: Vec<ImportedSymbol>,
    depends_on: BTreeSet<PathBuf>,
    depended_by: BTreeSet<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphStats {
    pub total_files: usize,
    pub total_edges: usize,
    pub entry_points: usize,
}

/// An export no other file imports, with enough context for confidence
/// tagging.
#[derive(Debug)]
pub struct UnusedExport {
    pub file: PathBuf,
    pub symbol: ExportedSymbol,
    pub total_exports: usize,
}

#[derive(Debug, Default)]
pub struct DependencyGraph {
    // BTreeMap keeps traversal and report order deterministic
    nodes: BTreeMap<PathBuf, FileNode>,
    entry_points: BTreeSet<PathBuf>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, file: impl Into<PathBuf>) {
        self.nodes.entry(file.into()).or_default();
    }

    pub fn add_export(&mut self, file: impl Into<PathBuf>, symbol: ExportedSymbol) {
        self.nodes.entry(file.into()).or_default().exports.push(symbol);
    }

    pub fn add_import(&mut self, file: impl Into<PathBuf>, symbol: ImportedSymbol) {
        self.nodes.entry(file.into()).or_default().imports.push(symbol);
    }

    pub fn add_edge(&mut self, from: impl Into<PathBuf>, to: impl Into<PathBuf>) {
        let from = from.into();
        let to = to.into();
        self.nodes.entry(to.clone()).or_default().depended_by.insert(from.clone());
        self.nodes.entry(from).or_default().depends_on.insert(to);
    }

    pub fn mark_entry_point(&mut self, file: impl Into<PathBuf>) {
        self.entry_points.insert(file.into());
    }

    pub fn is_entry_point(&self, file: &Path) -> bool {
        self.entry_points.contains(file)
    }

    /// Flood-fill from all entry points; anything unvisited is orphaned.
    pub fn orphaned_files(&self) -> Vec<PathBuf> {
        let mut visited: BTreeSet<&Path> = BTreeSet::new();
        let mut queue: VecDeque<&Path> =
            self.entry_points.iter().map(PathBuf::as_path).collect();

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            for dep in &node.depends_on {
                if !visited.contains(dep.as_path()) {
                    queue.push_back(dep);
                }
            }
        }

        self.nodes
            .keys()
            .filter(|file| !visited.contains(file.as_path()))
            .cloned()
            .collect()
    }

    /// Import route from some entry point to `target`, or empty when the
    /// target is unreachable.
    pub fn trace_route(&self, target: &Path) -> Vec<PathBuf> {
        for entry in &self.entry_points {
            let mut visited = BTreeSet::new();
            let route = self.dfs_trace(entry, target, &mut visited);
            if !route.is_empty() {
                return route;
            }
        }
        Vec::new()
    }

    fn dfs_trace(
        &self,
        current: &Path,
        target: &Path,
        visited: &mut BTreeSet<PathBuf>,
    ) -> Vec<PathBuf> {
        if current == target {
            return vec![current.to_path_buf()];
        }
        if !visited.insert(current.to_path_buf()) {
            return Vec::new();
        }
        let Some(node) = self.nodes.get(current) else {
            return Vec::new();
        };

        for dep in &node.depends_on {
            let route = self.dfs_trace(dep, target, visited);
            if !route.is_empty() {
                let mut full = Vec::with_capacity(route.len() + 1);
                full.push(current.to_path_buf());
                full.extend(route);
                return full;
            }
        }
        Vec::new()
    }

    /// Imports whose targets resolved to nothing become stale-reference
    /// errors with a remove-import fix.
    pub fn broken_imports(&self) -> Vec<Issue> {
        let mut issues = Vec::new();
        for (file, node) in &self.nodes {
            for imp in &node.imports {
                if imp.resolved == Resolution::Unresolved {
                    let mut issue = Issue::new(
                        IssueCategory::StaleReference,
                        Severity::Error,
                        file.clone(),
                        format!(
                            "Import '{}' from '{}' cannot be resolved",
                            imp.name, imp.from_module
                        ),
                        Action::Update,
                    )
                    .with_fix(Fix {
                        kind: FixKind::RemoveImport,
                        target: imp.from_module.clone(),
                        replacement: None,
                    });
                    issue.line = imp.line;
                    issues.push(issue);
                }
            }
        }
        issues
    }

    /// Exports never imported by another file. Entry points are exempt.
    pub fn unused_exports(&self) -> Vec<UnusedExport> {
        let mut results = Vec::new();
        for (file, node) in &self.nodes {
            if self.entry_points.contains(file) {
                continue;
            }
            for export in &node.exports {
                if !self.is_export_used(file, &export.name) {
                    results.push(UnusedExport {
                        file: file.clone(),
                        symbol: export.clone(),
                        total_exports: node.exports.len(),
                    });
                }
            }
        }
        results
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            total_files: self.nodes.len(),
            total_edges: self.nodes.values().map(|n| n.depends_on.len()).sum(),
            entry_points: self.entry_points.len(),
        }
    }

    fn is_export_used(&self, file: &Path, export_name: &str) -> bool {
        self.nodes.iter().any(|(other, node)| {
            other != file
                && node.imports.iter().any(|imp| {
                    imp.resolved == Resolution::Local(file.to_path_buf())
                        && (imp.name == export_name || imp.name == "*")
                })
        })
    }
}
