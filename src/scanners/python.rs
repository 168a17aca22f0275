//! Python scanner: regex-based import/export extraction, `__all__`
//! consistency for packages, requirements.txt hygiene and file-size checks.

use anyhow::Result;
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::SweepConfig;
use crate::report::{Action, Fix, FixKind, Issue, IssueCategory, Severity};
use crate::resolver::resolve_python_import;
use crate::scanners::{
    line_number, ExportedSymbol, ImportedSymbol, Resolution, ScanResult, Scanner, SymbolKind,
};

static IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^import\s+([\w.]+)").expect("valid regex"));
static FROM_IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^from\s+([\w.]+)\s+import\s+(.+)").expect("valid regex"));
static DEF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(def|class)\s+(\w+)").expect("valid regex"));
static ALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)__all__\s*=\s*\[([^\]]*)\]").expect("valid regex"));

#[derive(Default)]
struct FileScan {
    exports: Vec<ExportedSymbol>,
    imports: Vec<ImportedSymbol>,
    issues: Vec<Issue>,
    /// Top-level module names this file imports, for the requirements check.
    imported_modules: HashSet<String>,
}

pub struct PythonScanner;

impl Scanner for PythonScanner {
    fn name(&self) -> &'static str {
        "python"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".py"]
    }

    fn scan(
        &self,
        files: &[PathBuf],
        all_files: &[PathBuf],
        config: &SweepConfig,
    ) -> Result<ScanResult> {
        let all_file_set: HashSet<PathBuf> = all_files.iter().cloned().collect();

        let scans: Vec<FileScan> = files
            .par_iter()
            .map(|file| scan_file(file, &all_file_set, config))
            .collect();

        let mut result = ScanResult {
            files: files.to_vec(),
            ..Default::default()
        };
        let mut imported_modules = HashSet::new();
        for scan in scans {
            result.exports.extend(scan.exports);
            result.imports.extend(scan.imports);
            result.issues.extend(scan.issues);
            imported_modules.extend(scan.imported_modules);
        }

        // Dependency manifests live outside the .py extension filter
        for req in all_files
            .iter()
            .filter(|f| f.file_name().map_or(false, |n| n == "requirements.txt"))
        {
            check_requirements(req, &imported_modules, &mut result.issues);
        }
        for pyproject in all_files
            .iter()
            .filter(|f| f.file_name().map_or(false, |n| n == "pyproject.toml"))
        {
            check_pyproject(pyproject, &imported_modules, &mut result.issues);
        }

        Ok(result)
    }
}

fn scan_file(file: &Path, all_files: &HashSet<PathBuf>, config: &SweepConfig) -> FileScan {
    let mut out = FileScan::default();
    let content = match std::fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(file = %file.display(), "cannot read python file: {e}");
            return out;
        }
    };

    // Top-level def/class are that file's exported surface
    for cap in DEF_RE.captures_iter(&content) {
        let kind = if &cap[1] == "class" {
            SymbolKind::Class
        } else {
            SymbolKind::Function
        };
        let m = cap.get(0).map(|m| m.start()).unwrap_or(0);
        out.exports.push(ExportedSymbol {
            name: cap[2].to_string(),
            file: file.to_path_buf(),
            line: Some(line_number(&content, m)),
            kind,
        });
    }

    // `import X` and `import X.Y`
    for cap in IMPORT_RE.captures_iter(&content) {
        let module_path = &cap[1];
        let offset = cap.get(0).map(|m| m.start()).unwrap_or(0);
        out.imported_modules
            .insert(module_path.split('.').next().unwrap_or(module_path).to_string());
        let resolved = resolve_python_import(module_path, &config.root_dir, all_files)
            .map(Resolution::Local)
            // Unresolved dotted imports are stdlib/pip packages, not broken
            .unwrap_or(Resolution::External);
        out.imports.push(ImportedSymbol {
            name: module_path.rsplit('.').next().unwrap_or(module_path).to_string(),
            from_module: module_path.to_string(),
            file: file.to_path_buf(),
            line: Some(line_number(&content, offset)),
            resolved,
        });
    }

    // `from X import a, b as c`
    for cap in FROM_IMPORT_RE.captures_iter(&content) {
        let module_path = cap[1].to_string();
        let offset = cap.get(0).map(|m| m.start()).unwrap_or(0);
        out.imported_modules
            .insert(module_path.split('.').next().unwrap_or(&module_path).to_string());
        let resolved = resolve_python_import(&module_path, &config.root_dir, all_files)
            .map(Resolution::Local)
            .unwrap_or(Resolution::External);

        for raw in cap[2].split(',') {
            let name = raw.trim().split(" as ").next().unwrap_or("").trim();
            if name.is_empty() || name == "(" || name == ")" || name == "\\" {
                continue;
            }
            out.imports.push(ImportedSymbol {
                name: name.to_string(),
                from_module: module_path.clone(),
                file: file.to_path_buf(),
                line: Some(line_number(&content, offset)),
                resolved: resolved.clone(),
            });
        }
    }

    if file.file_name().map_or(false, |n| n == "__init__.py") {
        check_dunder_all(file, &content, all_files, &mut out.issues);
    }

    let lines = content.lines().count();
    if lines > config.thresholds.max_file_lines {
        out.issues.push(Issue::new(
            IssueCategory::Modularity,
            Severity::Info,
            file,
            format!(
                "File has {lines} lines (threshold: {})",
                config.thresholds.max_file_lines
            ),
            Action::Skip,
        ));
    }

    out
}

/// `__all__` names in a package must correspond to sibling modules.
fn check_dunder_all(
    file: &Path,
    content: &str,
    all_files: &HashSet<PathBuf>,
    issues: &mut Vec<Issue>,
) {
    let Some(cap) = ALL_RE.captures(content) else {
        return;
    };
    let Some(dir) = file.parent() else {
        return;
    };

    for raw in cap[1].split(',') {
        let name = raw.trim().trim_matches(|c| c == '\'' || c == '"');
        if name.is_empty() {
            continue;
        }
        let expected = dir.join(format!("{name}.py"));
        let expected_pkg = dir.join(name).join("__init__.py");
        if !all_files.contains(&expected) && !all_files.contains(&expected_pkg) {
            issues.push(
                Issue::new(
                    IssueCategory::StaleReference,
                    Severity::Error,
                    file,
                    format!(
                        "__all__ exports '{name}' but {name}.py does not exist in {}",
                        dir.display()
                    ),
                    Action::Update,
                )
                .with_fix(Fix {
                    kind: FixKind::RemoveImport,
                    target: name.to_string(),
                    replacement: None,
                }),
            );
        }
    }
}

fn check_requirements(req: &Path, imported_modules: &HashSet<String>, issues: &mut Vec<Issue>) {
    let content = match std::fs::read_to_string(req) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(file = %req.display(), "cannot read requirements.txt: {e}");
            return;
        }
    };

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('-') {
            continue;
        }
        let raw_name = trimmed
            .split(|c| ['>', '<', '=', '!', '~', '['].contains(&c))
            .next()
            .unwrap_or("")
            .trim();
        if raw_name.is_empty() {
            continue;
        }
        // Distribution names use dashes; import names use underscores
        let normalized = raw_name.replace('-', "_").to_ascii_lowercase();
        let squashed = normalized.replace('_', "");
        if !imported_modules.contains(&normalized) && !imported_modules.contains(&squashed) {
            issues.push(Issue::new(
                IssueCategory::UnusedDependency,
                Severity::Warning,
                req,
                format!("Package '{raw_name}' in requirements.txt is not imported in any Python file"),
                Action::Skip,
            ));
        }
    }
}

/// PEP 621 `[project] dependencies` entries, same matching rules as
/// requirements.txt.
fn check_pyproject(file: &Path, imported_modules: &HashSet<String>, issues: &mut Vec<Issue>) {
    let Ok(content) = std::fs::read_to_string(file) else {
        return;
    };
    let Ok(doc) = content.parse::<toml::Table>() else {
        return;
    };
    let Some(deps) = doc
        .get("project")
        .and_then(|p| p.get("dependencies"))
        .and_then(|d| d.as_array())
    else {
        return;
    };

    for dep in deps.iter().filter_map(|d| d.as_str()) {
        let raw_name = dep
            .split(|c| ['>', '<', '=', '!', '~', '[', ';', ' '].contains(&c))
            .next()
            .unwrap_or("")
            .trim();
        if raw_name.is_empty() {
            continue;
        }
        let normalized = raw_name.replace('-', "_").to_ascii_lowercase();
        let squashed = normalized.replace('_', "");
        if !imported_modules.contains(&normalized) && !imported_modules.contains(&squashed) {
            issues.push(Issue::new(
                IssueCategory::UnusedDependency,
                Severity::Warning,
                file,
                format!("Package '{raw_name}' in pyproject.toml is not imported in any Python file"),
                Action::Skip,
            ));
        }
    }
}
