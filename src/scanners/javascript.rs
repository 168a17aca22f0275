//! JavaScript/TypeScript scanner: ESM, require and dynamic imports, export
//! extraction with symbol kinds, package.json dependency hygiene and
//! modularity thresholds.

use anyhow::Result;
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::SweepConfig;
use crate::report::{Action, Issue, IssueCategory, Severity};
use crate::resolver::resolve_js_import;
use crate::scanners::{
    line_number, ExportedSymbol, ImportedSymbol, Resolution, ScanResult, Scanner, SymbolKind,
};

static ESM_IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"import\s+(?:type\s+)?(?:(?:\{[^}]*\}|[\w*]+)\s+from\s+)?['"]([^'"]+)['"]"#)
        .expect("valid regex")
});
static REQUIRE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#).expect("valid regex"));
static DYNAMIC_IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"import\s*\(\s*['"]([^'"]+)['"]\s*\)"#).expect("valid regex"));
static EXPORT_NAMED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"export\s+(?:const|let|var|function|class|type|interface|enum)\s+(\w+)")
        .expect("valid regex")
});
static EXPORT_DEFAULT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"export\s+default\s+(?:function|class)?\s*(\w+)?").expect("valid regex")
});

#[derive(Default)]
struct FileScan {
    exports: Vec<ExportedSymbol>,
    imports: Vec<ImportedSymbol>,
    issues: Vec<Issue>,
    imported_packages: HashSet<String>,
}

pub struct JavaScriptScanner;

impl Scanner for JavaScriptScanner {
    fn name(&self) -> &'static str {
        "javascript"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".js", ".jsx", ".ts", ".tsx", ".mjs", ".cjs"]
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
        let mut imported_packages = HashSet::new();
        for scan in scans {
            result.exports.extend(scan.exports);
            result.imports.extend(scan.imports);
            result.issues.extend(scan.issues);
            imported_packages.extend(scan.imported_packages);
        }

        for pkg_file in all_files
            .iter()
            .filter(|f| f.file_name().map_or(false, |n| n == "package.json"))
        {
            check_package_json(pkg_file, &imported_packages, &mut result.issues);
        }

        Ok(result)
    }
}

fn scan_file(file: &Path, all_files: &HashSet<PathBuf>, config: &SweepConfig) -> FileScan {
    let mut out = FileScan::default();
    let content = match std::fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(file = %file.display(), "cannot read js/ts file: {e}");
            return out;
        }
    };

    for cap in EXPORT_NAMED_RE.captures_iter(&content) {
        let whole = &cap[0];
        let kind = if whole.contains("function") {
            SymbolKind::Function
        } else if whole.contains("class") {
            SymbolKind::Class
        } else if whole.contains("type") || whole.contains("interface") {
            SymbolKind::Type
        } else {
            SymbolKind::Variable
        };
        let offset = cap.get(0).map(|m| m.start()).unwrap_or(0);
        out.exports.push(ExportedSymbol {
            name: cap[1].to_string(),
            file: file.to_path_buf(),
            line: Some(line_number(&content, offset)),
            kind,
        });
    }

    for cap in EXPORT_DEFAULT_RE.captures_iter(&content) {
        let name = cap.get(1).map(|m| m.as_str()).unwrap_or("default");
        let offset = cap.get(0).map(|m| m.start()).unwrap_or(0);
        out.exports.push(ExportedSymbol {
            name: name.to_string(),
            file: file.to_path_buf(),
            line: Some(line_number(&content, offset)),
            kind: SymbolKind::Default,
        });
    }

    for re in [&*ESM_IMPORT_RE, &*REQUIRE_RE, &*DYNAMIC_IMPORT_RE] {
        for cap in re.captures_iter(&content) {
            let specifier = cap[1].to_string();
            let offset = cap.get(0).map(|m| m.start()).unwrap_or(0);
            let bare = is_bare_import(&specifier);
            if let Some(pkg) = extract_package_name(&specifier) {
                out.imported_packages.insert(pkg);
            }
            // Bare specifiers are npm packages or node builtins; only local
            // references that fail to resolve are truly broken.
            let resolved = if bare {
                Resolution::External
            } else {
                resolve_js_import(&specifier, file, all_files)
                    .map(Resolution::Local)
                    .unwrap_or(Resolution::Unresolved)
            };
            out.imports.push(ImportedSymbol {
                name: specifier.clone(),
                from_module: specifier,
                file: file.to_path_buf(),
                line: Some(line_number(&content, offset)),
                resolved,
            });
        }
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
    if out.exports.len() > config.thresholds.max_exports {
        out.issues.push(Issue::new(
            IssueCategory::Modularity,
            Severity::Info,
            file,
            format!(
                "File has {} exports (threshold: {})",
                out.exports.len(),
                config.thresholds.max_exports
            ),
            Action::Skip,
        ));
    }

    out
}

fn check_package_json(pkg_file: &Path, imported: &HashSet<String>, issues: &mut Vec<Issue>) {
    let content = match std::fs::read_to_string(pkg_file) {
        Ok(content) => content,
        Err(_) => return,
    };
    let Ok(parsed) = serde_json::from_str::<serde_json::Value>(&content) else {
        // Malformed package.json is not this scanner's problem
        return;
    };

    let mut deps: Vec<String> = Vec::new();
    for section in ["dependencies", "devDependencies"] {
        if let Some(obj) = parsed.get(section).and_then(|v| v.as_object()) {
            deps.extend(obj.keys().cloned());
        }
    }

    for dep in deps {
        if is_dev_tool(&dep) {
            continue;
        }
        if !imported.contains(&dep) {
            issues.push(Issue::new(
                IssueCategory::UnusedDependency,
                Severity::Warning,
                pkg_file,
                format!("Package '{dep}' in package.json is not imported in any JS/TS file"),
                Action::Skip,
            ));
        }
    }
}

/// npm package name of a bare specifier, handling `@scope/name`.
fn extract_package_name(specifier: &str) -> Option<String> {
    if specifier.starts_with('.') || specifier.starts_with('/') {
        return None;
    }
    if let Some(rest) = specifier.strip_prefix('@') {
        let mut parts = rest.splitn(2, '/');
        let scope = parts.next()?;
        let name = parts.next()?.split('/').next()?;
        return Some(format!("@{scope}/{name}"));
    }
    specifier.split('/').next().map(str::to_string)
}

fn is_bare_import(specifier: &str) -> bool {
    !specifier.starts_with('.') && !specifier.starts_with('/')
}

/// Tools that are driven by CLI or config files rather than imported.
fn is_dev_tool(dep: &str) -> bool {
    const TOOLS: &[&str] = &[
        "typescript",
        "tsup",
        "vitest",
        "jest",
        "mocha",
        "eslint",
        "prettier",
        "husky",
        "lint-staged",
        "ts-node",
        "nodemon",
        "concurrently",
    ];
    TOOLS.contains(&dep) || dep.starts_with("@types/")
}
