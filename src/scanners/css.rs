//! CSS scanner: finds class definitions that no JS/JSX/TSX/HTML file
//! references through `className=` or `class=` attributes.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;

use crate::config::SweepConfig;
use crate::report::{Action, Issue, IssueCategory, Severity};
use crate::scanners::{ExportedSymbol, ScanResult, Scanner, SymbolKind};

static CSS_CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.([a-zA-Z_][\w-]*)\s*[{,:\s]").expect("valid regex"));
static CLASSNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"className\s*=\s*[{"]([^}"]+)"#).expect("valid regex"));
static CLASS_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"class\s*=\s*["']([^"']+)"#).expect("valid regex"));

pub struct CssScanner;

impl Scanner for CssScanner {
    fn name(&self) -> &'static str {
        "css"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".css"]
    }

    fn scan(
        &self,
        files: &[PathBuf],
        all_files: &[PathBuf],
        _config: &SweepConfig,
    ) -> Result<ScanResult> {
        let mut result = ScanResult {
            files: files.to_vec(),
            ..Default::default()
        };

        let mut used_classes: HashSet<String> = HashSet::new();
        let markup_files = all_files.iter().filter(|f| {
            f.extension()
                .map_or(false, |e| ["js", "jsx", "tsx", "html"].iter().any(|x| e == *x))
        });
        for markup in markup_files {
            let Ok(content) = std::fs::read_to_string(markup) else {
                continue;
            };
            for re in [&*CLASSNAME_RE, &*CLASS_ATTR_RE] {
                for cap in re.captures_iter(&content) {
                    for cls in cap[1].split_whitespace() {
                        used_classes.insert(cls.to_string());
                    }
                }
            }
        }

        for file in files {
            let Ok(content) = std::fs::read_to_string(file) else {
                continue;
            };
            // BTreeSet keeps issue order stable across runs
            let defined: BTreeSet<String> = CSS_CLASS_RE
                .captures_iter(&content)
                .map(|cap| cap[1].to_string())
                .collect();

            for cls in defined {
                result.exports.push(ExportedSymbol {
                    name: cls.clone(),
                    file: file.clone(),
                    line: None,
                    kind: SymbolKind::Variable,
                });
                if !used_classes.contains(&cls) {
                    result.issues.push(Issue::new(
                        IssueCategory::DeadFile,
                        Severity::Info,
                        file,
                        format!("CSS class '.{cls}' is defined but never referenced in any JS/HTML file"),
                        Action::Skip,
                    ));
                }
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unused_css_class_is_reported_and_used_is_not() {
        let td = tempfile::tempdir().unwrap();
        let css = td.path().join("styles.css");
        std::fs::write(&css, ".used { color: red; }\n.dead-class { margin: 0; }\n").unwrap();
        let jsx = td.path().join("App.jsx");
        std::fs::write(&jsx, "export const App = () => <div className=\"used\" />;\n").unwrap();

        let all = vec![css.clone(), jsx];
        let config = SweepConfig::default();
        let result = CssScanner.scan(&[css], &all, &config).unwrap();

        assert!(result.issues.iter().any(|i| i.message.contains("dead-class")));
        assert!(!result.issues.iter().any(|i| i.message.contains("'.used'")));
    }
}
