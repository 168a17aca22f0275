//! Markdown scanner: validates `[text](path)` links against the filesystem.
//! External URLs, anchors and mailto links are skipped; anchors are stripped
//! before resolution. Broken targets become doc-drift errors.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::config::SweepConfig;
use crate::report::{Action, Fix, FixKind, Issue, IssueCategory, Severity};
use crate::resolver::resolve_relative_link;
use crate::scanners::{line_number, ImportedSymbol, Resolution, ScanResult, Scanner};

static MD_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]+)\)").expect("valid regex"));

pub struct MarkdownScanner;

impl Scanner for MarkdownScanner {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".md", ".mdx"]
    }

    fn scan(
        &self,
        files: &[PathBuf],
        _all_files: &[PathBuf],
        _config: &SweepConfig,
    ) -> Result<ScanResult> {
        let mut result = ScanResult {
            files: files.to_vec(),
            ..Default::default()
        };

        for file in files {
            scan_file(file, &mut result);
        }
        Ok(result)
    }
}

fn scan_file(file: &Path, result: &mut ScanResult) {
    let content = match std::fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(file = %file.display(), "cannot read markdown file: {e}");
            return;
        }
    };

    for cap in MD_LINK_RE.captures_iter(&content) {
        let link_text = &cap[1];
        let link_path = &cap[2];

        if link_path.starts_with("http://")
            || link_path.starts_with("https://")
            || link_path.starts_with('#')
            || link_path.starts_with("mailto:")
        {
            continue;
        }

        // "file.md#section" points at file.md
        let clean_path = link_path.split('#').next().unwrap_or("");
        if clean_path.is_empty() {
            continue;
        }

        let offset = cap.get(0).map(|m| m.start()).unwrap_or(0);
        let line = line_number(&content, offset);
        let resolved = resolve_relative_link(clean_path, file);

        result.imports.push(ImportedSymbol {
            name: link_text.to_string(),
            from_module: clean_path.to_string(),
            file: file.to_path_buf(),
            line: Some(line),
            resolved: resolved
                .clone()
                .map(Resolution::Local)
                .unwrap_or(Resolution::Unresolved),
        });

        if resolved.is_none() {
            result.issues.push(
                Issue::new(
                    IssueCategory::DocDrift,
                    Severity::Error,
                    file,
                    format!("Link [{link_text}]({link_path}) points to non-existent file"),
                    Action::Update,
                )
                .with_line(line)
                .with_fix(Fix {
                    kind: FixKind::RemoveLink,
                    target: cap[0].to_string(),
                    replacement: None,
                }),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broken_links_are_doc_drift_and_valid_links_pass() {
        let td = tempfile::tempdir().unwrap();
        let readme = td.path().join("README.md");
        let guide = td.path().join("guide.md");
        std::fs::write(&guide, "See [readme](README.md).\n").unwrap();
        std::fs::write(
            &readme,
            "[guide](guide.md)\n[missing](nonexistent.md)\n[site](https://example.com)\n[top](#top)\n[anchored](guide.md#intro)\n",
        )
        .unwrap();

        let config = SweepConfig::default();
        let files = vec![readme.clone(), guide];
        let result = MarkdownScanner.scan(&files.clone(), &files, &config).unwrap();

        let drift: Vec<_> = result
            .issues
            .iter()
            .filter(|i| i.category == IssueCategory::DocDrift)
            .collect();
        assert_eq!(drift.len(), 1);
        assert!(drift[0].message.contains("nonexistent.md"));
        assert_eq!(drift[0].fix.as_ref().unwrap().target, "[missing](nonexistent.md)");
        // Anchored link resolved to guide.md, not treated as broken
        assert!(result
            .imports
            .iter()
            .any(|i| i.from_module == "guide.md" && i.resolved != Resolution::Unresolved));
    }
}
