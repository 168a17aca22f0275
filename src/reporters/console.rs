//! Plain-text console report: issues grouped by category in a fixed order,
//! then a summary block.

use std::fmt::Write as _;

use crate::report::{IssueCategory, ScanReport, Severity};
use crate::reporters::Reporter;

pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn name(&self) -> &'static str {
        "console"
    }

    fn render(&self, report: &ScanReport) -> String {
        let mut out = String::with_capacity(2048);
        out.push_str("\n=== codesweep scan report ===\n\n");

        if report.issues.is_empty() {
            out.push_str("  No issues found. Your codebase is clean.\n\n");
            return out;
        }

        let mut section = 1;
        for category in IssueCategory::ORDER {
            let issues: Vec<_> = report
                .issues
                .iter()
                .filter(|i| i.category == category)
                .collect();
            if issues.is_empty() {
                continue;
            }

            let _ = writeln!(out, "{section}. {} ({})", category.title(), issues.len());
            for issue in &issues {
                let rel = issue
                    .file
                    .strip_prefix(&report.root_dir)
                    .unwrap_or(&issue.file);
                let location = match issue.line {
                    Some(line) => format!("{}:{line}", rel.display()),
                    None => rel.display().to_string(),
                };
                let badge = issue
                    .confidence
                    .map(|c| format!(" {}", c.badge()))
                    .unwrap_or_default();
                let _ = writeln!(
                    out,
                    "  {} {location} -- {}{badge}",
                    issue.severity.marker(),
                    issue.message
                );
            }
            out.push('\n');
            section += 1;
        }

        let errors = report.count_severity(Severity::Error);
        let warnings = report.count_severity(Severity::Warning);
        let infos = report.count_severity(Severity::Info);

        out.push_str("--- summary ---\n");
        let _ = writeln!(out, "Files scanned: {}", report.stats.files_scanned);
        let _ = writeln!(out, "Total issues:  {}", report.issues.len());
        let _ = writeln!(out, "  X errors:   {errors}");
        let _ = writeln!(out, "  ! warnings: {warnings}");
        let _ = writeln!(out, "  i info:     {infos}");
        let _ = writeln!(out, "Duration: {}ms", report.duration_ms);

        if errors > 0 || warnings > 0 {
            out.push_str("\nRun `codesweep clean` to interactively fix these issues.\n");
        }
        out
    }
}
