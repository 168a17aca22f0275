//! CLI command implementations: scan, clean, report, init.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::backup::BackupManager;
use crate::cleaners::execute_fix;
use crate::config::{self, load_config};
use crate::engine::ScanOrchestrator;
use crate::report::{Action, Issue, IssueCategory, ScanReport};

#[derive(Debug, Default, Clone)]
pub struct ScanOptions {
    pub only: Option<String>,
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CleanOptions {
    pub dry_run: bool,
    pub auto: bool,
}

/// Scan a directory and return the report.
pub fn run_scan(target_dir: &Path, options: &ScanOptions) -> Result<ScanReport> {
    let root = target_dir
        .canonicalize()
        .with_context(|| format!("resolve scan root {}", target_dir.display()))?;
    let config = load_config(&root, options.config_file.as_deref());
    let mut orchestrator = ScanOrchestrator::new(&config);
    orchestrator.scan(&config, options.only.as_deref())
}

/// Apply fixes for a report's actionable issues. Returns (fixed, failed).
pub fn run_clean(report: &ScanReport, options: &CleanOptions) -> Result<(usize, usize)> {
    let actionable: Vec<&Issue> =
        report.issues.iter().filter(|i| i.action != Action::Skip).collect();
    if actionable.is_empty() {
        println!("No actionable issues to clean.");
        return Ok((0, 0));
    }

    // Pre-flight: files may have moved since the scan
    let (valid, stale): (Vec<&Issue>, Vec<&Issue>) =
        actionable.into_iter().partition(|i| i.file.exists());
    if !stale.is_empty() {
        tracing::warn!("{} file(s) no longer exist since scan, skipping them", stale.len());
    }
    if valid.is_empty() {
        println!("All actionable files have been moved or deleted. Nothing to do.");
        return Ok((0, 0));
    }

    print_plan(report, &valid);

    if !options.auto && !options.dry_run && !confirm("Apply these fixes? [y/N] ")? {
        println!("Aborted. No files were changed.");
        return Ok((0, 0));
    }

    let mut backup = BackupManager::new(&report.root_dir);
    if !options.dry_run {
        for issue in &valid {
            if let Err(e) = backup.backup(&issue.file) {
                tracing::warn!(file = %issue.file.display(), "backup failed: {e:#}");
            }
        }
        tracing::info!("backed up {} files", backup.backed_up_count());
    }

    let mut fixed = 0;
    let mut failed = 0;
    for issue in &valid {
        match execute_fix(issue, options.dry_run) {
            Ok(true) => fixed += 1,
            Ok(false) => {}
            Err(e) => {
                tracing::error!(file = %issue.file.display(), "fix failed: {e}");
                failed += 1;
            }
        }
    }

    if !options.dry_run {
        if failed > 0 {
            tracing::warn!(
                "{failed} operation(s) failed; backups are preserved under {}/",
                crate::backup::BACKUP_DIR
            );
        } else {
            backup.cleanup();
        }
    }

    let suffix = if options.dry_run { " (dry run)" } else { "" };
    println!("Done: {fixed} fixed, {failed} failed{suffix}");
    Ok((fixed, failed))
}

fn print_plan(report: &ScanReport, issues: &[&Issue]) {
    let rel = |i: &Issue| {
        i.file
            .strip_prefix(&report.root_dir)
            .unwrap_or(&i.file)
            .display()
            .to_string()
    };
    let deletes: Vec<_> = issues.iter().filter(|i| i.action == Action::Delete).collect();
    let updates: Vec<_> = issues.iter().filter(|i| i.action == Action::Update).collect();

    println!("\nCleanup plan:");
    if !deletes.is_empty() {
        println!("DELETE ({} files):", deletes.len());
        for issue in deletes {
            println!("  x {} -- {}", rel(issue), issue.message);
        }
    }
    if !updates.is_empty() {
        println!("UPDATE ({} files):", updates.len());
        for issue in updates {
            println!("  ~ {} -- {}", rel(issue), issue.message);
        }
    }
    println!();
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    std::io::stdout().flush().context("flush stdout")?;
    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// Render the cached report, optionally drilling into one category.
pub fn run_report(root: &Path, detail: Option<&str>) -> Result<Option<ScanReport>> {
    let root = root
        .canonicalize()
        .with_context(|| format!("resolve project root {}", root.display()))?;
    let Some(report) = ScanReport::load_cached(&root)? else {
        tracing::warn!("no cached report found, run `codesweep scan` first");
        return Ok(None);
    };

    if let Some(name) = detail {
        let Some(category) = IssueCategory::from_cli_name(name) else {
            anyhow::bail!(
                "unknown category: {name} (available: dead-files, unused-exports, stale-refs, unused-deps, doc-drift, modularity)"
            );
        };
        print_detail(&report, category);
        return Ok(None);
    }

    Ok(Some(report))
}

fn print_detail(report: &ScanReport, category: IssueCategory) {
    let filtered: Vec<&Issue> =
        report.issues.iter().filter(|i| i.category == category).collect();
    if filtered.is_empty() {
        println!("No issues in category: {}", category.title());
        return;
    }

    println!("\n=== {} ({} issues) ===\n", category.title(), filtered.len());
    for issue in filtered {
        let rel = issue.file.strip_prefix(&report.root_dir).unwrap_or(&issue.file);
        let location = match issue.line {
            Some(line) => format!("{}:{line}", rel.display()),
            None => rel.display().to_string(),
        };
        println!("  {location}");
        println!("    {}", issue.message);
        if let Some(confidence) = issue.confidence {
            println!("    Confidence: {}", confidence.badge());
        }
        if let Some(reason) = &issue.reason {
            println!("    Reason: {reason}");
        }
        if let Some(trace) = &issue.trace {
            let route: Vec<String> = trace
                .iter()
                .map(|t| {
                    t.strip_prefix(&report.root_dir)
                        .unwrap_or(t)
                        .display()
                        .to_string()
                })
                .collect();
            println!("    Trace: {}", route.join(" -> "));
        }
        println!();
    }
}

/// Write a default `.codesweeprc.json`, refusing to overwrite an existing one.
pub fn run_init(root: &Path) -> Result<()> {
    let path = root.join(config::CONFIG_FILE);
    if path.exists() {
        tracing::warn!("{} already exists, leaving it untouched", path.display());
        return Ok(());
    }

    let mut content = config::generate_default_config();
    content.push('\n');
    std::fs::write(&path, content).with_context(|| format!("write {}", path.display()))?;
    println!("Created {}", path.display());
    println!("Edit this file to customize scanning behavior.");
    Ok(())
}
