use std::path::{Path, PathBuf};

use codesweep::commands::{run_report, run_scan, ScanOptions};
use codesweep::report::{IssueCategory, ScanReport};
use codesweep::reporters::{JsonReporter, Reporter};
use codesweep::{scan_project, ScanProjectOptions};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn copy_tree(from: &Path, to: &Path) {
    std::fs::create_dir_all(to).unwrap();
    for entry in std::fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let dest = to.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_tree(&entry.path(), &dest);
        } else {
            std::fs::copy(entry.path(), &dest).unwrap();
        }
    }
}

fn scan_fixture(name: &str) -> (tempfile::TempDir, ScanReport) {
    let td = tempfile::tempdir().unwrap();
    copy_tree(&fixture(name), td.path());
    let report = scan_project(td.path(), &ScanProjectOptions::default()).unwrap();
    (td, report)
}

fn files_in_category(report: &ScanReport, category: IssueCategory) -> Vec<String> {
    report
        .issues
        .iter()
        .filter(|i| i.category == category)
        .map(|i| i.file.to_string_lossy().replace('\\', "/"))
        .collect()
}

#[test]
fn python_project_finds_dead_helper_and_unused_requirement() {
    let (_td, report) = scan_fixture("python-project");

    let dead = files_in_category(&report, IssueCategory::DeadFile);
    assert!(dead.iter().any(|f| f.ends_with("app/dead_helper.py")), "dead: {dead:?}");
    assert!(!dead.iter().any(|f| f.ends_with("main.py")));
    assert!(!dead.iter().any(|f| f.ends_with("app/auth.py")));
    assert!(!dead.iter().any(|f| f.ends_with("app/database.py")));

    let unused_dep = report
        .issues
        .iter()
        .find(|i| i.category == IssueCategory::UnusedDependency)
        .expect("unused-package should be reported");
    assert!(unused_dep.message.contains("unused-package"), "{}", unused_dep.message);
    assert!(
        !report
            .issues
            .iter()
            .any(|i| i.category == IssueCategory::UnusedDependency
                && i.message.contains("requests")),
        "requests is imported by app/database.py"
    );
}

#[test]
fn react_project_finds_orphans_and_unused_lib() {
    let (_td, report) = scan_fixture("react-project");

    let dead = files_in_category(&report, IssueCategory::DeadFile);
    assert!(dead.iter().any(|f| f.ends_with("OrphanedComponent.ts")), "dead: {dead:?}");
    assert!(dead.iter().any(|f| f.ends_with("useOldFeature.ts")));
    assert!(!dead.iter().any(|f| f.ends_with("App.ts")));
    assert!(!dead.iter().any(|f| f.ends_with("Header.ts")));
    assert!(!dead.iter().any(|f| f.ends_with("useAuth.ts")));

    let dep_messages: Vec<&str> = report
        .issues
        .iter()
        .filter(|i| i.category == IssueCategory::UnusedDependency)
        .map(|i| i.message.as_str())
        .collect();
    assert!(dep_messages.iter().any(|m| m.contains("unused-lib")), "{dep_messages:?}");
    assert!(!dep_messages.iter().any(|m| m.contains("react")));
    assert!(!dep_messages.iter().any(|m| m.contains("typescript")));
}

#[test]
fn docs_project_flags_only_broken_links() {
    let (_td, report) = scan_fixture("docs-project");

    let drift: Vec<&codesweep::Issue> = report
        .issues
        .iter()
        .filter(|i| i.category == IssueCategory::DocDrift)
        .collect();
    assert_eq!(drift.len(), 3, "{drift:?}");
    let messages: Vec<&str> = drift.iter().map(|i| i.message.as_str()).collect();
    assert!(messages.iter().any(|m| m.contains("nonexistent.md")));
    assert!(messages.iter().any(|m| m.contains("api.md")));
    assert!(messages.iter().any(|m| m.contains("notes.md")));
    assert!(!messages.iter().any(|m| m.contains("example.com")));
    assert!(!messages.iter().any(|m| m.contains("README.md")));
}

#[test]
fn only_flag_restricts_scanner_families() {
    let td = tempfile::tempdir().unwrap();
    copy_tree(&fixture("python-project"), td.path());
    std::fs::write(td.path().join("notes.md"), "[gone](missing.md)\n").unwrap();

    let report = scan_project(
        td.path(),
        &ScanProjectOptions {
            only: Some("docs".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    // Only the markdown scanner ran: python-side categories must be absent
    assert!(!report.issues.iter().any(|i| matches!(
        i.category,
        IssueCategory::DeadFile | IssueCategory::UnusedDependency | IssueCategory::UnusedExport
    )));
    let drift = report
        .issues
        .iter()
        .filter(|i| i.category == IssueCategory::DocDrift)
        .count();
    assert_eq!(drift, 1);
}

#[test]
fn ghost_env_example_key_surfaces_as_stale_reference() {
    let td = tempfile::tempdir().unwrap();
    std::fs::write(
        td.path().join(".env.example"),
        "DATABASE_URL=postgres://localhost/app\nGHOST_KEY=1\n",
    )
    .unwrap();
    std::fs::write(
        td.path().join("settings.py"),
        "import os\nurl = os.environ['DATABASE_URL']\n",
    )
    .unwrap();

    let report = scan_project(td.path(), &ScanProjectOptions::default()).unwrap();
    let stale: Vec<&str> = report
        .issues
        .iter()
        .filter(|i| i.category == IssueCategory::StaleReference)
        .map(|i| i.message.as_str())
        .collect();
    assert!(stale.iter().any(|m| m.contains("GHOST_KEY")), "{stale:?}");
    assert!(!stale.iter().any(|m| m.contains("DATABASE_URL")));
}

#[test]
fn cached_report_round_trips_through_run_report() {
    let td = tempfile::tempdir().unwrap();
    copy_tree(&fixture("python-project"), td.path());

    let report = run_scan(td.path(), &ScanOptions::default()).unwrap();
    report.save_cache().unwrap();

    let cached = run_report(td.path(), None)
        .unwrap()
        .expect("cache was just written");
    assert_eq!(cached.issues.len(), report.issues.len());
    assert_eq!(cached.stats.files_scanned, report.stats.files_scanned);
    assert!(cached
        .issues
        .iter()
        .any(|i| i.file.to_string_lossy().ends_with("dead_helper.py")));
}

#[test]
fn run_report_without_cache_returns_none() {
    let td = tempfile::tempdir().unwrap();
    assert!(run_report(td.path(), None).unwrap().is_none());
}

#[test]
fn json_reporter_emits_valid_relative_report() {
    let (_td, report) = scan_fixture("python-project");
    let rendered = JsonReporter.render(&report);
    let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert!(parsed["issues"].is_array());
    assert!(parsed["stats"]["files_scanned"].as_u64().unwrap() > 0);
}
