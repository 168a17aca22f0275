use std::path::{Path, PathBuf};

use codesweep::commands::{run_clean, run_scan, CleanOptions, ScanOptions};
use codesweep::report::{Action, IssueCategory};

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

#[test]
fn auto_clean_deletes_dead_files_and_keeps_live_ones() {
    let td = tempfile::tempdir().unwrap();
    copy_tree(&fixture("python-project"), td.path());
    let root = td.path().canonicalize().unwrap();

    let report = run_scan(&root, &ScanOptions::default()).unwrap();
    assert!(report
        .issues
        .iter()
        .any(|i| i.category == IssueCategory::DeadFile && i.action == Action::Delete));

    let (fixed, failed) = run_clean(
        &report,
        &CleanOptions {
            dry_run: false,
            auto: true,
        },
    )
    .unwrap();
    assert!(fixed >= 1);
    assert_eq!(failed, 0);

    assert!(!root.join("app/dead_helper.py").exists());
    assert!(root.join("main.py").exists());
    assert!(root.join("app/auth.py").exists());
    assert!(root.join("app/database.py").exists());

    // Backups are discarded after a fully successful run
    assert!(!root.join(".codesweep-backup").exists());
}

#[test]
fn dry_run_clean_leaves_the_tree_untouched() {
    let td = tempfile::tempdir().unwrap();
    copy_tree(&fixture("python-project"), td.path());
    let root = td.path().canonicalize().unwrap();

    let report = run_scan(&root, &ScanOptions::default()).unwrap();
    run_clean(
        &report,
        &CleanOptions {
            dry_run: true,
            auto: true,
        },
    )
    .unwrap();

    assert!(root.join("app/dead_helper.py").exists());
    assert!(!root.join(".codesweep-backup").exists());
}

#[test]
fn broken_markdown_link_is_rewritten_to_plain_text() {
    let td = tempfile::tempdir().unwrap();
    copy_tree(&fixture("docs-project"), td.path());
    let root = td.path().canonicalize().unwrap();

    let report = run_scan(&root, &ScanOptions::default()).unwrap();
    let (fixed, failed) = run_clean(
        &report,
        &CleanOptions {
            dry_run: false,
            auto: true,
        },
    )
    .unwrap();
    assert!(fixed >= 3);
    assert_eq!(failed, 0);

    let readme = std::fs::read_to_string(root.join("README.md")).unwrap();
    assert!(!readme.contains("](docs/nonexistent.md)"));
    assert!(readme.contains("missing page"));
    // Valid links survive
    assert!(readme.contains("](docs/guide.md)"));
    assert!(readme.contains("https://example.com/page"));
}
