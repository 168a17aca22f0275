//! Extra ignore patterns loaded from `.codesweepignore` in the project root.
//! Lines use glob syntax, `#` starts a comment. Only the project's own ignore
//! file is read so scans stay deterministic across machines.

use std::path::Path;

pub const IGNORE_FILE: &str = ".codesweepignore";

pub fn load_ignore_patterns(root: &Path) -> Vec<String> {
    let path = root.join(IGNORE_FILE);
    if !path.exists() {
        return Vec::new();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect(),
        Err(e) => {
            // Do not fail hard on an unreadable ignore file
            tracing::warn!(path = %path.display(), "cannot read ignore file: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments_and_blank_lines() {
        let td = tempfile::tempdir().unwrap();
        std::fs::write(
            td.path().join(IGNORE_FILE),
            "# generated artefacts\n\n**/generated/**\n  *.snap  \n",
        )
        .unwrap();

        let patterns = load_ignore_patterns(td.path());
        assert_eq!(patterns, vec!["**/generated/**".to_string(), "*.snap".to_string()]);
    }

    #[test]
    fn missing_file_yields_no_patterns() {
        let td = tempfile::tempdir().unwrap();
        assert!(load_ignore_patterns(td.path()).is_empty());
    }
}
