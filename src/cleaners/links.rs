//! Broken markdown link removal. The link is replaced by its display text,
//! and only the first occurrence is touched so duplicate links elsewhere in
//! the file survive.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::cleaners::FixError;

static LINK_TEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]*)\]").expect("valid regex"));

pub fn remove_broken_link(
    file: &Path,
    link_markdown: &str,
    dry_run: bool,
) -> Result<bool, FixError> {
    if dry_run {
        tracing::info!("[dry run] would remove broken link from {}", file.display());
        return Ok(true);
    }

    let content = std::fs::read_to_string(file)?;
    let replacement = LINK_TEXT_RE
        .captures(link_markdown)
        .map(|cap| cap[1].to_string())
        .unwrap_or_default();

    let Some(idx) = content.find(link_markdown) else {
        return Ok(false);
    };

    let mut updated = String::with_capacity(content.len());
    updated.push_str(&content[..idx]);
    updated.push_str(&replacement);
    updated.push_str(&content[idx + link_markdown.len()..]);

    std::fs::write(file, updated)?;
    tracing::info!("fixed broken link in {}", file.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_link_with_its_text() {
        let td = tempfile::tempdir().unwrap();
        let file = td.path().join("README.md");
        std::fs::write(&file, "See [the guide](missing.md) for details.\n").unwrap();

        assert!(remove_broken_link(&file, "[the guide](missing.md)", false).unwrap());
        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "See the guide for details.\n"
        );
    }

    #[test]
    fn only_first_occurrence_is_removed() {
        let td = tempfile::tempdir().unwrap();
        let file = td.path().join("README.md");
        std::fs::write(&file, "[x](gone.md) and again [x](gone.md)\n").unwrap();

        remove_broken_link(&file, "[x](gone.md)", false).unwrap();
        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "x and again [x](gone.md)\n"
        );
    }

    #[test]
    fn absent_link_reports_no_change() {
        let td = tempfile::tempdir().unwrap();
        let file = td.path().join("README.md");
        std::fs::write(&file, "plain text\n").unwrap();
        assert!(!remove_broken_link(&file, "[x](gone.md)", false).unwrap());
    }
}
