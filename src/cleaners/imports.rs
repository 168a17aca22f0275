//! Import line removal with precise per-language matching, so targeting
//! `util` never removes an import of `utilHelper`.

use regex::Regex;
use std::path::Path;

use crate::cleaners::FixError;

pub fn remove_import_line(
    file: &Path,
    target_module: &str,
    dry_run: bool,
) -> Result<bool, FixError> {
    if dry_run {
        tracing::info!(
            "[dry run] would remove import of '{target_module}' from {}",
            file.display()
        );
        return Ok(true);
    }

    let content = std::fs::read_to_string(file)?;
    let escaped = regex::escape(target_module);

    let python_from = Regex::new(&format!(r"^\s*from\s+{escaped}\s+import\b"))?;
    let python_import = Regex::new(&format!(
        r"^\s*import\s+{escaped}\s*$|^\s*import\s+{escaped}\s*,|^\s*import\s+{escaped}\s+as\b"
    ))?;
    let js_quoted = Regex::new(&format!(r#"['"]{escaped}['"]"#))?;

    let filtered: Vec<&str> = content
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if python_from.is_match(trimmed) || python_import.is_match(trimmed) {
                return false;
            }
            // JS/TS: only drop lines where the module is an exact quoted string
            if js_quoted.is_match(trimmed)
                && (trimmed.starts_with("import ") || trimmed.contains("require("))
            {
                return false;
            }
            true
        })
        .collect();

    let line_count = content.lines().count();
    if filtered.len() == line_count {
        return Ok(false);
    }

    let mut updated = filtered.join("\n");
    if content.ends_with('\n') {
        updated.push('\n');
    }
    std::fs::write(file, updated)?;
    tracing::info!("removed import of '{target_module}' from {}", file.display());
    Ok(true)
}
