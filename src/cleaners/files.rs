//! Dead file deletion with pre-flight checks.

use std::path::Path;

use crate::cleaners::FixError;

pub fn delete_file(file: &Path, dry_run: bool) -> Result<bool, FixError> {
    if dry_run {
        tracing::info!("[dry run] would delete: {}", file.display());
        return Ok(true);
    }

    if !file.exists() {
        return Err(FixError::FileMissing(file.display().to_string()));
    }
    let readonly = std::fs::metadata(file)
        .map(|m| m.permissions().readonly())
        .unwrap_or(false);
    if readonly {
        return Err(FixError::ReadOnly(file.display().to_string()));
    }

    std::fs::remove_file(file)?;
    tracing::info!("deleted: {}", file.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deletes_existing_file() {
        let td = tempfile::tempdir().unwrap();
        let file = td.path().join("dead.py");
        std::fs::write(&file, "x\n").unwrap();

        assert!(delete_file(&file, false).unwrap());
        assert!(!file.exists());
    }

    #[test]
    fn dry_run_leaves_file_in_place() {
        let td = tempfile::tempdir().unwrap();
        let file = td.path().join("dead.py");
        std::fs::write(&file, "x\n").unwrap();

        assert!(delete_file(&file, true).unwrap());
        assert!(file.exists());
    }

    #[test]
    fn missing_file_is_an_error() {
        let td = tempfile::tempdir().unwrap();
        let result = delete_file(&td.path().join("ghost.py"), false);
        assert!(matches!(result, Err(FixError::FileMissing(_))));
    }
}
