//! Fix executors for `codesweep clean`. Each cleaner performs one narrowly
//! scoped edit and reports whether anything changed.

use thiserror::Error;

pub mod files;
pub mod imports;
pub mod links;

pub use files::delete_file;
pub use imports::remove_import_line;
pub use links::remove_broken_link;

use crate::report::{Action, FixKind, Issue};

#[derive(Debug, Error)]
pub enum FixError {
    #[error("file no longer exists: {0}")]
    FileMissing(String),

    #[error("no write permission for {0}")]
    ReadOnly(String),

    #[error("issue has an update action but no fix attached")]
    MissingFix,

    #[error("fix kind {0:?} is advisory and cannot be applied automatically")]
    Unsupported(FixKind),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Pattern(#[from] regex::Error),
}

/// Apply the fix recorded on an issue. Returns whether a change was made
/// (dry runs report what would change without touching the file).
pub fn execute_fix(issue: &Issue, dry_run: bool) -> Result<bool, FixError> {
    match issue.action {
        Action::Delete => delete_file(&issue.file, dry_run),
        Action::Update => {
            let fix = issue.fix.as_ref().ok_or(FixError::MissingFix)?;
            match fix.kind {
                FixKind::RemoveImport => remove_import_line(&issue.file, &fix.target, dry_run),
                FixKind::RemoveLink => remove_broken_link(&issue.file, &fix.target, dry_run),
                FixKind::RemoveDependency | FixKind::Custom => {
                    Err(FixError::Unsupported(fix.kind))
                }
            }
        }
        Action::Skip => Ok(false),
    }
}
