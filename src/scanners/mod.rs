//! Scanner plugins: one per file family (python, javascript, markdown,
//! config, css). Each scanner extracts exported and imported symbols for the
//! dependency graph and raises issues it can judge on its own.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::SweepConfig;
use crate::report::Issue;

pub mod config;
pub mod css;
pub mod javascript;
pub mod markdown;
pub mod python;

pub use self::config::ConfigScanner;
pub use css::CssScanner;
pub use javascript::JavaScriptScanner;
pub use markdown::MarkdownScanner;
pub use python::PythonScanner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Class,
    Variable,
    Type,
    Default,
    Module,
}

impl SymbolKind {
    pub fn label(&self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Class => "class",
            SymbolKind::Variable => "variable",
            SymbolKind::Type => "type",
            SymbolKind::Default => "default",
            SymbolKind::Module => "module",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedSymbol {
    pub name: String,
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub line: Option<usize>,
    pub kind: SymbolKind,
}

/// Where an import specifier pointed after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// A file inside the project.
    Local(PathBuf),
    /// A package or stdlib module; never treated as broken.
    External,
    /// A relative/local reference that matched nothing.
    Unresolved,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportedSymbol {
    pub name: String,
    pub from_module: String,
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub line: Option<usize>,
    pub resolved: Resolution,
}

/// Output of a single scanner run.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub files: Vec<PathBuf>,
    pub exports: Vec<ExportedSymbol>,
    pub imports: Vec<ImportedSymbol>,
    pub issues: Vec<Issue>,
}

pub trait Scanner: Send + Sync {
    /// Unique name, also accepted by `--only`.
    fn name(&self) -> &'static str;

    /// File extensions routed to this scanner.
    fn extensions(&self) -> &'static [&'static str];

    /// Scan `files` (already filtered to this scanner's extensions).
    /// `all_files` is the full discovery result, for cross-file checks.
    fn scan(
        &self,
        files: &[PathBuf],
        all_files: &[PathBuf],
        config: &SweepConfig,
    ) -> Result<ScanResult>;
}

/// 1-based line number of a byte offset within `content`.
pub(crate) fn line_number(content: &str, byte_offset: usize) -> usize {
    content[..byte_offset.min(content.len())]
        .bytes()
        .filter(|b| *b == b'\n')
        .count()
        + 1
}
