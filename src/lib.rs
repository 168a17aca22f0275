//! codesweep: dead code detector and codebase hygiene tool.
//!
//! Builds a cross-file dependency graph from lightweight regex scanners,
//! flags files nothing imports, stale references, unused dependencies and
//! documentation drift, and can apply the corresponding fixes with backups.

pub mod adapter;
pub mod backup;
pub mod cleaners;
pub mod commands;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod graph;
pub mod ignore;
pub mod report;
pub mod reporters;
pub mod resolver;
pub mod scanners;

pub use adapter::{scan_project, ScanProjectOptions};
pub use backup::BackupManager;
pub use config::{generate_default_config, load_config, SweepConfig};
pub use discovery::{discover_files, filter_by_extensions};
pub use engine::ScanOrchestrator;
pub use graph::DependencyGraph;
pub use report::{
    Action, Confidence, Fix, FixKind, Issue, IssueCategory, ScanReport, ScanStats, Severity,
};
pub use reporters::{ConsoleReporter, JsonReporter, Reporter};
