//! Report rendering. The console reporter produces the human-readable
//! sectioned view; the JSON reporter preserves every field for tooling.

pub mod console;
pub mod json;

pub use console::ConsoleReporter;
pub use json::JsonReporter;

use crate::report::ScanReport;

pub trait Reporter {
    fn name(&self) -> &'static str;

    fn render(&self, report: &ScanReport) -> String;
}
