//! JSON report output. Paths are rewritten relative to the root so reports
//! stay portable; every issue field survives for downstream tooling.

use crate::report::ScanReport;
use crate::reporters::Reporter;

pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn render(&self, report: &ScanReport) -> String {
        let relative = report.relative();
        serde_json::to_string_pretty(&relative)
            .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize report: {e}\"}}"))
    }
}
