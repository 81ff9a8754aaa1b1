// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Scan Report Types
 * Wire schema for scan results
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// Fallback message for a probe that failed to produce an outcome
pub const SCAN_FAILED_MESSAGE: &str = "Scan failed";

/// One line of the final report: the resolved result of a single probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub name: String,
    pub severity: Severity,
    pub success: bool,
    pub found: bool,
    pub messages: Vec<String>,
}

/// The complete scan output.
///
/// `error` is non-null only for scan-level aborts (invalid input,
/// unreachable target, cross-domain redirect, fetch failure); `result`
/// is empty in that case. Entries appear in registry order restricted to
/// the probes that were eligible to run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub result: Vec<ReportEntry>,
    pub error: Option<String>,
}

impl ScanReport {
    pub fn failed(error: String) -> Self {
        Self {
            result: Vec::new(),
            error: Some(error),
        }
    }

    pub fn completed(result: Vec<ReportEntry>) -> Self {
        Self {
            result,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_entry_serialization_shape() {
        let entry = ReportEntry {
            name: "WordPress Detection".to_string(),
            severity: Severity::Minor,
            success: true,
            found: false,
            messages: vec!["No WordPress vulnerabilities detected".to_string()],
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["name"], "WordPress Detection");
        assert_eq!(json["severity"], "minor");
        assert_eq!(json["success"], true);
        assert_eq!(json["found"], false);
        assert_eq!(json["messages"][0], "No WordPress vulnerabilities detected");
    }

    #[test]
    fn test_failed_report_has_empty_result() {
        let report = ScanReport::failed("URL redirected to a different domain".to_string());
        assert!(report.result.is_empty());
        assert_eq!(
            report.error.as_deref(),
            Some("URL redirected to a different domain")
        );
    }

    #[test]
    fn test_completed_report_has_no_error() {
        let report = ScanReport::completed(vec![]);
        assert!(report.error.is_none());
    }
}
