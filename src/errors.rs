// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Scan Error Types
 * Scan-level error taxonomy with thiserror
 *
 * Only scan-level failures live here: invalid input, unreachable target,
 * cross-domain redirect, baseline fetch failure. Per-probe failures are
 * contained by the orchestrator and never become a ScanError.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use thiserror::Error;

/// Errors that abort a whole scan before or during the baseline phase.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Malformed or missing invocation input; no network activity happened
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Baseline liveness check failed
    #[error("Target is not reachable: {url}")]
    TargetUnreachable { url: String },

    /// Baseline fetch landed on a different registrable domain
    #[error("URL redirected to a different domain: {landed}")]
    RedirectedToForeignDomain { requested: String, landed: String },

    /// Baseline body/headers could not be obtained
    #[error("Failed to retrieve target resources: {reason}")]
    ResourceFetchFailed { reason: String },
}

impl ScanError {
    /// Stable error string for the report schema and the submission
    /// payload. Detail stays in logs; the wire message is fixed.
    pub fn report_message(&self) -> String {
        match self {
            ScanError::InvalidInput(reason) => format!("Invalid input: {}", reason),
            ScanError::TargetUnreachable { .. } => "Target is not reachable".to_string(),
            ScanError::RedirectedToForeignDomain { .. } => {
                "URL redirected to a different domain".to_string()
            }
            ScanError::ResourceFetchFailed { .. } => {
                "Failed to retrieve target resources".to_string()
            }
        }
    }
}
