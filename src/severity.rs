// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Severity Scale
 * Ordered severity levels and the single escalation rule
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use serde::{Deserialize, Serialize};

use crate::probes::ProbeOutcome;

/// Severity of a finding, ordered from least to most severe.
///
/// - `Info`: informational finding (no direct risk)
/// - `Minor`: low impact (e.g., information disclosure)
/// - `Moderate`: medium impact (e.g., CSRF, XSS)
/// - `High`: high impact (e.g., SQL injection)
/// - `Critical`: critical impact (e.g., RCE, file traversal)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Minor,
    Moderate,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Minor => write!(f, "minor"),
            Severity::Moderate => write!(f, "moderate"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Minor => "minor",
            Severity::Moderate => "moderate",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// Resolve the reported severity for one probe.
///
/// Starts from the probe's configured default. A successful outcome with
/// the critical flag set forces the severity to exactly `Critical`;
/// escalation is one-directional and never downgrades. A failed probe
/// (no outcome) keeps the configured default.
pub fn resolve(default: Severity, outcome: Option<&ProbeOutcome>) -> Severity {
    match outcome {
        Some(o) if o.critical => Severity::Critical,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_is_totally_ordered() {
        assert!(Severity::Info < Severity::Minor);
        assert!(Severity::Minor < Severity::Moderate);
        assert!(Severity::Moderate < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Severity::Moderate).unwrap(),
            "\"moderate\""
        );
        assert_eq!(
            serde_json::to_string(&Severity::Critical).unwrap(),
            "\"critical\""
        );
    }

    #[test]
    fn test_resolve_keeps_default_without_override() {
        let outcome = ProbeOutcome {
            found: true,
            messages: vec!["leak".into()],
            critical: false,
        };
        assert_eq!(
            resolve(Severity::Moderate, Some(&outcome)),
            Severity::Moderate
        );
    }

    #[test]
    fn test_resolve_escalates_to_critical() {
        let outcome = ProbeOutcome {
            found: true,
            messages: vec![],
            critical: true,
        };
        assert_eq!(resolve(Severity::High, Some(&outcome)), Severity::Critical);
        // Escalation never downgrades: a critical default stays critical.
        assert_eq!(
            resolve(Severity::Critical, Some(&outcome)),
            Severity::Critical
        );
    }

    #[test]
    fn test_resolve_failed_probe_keeps_default() {
        assert_eq!(resolve(Severity::High, None), Severity::High);
        assert_eq!(resolve(Severity::Info, None), Severity::Info);
    }
}
