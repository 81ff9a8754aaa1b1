// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Probe Modules
 * Individual misconfiguration checks and the probe contract
 *
 * A probe is one independent vulnerability check. Every probe receives
 * the full shared TargetContext and consumes whichever subset of
 * {url, body, headers} it needs. A probe either returns a ProbeOutcome
 * or fails; failures are isolated by the orchestrator and never affect
 * sibling probes.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use anyhow::Result;

use crate::target::TargetContext;

pub mod email_exposure;
pub mod exposed_configs;
pub mod http_upgrade;
pub mod outdated;
pub mod ssh;
pub mod traversal;
pub mod usage_leak;
pub mod wordpress;

pub use email_exposure::EmailExposureProbe;
pub use exposed_configs::ExposedConfigsProbe;
pub use http_upgrade::HttpUpgradeProbe;
pub use outdated::OutdatedSoftwareProbe;
pub use ssh::SshProbe;
pub use traversal::FileTraversalProbe;
pub use usage_leak::UsageLeakProbe;
pub use wordpress::WordPressProbe;

/// What a probe reports on success.
///
/// `messages` may be empty here; the aggregator substitutes the probe's
/// sentinel or the failure fallback so the final report never carries an
/// empty message list. `critical` asks the severity resolver to escalate
/// this entry to the top of the scale.
#[derive(Debug, Clone, Default)]
pub struct ProbeOutcome {
    pub found: bool,
    pub messages: Vec<String>,
    pub critical: bool,
}

impl ProbeOutcome {
    /// Nothing found; the given sentinel becomes the single message.
    pub fn clean(sentinel: &str) -> Self {
        Self {
            found: false,
            messages: vec![sentinel.to_string()],
            critical: false,
        }
    }

    /// Findings with messages, no severity escalation.
    pub fn findings(messages: Vec<String>) -> Self {
        Self {
            found: true,
            messages,
            critical: false,
        }
    }
}

/// A single misconfiguration check.
///
/// Implementations must not mutate the context, must route any extra
/// network calls through the shared HttpClient (individually
/// timeout-bounded), and must degrade a failed sub-request to "not
/// found" rather than failing the whole probe.
#[async_trait::async_trait]
pub trait Probe: Send + Sync {
    async fn run(&self, ctx: &TargetContext) -> Result<ProbeOutcome>;
}
