// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Probe Registry
 * Immutable, ordered catalogue of probe descriptors
 *
 * Registration order is authoritative: the final report lists entries in
 * exactly this order (restricted to eligible probes), regardless of
 * completion order. Built once at startup, never mutated during a scan.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::sync::Arc;

use crate::http_client::HttpClient;
use crate::probes::{
    EmailExposureProbe, ExposedConfigsProbe, FileTraversalProbe, HttpUpgradeProbe,
    OutdatedSoftwareProbe, Probe, SshProbe, UsageLeakProbe, WordPressProbe,
};
use crate::severity::Severity;

/// One registered probe: stable name, default severity, linkage gate,
/// and the callable itself.
pub struct ProbeDescriptor {
    pub name: &'static str,
    pub severity: Severity,
    pub requires_linkage: bool,
    pub probe: Box<dyn Probe>,
}

impl ProbeDescriptor {
    pub fn new(name: &'static str, severity: Severity, probe: Box<dyn Probe>) -> Self {
        Self {
            name,
            severity,
            requires_linkage: false,
            probe,
        }
    }

    pub fn requiring_linkage(mut self) -> Self {
        self.requires_linkage = true;
        self
    }
}

pub struct ProbeRegistry {
    descriptors: Vec<ProbeDescriptor>,
}

impl ProbeRegistry {
    pub fn new(descriptors: Vec<ProbeDescriptor>) -> Self {
        debug_assert!(
            {
                let mut names: Vec<_> = descriptors.iter().map(|d| d.name).collect();
                names.sort_unstable();
                names.windows(2).all(|w| w[0] != w[1])
            },
            "probe names must be unique"
        );
        Self { descriptors }
    }

    /// The standard probe lineup, in report order.
    pub fn standard(http_client: Arc<HttpClient>) -> Self {
        Self::new(vec![
            ProbeDescriptor::new(
                "WordPress Detection",
                Severity::Minor,
                Box::new(WordPressProbe::new(Arc::clone(&http_client))),
            ),
            ProbeDescriptor::new(
                "File Traversal",
                Severity::Critical,
                Box::new(FileTraversalProbe::new(Arc::clone(&http_client))),
            ),
            ProbeDescriptor::new(
                "Software Usage Leaks",
                Severity::Info,
                Box::new(UsageLeakProbe::new()),
            ),
            ProbeDescriptor::new(
                "Outdated Software",
                Severity::Moderate,
                Box::new(OutdatedSoftwareProbe::new(Arc::clone(&http_client))),
            ),
            ProbeDescriptor::new(
                "HTTP Upgrade",
                Severity::High,
                Box::new(HttpUpgradeProbe::new(Arc::clone(&http_client))),
            ),
            ProbeDescriptor::new(
                "Email Address Detection",
                Severity::Minor,
                Box::new(EmailExposureProbe::new()),
            ),
            ProbeDescriptor::new(
                "Exposed Configurations",
                Severity::Critical,
                Box::new(ExposedConfigsProbe::new(Arc::clone(&http_client))),
            ),
            ProbeDescriptor::new("SSH Configuration", Severity::High, Box::new(SshProbe::new()))
                .requiring_linkage(),
        ])
    }

    pub fn descriptors(&self) -> &[ProbeDescriptor] {
        &self.descriptors
    }

    /// Descriptors eligible for a scan: linkage-gated probes only when
    /// the context is linked.
    pub fn eligible(&self, linked: bool) -> Vec<&ProbeDescriptor> {
        self.descriptors
            .iter()
            .filter(|d| !d.requires_linkage || linked)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
