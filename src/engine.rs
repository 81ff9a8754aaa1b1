// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Scan Engine
 * Fan-out/fan-in orchestration of the probe registry
 *
 * Pipeline: validate input -> liveness check -> baseline fetch ->
 * redirect guard -> linkage filter -> concurrent probe dispatch ->
 * severity resolution -> ordered aggregation.
 *
 * Every eligible probe runs as its own task against the shared context.
 * The join waits for all of them to reach a terminal state; one probe's
 * error or panic never removes or delays any other probe's entry. The
 * report is assembled only after everything has settled, in registry
 * order, never in completion order.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ScanOptions;
use crate::errors::ScanError;
use crate::http_client::HttpClient;
use crate::linkage;
use crate::probes::ProbeOutcome;
use crate::registry::{ProbeDescriptor, ProbeRegistry};
use crate::report::{ReportEntry, ScanReport, SCAN_FAILED_MESSAGE};
use crate::severity;
use crate::target::{self, TargetContext};

/// Last-resort message when a successful outcome carries no messages
const NO_FINDINGS_FALLBACK: &str = "No findings reported";

pub struct ScanEngine {
    http_client: Arc<HttpClient>,
    registry: Arc<ProbeRegistry>,
}

impl ScanEngine {
    pub fn new(http_client: Arc<HttpClient>, registry: Arc<ProbeRegistry>) -> Self {
        Self {
            http_client,
            registry,
        }
    }

    /// Run one complete scan. Always returns a well-formed report:
    /// scan-level failures land in `error` with an empty result, never
    /// as a raw error to the caller.
    pub async fn scan(&self, options: &ScanOptions) -> ScanReport {
        match self.scan_inner(options).await {
            Ok(entries) => ScanReport::completed(entries),
            Err(e) => {
                warn!("Scan aborted: {}", e);
                ScanReport::failed(e.report_message())
            }
        }
    }

    async fn scan_inner(&self, options: &ScanOptions) -> Result<Vec<ReportEntry>, ScanError> {
        let url = options.parse_url()?;

        self.check_liveness(&url).await?;

        let linked = linkage::is_linked(options.email(), url.host_str().unwrap_or_default());
        debug!(
            "Linkage for {}: {}",
            url.host_str().unwrap_or_default(),
            linked
        );

        let fetched = target::fetch_target_resources(&self.http_client, &url).await?;
        let ctx = target::build_context(url, fetched, linked)?;

        Ok(self.execute_probes(ctx).await)
    }

    /// Quick HEAD to the origin before committing to the full probe
    /// fan-out. Anything but a 2xx means the target is not scannable.
    async fn check_liveness(&self, url: &Url) -> Result<(), ScanError> {
        let origin = url.origin().ascii_serialization();
        match self.http_client.head(&origin).await {
            Ok(response) if (200..300).contains(&response.status_code) => Ok(()),
            Ok(response) => {
                warn!("Liveness check of {} returned {}", origin, response.status_code);
                Err(ScanError::TargetUnreachable { url: origin })
            }
            Err(e) => {
                warn!("Liveness check of {} failed: {:#}", origin, e);
                Err(ScanError::TargetUnreachable { url: origin })
            }
        }
    }

    /// Dispatch all eligible probes concurrently and wait for every one
    /// of them to settle, then aggregate in registry order.
    async fn execute_probes(&self, ctx: Arc<TargetContext>) -> Vec<ReportEntry> {
        let eligible: Vec<usize> = self
            .registry
            .descriptors()
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.requires_linkage || ctx.linked)
            .map(|(idx, _)| idx)
            .collect();

        info!(
            "Dispatching {} of {} probes against {}",
            eligible.len(),
            self.registry.len(),
            ctx.origin()
        );

        // Each probe runs as its own task so a panic is contained by the
        // join handle instead of tearing down sibling probes.
        let handles: Vec<_> = eligible
            .iter()
            .map(|&idx| {
                let registry = Arc::clone(&self.registry);
                let ctx = Arc::clone(&ctx);
                tokio::spawn(async move { registry.descriptors()[idx].probe.run(&ctx).await })
            })
            .collect();

        let settled = join_all(handles).await;

        eligible
            .into_iter()
            .zip(settled)
            .map(|(idx, joined)| {
                let descriptor = &self.registry.descriptors()[idx];
                let outcome = match joined {
                    Ok(Ok(outcome)) => Some(outcome),
                    Ok(Err(e)) => {
                        warn!("Probe '{}' failed: {:#}", descriptor.name, e);
                        None
                    }
                    Err(e) => {
                        warn!("Probe '{}' panicked: {}", descriptor.name, e);
                        None
                    }
                };
                Self::build_entry(descriptor, outcome)
            })
            .collect()
    }

    /// One report entry per eligible probe: resolved severity, success
    /// flag, and a never-empty message list.
    fn build_entry(descriptor: &ProbeDescriptor, outcome: Option<ProbeOutcome>) -> ReportEntry {
        let resolved = severity::resolve(descriptor.severity, outcome.as_ref());

        match outcome {
            Some(outcome) => {
                let messages = if outcome.messages.is_empty() {
                    vec![NO_FINDINGS_FALLBACK.to_string()]
                } else {
                    outcome.messages
                };
                ReportEntry {
                    name: descriptor.name.to_string(),
                    severity: resolved,
                    success: true,
                    found: outcome.found,
                    messages,
                }
            }
            None => ReportEntry {
                name: descriptor.name.to_string(),
                severity: resolved,
                success: false,
                found: false,
                messages: vec![SCAN_FAILED_MESSAGE.to_string()],
            },
        }
    }
}
