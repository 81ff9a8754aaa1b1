// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - HTTP Upgrade Probe
 * Checks whether plain-HTTP requests are redirected to HTTPS
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use anyhow::Result;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::http_client::HttpClient;
use crate::probes::{Probe, ProbeOutcome};
use crate::target::TargetContext;

const NO_FINDINGS: &str = "No HTTP upgrade issues detected";
const MISSING_UPGRADE: &str =
    "Security vulnerability: HTTP requests are not redirected to HTTPS";

pub struct HttpUpgradeProbe {
    http_client: Arc<HttpClient>,
}

impl HttpUpgradeProbe {
    pub fn new(http_client: Arc<HttpClient>) -> Self {
        Self { http_client }
    }

    /// The plain-HTTP version of the target origin
    fn http_origin(url: &Url) -> Option<String> {
        let mut http_url = Url::parse(&url.origin().ascii_serialization()).ok()?;
        http_url.set_scheme("http").ok()?;
        Some(http_url.origin().ascii_serialization())
    }

    /// True when an HTTP request stays on HTTP (upgrade missing). A
    /// failed request means nothing answers on port 80; that is not an
    /// upgrade finding.
    async fn stays_on_http(&self, http_origin: &str) -> bool {
        match self.http_client.head(http_origin).await {
            Ok(response) => response.final_url.starts_with("http://"),
            Err(e) => {
                debug!("HTTP upgrade test failed: {}", e);
                false
            }
        }
    }
}

#[async_trait::async_trait]
impl Probe for HttpUpgradeProbe {
    async fn run(&self, ctx: &TargetContext) -> Result<ProbeOutcome> {
        let http_origin = match Self::http_origin(&ctx.url) {
            Some(origin) => origin,
            None => return Ok(ProbeOutcome::clean(NO_FINDINGS)),
        };

        if self.stays_on_http(&http_origin).await {
            return Ok(ProbeOutcome::findings(vec![MISSING_UPGRADE.to_string()]));
        }

        Ok(ProbeOutcome::clean(NO_FINDINGS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_origin_downgrades_scheme() {
        let url = Url::parse("https://example.com/some/page").unwrap();
        assert_eq!(
            HttpUpgradeProbe::http_origin(&url).unwrap(),
            "http://example.com"
        );
    }

    #[test]
    fn test_http_origin_keeps_host() {
        let url = Url::parse("https://www.example.org").unwrap();
        assert_eq!(
            HttpUpgradeProbe::http_origin(&url).unwrap(),
            "http://www.example.org"
        );
    }
}
