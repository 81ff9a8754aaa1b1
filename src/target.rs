// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Target Context
 * Baseline resource fetch, redirect guard, and the shared scan context
 *
 * The target's body and headers are fetched exactly once per scan and
 * shared read-only by every probe. A baseline fetch that lands on a
 * foreign domain aborts the scan before any probe runs.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use crate::errors::ScanError;
use crate::http_client::HttpClient;

/// Case-insensitive response header mapping. Keys are lowercased once at
/// construction so probes can do cheap exact lookups.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    map: HashMap<String, String>,
}

impl Headers {
    pub fn from_map(raw: HashMap<String, String>) -> Self {
        let map = raw
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        Self { map }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(&name.to_ascii_lowercase()).map(|v| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
impl Headers {
    /// Test constructor from (name, value) pairs
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self::from_map(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// Immutable inputs shared by every probe in one scan.
///
/// Constructed once after the baseline fetch, wrapped in `Arc`, and
/// discarded after aggregation. Probes read the fields they need and
/// ignore the rest.
#[derive(Debug, Clone)]
pub struct TargetContext {
    pub url: Url,
    pub body: String,
    pub headers: Headers,
    pub linked: bool,
}

impl TargetContext {
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    pub fn hostname(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }
}

/// Result of the one baseline request to the target origin.
pub struct FetchedTarget {
    pub body: String,
    pub headers: Headers,
    pub final_url: Url,
}

/// Fetch the target's baseline resources: one GET to the origin.
///
/// Network errors and timeouts surface as `ResourceFetchFailed`; any
/// HTTP status is a successful fetch.
pub async fn fetch_target_resources(
    client: &HttpClient,
    url: &Url,
) -> Result<FetchedTarget, ScanError> {
    let origin = url.origin().ascii_serialization();

    let response = client.get(&origin).await.map_err(|e| {
        warn!("Baseline fetch of {} failed: {:#}", origin, e);
        ScanError::ResourceFetchFailed {
            reason: e.to_string(),
        }
    })?;

    let final_url = Url::parse(&response.final_url).map_err(|e| ScanError::ResourceFetchFailed {
        reason: format!("unparseable final URL {}: {}", response.final_url, e),
    })?;

    debug!(
        "Baseline fetch of {} -> {} ({} headers, {} byte body)",
        origin,
        response.status_code,
        response.headers.len(),
        response.body.len()
    );

    Ok(FetchedTarget {
        body: response.body,
        headers: Headers::from_map(response.headers),
        final_url,
    })
}

/// Abort the scan when the baseline fetch was redirected off-domain.
///
/// Hostnames are considered equivalent when they differ only by a
/// leading `www.` label; anything beyond that means the target forwarded
/// us to a third party we have no authorization to scan.
pub fn guard_redirect(requested: &Url, landed: &Url) -> Result<(), ScanError> {
    if requested.origin() == landed.origin() {
        return Ok(());
    }

    let requested_host = strip_www(requested.host_str().unwrap_or_default());
    let landed_host = strip_www(landed.host_str().unwrap_or_default());

    if requested_host == landed_host {
        return Ok(());
    }

    warn!(
        "Baseline fetch redirected to a different domain: {} -> {}",
        requested, landed
    );
    Err(ScanError::RedirectedToForeignDomain {
        requested: requested.to_string(),
        landed: landed.to_string(),
    })
}

fn strip_www(hostname: &str) -> &str {
    hostname.strip_prefix("www.").unwrap_or(hostname)
}

/// Build the shared context for one scan from the guarded fetch result.
pub fn build_context(
    url: Url,
    fetched: FetchedTarget,
    linked: bool,
) -> Result<Arc<TargetContext>, ScanError> {
    guard_redirect(&url, &fetched.final_url)?;

    Ok(Arc::new(TargetContext {
        url,
        body: fetched.body,
        headers: fetched.headers,
        linked,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_guard_allows_same_origin() {
        assert!(guard_redirect(&url("https://example.com"), &url("https://example.com/")).is_ok());
    }

    #[test]
    fn test_guard_allows_www_difference() {
        assert!(
            guard_redirect(&url("https://example.com"), &url("https://www.example.com/")).is_ok()
        );
        assert!(
            guard_redirect(&url("https://www.example.com"), &url("https://example.com/")).is_ok()
        );
    }

    #[test]
    fn test_guard_rejects_foreign_domain() {
        let err = guard_redirect(&url("https://example.com"), &url("https://evil.example.net/"))
            .unwrap_err();
        assert!(matches!(err, ScanError::RedirectedToForeignDomain { .. }));
        assert_eq!(err.report_message(), "URL redirected to a different domain");
    }

    #[test]
    fn test_guard_rejects_subdomain_beyond_www() {
        let err = guard_redirect(&url("https://example.com"), &url("https://login.example.com/"))
            .unwrap_err();
        assert!(matches!(err, ScanError::RedirectedToForeignDomain { .. }));
    }

    #[test]
    fn test_headers_case_insensitive_lookup() {
        let headers = Headers::from_pairs(&[("X-Powered-By", "PHP/8.1"), ("Server", "nginx")]);
        assert_eq!(headers.get("x-powered-by"), Some("PHP/8.1"));
        assert_eq!(headers.get("SERVER"), Some("nginx"));
        assert_eq!(headers.get("x-missing"), None);
    }

    #[test]
    fn test_context_origin_and_hostname() {
        let ctx = TargetContext {
            url: url("https://www.example.com/some/path"),
            body: String::new(),
            headers: Headers::default(),
            linked: false,
        };
        assert_eq!(ctx.origin(), "https://www.example.com");
        assert_eq!(ctx.hostname(), "www.example.com");
    }

    #[test]
    fn test_build_context_rejects_redirected_fetch() {
        let fetched = FetchedTarget {
            body: String::new(),
            headers: Headers::default(),
            final_url: url("https://other.example.org/"),
        };
        assert!(build_context(url("https://example.com"), fetched, false).is_err());
    }
}
