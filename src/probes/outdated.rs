// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Outdated Software Probe
 * Detects stale jQuery, Lodash and Bootstrap builds referenced by the page
 *
 * For each known library: collect matching <script src> candidates from
 * the baseline body (capped to bound request amplification), fetch each
 * candidate, extract version strings, and compare against the latest
 * version published on the npm registry. Every sub-request is isolated;
 * a failed script fetch or registry lookup degrades that sub-check to
 * "not outdated".
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use anyhow::Result;
use futures::future::join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

use crate::http_client::HttpClient;
use crate::probes::{Probe, ProbeOutcome};
use crate::target::TargetContext;

const NO_FINDINGS: &str = "No outdated software detected";

/// Default version-registry endpoint
const NPM_REGISTRY_BASE: &str = "https://registry.npmjs.org";

/// Cap on script candidates fetched per library. Pages routinely carry
/// dozens of matching tags; the first few are enough to identify the
/// deployed version without uncontrolled fan-out.
const MAX_SCRIPT_MATCHES: usize = 5;

static SCRIPT_SRC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<script\b[^>]*src=["']([^"']*)["'][^>]*>"#).unwrap());

struct LibrarySignature {
    name: &'static str,
    npm_package: &'static str,
    filename: Regex,
    version_extractors: Vec<Regex>,
}

static LIBRARIES: Lazy<Vec<LibrarySignature>> = Lazy::new(|| {
    vec![
        LibrarySignature {
            name: "jQuery",
            npm_package: "jquery",
            filename: Regex::new(r"(?i)(^|/)(jquery|jquery\.min)(-[0-9.]+)?(\.min)?\.js($|\?|#)")
                .unwrap(),
            version_extractors: vec![
                // Header comment format
                Regex::new(r"/\*! jQuery v([0-9.]+) \|").unwrap(),
                // Version variable format
                Regex::new(r#"var [a-zA-Z0-9]="([0-9.]+)""#).unwrap(),
                // Newer jQuery.extend format
                Regex::new(r#"jQuery\.extend\(\{[^}]*version:"([0-9.]+)""#).unwrap(),
            ],
        },
        LibrarySignature {
            name: "Lodash",
            npm_package: "lodash",
            filename: Regex::new(r"(?i)(^|/)(lodash|lodash\.min)(-[0-9.]+)?(\.min)?\.js($|\?|#)")
                .unwrap(),
            version_extractors: vec![
                Regex::new(r"ash\s+([0-9.]+)").unwrap(),
                Regex::new(r#"="([0-9.]+)""#).unwrap(),
            ],
        },
        LibrarySignature {
            name: "Bootstrap",
            npm_package: "bootstrap",
            filename: Regex::new(
                r"(?i)(^|/)(bootstrap|bootstrap\.min|bootstrap\.esm)(-[0-9.]+)?(\.min)?\.js($|\?|#)",
            )
            .unwrap(),
            version_extractors: vec![
                Regex::new(r"(?i)strap\sv+([0-9.]+)").unwrap(),
                Regex::new(r#""([0-9.]+)"\}"#).unwrap(),
            ],
        },
    ]
});

pub struct OutdatedSoftwareProbe {
    http_client: Arc<HttpClient>,
    registry_base: String,
}

impl OutdatedSoftwareProbe {
    pub fn new(http_client: Arc<HttpClient>) -> Self {
        Self::with_registry_base(http_client, NPM_REGISTRY_BASE)
    }

    /// Override the version-registry endpoint (used by tests)
    pub fn with_registry_base(http_client: Arc<HttpClient>, registry_base: &str) -> Self {
        Self {
            http_client,
            registry_base: registry_base.trim_end_matches('/').to_string(),
        }
    }

    /// Script srcs in the body whose filename matches the library,
    /// capped at the first MAX_SCRIPT_MATCHES candidates.
    fn find_scripts(body: &str, signature: &LibrarySignature) -> Vec<String> {
        SCRIPT_SRC_RE
            .captures_iter(body)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
            .filter(|src| signature.filename.is_match(src))
            .take(MAX_SCRIPT_MATCHES)
            .collect()
    }

    fn extract_versions(content: &str, signature: &LibrarySignature) -> BTreeSet<String> {
        signature
            .version_extractors
            .iter()
            .filter_map(|re| re.captures(content))
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }

    /// Fetch one script candidate and pull version strings out of it.
    /// Relative srcs resolve against the target URL; a fetch failure
    /// contributes nothing.
    async fn versions_from_script(
        &self,
        ctx: &TargetContext,
        src: &str,
        signature: &LibrarySignature,
    ) -> BTreeSet<String> {
        let script_url = match ctx.url.join(src) {
            Ok(u) => u.to_string(),
            Err(e) => {
                debug!("Unresolvable script src {}: {}", src, e);
                return BTreeSet::new();
            }
        };

        match self.http_client.get(&script_url).await {
            Ok(response) => Self::extract_versions(&response.body, signature),
            Err(e) => {
                debug!("Script fetch {} failed: {}", script_url, e);
                BTreeSet::new()
            }
        }
    }

    /// Latest published version per the npm registry, or None when the
    /// lookup fails for any reason.
    async fn fetch_latest_version(&self, npm_package: &str) -> Option<String> {
        let url = format!("{}/{}/latest", self.registry_base, npm_package);
        let response = match self.http_client.get(&url).await {
            Ok(r) => r,
            Err(e) => {
                debug!("Registry lookup for {} failed: {}", npm_package, e);
                return None;
            }
        };

        serde_json::from_str::<serde_json::Value>(&response.body)
            .ok()?
            .get("version")?
            .as_str()
            .map(|s| s.to_string())
    }

    /// Full check for one library: find scripts, extract versions,
    /// compare against latest.
    async fn check_library(
        &self,
        ctx: &TargetContext,
        signature: &LibrarySignature,
    ) -> Option<String> {
        let scripts = Self::find_scripts(&ctx.body, signature);
        if scripts.is_empty() {
            return None;
        }

        let version_sets = join_all(
            scripts
                .iter()
                .map(|src| self.versions_from_script(ctx, src, signature)),
        )
        .await;

        let detected: BTreeSet<String> = version_sets.into_iter().flatten().collect();
        if detected.is_empty() {
            return None;
        }

        let latest = self.fetch_latest_version(signature.npm_package).await?;
        let outdated: Vec<String> = detected.into_iter().filter(|v| *v != latest).collect();
        if outdated.is_empty() {
            return None;
        }

        Some(format!(
            "Outdated {} versions detected: {}. Latest: {}",
            signature.name,
            outdated.join(", "),
            latest
        ))
    }
}

#[async_trait::async_trait]
impl Probe for OutdatedSoftwareProbe {
    async fn run(&self, ctx: &TargetContext) -> Result<ProbeOutcome> {
        let checks = join_all(
            LIBRARIES
                .iter()
                .map(|signature| self.check_library(ctx, signature)),
        )
        .await;

        let messages: Vec<String> = checks.into_iter().flatten().collect();

        if messages.is_empty() {
            return Ok(ProbeOutcome::clean(NO_FINDINGS));
        }

        Ok(ProbeOutcome::findings(messages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jquery() -> &'static LibrarySignature {
        &LIBRARIES[0]
    }

    #[test]
    fn test_find_scripts_matches_jquery_variants() {
        let body = r#"
            <script src="/js/jquery.min.js"></script>
            <script src="https://cdn.example.com/jquery-3.6.0.min.js"></script>
            <script src="/js/app.js"></script>
        "#;
        let scripts = OutdatedSoftwareProbe::find_scripts(body, jquery());
        assert_eq!(scripts.len(), 2);
        assert!(scripts[0].contains("jquery.min.js"));
    }

    #[test]
    fn test_find_scripts_ignores_lookalikes() {
        let body = r#"<script src="/js/jquery-plugin-loader.js"></script>"#;
        assert!(OutdatedSoftwareProbe::find_scripts(body, jquery()).is_empty());
    }

    #[test]
    fn test_find_scripts_caps_candidates() {
        let tag = r#"<script src="/jquery.min.js"></script>"#;
        let body = tag.repeat(20);
        let scripts = OutdatedSoftwareProbe::find_scripts(&body, jquery());
        assert_eq!(scripts.len(), MAX_SCRIPT_MATCHES);
    }

    #[test]
    fn test_extract_jquery_header_comment_version() {
        let content = "/*! jQuery v3.5.1 | (c) JS Foundation */";
        let versions = OutdatedSoftwareProbe::extract_versions(content, jquery());
        assert!(versions.contains("3.5.1"));
    }

    #[test]
    fn test_extract_jquery_extend_version() {
        let content = r#"jQuery.extend({expando:"x",version:"3.6.0"})"#;
        let versions = OutdatedSoftwareProbe::extract_versions(content, jquery());
        assert!(versions.contains("3.6.0"));
    }

    #[test]
    fn test_extract_bootstrap_header_version() {
        let bootstrap = &LIBRARIES[2];
        let content = "/*! Bootstrap v4.6.0 (https://getbootstrap.com/) */";
        let versions = OutdatedSoftwareProbe::extract_versions(content, bootstrap);
        assert!(versions.contains("4.6.0"));
    }

    #[test]
    fn test_extract_lodash_version() {
        let lodash = &LIBRARIES[1];
        let content = "/** @license lodash 4.17.15 */";
        let versions = OutdatedSoftwareProbe::extract_versions(content, lodash);
        assert!(versions.contains("4.17.15"));
    }
}
