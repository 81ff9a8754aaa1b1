// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Scan Invocation Options
 * Input contract for one scan: target URL, submitter e-mail, timeout
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::ScanError;

/// Per-request timeout when the caller does not pick one
pub const DEFAULT_TIMEOUT_MS: u64 = 8_000;

/// Hard ceiling for caller-supplied timeouts
pub const MAX_TIMEOUT_MS: u64 = 30_000;

/// Invocation input for one scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOptions {
    /// Target URL; must parse as an absolute http/https URL
    pub url: String,

    /// Submitter e-mail; drives linkage gating for invasive probes
    #[serde(default)]
    pub email: Option<String>,

    /// Per-request timeout in milliseconds, clamped to MAX_TIMEOUT_MS
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl ScanOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            email: None,
            timeout_ms: None,
        }
    }

    /// Effective per-request timeout: caller value clamped to the
    /// ceiling, default when absent or nonsensical.
    pub fn timeout(&self) -> Duration {
        let ms = match self.timeout_ms {
            Some(ms) if ms > 0 => ms.min(MAX_TIMEOUT_MS),
            _ => DEFAULT_TIMEOUT_MS,
        };
        Duration::from_millis(ms)
    }

    /// Submitter e-mail with surrounding whitespace removed
    pub fn email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    /// Validate and parse the target URL. Runs before any network
    /// activity; failures abort the scan as input errors.
    pub fn parse_url(&self) -> Result<Url, ScanError> {
        let raw = self.url.trim();
        if raw.is_empty() {
            return Err(ScanError::InvalidInput(
                "Missing required field: url".to_string(),
            ));
        }

        let url = Url::parse(raw)
            .map_err(|e| ScanError::InvalidInput(format!("Invalid URL: {}", e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ScanError::InvalidInput(
                "URL must use http or https".to_string(),
            ));
        }

        if url.host_str().is_none() {
            return Err(ScanError::InvalidInput(
                "URL must have a host".to_string(),
            ));
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_defaults_when_absent() {
        let options = ScanOptions::new("https://example.com");
        assert_eq!(options.timeout(), Duration::from_millis(DEFAULT_TIMEOUT_MS));
    }

    #[test]
    fn test_timeout_is_clamped_to_ceiling() {
        let mut options = ScanOptions::new("https://example.com");
        options.timeout_ms = Some(120_000);
        assert_eq!(options.timeout(), Duration::from_millis(MAX_TIMEOUT_MS));

        options.timeout_ms = Some(3_000);
        assert_eq!(options.timeout(), Duration::from_millis(3_000));

        options.timeout_ms = Some(0);
        assert_eq!(options.timeout(), Duration::from_millis(DEFAULT_TIMEOUT_MS));
    }

    #[test]
    fn test_parse_url_accepts_http_and_https() {
        assert!(ScanOptions::new("https://example.com").parse_url().is_ok());
        assert!(ScanOptions::new("http://example.com").parse_url().is_ok());
    }

    #[test]
    fn test_parse_url_rejects_bad_input() {
        assert!(ScanOptions::new("").parse_url().is_err());
        assert!(ScanOptions::new("   ").parse_url().is_err());
        assert!(ScanOptions::new("not a url").parse_url().is_err());
        assert!(ScanOptions::new("ftp://example.com").parse_url().is_err());
    }

    #[test]
    fn test_email_is_trimmed() {
        let mut options = ScanOptions::new("https://example.com");
        options.email = Some("  user@example.com  ".to_string());
        assert_eq!(options.email(), Some("user@example.com"));

        options.email = Some("   ".to_string());
        assert_eq!(options.email(), None);
    }

    #[test]
    fn test_options_deserialize_camel_case() {
        let options: ScanOptions = serde_json::from_str(
            r#"{"url":"https://example.com","email":"a@b.com","timeoutMs":5000}"#,
        )
        .unwrap();
        assert_eq!(options.timeout_ms, Some(5000));
        assert_eq!(options.email.as_deref(), Some("a@b.com"));
    }
}
