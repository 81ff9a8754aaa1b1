// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - HTTP Transport
 * Timeout-bounded outbound requests with a per-invocation request log
 *
 * Every outbound request made during one scan goes through this client.
 * A request either returns a response (any status code, non-2xx included)
 * or fails locally after the configured timeout. There is no retry: a
 * failed or timed-out request is final for that attempt.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use anyhow::{Context, Result};
use parking_lot::Mutex;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Identification header sent with every scan request
const SCANNER_HEADER: (&str, &str) = (
    "x-scanner",
    "Security scan by Bountyy Oy; report abuse at https://bountyy.fi/scan/abuse",
);

/// Browser User-Agent to avoid trivial bot blocks
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Maximum response body size (10MB) to prevent memory exhaustion
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

const DEFAULT_POOL_IDLE_PER_HOST: usize = 32;
const DEFAULT_POOL_MAX_IDLE_TIMEOUT: u64 = 90;

/// Append-only record of outbound request URLs, scoped to one scan
/// invocation. Never shared across concurrent scans of different targets.
#[derive(Clone, Default)]
pub struct RequestLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl RequestLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, url: &str) {
        self.entries.lock().push(url.to_string());
    }

    /// All requests made so far, in issue order.
    pub fn snapshot(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// URLs requested more than once, one entry per repeat.
    pub fn duplicates(&self) -> Vec<String> {
        let entries = self.entries.lock();
        let mut seen = std::collections::HashSet::new();
        let mut duplicates = Vec::new();
        for url in entries.iter() {
            if !seen.insert(url.clone()) {
                duplicates.push(url.clone());
            }
        }
        duplicates
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: String,
    pub headers: HashMap<String, String>,
    /// URL of the final response after redirects
    pub final_url: String,
}

impl HttpResponse {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    timeout: Duration,
    requests: RequestLog,
}

impl HttpClient {
    pub fn new(timeout: Duration, requests: RequestLog) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(DEFAULT_POOL_IDLE_PER_HOST)
            .pool_idle_timeout(Duration::from_secs(DEFAULT_POOL_MAX_IDLE_TIMEOUT))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client: Arc::new(client),
            timeout,
            requests,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn request_log(&self) -> &RequestLog {
        &self.requests
    }

    /// Send a GET request. Non-2xx statuses are responses, not errors;
    /// only network failures and timeouts return Err.
    pub async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.requests.record(url);

        let response = self
            .client
            .get(url)
            .header(SCANNER_HEADER.0, SCANNER_HEADER.1)
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers_map = Self::header_map(response.headers());

        let body_bytes = response.bytes().await.unwrap_or_default();
        let body = if body_bytes.len() > MAX_BODY_SIZE {
            String::from_utf8_lossy(&body_bytes[..MAX_BODY_SIZE]).to_string()
        } else {
            String::from_utf8_lossy(&body_bytes).to_string()
        };

        debug!("GET {} -> {}", url, status_code);

        Ok(HttpResponse {
            status_code,
            body,
            headers: headers_map,
            final_url,
        })
    }

    /// Send a HEAD request. Used for the liveness check and the HTTP
    /// upgrade probe, where only status and final URL matter.
    pub async fn head(&self, url: &str) -> Result<HttpResponse> {
        self.requests.record(url);

        let response = self
            .client
            .head(url)
            .header(SCANNER_HEADER.0, SCANNER_HEADER.1)
            .send()
            .await
            .with_context(|| format!("HEAD {} failed", url))?;

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers_map = Self::header_map(response.headers());

        debug!("HEAD {} -> {}", url, status_code);

        Ok(HttpResponse {
            status_code,
            body: String::new(),
            headers: headers_map,
            final_url,
        })
    }

    fn header_map(headers: &reqwest::header::HeaderMap) -> HashMap<String, String> {
        let mut map = HashMap::with_capacity(headers.len());
        for (k, v) in headers.iter() {
            if let Ok(value_str) = v.to_str() {
                map.insert(k.as_str().to_string(), value_str.to_string());
            }
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_log_records_in_order() {
        let log = RequestLog::new();
        log.record("https://a.example/");
        log.record("https://b.example/");
        assert_eq!(
            log.snapshot(),
            vec!["https://a.example/".to_string(), "https://b.example/".to_string()]
        );
    }

    #[test]
    fn test_request_log_finds_duplicates() {
        let log = RequestLog::new();
        log.record("https://a.example/");
        log.record("https://b.example/");
        log.record("https://a.example/");
        log.record("https://a.example/");
        assert_eq!(
            log.duplicates(),
            vec!["https://a.example/".to_string(), "https://a.example/".to_string()]
        );
    }

    #[test]
    fn test_response_header_lookup_is_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("Server".to_string(), "nginx".to_string());
        let response = HttpResponse {
            status_code: 200,
            body: String::new(),
            headers,
            final_url: "https://example.com/".to_string(),
        };
        assert_eq!(response.header("server"), Some("nginx"));
        assert_eq!(response.header("SERVER"), Some("nginx"));
        assert_eq!(response.header("x-missing"), None);
    }
}
