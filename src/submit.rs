// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Result Submission
 * Delivers finished scan results to the collection endpoint
 *
 * Submission is strictly best-effort: failures are logged and swallowed,
 * never surfaced to the caller and never retried.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

use crate::report::ReportEntry;

/// Environment variable naming the results-collection endpoint
pub const SUBMIT_URL_ENV: &str = "LUOTAIN_SUBMIT_URL";

const SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultsPayload<'a> {
    email: Option<&'a str>,
    url: &'a str,
    results: &'a [ReportEntry],
    started_at: String,
    elapsed: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorPayload<'a> {
    email: Option<&'a str>,
    url: &'a str,
    error: &'a str,
}

pub struct SubmissionClient {
    endpoint: Option<String>,
    http_client: Client,
}

impl SubmissionClient {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            endpoint,
            http_client: Client::builder()
                .timeout(SUBMIT_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Endpoint from the environment; submission is skipped when unset.
    pub fn from_env() -> Self {
        Self::new(std::env::var(SUBMIT_URL_ENV).ok())
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Submit a completed scan's entries.
    pub async fn submit_results(
        &self,
        email: Option<&str>,
        origin: &str,
        results: &[ReportEntry],
        started_at: chrono::DateTime<chrono::Utc>,
        elapsed: Duration,
    ) {
        let payload = ResultsPayload {
            email,
            url: origin,
            results,
            started_at: started_at.to_rfc3339(),
            elapsed: elapsed.as_secs_f64(),
        };
        self.post(&payload).await;
    }

    /// Submit a scan-level failure.
    pub async fn submit_error(&self, email: Option<&str>, url: &str, error: &str) {
        let payload = ErrorPayload { email, url, error };
        self.post(&payload).await;
    }

    async fn post<T: Serialize>(&self, payload: &T) {
        let endpoint = match &self.endpoint {
            Some(endpoint) => endpoint,
            None => {
                debug!("No submission endpoint configured, skipping");
                return;
            }
        };

        match self.http_client.post(endpoint).json(payload).send().await {
            Ok(response) => {
                debug!("Submitted scan results: {}", response.status());
            }
            Err(e) => {
                error!("Error submitting scan results: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_client_is_inert() {
        let client = SubmissionClient::new(None);
        assert!(!client.is_configured());
    }

    #[test]
    fn test_results_payload_shape() {
        let payload = ResultsPayload {
            email: Some("user@example.com"),
            url: "https://example.com",
            results: &[],
            started_at: "2026-01-01T00:00:00+00:00".to_string(),
            elapsed: 1.25,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["email"], "user@example.com");
        assert_eq!(json["url"], "https://example.com");
        assert_eq!(json["startedAt"], "2026-01-01T00:00:00+00:00");
        assert_eq!(json["elapsed"], 1.25);
        assert!(json["results"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_error_payload_shape() {
        let payload = ErrorPayload {
            email: None,
            url: "https://example.com",
            error: "URL redirected to a different domain",
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["email"].is_null());
        assert_eq!(json["error"], "URL redirected to a different domain");
    }
}
