// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Usage Leak Probe
 * Flags banner headers that disclose server software and infrastructure
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use anyhow::Result;

use crate::probes::{Probe, ProbeOutcome};
use crate::target::{Headers, TargetContext};

const NO_FINDINGS: &str = "No information leakage vulnerabilities detected in headers";

struct HeaderCheck {
    name: &'static str,
    warning: &'static str,
}

/// Security-sensitive banner headers; `{}` is replaced by the leaked value
const HEADER_CHECKS: &[HeaderCheck] = &[
    HeaderCheck {
        name: "Server",
        warning: "Server header \"{}\" was leaked, potentially exposing server version information",
    },
    HeaderCheck {
        name: "X-Powered-By",
        warning: "X-Powered-By header \"{}\" was leaked, potentially exposing backend technology",
    },
    HeaderCheck {
        name: "X-AspNet-Version",
        warning: "X-AspNet-Version header \"{}\" was leaked, exposing ASP.NET version details",
    },
    HeaderCheck {
        name: "X-Backend-Server",
        warning: "X-Backend-Server header \"{}\" was leaked, exposing backend infrastructure",
    },
    HeaderCheck {
        name: "X-Generator",
        warning: "X-Generator header \"{}\" was leaked, exposing CMS/framework information",
    },
    HeaderCheck {
        name: "X-Varnish",
        warning: "X-Varnish header \"{}\" was leaked, exposing caching infrastructure",
    },
    HeaderCheck {
        name: "X-Served-By",
        warning: "X-Served-By header \"{}\" was leaked, exposing server identification",
    },
];

pub struct UsageLeakProbe;

impl UsageLeakProbe {
    pub fn new() -> Self {
        Self
    }

    fn check_headers(headers: &Headers) -> Vec<String> {
        HEADER_CHECKS
            .iter()
            .filter_map(|check| {
                headers
                    .get(check.name)
                    .map(|value| check.warning.replace("{}", value))
            })
            .collect()
    }
}

impl Default for UsageLeakProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Probe for UsageLeakProbe {
    async fn run(&self, ctx: &TargetContext) -> Result<ProbeOutcome> {
        let messages = Self::check_headers(&ctx.headers);

        if messages.is_empty() {
            return Ok(ProbeOutcome::clean(NO_FINDINGS));
        }

        Ok(ProbeOutcome::findings(messages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_leaked_server_header() {
        let headers = Headers::from_pairs(&[("Server", "Apache/2.4.41 (Ubuntu)")]);
        let messages = UsageLeakProbe::check_headers(&headers);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("Apache/2.4.41 (Ubuntu)"));
        assert!(messages[0].contains("Server header"));
    }

    #[test]
    fn test_detects_multiple_leaks() {
        let headers = Headers::from_pairs(&[
            ("Server", "nginx"),
            ("X-Powered-By", "PHP/8.1"),
            ("X-Varnish", "12345"),
            ("Content-Type", "text/html"),
        ]);
        let messages = UsageLeakProbe::check_headers(&headers);
        assert_eq!(messages.len(), 3);
    }

    #[test]
    fn test_clean_headers_produce_no_messages() {
        let headers = Headers::from_pairs(&[("Content-Type", "text/html")]);
        assert!(UsageLeakProbe::check_headers(&headers).is_empty());
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let headers = Headers::from_pairs(&[("x-powered-by", "Express")]);
        let messages = UsageLeakProbe::check_headers(&headers);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("Express"));
    }
}
