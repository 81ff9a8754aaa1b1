// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Exposed Configuration Probe
 * Hunts for environment files, cloud credentials and debug endpoints
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

const NO_FINDINGS: &str = "No exposed configs detected";

const CONFIG_PATHS: &[&str] = &[
    "/.aws/config",
    "/aws/credentials",
    "/.travis.yml",
    "/admin/config",
    "/api/config/config.yml",
    "/main.yml",
    "/aws.yml",
    "/.env",
    "/phpinfo",
    "/phpinfo.php",
    "/portal/.env",
    "/env/.env",
    "/api/.env",
    "/app/.env",
    "/dev/.env",
    "/new/.env",
    "/new/.env.local",
    "/new/.env.production",
    "/new/.env.staging",
    "/_phpinfo.php",
    "/_profiler/phpinfo",
    "/_profiler/phpinfo/info.php",
    "/_profiler/phpinfo/phpinfo.php",
    "/wp-config",
    "/aws-secret.yaml",
    "/awstats/.env",
    "/conf/.env",
    "/cron/.env",
    "/www/.env",
    "/docker/.env",
    "/docker/app/.env",
    "/env.backup",
    "/xampp/phpinfo.php",
    "/lara/info.php",
    "/lara/phpinfo.php",
    "/laravel/info.php",
    "/.vscode/.env",
    "/js/.env",
    "/laravel/.env",
    "/laravel/core/.env",
    "/mail/.env",
    "/mailer/.env",
    "/nginx/.env",
    "/public/.env",
    "/site/.env",
    "/xampp/.env",
    "/main/.env",
    "/node_modules/.env",
    "/kyc/.env",
    "/admin/.env",
    "/prod/.env",
    "/.env.bak",
    "/api/shared/config/config.env",
    "/api/shared/config.env",
    "/config.env",
    "/website/.env",
    "/development/.env",
    "/backend/.env",
    "/api/shared/config/.env",
    "/api/shared/.env",
    "/api/config.env",
    "/service/email_service.py",
    "/node/.env_example",
    "/.env.production.local",
    "/.env.local",
    "/.env.example",
    "/.env.stage",
    "/server/config/database.js",
    "/.env.old",
    "/.env_sample",
    "/scripts/nodemailer.js",
    "/.env.prod",
    "/crm/.env",
    "/local/.env",
    "/core/.env",
    "/apps/.env",
    "/config.js",
];

pub struct ExposedConfigsProbe {
    http_client: Arc<HttpClient>,
}

impl ExposedConfigsProbe {
    pub fn new(http_client: Arc<HttpClient>) -> Self {
        Self { http_client }
    }

    async fn test_path(&self, origin: &str, path: &str) -> bool {
        let url = format!("{}{}", origin, path);
        match self.http_client.get(&url).await {
            Ok(response) => response.status_code == 200,
            Err(e) => {
                debug!("Config path {} failed: {}", path, e);
                false
            }
        }
    }
}

#[async_trait::async_trait]
impl Probe for ExposedConfigsProbe {
    async fn run(&self, ctx: &TargetContext) -> Result<ProbeOutcome> {
        let origin = ctx.origin();

        let results = join_all(
            CONFIG_PATHS
                .iter()
                .map(|path| self.test_path(&origin, path)),
        )
        .await;

        let messages: Vec<String> = CONFIG_PATHS
            .iter()
            .zip(results)
            .filter(|(_, hit)| *hit)
            .map(|(path, _)| format!("Potential exposed config file detected at: {}", path))
            .collect();

        if messages.is_empty() {
            return Ok(ProbeOutcome::clean(NO_FINDINGS));
        }

        Ok(ProbeOutcome::findings(messages))
    }
}
