// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Luotain - Single-Origin Misconfiguration Scanner
 * Standalone CLI entrypoint
 *
 * Scans one target origin, prints the findings and a diagnostic list of
 * every outbound request made (duplicates included), and submits the
 * report to the collection endpoint when one is configured.
 *
 * (c) 2026 Bountyy Oy
 */

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use luotain::config::ScanOptions;
use luotain::engine::ScanEngine;
use luotain::http_client::{HttpClient, RequestLog};
use luotain::registry::ProbeRegistry;
use luotain::submit::SubmissionClient;

/// Luotain - Single-Origin Misconfiguration Scanner
#[derive(Parser)]
#[command(name = "luotain")]
#[command(author = "Bountyy Oy <info@bountyy.fi>")]
#[command(version = "1.0.0")]
#[command(about = "Probe one web origin for common security misconfigurations", long_about = None)]
struct Cli {
    /// Target URL to scan
    url: String,

    /// Submitter e-mail; unlocks invasive probes for linked domains
    #[arg(short, long)]
    email: Option<String>,

    /// Per-request timeout in milliseconds (capped at 30000)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .thread_name("luotain-worker")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    let options = ScanOptions {
        url: cli.url,
        email: cli.email,
        timeout_ms: cli.timeout_ms,
    };

    println!("Starting scan for URL: {}", options.url.trim());

    let request_log = RequestLog::new();
    let http_client = Arc::new(HttpClient::new(options.timeout(), request_log.clone())?);
    let registry = Arc::new(ProbeRegistry::standard(Arc::clone(&http_client)));
    let engine = ScanEngine::new(Arc::clone(&http_client), registry);

    let started_at = chrono::Utc::now();
    let start = Instant::now();
    let report = engine.scan(&options).await;
    let elapsed = start.elapsed();

    info!("Scan finished in {:.2}s", elapsed.as_secs_f64());

    print_request_diagnostics(&request_log);
    print_report(&report);

    let submission = SubmissionClient::from_env();
    if submission.is_configured() {
        match &report.error {
            None => {
                let origin = options
                    .parse_url()
                    .map(|u| u.origin().ascii_serialization())
                    .unwrap_or_else(|_| options.url.clone());
                submission
                    .submit_results(options.email(), &origin, &report.result, started_at, elapsed)
                    .await;
            }
            Some(error) => {
                submission
                    .submit_error(options.email(), &options.url, error)
                    .await;
            }
        }
    }

    Ok(())
}

fn print_request_diagnostics(request_log: &RequestLog) {
    println!();
    println!("Requests made during scan:");
    for (index, url) in request_log.snapshot().iter().enumerate() {
        println!("{}: {}", index + 1, url);
    }

    println!();
    let duplicates = request_log.duplicates();
    if duplicates.is_empty() {
        println!("No duplicate requests found.");
    } else {
        println!("Duplicate requests found:");
        for (index, url) in duplicates.iter().enumerate() {
            println!("Duplicate {}: {}", index + 1, url);
        }
    }
}

fn print_report(report: &luotain::report::ScanReport) {
    println!();

    if let Some(error) = &report.error {
        println!("Scan failed: {}", error);
        return;
    }

    println!("Scan results:");
    for (index, entry) in report.result.iter().filter(|e| e.found).enumerate() {
        println!();
        println!("{}: {} - Severity: {}", index + 1, entry.name, entry.severity);
        for (msg_index, message) in entry.messages.iter().enumerate() {
            println!("   Message {}: {}", msg_index + 1, message);
        }
    }
}
