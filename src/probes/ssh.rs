// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - SSH Configuration Probe
 * Inspects the target's SSH service and tests common default credentials
 *
 * Only runs for linked targets (submitter e-mail domain matches the
 * target domain); credential testing against arbitrary third parties is
 * never acceptable. Accepted default credentials escalate the finding to
 * critical. Credentials themselves are never logged or reported.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use anyhow::Result;
use futures::future::join_all;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::TokioResolver;
use ssh2::Session;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::probes::{Probe, ProbeOutcome};
use crate::target::TargetContext;

const NO_FINDINGS: &str = "No SSH vulnerabilities found";

const SSH_PORT: u16 = 22;
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(3);
const OUTDATED_SSH_VERSIONS: &[&str] = &["SSH-1."];
const WEAK_AUTH_METHODS: &[&str] = &["password", "none"];

const COMMON_USERNAMES: &[&str] = &["root", "admin", "pi"];
const COMMON_PASSWORDS: &[&str] = &["password", "toor", "admin", "root", "raspberry"];

/// What the pre-auth exchange revealed about the server
#[derive(Debug, Default)]
struct SshServerInfo {
    banner: Option<String>,
    auth_methods: Vec<String>,
}

pub struct SshProbe;

impl SshProbe {
    pub fn new() -> Self {
        Self
    }

    async fn resolve_target(hostname: &str) -> Result<Option<IpAddr>> {
        if let Ok(ip) = hostname.parse::<IpAddr>() {
            return Ok(Some(ip));
        }

        let resolver = TokioResolver::builder(TokioConnectionProvider::default())?.build();
        let lookup = resolver.lookup_ip(hostname).await?;
        Ok(lookup.iter().next())
    }

    /// Connect to the SSH port and read the pre-auth server data
    async fn inspect_server(addr: SocketAddr) -> Option<SshServerInfo> {
        let mut stream = timeout(CONNECTION_TIMEOUT, TcpStream::connect(addr))
            .await
            .ok()?
            .ok()?;

        let mut data = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            match timeout(CONNECTION_TIMEOUT, stream.read(&mut buf)).await {
                Ok(Ok(0)) => break,
                Ok(Ok(n)) => {
                    data.extend_from_slice(&buf[..n]);
                    if data.contains(&b'\n') {
                        break;
                    }
                }
                _ => break,
            }
        }

        if data.is_empty() {
            return None;
        }

        let text = String::from_utf8_lossy(&data).to_string();
        let banner = text.lines().next().map(|line| line.trim().to_string());
        let auth_methods = Self::detect_auth_methods(&text);

        Some(SshServerInfo {
            banner: banner.filter(|b| !b.is_empty()),
            auth_methods,
        })
    }

    /// Authentication methods advertised in the pre-auth exchange.
    /// Only meaningful for SSH-2.0 servers.
    fn detect_auth_methods(response: &str) -> Vec<String> {
        if !response.contains("SSH-2.0") {
            return Vec::new();
        }

        ["password", "publickey", "gssapi-with-mic", "hostbased", "none"]
            .iter()
            .filter(|method| response.contains(*method))
            .map(|method| method.to_string())
            .collect()
    }

    /// Version messages from the server banner
    fn analyze_version(banner: &str) -> Vec<String> {
        let version = banner.split(' ').next().unwrap_or(banner);
        let mut messages = vec![format!("SSH version: {}", version)];

        if OUTDATED_SSH_VERSIONS.iter().any(|v| version.starts_with(v)) {
            messages.push(format!(
                "Warning: Outdated SSH version ({}) - security vulnerabilities likely",
                version
            ));
        }

        messages
    }

    /// Messages and criticality from the advertised auth methods
    fn analyze_auth_methods(methods: &[String]) -> (Vec<String>, bool) {
        let mut messages = vec![format!("Auth methods: {}", methods.join(", "))];
        let mut critical = false;

        if methods.iter().any(|m| m == "none") {
            critical = true;
            messages.push("CRITICAL: Server allows unauthenticated access!".to_string());
        }

        if methods.iter().any(|m| m == "password") {
            messages.push("Warning: Password auth enabled - prefer key-based auth".to_string());
        }

        if methods
            .iter()
            .any(|m| WEAK_AUTH_METHODS.contains(&m.as_str()))
        {
            messages
                .push("Security recommendation: Disable weak authentication methods".to_string());
        }

        (messages, critical)
    }

    /// One blocking credential attempt. Runs on the blocking pool; any
    /// failure (connect, handshake, rejection) counts as not accepted.
    fn try_credentials_blocking(addr: SocketAddr, username: &str, password: &str) -> bool {
        let tcp = match std::net::TcpStream::connect_timeout(&addr, CONNECTION_TIMEOUT) {
            Ok(tcp) => tcp,
            Err(_) => return false,
        };
        let _ = tcp.set_read_timeout(Some(CONNECTION_TIMEOUT));
        let _ = tcp.set_write_timeout(Some(CONNECTION_TIMEOUT));

        let mut sess = match Session::new() {
            Ok(sess) => sess,
            Err(_) => return false,
        };
        sess.set_tcp_stream(tcp);
        sess.set_timeout(CONNECTION_TIMEOUT.as_millis() as u32);
        if sess.handshake().is_err() {
            return false;
        }

        sess.userauth_password(username, password).is_ok() && sess.authenticated()
    }

    /// Test the common-credential grid, all attempts concurrent and
    /// isolated. Returns the number of accepted logins.
    async fn test_common_credentials(addr: SocketAddr) -> usize {
        let attempts = COMMON_USERNAMES.iter().flat_map(|username| {
            COMMON_PASSWORDS.iter().map(move |password| {
                let (username, password) = (username.to_string(), password.to_string());
                tokio::task::spawn_blocking(move || {
                    Self::try_credentials_blocking(addr, &username, &password)
                })
            })
        });

        join_all(attempts)
            .await
            .into_iter()
            .filter(|result| matches!(result, Ok(true)))
            .count()
    }
}

impl Default for SshProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Probe for SshProbe {
    async fn run(&self, ctx: &TargetContext) -> Result<ProbeOutcome> {
        let hostname = ctx.hostname().to_string();

        let ip = match Self::resolve_target(&hostname).await {
            Ok(Some(ip)) => ip,
            Ok(None) => return Ok(ProbeOutcome::clean(NO_FINDINGS)),
            Err(e) => {
                debug!("SSH target resolution failed for {}: {}", hostname, e);
                return Ok(ProbeOutcome {
                    found: false,
                    messages: vec![format!("Scan error: {}", e)],
                    critical: false,
                });
            }
        };

        let addr = SocketAddr::new(ip, SSH_PORT);
        let server = match Self::inspect_server(addr).await {
            Some(info) => info,
            None => return Ok(ProbeOutcome::clean(NO_FINDINGS)),
        };

        let mut messages = vec![format!("SSH port ({}) is open on {}", SSH_PORT, ip)];
        let mut critical = false;

        if let Some(ref banner) = server.banner {
            messages.extend(Self::analyze_version(banner));
        }

        if !server.auth_methods.is_empty() {
            let (auth_messages, auth_critical) = Self::analyze_auth_methods(&server.auth_methods);
            messages.extend(auth_messages);
            critical = critical || auth_critical;
        }

        // Test common credentials even if password auth was not
        // advertised; a server can still accept them misconfigured.
        let accepted = Self::test_common_credentials(addr).await;
        if accepted > 0 {
            info!("SSH server on {} accepted {} default credential pairs", ip, accepted);
            critical = true;
            for _ in 0..accepted {
                messages.push("CRITICAL: Accepted common credentials!".to_string());
            }
            messages.push("IMMEDIATE ACTION REQUIRED: Change all default credentials!".to_string());
        }

        Ok(ProbeOutcome {
            found: true,
            messages,
            critical,
        })
    }
}
