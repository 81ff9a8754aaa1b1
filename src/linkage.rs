// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Linkage Policy
 * Decides whether the submitter's e-mail domain is linked to the target
 *
 * Invasive probes (currently SSH credential testing) only run when the
 * scan submitter can plausibly claim the target: their e-mail root domain
 * must equal the target hostname's root domain.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

/// Two-label "root domain" of a hostname: strip a leading `www.`, then
/// keep only the last two dot-separated labels when more than two remain.
///
/// This is a deliberate approximation of registrable-domain extraction.
/// It mishandles multi-part public suffixes ("example.co.uk" yields
/// "co.uk"); linkage gating depends on matching this heuristic, so it is
/// kept as-is rather than swapped for a public-suffix list.
pub fn root_domain(hostname: &str) -> String {
    let stripped = hostname
        .strip_prefix("www.")
        .unwrap_or(hostname)
        .to_ascii_lowercase();

    let labels: Vec<&str> = stripped.split('.').collect();
    if labels.len() > 2 {
        labels[labels.len() - 2..].join(".")
    } else {
        stripped
    }
}

/// Compute the linkage flag for one scan invocation.
///
/// `linked` is true iff the e-mail's domain part and the target hostname
/// reduce to the same non-empty root domain. Absence of an e-mail, or an
/// e-mail without a domain part, yields false.
pub fn is_linked(email: Option<&str>, target_hostname: &str) -> bool {
    let email_domain = match email.and_then(|e| e.rsplit_once('@')) {
        Some((_, domain)) if !domain.is_empty() => domain,
        _ => return false,
    };

    let email_root = root_domain(email_domain);
    let target_root = root_domain(target_hostname);

    !email_root.is_empty() && !target_root.is_empty() && email_root == target_root
}
