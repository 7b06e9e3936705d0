// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! URL metadata collaborator.
//!
//! Given a product URL, fetch the page and extract best-effort metadata
//! (title, image, price, category, description) from Open Graph tags. The
//! fetch is bounded by a hard timeout and never retried; extraction
//! failures degrade to empty fields rather than errors.

use crate::error::{AppError, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// Only scan the head of large pages; OG tags live near the top.
const MAX_SCAN_BYTES: usize = 512 * 1024;

const USER_AGENT: &str = concat!("giftwell/", env!("CARGO_PKG_VERSION"));

/// Best-effort metadata extracted from a product page.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price_cents: Option<u64>,
    pub category: Option<String>,
}

/// HTTP client plus precompiled extraction patterns.
pub struct MetadataService {
    http: reqwest::Client,
    meta_tag: Regex,
    meta_key: Regex,
    meta_content: Regex,
    page_title: Regex,
}

impl MetadataService {
    /// Create the service with a hard per-fetch timeout.
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            meta_tag: Regex::new(r"(?is)<meta\s[^>]*>")?,
            meta_key: Regex::new(r#"(?i)(?:property|name)\s*=\s*["']([^"']+)["']"#)?,
            meta_content: Regex::new(r#"(?i)content\s*=\s*["']([^"']*)["']"#)?,
            page_title: Regex::new(r"(?is)<title[^>]*>([^<]*)</title>")?,
        })
    }

    /// Fetch a URL and extract metadata.
    ///
    /// Timeouts surface as 408; any other fetch failure as 400. There is
    /// no retry.
    pub async fn fetch(&self, url: &str) -> Result<UrlMetadata> {
        ensure_https(url)?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| map_fetch_err(&e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "Metadata fetch for {} failed with status {}",
                url, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| map_fetch_err(&e, url))?;

        let metadata = self.extract(&body);
        tracing::debug!(
            url,
            has_title = metadata.title.is_some(),
            has_price = metadata.price_cents.is_some(),
            "Metadata extracted"
        );

        Ok(metadata)
    }

    /// Best-effort extraction from an HTML document.
    fn extract(&self, html: &str) -> UrlMetadata {
        let snippet = head_slice(html, MAX_SCAN_BYTES);

        // First occurrence of each meta key wins.
        let mut meta: HashMap<String, String> = HashMap::new();
        for tag in self.meta_tag.find_iter(snippet) {
            let tag = tag.as_str();
            let key = self.meta_key.captures(tag).map(|c| c[1].to_lowercase());
            let content = self.meta_content.captures(tag).map(|c| c[1].to_string());
            if let (Some(key), Some(content)) = (key, content) {
                meta.entry(key).or_insert(content);
            }
        }

        let title = meta
            .get("og:title")
            .cloned()
            .or_else(|| {
                self.page_title
                    .captures(snippet)
                    .map(|c| c[1].trim().to_string())
            })
            .filter(|t| !t.is_empty());

        let description = meta
            .get("og:description")
            .or_else(|| meta.get("description"))
            .cloned()
            .filter(|d| !d.is_empty());

        let image = meta.get("og:image").cloned().filter(|i| !i.is_empty());

        let price_cents = meta
            .get("og:price:amount")
            .or_else(|| meta.get("product:price:amount"))
            .and_then(|amount| parse_price_cents(amount));

        let category = meta
            .get("product:category")
            .or_else(|| meta.get("og:type"))
            .cloned()
            .filter(|c| !c.is_empty());

        UrlMetadata {
            title,
            description,
            image,
            price_cents,
            category,
        }
    }
}

/// Reject anything that is not an absolute HTTPS URL.
pub fn ensure_https(url: &str) -> Result<()> {
    if url.starts_with("https://") {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Only HTTPS URLs are allowed".to_string(),
        ))
    }
}

fn map_fetch_err(e: &reqwest::Error, url: &str) -> AppError {
    if e.is_timeout() {
        AppError::UpstreamTimeout(format!("Metadata fetch for {} timed out", url))
    } else {
        AppError::Upstream(format!("Metadata fetch for {} failed: {}", url, e))
    }
}

/// Parse a decimal price string into smallest-currency-unit cents.
fn parse_price_cents(amount: &str) -> Option<u64> {
    let value: f64 = amount.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value * 100.0).round() as u64)
}

/// Slice a prefix of at most `max_bytes`, respecting char boundaries.
fn head_slice(s: &str, max_bytes: usize) -> &str {
    let mut end = max_bytes.min(s.len());
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
