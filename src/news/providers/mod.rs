// src/news/providers/mod.rs
pub mod editorial;
pub mod fixture;
pub mod gnews;

use anyhow::{Context, Result};
use metrics::counter;
use std::time::Duration;

use crate::news::types::{Article, HeadlineProvider};

/// HTTP client shared by the upstream adapters. These timeouts are the only
/// bound on a fetch; there is no separate operation timeout.
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(4))
        .timeout(Duration::from_secs(10))
        .build()
        .context("building reqwest client")
}

/// Fail-soft fetch: any provider error is logged, counted and becomes an empty
/// batch. The `bool` is `true` when the provider failed.
pub async fn fetch_or_empty(provider: &dyn HeadlineProvider) -> (Vec<Article>, bool) {
    match provider.fetch_latest().await {
        Ok(v) => (v, false),
        Err(e) => {
            tracing::warn!(error = ?e, source = %provider.source(), "headline fetch failed");
            counter!("news_fetch_errors_total", "source" => provider.source().to_string())
                .increment(1);
            (Vec::new(), true)
        }
    }
}
