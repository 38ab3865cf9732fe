// src/news/providers/gnews.rs
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use metrics::counter;
use std::sync::Arc;

use crate::config::{CountryConfig, NewsConfig};
use crate::news::normalize::{normalize_batch, parse_headlines_body};
use crate::news::types::{Article, HeadlineProvider};

/// Top-headlines adapter for one country. One request per call, no retries.
pub struct GNewsProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    country: CountryConfig,
    source_tag: String,
    lang: String,
    category: String,
    max: u32,
}

impl GNewsProvider {
    pub fn new(client: reqwest::Client, cfg: &NewsConfig, country: &CountryConfig) -> Self {
        Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key().map(str::to_string),
            country: country.clone(),
            source_tag: country.display_code(),
            lang: cfg.lang.clone(),
            category: cfg.category.clone(),
            max: cfg.per_country_limit,
        }
    }

    /// One provider per configured country, all sharing `client`.
    pub fn for_config(client: &reqwest::Client, cfg: &NewsConfig) -> Vec<Arc<dyn HeadlineProvider>> {
        cfg.countries
            .iter()
            .map(|c| Arc::new(Self::new(client.clone(), cfg, c)) as Arc<dyn HeadlineProvider>)
            .collect()
    }

    pub fn request_url(&self, api_key: &str) -> Result<reqwest::Url> {
        let max = self.max.to_string();
        reqwest::Url::parse_with_params(
            &format!("{}/top-headlines", self.base_url),
            &[
                ("apikey", api_key),
                ("lang", self.lang.as_str()),
                ("country", self.country.code.as_str()),
                ("category", self.category.as_str()),
                ("max", max.as_str()),
            ],
        )
        .context("building top-headlines url")
    }
}

#[async_trait]
impl HeadlineProvider for GNewsProvider {
    async fn fetch_latest(&self) -> Result<Vec<Article>> {
        let Some(key) = self.api_key.as_deref() else {
            tracing::debug!(source = %self.source_tag, "no api key, skipping fetch");
            return Ok(Vec::new());
        };

        let url = self.request_url(key)?;
        tracing::debug!(source = %self.source_tag, country = %self.country.name, "fetching top headlines");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("top-headlines request for {}", self.source_tag))?;

        let status = resp.status();
        if !status.is_success() {
            bail!(
                "top-headlines for {} returned {} {}",
                self.source_tag,
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            );
        }

        let body = resp
            .text()
            .await
            .with_context(|| format!("reading top-headlines body for {}", self.source_tag))?;
        let raws = parse_headlines_body(&body)?;
        let articles = normalize_batch(raws, &self.source_tag, chrono::Utc::now());

        counter!("news_articles_fetched_total", "source" => self.source_tag.clone())
            .increment(articles.len() as u64);
        tracing::info!(
            source = %self.source_tag,
            country = %self.country.name,
            count = articles.len(),
            "headlines fetched"
        );
        Ok(articles)
    }

    fn source(&self) -> &str {
        &self.source_tag
    }
}
