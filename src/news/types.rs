// src/news/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A headline after normalization. `source_country` is the upper-case feed tag
/// ("FR"), `similarity_score` is diagnostic only (set by the dedup filter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub source_name: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub source_country: String,
    pub similarity_score: f32,
}

/// Upstream headline exactly as the headlines API sends it; every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "publishedAt")]
    pub published_at: Option<String>,
    #[serde(default)]
    pub source: Option<RawSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSource {
    #[serde(default)]
    pub name: Option<String>,
}

/// Headline as handed to the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayArticle {
    pub number: usize,
    pub title: String,
    pub author: String,
    pub link: String,
    pub published_at: DateTime<Utc>,
    pub country: String,
    pub country_name: String,
    pub country_flag: String,
    pub similarity: f32,
}

/// One aggregation cycle's output. `from_cache` is true iff no upstream fetch
/// produced it; `stale` marks a fallback served after a failed refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResult {
    pub articles: Vec<DisplayArticle>,
    pub generated_at: DateTime<Utc>,
    pub from_cache: bool,
    #[serde(default)]
    pub stale: bool,
    pub total_source_articles: usize,
    pub unique_after_filtering: usize,
}

impl CachedResult {
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            articles: Vec::new(),
            generated_at: now,
            from_cache: false,
            stale: false,
            total_source_articles: 0,
            unique_after_filtering: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Diagnostics for the cache slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStatus {
    pub has_cached_data: bool,
    pub cache_timestamp: Option<DateTime<Utc>>,
    pub cache_age_minutes: Option<i64>,
    pub cache_valid: bool,
    pub ttl_minutes: u64,
}

/// One upstream feed. Implementations return `Err` on transport/status/parse
/// failures; the aggregation step turns those into "no articles from this source".
#[async_trait::async_trait]
pub trait HeadlineProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<Article>>;
    /// Upper-case feed tag, matching `Article::source_country`.
    fn source(&self) -> &str;
}
