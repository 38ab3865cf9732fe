// src/news/service.rs
//! Get-or-refresh pipeline for the world-headlines panel:
//! cache check -> concurrent fetch -> merge -> dedup -> balanced pick -> store.

use anyhow::{bail, Result};
use futures::future::join_all;
use metrics::{counter, gauge};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};

use crate::clock::{Clock, SystemClock};
use crate::config::NewsConfig;
use crate::news::cache::NewsCache;
use crate::news::dedup::{remove_similar, DedupConfig};
use crate::news::providers::gnews::GNewsProvider;
use crate::news::providers::{fetch_or_empty, http_client};
use crate::news::select::select_balanced;
use crate::news::similarity::SimilarityProfile;
use crate::news::types::{Article, CacheStatus, CachedResult, DisplayArticle, HeadlineProvider};

pub struct NewsService {
    cfg: NewsConfig,
    providers: Vec<Arc<dyn HeadlineProvider>>,
    cache: NewsCache,
    rng: Mutex<StdRng>,
}

impl NewsService {
    pub fn new(
        cfg: NewsConfig,
        providers: Vec<Arc<dyn HeadlineProvider>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let rng = match cfg.selection_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        gauge!("news_cache_ttl_seconds").set(cfg.cache_ttl_secs as f64);
        Self {
            cache: NewsCache::new(cfg.cache_ttl(), clock),
            cfg,
            providers,
            rng: Mutex::new(rng),
        }
    }

    /// Production wiring: one headlines adapter per configured country, wall clock.
    pub fn from_config(cfg: NewsConfig) -> Result<Self> {
        if cfg.api_key().is_none() {
            tracing::warn!("missing GNEWS_API_KEY; world headlines will be empty");
        }
        let client = http_client()?;
        let providers = GNewsProvider::for_config(&client, &cfg);
        Ok(Self::new(cfg, providers, Arc::new(SystemClock)))
    }

    pub fn config(&self) -> &NewsConfig {
        &self.cfg
    }

    /// Best available result; never fails.
    ///
    /// Fresh cache -> cached copy. Otherwise refresh; on failure fall back to
    /// the last stored result (stale) or an empty one.
    pub async fn headlines(&self) -> CachedResult {
        if let Some(hit) = self.cache.get() {
            counter!("news_cache_hits_total").increment(1);
            tracing::info!(articles = hit.articles.len(), "serving cached headlines");
            return hit;
        }
        counter!("news_cache_misses_total").increment(1);

        match self.refresh().await {
            Ok(fresh) => fresh,
            Err(e) => {
                tracing::warn!(error = %e, "headline refresh failed");
                match self.cache.stale() {
                    Some(stale) => {
                        tracing::info!(generated_at = %stale.generated_at, "serving stale headlines");
                        stale
                    }
                    None => CachedResult::empty(self.cache.now()),
                }
            }
        }
    }

    /// Manual cache bust: the next read goes upstream.
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Clear, then get-or-refresh.
    pub async fn refresh_now(&self) -> CachedResult {
        self.clear();
        self.headlines().await
    }

    pub fn cache_status(&self) -> CacheStatus {
        self.cache.status()
    }

    /// Run the full pipeline and store the result. Fails when no source
    /// produced a single article (all down, or no API key).
    ///
    /// Overlapping refreshes are not coalesced; whichever finishes last owns the slot.
    pub async fn refresh(&self) -> Result<CachedResult> {
        tracing::info!(sources = self.providers.len(), "fetching headlines");

        let outcomes = join_all(self.providers.iter().map(|p| fetch_or_empty(p.as_ref()))).await;

        let failed = outcomes.iter().filter(|(_, failed)| *failed).count();
        let mut pool: Vec<Article> = Vec::new();
        for (articles, _) in outcomes {
            pool.extend(articles);
        }
        for p in &self.providers {
            let n = pool
                .iter()
                .filter(|a| a.source_country.eq_ignore_ascii_case(p.source()))
                .count();
            tracing::debug!(source = %p.source(), articles = n, "raw articles collected");
        }

        if pool.is_empty() {
            bail!(
                "no articles from any source ({failed} of {} failed)",
                self.providers.len()
            );
        }

        let total = pool.len();
        let (unique, report) = remove_similar(pool, &self.dedup_config());
        counter!("news_dedup_dropped_total").increment(report.dropped as u64);

        let unique_count = unique.len();
        let sources: Vec<String> = self.cfg.countries.iter().map(|c| c.display_code()).collect();
        let picked = {
            let mut rng = self.rng.lock().expect("selection rng mutex poisoned");
            select_balanced(unique, &sources, self.cfg.max_articles, &mut *rng)
        };

        let articles = self.format_for_display(picked);
        let result = CachedResult {
            articles,
            generated_at: self.cache.now(),
            from_cache: false,
            stale: false,
            total_source_articles: total,
            unique_after_filtering: unique_count,
        };
        self.cache.store(result.clone());

        tracing::info!(
            total,
            unique = unique_count,
            selected = result.articles.len(),
            failed_sources = failed,
            distribution = %result
                .articles
                .iter()
                .map(|a| a.country.as_str())
                .collect::<Vec<_>>()
                .join(","),
            "headlines refreshed"
        );
        Ok(result)
    }

    fn dedup_config(&self) -> DedupConfig {
        DedupConfig {
            threshold: self.cfg.duplicate_threshold,
            profile: SimilarityProfile {
                entity_bonus: self.cfg.entity_bonus,
                length_penalty: self.cfg.length_penalty,
            },
        }
    }

    fn format_for_display(&self, picked: Vec<Article>) -> Vec<DisplayArticle> {
        picked
            .into_iter()
            .enumerate()
            .map(|(i, a)| {
                let (country_name, country_flag) = match self.cfg.country(&a.source_country) {
                    Some(c) => (c.name.clone(), c.flag.clone()),
                    None => (a.source_country.clone(), String::new()),
                };
                DisplayArticle {
                    number: i + 1,
                    title: a.title,
                    author: a.source_name,
                    link: a.url,
                    published_at: a.published_at,
                    country: a.source_country,
                    country_name,
                    country_flag,
                    similarity: a.similarity_score,
                }
            })
            .collect()
    }
}
