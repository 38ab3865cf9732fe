// src/news/providers/fixture.rs
//! In-memory provider for tests and offline runs.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::news::types::{Article, HeadlineProvider};

enum Mode {
    Articles(Vec<Article>),
    Fail(String),
}

pub struct FixtureProvider {
    source: String,
    mode: Mode,
    calls: AtomicUsize,
    down: AtomicBool,
}

impl FixtureProvider {
    pub fn from_articles(source: &str, articles: Vec<Article>) -> Self {
        Self {
            source: source.to_ascii_uppercase(),
            mode: Mode::Articles(articles),
            calls: AtomicUsize::new(0),
            down: AtomicBool::new(false),
        }
    }

    /// Articles with the given titles and placeholder metadata.
    pub fn from_titles(source: &str, titles: &[&str]) -> Self {
        let tag = source.to_ascii_uppercase();
        let published_at = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        let articles = titles
            .iter()
            .enumerate()
            .map(|(i, t)| Article {
                title: t.to_string(),
                source_name: format!("{tag} Wire"),
                url: format!("https://fixture.local/{}/{}", tag.to_ascii_lowercase(), i),
                published_at,
                source_country: tag.clone(),
                similarity_score: 0.0,
            })
            .collect();
        Self::from_articles(&tag, articles)
    }

    /// Provider whose every fetch fails with `reason`.
    pub fn failing(source: &str, reason: &str) -> Self {
        Self {
            source: source.to_ascii_uppercase(),
            mode: Mode::Fail(reason.to_string()),
            calls: AtomicUsize::new(0),
            down: AtomicBool::new(false),
        }
    }

    /// Number of `fetch_latest` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Toggle an outage: while down, every fetch fails regardless of mode.
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }
}

#[async_trait]
impl HeadlineProvider for FixtureProvider {
    async fn fetch_latest(&self) -> Result<Vec<Article>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down.load(Ordering::SeqCst) {
            return Err(anyhow!("fixture {} is down", self.source));
        }
        match &self.mode {
            Mode::Articles(v) => Ok(v.clone()),
            Mode::Fail(reason) => Err(anyhow!("fixture {} failed: {}", self.source, reason)),
        }
    }

    fn source(&self) -> &str {
        &self.source
    }
}
