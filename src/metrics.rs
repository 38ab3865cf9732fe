use anyhow::{Context, Result};
use shuttle_axum::axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and describe the news series.
    pub fn init() -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        describe_counter!("news_articles_fetched_total", "Headlines returned by upstream, per source.");
        describe_counter!("news_fetch_errors_total", "Upstream fetch/parse failures, per source.");
        describe_counter!("news_dedup_dropped_total", "Headlines dropped as near-duplicates.");
        describe_counter!("news_cache_hits_total", "Reads served from a fresh cache slot.");
        describe_counter!("news_cache_misses_total", "Reads that had to refresh.");
        describe_gauge!("news_cache_ttl_seconds", "Configured headline cache TTL.");

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
