use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use shuttle_axum::axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::clock::{Clock, SystemClock};
use crate::config::{EditorialConfig, NewsConfig};
use crate::elections::{self, TooltipInfo};
use crate::news::providers::editorial::{group_by_day, DayGroup, EditorialClient, EditorialHeadline};
use crate::news::providers::http_client;
use crate::news::similarity::{similarity_with, SimilarityProfile};
use crate::news::{CacheStatus, CachedResult, NewsService};

/// Days shown in the editorial panel.
const EDITORIAL_DAYS: usize = 5;

#[derive(Clone)]
pub struct AppState {
    pub news: Arc<NewsService>,
    pub editorial: Arc<EditorialClient>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(news: NewsService, editorial: EditorialClient, clock: Arc<dyn Clock>) -> Self {
        Self {
            news: Arc::new(news),
            editorial: Arc::new(editorial),
            clock,
        }
    }

    /// Wire everything from `config/news.toml` + env.
    pub fn from_env() -> Result<Self> {
        let news = NewsService::from_config(NewsConfig::load_default())?;
        let editorial = EditorialClient::new(http_client()?, EditorialConfig::from_env());
        Ok(Self::new(news, editorial, Arc::new(SystemClock)))
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/news", get(news))
        .route("/api/news/refresh", post(refresh_news))
        .route("/api/news/cache", delete(clear_news_cache))
        .route("/api/news/cache-status", get(news_cache_status))
        .route("/api/headlines", get(editorial_headlines))
        .route("/api/elections", get(list_elections))
        .route("/api/elections/{code}", get(election_tooltip))
        .route("/api/similarity", get(similarity_probe))
        .route("/api/dashboard", get(dashboard))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn news(State(state): State<AppState>) -> Json<CachedResult> {
    Json(state.news.headlines().await)
}

async fn refresh_news(State(state): State<AppState>) -> Json<CachedResult> {
    Json(state.news.refresh_now().await)
}

async fn clear_news_cache(State(state): State<AppState>) -> StatusCode {
    state.news.clear();
    StatusCode::NO_CONTENT
}

async fn news_cache_status(State(state): State<AppState>) -> Json<CacheStatus> {
    Json(state.news.cache_status())
}

#[derive(Serialize)]
struct HeadlinesOut {
    headlines: Vec<EditorialHeadline>,
    by_day: Vec<DayGroup>,
}

fn headlines_out(state: &AppState, headlines: Vec<EditorialHeadline>) -> HeadlinesOut {
    let today = state.clock.now().date_naive();
    let by_day = group_by_day(&headlines, today, EDITORIAL_DAYS);
    HeadlinesOut { headlines, by_day }
}

async fn editorial_headlines(State(state): State<AppState>) -> Json<HeadlinesOut> {
    let headlines = state.editorial.fetch_headlines().await;
    Json(headlines_out(&state, headlines))
}

async fn list_elections(State(state): State<AppState>) -> Json<Vec<TooltipInfo>> {
    Json(elections::overview(state.clock.now().date_naive()))
}

async fn election_tooltip(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<TooltipInfo>, StatusCode> {
    let entry = elections::lookup(&code).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(elections::tooltip(entry, state.clock.now().date_naive())))
}

#[derive(Deserialize)]
struct SimilarityReq {
    a: String,
    b: String,
}

#[derive(Serialize)]
struct SimilarityOut {
    a: String,
    b: String,
    score: f32,
    percent: u32,
    duplicate: bool,
}

async fn similarity_probe(
    State(state): State<AppState>,
    Query(q): Query<SimilarityReq>,
) -> Json<SimilarityOut> {
    let cfg = state.news.config();
    let profile = SimilarityProfile {
        entity_bonus: cfg.entity_bonus,
        length_penalty: cfg.length_penalty,
    };
    let score = similarity_with(&q.a, &q.b, profile);
    Json(SimilarityOut {
        percent: (score * 100.0).round() as u32,
        duplicate: score > cfg.duplicate_threshold,
        score,
        a: q.a,
        b: q.b,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum PanelState {
    Ready,
    Empty,
}

impl PanelState {
    fn of(is_empty: bool) -> Self {
        if is_empty {
            PanelState::Empty
        } else {
            PanelState::Ready
        }
    }
}

#[derive(Serialize)]
struct DashboardOut {
    world_state: PanelState,
    world: CachedResult,
    editorial_state: PanelState,
    editorial: HeadlinesOut,
    elections: Vec<TooltipInfo>,
}

/// Both news panels in one round trip. Neither load can fail the other.
async fn dashboard(State(state): State<AppState>) -> Json<DashboardOut> {
    let (world, editorial) = tokio::join!(state.news.headlines(), state.editorial.fetch_headlines());
    let editorial_state = PanelState::of(editorial.is_empty());
    Json(DashboardOut {
        world_state: PanelState::of(world.is_empty()),
        world,
        editorial_state,
        editorial: headlines_out(&state, editorial),
        elections: elections::overview(state.clock.now().date_naive()),
    })
}
