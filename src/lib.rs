// src/lib.rs
// Public library surface for integration tests (and the binary).

pub mod api;
pub mod clock;
pub mod config;
pub mod elections;
pub mod metrics;
pub mod news;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::news::NewsService;

use shuttle_axum::axum::Router;

/// Build the full HTTP app from `config/news.toml` and env, the way the binary does
/// (minus the `/metrics` route, which needs a process-wide recorder).
pub fn app() -> anyhow::Result<Router> {
    let state = AppState::from_env()?;
    Ok(create_router(state))
}
