//! Election & news dashboard backend — binary entrypoint.
//! Boots the Axum HTTP server, wiring routes, shared state, and metrics.

use europulse::{api, metrics::Metrics};
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Local tracing setup. Shuttle installs its own subscriber in deployed runs,
/// so this only kicks in when EUROPULSE_DEV_LOG=1 in a dev environment
/// (debug build OR SHUTTLE_ENV in {local, development, dev}).
/// LOG_FORMAT=json switches to JSON lines.
fn enable_dev_tracing() {
    let dev_flag = std::env::var("EUROPULSE_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("europulse=info,warn"));

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let res = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
    };
    if let Err(e) = res {
        eprintln!("tracing already initialized: {e}");
    }
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let metrics = Metrics::init()?;
    let state = api::AppState::from_env()?;
    tracing::info!(
        countries = state.news.config().countries.len(),
        ttl_secs = state.news.config().cache_ttl_secs,
        "news service ready"
    );

    let router = api::create_router(state).merge(metrics.router());
    Ok(router.into())
}
