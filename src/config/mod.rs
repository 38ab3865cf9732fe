// src/config/mod.rs
pub mod editorial;
pub mod news;

pub use editorial::EditorialConfig;
pub use news::{CountryConfig, NewsConfig};

/// Read a non-empty, trimmed env var.
pub(crate) fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
