// src/config/editorial.rs
use serde::{Deserialize, Serialize};

use super::env_nonempty;

pub const ENV_SPACE_ID: &str = "CONTENTFUL_SPACE_ID";
pub const ENV_ACCESS_TOKEN: &str = "CONTENTFUL_ACCESS_TOKEN";
pub const ENV_BASE_URL: &str = "CONTENTFUL_BASE_URL";

/// Connection settings for the editorial entries API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorialConfig {
    pub space_id: Option<String>,
    pub access_token: Option<String>,
    pub base_url: String,
    pub environment: String,
    pub content_type: String,
    pub limit: u32,
}

impl Default for EditorialConfig {
    fn default() -> Self {
        Self {
            space_id: None,
            access_token: None,
            base_url: "https://cdn.contentful.com".to_string(),
            environment: "master".to_string(),
            content_type: "headlines".to_string(),
            limit: 20,
        }
    }
}

impl EditorialConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self {
            space_id: env_nonempty(ENV_SPACE_ID),
            access_token: env_nonempty(ENV_ACCESS_TOKEN),
            ..Self::default()
        };
        if let Some(url) = env_nonempty(ENV_BASE_URL) {
            cfg.base_url = url;
        }
        tracing::info!(
            space_id = if cfg.space_id.is_some() { "SET" } else { "MISSING" },
            access_token = if cfg.access_token.is_some() { "SET" } else { "MISSING" },
            "editorial config loaded"
        );
        cfg
    }

    /// Both credentials present.
    pub fn is_configured(&self) -> bool {
        self.space_id.is_some() && self.access_token.is_some()
    }
}
