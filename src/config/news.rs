// src/config/news.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::env_nonempty;

pub const DEFAULT_NEWS_CONFIG_PATH: &str = "config/news.toml";

pub const ENV_NEWS_CONFIG_PATH: &str = "NEWS_CONFIG_PATH";
pub const ENV_GNEWS_API_KEY: &str = "GNEWS_API_KEY";
pub const ENV_GNEWS_BASE_URL: &str = "GNEWS_BASE_URL";
pub const ENV_CACHE_TTL_SECS: &str = "NEWS_CACHE_TTL_SECS";
pub const ENV_COUNTRIES: &str = "NEWS_COUNTRIES";
pub const ENV_SELECTION_SEED: &str = "NEWS_SELECTION_SEED";

fn default_base_url() -> String {
    "https://gnews.io/api/v4".to_string()
}
fn default_lang() -> String {
    "en".to_string()
}
fn default_category() -> String {
    "world".to_string()
}
fn default_per_country_limit() -> u32 {
    10
}
fn default_max_articles() -> usize {
    5
}
fn default_cache_ttl_secs() -> u64 {
    3600
}
fn default_duplicate_threshold() -> f32 {
    0.65
}
fn default_entity_bonus() -> f32 {
    0.25
}
fn default_length_penalty() -> f32 {
    0.10
}

/// A country feed: lower-case API code plus display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryConfig {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub flag: String,
}

impl CountryConfig {
    pub fn new(code: &str, name: &str, flag: &str) -> Self {
        Self {
            code: code.to_ascii_lowercase(),
            name: name.to_string(),
            flag: flag.to_string(),
        }
    }

    /// Upper-case tag carried by articles and shown in the UI ("FR", "DE").
    pub fn display_code(&self) -> String {
        self.code.to_ascii_uppercase()
    }
}

fn default_countries() -> Vec<CountryConfig> {
    vec![
        CountryConfig::new("fr", "France", "🇫🇷"),
        CountryConfig::new("de", "Germany", "🇩🇪"),
        CountryConfig::new("it", "Italy", "🇮🇹"),
        CountryConfig::new("es", "Spain", "🇪🇸"),
    ]
}

/// Settings for the world-headlines panel: upstream query, pipeline knobs, cache TTL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    /// "ENV" (or absent) means: read from `GNEWS_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_countries")]
    pub countries: Vec<CountryConfig>,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_per_country_limit")]
    pub per_country_limit: u32,
    #[serde(default = "default_max_articles")]
    pub max_articles: usize,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_duplicate_threshold")]
    pub duplicate_threshold: f32,
    #[serde(default = "default_entity_bonus")]
    pub entity_bonus: f32,
    #[serde(default = "default_length_penalty")]
    pub length_penalty: f32,
    /// Fixed seed makes selection reproducible; `None` seeds from the OS.
    #[serde(default)]
    pub selection_seed: Option<u64>,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            countries: default_countries(),
            lang: default_lang(),
            category: default_category(),
            per_country_limit: default_per_country_limit(),
            max_articles: default_max_articles(),
            cache_ttl_secs: default_cache_ttl_secs(),
            duplicate_threshold: default_duplicate_threshold(),
            entity_bonus: default_entity_bonus(),
            length_penalty: default_length_penalty(),
            selection_seed: None,
        }
    }
}

impl NewsConfig {
    /// Parse a TOML file. Env overrides are not applied here.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading news config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: NewsConfig = toml::from_str(s).context("parsing news config toml")?;
        Ok(cfg.sanitized())
    }

    /// Resolve config the way the service boots:
    /// 1) $NEWS_CONFIG_PATH
    /// 2) config/news.toml
    /// 3) built-in defaults
    ///
    /// then apply env overrides. Unreadable files fall back to defaults.
    pub fn load_default() -> Self {
        let path = env_nonempty(ENV_NEWS_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_NEWS_CONFIG_PATH));

        let base = if path.exists() {
            match Self::load_from_file(&path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!(error = ?e, path = %path.display(), "news config unusable, using defaults");
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        base.with_env_overrides()
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Some(key) = env_nonempty(ENV_GNEWS_API_KEY) {
            if self.api_key.is_none() || self.api_key_is_env_marker() {
                self.api_key = Some(key);
            }
        }
        if let Some(url) = env_nonempty(ENV_GNEWS_BASE_URL) {
            self.base_url = url;
        }
        if let Some(ttl) = env_nonempty(ENV_CACHE_TTL_SECS) {
            match ttl.parse::<u64>() {
                Ok(v) => self.cache_ttl_secs = v,
                Err(_) => tracing::warn!(value = %ttl, "ignoring invalid {ENV_CACHE_TTL_SECS}"),
            }
        }
        if let Some(list) = env_nonempty(ENV_COUNTRIES) {
            let parsed = parse_country_list(&list);
            if !parsed.is_empty() {
                self.countries = parsed;
            }
        }
        if let Some(seed) = env_nonempty(ENV_SELECTION_SEED) {
            match seed.parse::<u64>() {
                Ok(v) => self.selection_seed = Some(v),
                Err(_) => tracing::warn!(value = %seed, "ignoring invalid {ENV_SELECTION_SEED}"),
            }
        }
        self.sanitized()
    }

    /// The usable API key, if any. The literal "ENV" marker counts as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && !k.eq_ignore_ascii_case("env"))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn country(&self, display_code: &str) -> Option<&CountryConfig> {
        self.countries
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(display_code))
    }

    fn api_key_is_env_marker(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|k| k.trim().eq_ignore_ascii_case("env"))
    }

    fn sanitized(mut self) -> Self {
        if !(0.0..=1.0).contains(&self.duplicate_threshold) {
            self.duplicate_threshold = default_duplicate_threshold();
        }
        if !(0.0..=1.0).contains(&self.entity_bonus) {
            self.entity_bonus = default_entity_bonus();
        }
        if !(0.0..=1.0).contains(&self.length_penalty) {
            self.length_penalty = default_length_penalty();
        }
        if self.max_articles == 0 {
            self.max_articles = default_max_articles();
        }
        if self.per_country_limit == 0 {
            self.per_country_limit = default_per_country_limit();
        }
        if self.cache_ttl_secs == 0 {
            self.cache_ttl_secs = default_cache_ttl_secs();
        }

        let mut seen = std::collections::HashSet::new();
        self.countries.retain(|c| {
            !c.code.trim().is_empty() && seen.insert(c.code.trim().to_ascii_lowercase())
        });
        for c in &mut self.countries {
            c.code = c.code.trim().to_ascii_lowercase();
            if c.name.is_empty() {
                c.name = c.display_code();
            }
        }
        if self.countries.is_empty() {
            self.countries = default_countries();
        }
        self
    }
}

/// "fr,de, IT" -> countries, reusing known display metadata where possible.
fn parse_country_list(s: &str) -> Vec<CountryConfig> {
    let known = default_countries();
    s.split(',')
        .map(|c| c.trim().to_ascii_lowercase())
        .filter(|c| !c.is_empty())
        .map(|code| {
            known
                .iter()
                .find(|k| k.code == code)
                .cloned()
                .unwrap_or_else(|| CountryConfig::new(&code, &code.to_ascii_uppercase(), ""))
        })
        .collect()
}
