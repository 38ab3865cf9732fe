// src/news/normalize.rs
//! Shaping of partial upstream records into typed articles.
//!
//! Defaulting rules:
//! - missing/blank title: "Untitled"
//! - missing source name: "Unknown Source" (a bare string `source` is taken as the name)
//! - missing url: "#"
//! - missing/unparseable `publishedAt`: fetch time
//!
//! A field of the wrong type counts as missing. A malformed field never costs
//! the record, and a malformed record never fails the batch it arrived in.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde_json::Value;

use crate::news::types::{Article, RawArticle, RawSource};

pub const UNKNOWN_SOURCE: &str = "Unknown Source";
pub const MISSING_LINK: &str = "#";
pub const UNTITLED: &str = "Untitled";

/// Decode HTML entities, strip tags, collapse whitespace.
pub fn clean_title(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
    let stripped = re_tags.replace_all(&decoded, "");

    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("ws regex"));
    re_ws.replace_all(&stripped, " ").trim().to_string()
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn normalize_article(
    raw: RawArticle,
    source_country: &str,
    fetched_at: DateTime<Utc>,
) -> Article {
    let title = non_blank(raw.title)
        .map(|t| clean_title(&t))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    let source_name = raw
        .source
        .and_then(|s| non_blank(s.name))
        .unwrap_or_else(|| UNKNOWN_SOURCE.to_string());
    let url = non_blank(raw.url).unwrap_or_else(|| MISSING_LINK.to_string());
    let published_at = raw
        .published_at
        .as_deref()
        .and_then(parse_timestamp)
        .unwrap_or(fetched_at);

    Article {
        title,
        source_name,
        url,
        published_at,
        source_country: source_country.to_ascii_uppercase(),
        similarity_score: 0.0,
    }
}

pub fn normalize_batch(
    raws: Vec<RawArticle>,
    source_country: &str,
    fetched_at: DateTime<Utc>,
) -> Vec<Article> {
    raws.into_iter()
        .map(|r| normalize_article(r, source_country, fetched_at))
        .collect()
}

fn value_str(v: &Value, key: &str) -> Option<String> {
    v.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Field-by-field read of one upstream record. `None` only for non-objects.
fn raw_article(item: &Value) -> Option<RawArticle> {
    if !item.is_object() {
        return None;
    }
    let source = match item.get("source") {
        Some(Value::Object(_)) => Some(RawSource {
            name: item.get("source").and_then(|s| value_str(s, "name")),
        }),
        Some(Value::String(name)) => Some(RawSource {
            name: Some(name.clone()),
        }),
        _ => None,
    };
    Some(RawArticle {
        title: value_str(item, "title"),
        url: value_str(item, "url"),
        published_at: value_str(item, "publishedAt"),
        source,
    })
}

/// Parse a headlines response body. Invalid JSON is an error; a missing or
/// non-array `articles` field is an empty batch. Array entries that are not
/// objects carry no fields and are skipped.
pub fn parse_headlines_body(body: &str) -> Result<Vec<RawArticle>> {
    let v: Value = serde_json::from_str(body).context("parsing headlines json")?;
    let Some(items) = v.get("articles").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };
    let raws: Vec<RawArticle> = items.iter().filter_map(raw_article).collect();
    if raws.len() < items.len() {
        tracing::debug!(skipped = items.len() - raws.len(), "skipped non-object headline entries");
    }
    Ok(raws)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
    }

    #[test]
    fn clean_title_decodes_and_collapses() {
        assert_eq!(
            clean_title("  Macron&nbsp;visits <b>Berlin</b>\n today "),
            "Macron visits Berlin today"
        );
    }

    #[test]
    fn missing_fields_get_placeholders() {
        let raw = RawArticle {
            title: Some("EU summit opens".into()),
            url: None,
            published_at: Some("garbage".into()),
            source: Some(RawSource { name: Some("  ".into()) }),
        };
        let a = normalize_article(raw, "fr", now());
        assert_eq!(a.source_name, UNKNOWN_SOURCE);
        assert_eq!(a.url, MISSING_LINK);
        assert_eq!(a.published_at, now());
        assert_eq!(a.source_country, "FR");
    }

    #[test]
    fn untitled_record_gets_placeholder() {
        let raws = vec![
            RawArticle::default(),
            RawArticle {
                title: Some("Climate summit begins".into()),
                published_at: Some("2026-10-15T08:00:00Z".into()),
                ..RawArticle::default()
            },
        ];
        let out = normalize_batch(raws, "DE", now());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].title, UNTITLED);
        assert_eq!(out[0].url, MISSING_LINK);
        assert_eq!(out[0].published_at, now());
        assert_eq!(
            out[1].published_at,
            Utc.with_ymd_and_hms(2026, 10, 15, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn body_parsing_tolerates_schema_drift() {
        let body = r#"{
            "totalArticles": 3,
            "articles": [
                {"title": "A", "url": "https://a", "publishedAt": "2026-10-16T07:00:00Z", "source": {"name": "Le Monde"}},
                {"title": 42},
                {"title": "B", "source": null}
            ]
        }"#;
        let raws = parse_headlines_body(body).unwrap();
        assert_eq!(raws.len(), 3);
        assert_eq!(raws[1].title, None);
        assert_eq!(raws[2].title.as_deref(), Some("B"));
        assert_eq!(raws[2].source, None);

        assert!(parse_headlines_body(r#"{"errors": ["quota"]}"#).unwrap().is_empty());
        assert!(parse_headlines_body("<html>").is_err());
    }

    #[test]
    fn wrong_typed_fields_fall_back_per_field() {
        let body = r#"{"articles": [
            {"title": "Kept"},
            {"title": "Reuters story", "source": "Reuters"},
            {"title": "Epoch stamp", "publishedAt": 1760000000, "url": ["x"]},
            {"url": "https://d.test/4"},
            null
        ]}"#;
        let out = normalize_batch(parse_headlines_body(body).unwrap(), "it", now());
        assert_eq!(out.len(), 4);
        assert_eq!(out[1].source_name, "Reuters");
        assert_eq!(out[2].title, "Epoch stamp");
        assert_eq!(out[2].published_at, now());
        assert_eq!(out[2].url, MISSING_LINK);
        assert_eq!(out[3].title, UNTITLED);
        assert_eq!(out[3].url, "https://d.test/4");
        assert!(out.iter().all(|a| a.source_country == "IT"));
    }
}
