// src/news/providers/editorial.rs
//! Editorial headlines from an entries-style content API.
//!
//! Entries look like `{ sys: { createdAt }, fields: { title, author, url | link, date } }`.
//! Any field may be missing; missing credentials or any upstream error yield
//! an empty list.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::config::EditorialConfig;
use crate::news::normalize::{clean_title, parse_timestamp};

pub const NO_TITLE: &str = "No Title";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorialHeadline {
    pub title: String,
    pub author: String,
    pub link: String,
    pub date: DateTime<Utc>,
}

/// Headlines published on one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub label: String,
    pub headlines: Vec<EditorialHeadline>,
}

pub struct EditorialClient {
    client: reqwest::Client,
    cfg: EditorialConfig,
}

impl EditorialClient {
    pub fn new(client: reqwest::Client, cfg: EditorialConfig) -> Self {
        Self { client, cfg }
    }

    pub fn is_configured(&self) -> bool {
        self.cfg.is_configured()
    }

    /// Best-effort list, newest first.
    pub async fn fetch_headlines(&self) -> Vec<EditorialHeadline> {
        if !self.cfg.is_configured() {
            tracing::debug!("editorial credentials missing, skipping fetch");
            return Vec::new();
        }
        match self.try_fetch().await {
            Ok(v) => {
                if v.is_empty() {
                    tracing::warn!(
                        content_type = %self.cfg.content_type,
                        "no editorial headlines found; check the content type has published entries"
                    );
                }
                v
            }
            Err(e) => {
                tracing::warn!(error = ?e, "editorial fetch failed");
                metrics::counter!("news_fetch_errors_total", "source" => "editorial").increment(1);
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self) -> Result<Vec<EditorialHeadline>> {
        let (Some(space), Some(token)) = (self.cfg.space_id.as_deref(), self.cfg.access_token.as_deref())
        else {
            return Ok(Vec::new());
        };

        let limit = self.cfg.limit.to_string();
        let url = reqwest::Url::parse_with_params(
            &format!(
                "{}/spaces/{}/environments/{}/entries",
                self.cfg.base_url.trim_end_matches('/'),
                space,
                self.cfg.environment
            ),
            &[
                ("content_type", self.cfg.content_type.as_str()),
                ("order", "-sys.createdAt"),
                ("limit", limit.as_str()),
            ],
        )
        .context("building entries url")?;

        let resp = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .context("entries request")?;
        let status = resp.status();
        if !status.is_success() {
            bail!("entries api returned {}", status.as_u16());
        }
        let body = resp.text().await.context("reading entries body")?;
        parse_entries_body(&body, Utc::now())
    }
}

fn field_str<'a>(fields: &'a Value, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// RFC 3339 timestamp or bare `YYYY-MM-DD` (midnight UTC).
fn parse_entry_date(s: &str) -> Option<DateTime<Utc>> {
    parse_timestamp(s).or_else(|| {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    })
}

/// Turn one entry into a headline, substituting placeholders for missing fields.
pub fn entry_to_headline(entry: &Value, fallback_date: DateTime<Utc>) -> EditorialHeadline {
    let empty = Value::Null;
    let fields = entry.get("fields").unwrap_or(&empty);

    let title = field_str(fields, "title")
        .map(clean_title)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string());
    let author = field_str(fields, "author")
        .unwrap_or(UNKNOWN_AUTHOR)
        .to_string();
    let link = field_str(fields, "url")
        .or_else(|| field_str(fields, "link"))
        .unwrap_or(crate::news::normalize::MISSING_LINK)
        .to_string();
    let created = entry
        .get("sys")
        .and_then(|s| field_str(s, "createdAt"))
        .and_then(parse_entry_date);
    let date = field_str(fields, "date")
        .and_then(parse_entry_date)
        .or(created)
        .unwrap_or(fallback_date);

    EditorialHeadline {
        title,
        author,
        link,
        date,
    }
}

pub fn parse_entries_body(body: &str, fallback_date: DateTime<Utc>) -> Result<Vec<EditorialHeadline>> {
    let v: Value = serde_json::from_str(body).context("parsing entries json")?;
    Ok(v.get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|it| entry_to_headline(it, fallback_date))
                .collect()
        })
        .unwrap_or_default())
}

/// Bucket headlines into the last `days` calendar days ending `today`, newest
/// day first. Headlines outside the window are left out.
pub fn group_by_day(headlines: &[EditorialHeadline], today: NaiveDate, days: usize) -> Vec<DayGroup> {
    (0..days)
        .filter_map(|i| today.checked_sub_days(chrono::Days::new(i as u64)))
        .map(|date| DayGroup {
            date,
            label: date.format("%a, %b %-d").to_string(),
            headlines: headlines
                .iter()
                .filter(|h| h.date.date_naive() == date)
                .cloned()
                .collect(),
        })
        .collect()
}
