//! # Elections
//! Static reference table of upcoming national elections in Europe, keyed by
//! ISO country code, plus the tooltip helpers the map uses on hover.
//!
//! The table is built once on first use and never mutated. Map shapes carry
//! lower- or upper-case ids, so lookups ignore ASCII case.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElectionEntry {
    pub country_code: &'static str,
    pub country_name: &'static str,
    pub next_election: NaiveDate,
    pub election_type: &'static str,
}

// (code, name, (y, m, d), type)
const TABLE: &[(&str, &str, (i32, u32, u32), &str)] = &[
    ("DE", "Germany", (2025, 2, 23), "Federal Election (Bundestag) - COMPLETED"),
    ("RO", "Romania", (2025, 5, 18), "Presidential Election (2nd Round) - COMPLETED"),
    ("PL", "Poland", (2025, 6, 1), "Presidential Election (2nd Round) - UPCOMING"),
    ("CZ", "Czech Republic", (2025, 10, 11), "Parliamentary Election"),
    ("NO", "Norway", (2025, 9, 8), "Parliamentary Election"),
    ("FI", "Finland", (2026, 4, 19), "Parliamentary Election"),
    ("HU", "Hungary", (2026, 4, 26), "Parliamentary Election"),
    ("SE", "Sweden", (2026, 9, 13), "General Election"),
    ("NL", "Netherlands", (2026, 3, 15), "General Election"),
    ("IE", "Ireland", (2026, 2, 7), "General Election"),
    ("PT", "Portugal", (2026, 1, 11), "Presidential Election"),
    ("DK", "Denmark", (2026, 6, 5), "General Election"),
    ("IT", "Italy", (2027, 6, 7), "General Election"),
    ("FR", "France", (2027, 4, 10), "Presidential Election (1st Round)"),
    ("GR", "Greece", (2027, 6, 25), "Parliamentary Election"),
    ("CH", "Switzerland", (2027, 10, 17), "Federal Election"),
    ("BE", "Belgium", (2028, 5, 26), "Federal Election"),
    ("ES", "Spain", (2027, 12, 20), "General Election"),
    ("AT", "Austria", (2029, 9, 29), "National Council Election"),
    ("BG", "Bulgaria", (2027, 4, 4), "Parliamentary Election"),
    // No fixed date; latest possible date after the 2024 vote.
    ("UK", "United Kingdom", (2029, 1, 28), "General Election (latest possible date)"),
];

static ELECTIONS: Lazy<Vec<ElectionEntry>> = Lazy::new(|| {
    TABLE
        .iter()
        .filter_map(|&(code, name, (y, m, d), kind)| {
            let date = NaiveDate::from_ymd_opt(y, m, d);
            if date.is_none() {
                tracing::warn!(code, "invalid election date in table, skipping");
            }
            date.map(|next_election| ElectionEntry {
                country_code: code,
                country_name: name,
                next_election,
                election_type: kind,
            })
        })
        .collect()
});

/// Every entry, in table order.
pub fn all() -> &'static [ElectionEntry] {
    &ELECTIONS
}

/// Exact code match (ASCII case-insensitive). `GB` is accepted for `UK`.
pub fn lookup(code: &str) -> Option<&'static ElectionEntry> {
    let code = code.trim();
    let code = if code.eq_ignore_ascii_case("gb") { "UK" } else { code };
    ELECTIONS
        .iter()
        .find(|e| e.country_code.eq_ignore_ascii_case(code))
}

/// Calendar days from `today` to the election; negative once it has passed.
pub fn days_until(entry: &ElectionEntry, today: NaiveDate) -> i64 {
    (entry.next_election - today).num_days()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ElectionStatus {
    Upcoming { days: i64 },
    Today,
    Passed,
}

impl ElectionStatus {
    pub fn from_days(days: i64) -> Self {
        match days {
            d if d > 0 => ElectionStatus::Upcoming { days: d },
            0 => ElectionStatus::Today,
            _ => ElectionStatus::Passed,
        }
    }

    pub fn label(&self) -> String {
        match self {
            ElectionStatus::Upcoming { days: 1 } => "1 day remaining".to_string(),
            ElectionStatus::Upcoming { days } => format!("{days} days remaining"),
            ElectionStatus::Today => "Election day is today".to_string(),
            ElectionStatus::Passed => "Election day has passed".to_string(),
        }
    }
}

/// Everything the hover tooltip renders for one country.
#[derive(Debug, Clone, Serialize)]
pub struct TooltipInfo {
    pub country_code: &'static str,
    pub name: &'static str,
    pub election_type: &'static str,
    pub date: NaiveDate,
    pub date_label: String,
    pub status: ElectionStatus,
    pub status_label: String,
}

pub fn tooltip(entry: &'static ElectionEntry, today: NaiveDate) -> TooltipInfo {
    let status = ElectionStatus::from_days(days_until(entry, today));
    TooltipInfo {
        country_code: entry.country_code,
        name: entry.country_name,
        election_type: entry.election_type,
        date: entry.next_election,
        date_label: entry.next_election.format("%B %-d, %Y").to_string(),
        status,
        status_label: status.label(),
    }
}

/// Tooltip rows for the whole table, soonest election first.
pub fn overview(today: NaiveDate) -> Vec<TooltipInfo> {
    let mut rows: Vec<_> = all().iter().map(|e| tooltip(e, today)).collect();
    rows.sort_by_key(|r| r.date);
    rows
}
