// src/news/dedup.rs
use crate::news::similarity::{similarity_with, SimilarityProfile};
use crate::news::types::Article;

/// Threshold plus the similarity knobs it applies to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DedupConfig {
    pub threshold: f32,
    pub profile: SimilarityProfile,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            threshold: 0.65,
            profile: SimilarityProfile::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupReport {
    pub input: usize,
    pub kept: usize,
    pub dropped: usize,
}

/// Drop near-duplicate stories, keeping the first occurrence.
///
/// Each candidate is compared with every article kept so far; if its best
/// match scores above `cfg.threshold` it is dropped, otherwise it is kept
/// with `similarity_score` set to that best score. Relative order is preserved.
pub fn remove_similar(articles: Vec<Article>, cfg: &DedupConfig) -> (Vec<Article>, DedupReport) {
    let input = articles.len();
    let mut kept: Vec<Article> = Vec::with_capacity(input);

    for mut candidate in articles {
        let mut best = 0.0f32;
        let mut best_idx: Option<usize> = None;
        for (i, existing) in kept.iter().enumerate() {
            let s = similarity_with(&candidate.title, &existing.title, cfg.profile);
            if s > best {
                best = s;
                best_idx = Some(i);
            }
        }

        match best_idx {
            Some(i) if best > cfg.threshold => {
                tracing::debug!(
                    score = %format!("{:.0}%", best * 100.0),
                    original = %kept[i].title,
                    original_country = %kept[i].source_country,
                    duplicate = %candidate.title,
                    duplicate_country = %candidate.source_country,
                    "duplicate story dropped"
                );
            }
            _ => {
                candidate.similarity_score = best;
                kept.push(candidate);
            }
        }
    }

    let report = DedupReport {
        input,
        kept: kept.len(),
        dropped: input - kept.len(),
    };
    tracing::debug!(
        input = report.input,
        kept = report.kept,
        dropped = report.dropped,
        "similarity filtering complete"
    );
    (kept, report)
}
