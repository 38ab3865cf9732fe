// src/news/similarity.rs
//! Title similarity used to spot the same story reported by several feeds.
//!
//! Score in `[0, 1]`, combined from:
//! 1. exact match after normalization (1.0)
//! 2. containment: `len(shorter) / len(longer)`
//! 3. Jaccard over words longer than 2 chars
//!    + flat bonus when both titles name the same salient entity
//!    - penalty when one title is under half the length of the other
//!
//! Pure and symmetric.

use once_cell::sync::OnceCell;
use regex::Regex;
use std::collections::BTreeSet;

/// Topics that make two otherwise loosely-worded titles likely to be one story.
pub const KEY_ENTITIES: &[&str] = &[
    "ukraine", "russia", "putin", "trump", "biden", "china", "israel", "gaza", "palestine",
    "nato", "eu", "europe", "brexit", "covid", "climate", "economy", "election",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityProfile {
    pub entity_bonus: f32,
    pub length_penalty: f32,
}

impl Default for SimilarityProfile {
    fn default() -> Self {
        Self {
            entity_bonus: 0.25,
            length_penalty: 0.10,
        }
    }
}

/// Lower-case, punctuation to spaces, collapsed whitespace.
pub fn normalize_title(s: &str) -> String {
    static RE_PUNCT: OnceCell<Regex> = OnceCell::new();
    let re_punct = RE_PUNCT.get_or_init(|| Regex::new(r"[^\w\s]").expect("punct regex"));
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("ws regex"));

    let lower = s.to_lowercase();
    let spaced = re_punct.replace_all(&lower, " ");
    re_ws.replace_all(&spaced, " ").trim().to_string()
}

fn significant_words(norm: &str) -> BTreeSet<&str> {
    norm.split(' ')
        .filter(|w| w.chars().count() > 2)
        .collect()
}

fn entities(norm: &str) -> BTreeSet<&'static str> {
    let words: BTreeSet<&str> = norm.split(' ').collect();
    KEY_ENTITIES
        .iter()
        .copied()
        .filter(|e| words.contains(e))
        .collect()
}

fn jaccard(a: &BTreeSet<&str>, b: &BTreeSet<&str>) -> f32 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f32 / union as f32
}

pub fn similarity(a: &str, b: &str) -> f32 {
    similarity_with(a, b, SimilarityProfile::default())
}

pub fn similarity_with(a: &str, b: &str, profile: SimilarityProfile) -> f32 {
    let n1 = normalize_title(a);
    let n2 = normalize_title(b);
    if n1.is_empty() || n2.is_empty() {
        return 0.0;
    }

    if n1 == n2 {
        return 1.0;
    }

    let l1 = n1.chars().count();
    let l2 = n2.chars().count();
    let (shorter, longer) = if l1 <= l2 { (l1, l2) } else { (l2, l1) };

    if n1.contains(n2.as_str()) || n2.contains(n1.as_str()) {
        return shorter as f32 / longer as f32;
    }

    let base = jaccard(&significant_words(&n1), &significant_words(&n2));

    let e1 = entities(&n1);
    let e2 = entities(&n2);
    let bonus = if e1.is_disjoint(&e2) {
        0.0
    } else {
        profile.entity_bonus
    };

    let penalty = if (shorter as f32) / (longer as f32) < 0.5 {
        profile.length_penalty
    } else {
        0.0
    };

    (base + bonus - penalty).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_strips_punctuation_and_case() {
        assert_eq!(normalize_title("  Macron's  visit: BERLIN!! "), "macron s visit berlin");
        assert_eq!(normalize_title("¿Qué pasa, España?"), "qué pasa españa");
    }

    #[test]
    fn identical_after_normalization_is_one() {
        assert_eq!(similarity("Macron visits Berlin", "macron visits berlin!"), 1.0);
    }

    #[test]
    fn containment_is_length_ratio() {
        let a = "Macron visits Berlin";
        let b = "Macron visits Berlin today";
        let expected = 20.0 / 26.0;
        assert!((similarity(a, b) - expected).abs() < 1e-6);
        assert_eq!(similarity(a, b), similarity(b, a));
    }

    #[test]
    fn empty_inputs_score_zero() {
        assert_eq!(similarity("", ""), 0.0);
        assert_eq!(similarity("", "Anything"), 0.0);
        assert_eq!(similarity("!!!", "Anything"), 0.0);
    }

    #[test]
    fn unrelated_titles_score_low() {
        let s = similarity("Economy grows 2% in second quarter", "Climate summit begins in Bonn");
        assert!(s < 0.2, "got {s}");
    }

    #[test]
    fn shared_entity_adds_bonus() {
        let a = "NATO allies meet over Ukraine support package";
        let b = "Ukraine asks allies for more air defence";
        let plain = similarity_with(
            a,
            b,
            SimilarityProfile {
                entity_bonus: 0.0,
                length_penalty: 0.1,
            },
        );
        let boosted = similarity(a, b);
        assert!((boosted - plain - 0.25).abs() < 1e-6);
    }

    #[test]
    fn entity_must_be_a_whole_word() {
        // "eu" inside "reuters" is not a mention
        assert!(entities("reuters reports").is_empty());
        assert_eq!(entities("eu leaders").len(), 1);
    }

    #[test]
    fn length_mismatch_is_penalized_and_clamped() {
        let s = similarity("Strikes", "Rail workers announce nationwide strike next week across Italy");
        assert_eq!(s, 0.0);
    }

    #[test]
    fn scores_stay_in_unit_range_and_symmetric() {
        let titles = [
            "",
            "Putin meets Xi",
            "Putin meets Xi in Beijing for trade talks",
            "Election results: far-right gains in Europe",
            "Europe election: far right gains",
            "Gaza ceasefire talks resume",
            "a b c",
        ];
        for a in titles {
            for b in titles {
                let s = similarity(a, b);
                assert!((0.0..=1.0).contains(&s), "{a:?} vs {b:?} -> {s}");
                assert!((s - similarity(b, a)).abs() < 1e-6);
            }
        }
    }
}
