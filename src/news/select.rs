// src/news/select.rs
//! Source-balanced random pick of the articles to display.
//!
//! Randomness is deliberate (variety between refreshes); callers pass the RNG
//! so tests can seed it.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::news::types::Article;

/// Pick `min(max, pool.len())` articles.
///
/// 1. For each source in `sources` order, take one random article of that source.
/// 2. Fill the remaining slots uniformly at random from what is left.
/// 3. Shuffle so the selection order does not leak into display order.
pub fn select_balanced<R: Rng + ?Sized>(
    mut pool: Vec<Article>,
    sources: &[String],
    max: usize,
    rng: &mut R,
) -> Vec<Article> {
    let want = max.min(pool.len());
    let mut selected = Vec::with_capacity(want);

    for source in sources {
        if selected.len() >= want {
            break;
        }
        let candidates: Vec<usize> = pool
            .iter()
            .enumerate()
            .filter(|(_, a)| a.source_country.eq_ignore_ascii_case(source))
            .map(|(i, _)| i)
            .collect();
        if candidates.is_empty() {
            continue;
        }
        let pick = candidates[rng.random_range(0..candidates.len())];
        let article = pool.remove(pick);
        tracing::debug!(source = %article.source_country, title = %article.title, "balanced pick");
        selected.push(article);
    }

    while selected.len() < want && !pool.is_empty() {
        let idx = rng.random_range(0..pool.len());
        let article = pool.remove(idx);
        tracing::debug!(source = %article.source_country, title = %article.title, "random fill");
        selected.push(article);
    }

    selected.shuffle(rng);
    selected
}
