//! Shuffle and diversity selection.
//!
//! Both mechanisms take the random source as a parameter so callers can seed
//! them for reproducible output.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::category::{group_by_category, ALL_CATEGORIES};
use crate::Item;

/// Partition by category, shuffle each partition independently, concatenate.
/// The result stays category-grouped but surfaces a different ordering per
/// call.
pub fn shuffle_by_category<R: Rng>(items: &[Item], rng: &mut R) -> Vec<Item> {
    let mut groups = group_by_category(items);
    let mut out = Vec::with_capacity(items.len());
    for category in ALL_CATEGORIES {
        if let Some(group) = groups.get_mut(&category) {
            group.shuffle(rng);
            out.append(group);
        }
    }
    out
}

/// Pairwise dissimilarity of two items. Accumulates fixed contributions for
/// differing brand, retailer, color sets, and price tier.
pub fn pair_diversity(a: &Item, b: &Item) -> f64 {
    let mut score = 0.0;

    if a.brand != b.brand {
        score += 0.3;
    }
    if a.retailer != b.retailer {
        score += 0.2;
    }

    if !a.colors.is_empty() && !b.colors.is_empty() {
        let colors_a: HashSet<String> = a.colors.iter().map(|c| c.to_lowercase()).collect();
        let colors_b: HashSet<String> = b.colors.iter().map(|c| c.to_lowercase()).collect();
        let shared = colors_a.intersection(&colors_b).count();
        if shared == 0 {
            score += 0.3;
        } else if colors_a != colors_b {
            score += 0.15;
        }
    }

    if let (Some(price_a), Some(price_b)) = (a.price, b.price) {
        if price_a > 0.0 && price_b > 0.0 {
            let avg = (price_a + price_b) / 2.0;
            let delta = (price_a - price_b).abs();
            if delta > avg * 0.5 {
                score += 0.2;
            } else if delta > avg * 0.2 {
                score += 0.1;
            }
        }
    }

    score
}

/// Greedily pick up to `count` items, each time taking the candidate with the
/// highest mean pairwise diversity against the already-selected set. The
/// first pick is random; later ties resolve to the earliest pool position.
pub fn select_diverse<R: Rng>(pool: &[Item], count: usize, rng: &mut R) -> Vec<Item> {
    if pool.is_empty() || count == 0 {
        return vec![];
    }

    let mut remaining: Vec<Item> = pool.to_vec();
    let first = rng.gen_range(0..remaining.len());
    let mut selected = vec![remaining.remove(first)];

    while selected.len() < count && !remaining.is_empty() {
        let mut best_idx = 0;
        let mut best_score = f64::NEG_INFINITY;

        for (idx, candidate) in remaining.iter().enumerate() {
            let mean: f64 = selected
                .iter()
                .map(|picked| pair_diversity(candidate, picked))
                .sum::<f64>()
                / selected.len() as f64;
            if mean > best_score {
                best_score = mean;
                best_idx = idx;
            }
        }

        selected.push(remaining.remove(best_idx));
    }

    selected
}
