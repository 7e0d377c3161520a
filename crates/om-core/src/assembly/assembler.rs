//! Outfit assembly.
//!
//! Groups scored items by category, fills required slots with the
//! highest-scoring unused candidates, and packages the result with its
//! derived metrics. Per-category candidate order is shuffled before the
//! stable sort so equally-scored items vary run to run.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};
use ulid::Ulid;

use crate::category::{
    substitute_coverage, Category, ALL_CATEGORIES, REQUIRED_CATEGORIES,
};
use crate::rules::occasion::{best_occasion, Occasion};
use crate::season::{Season, Weather};
use crate::{CategoryRatio, Outfit, ScoredItem};

/// An outfit needs at least this many placed items to exist.
const MIN_OUTFIT_ITEMS: usize = 2;

#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Number of outfits to attempt.
    pub count: usize,
    /// Primary archetype, used for tagging and occasion scoring.
    pub archetype: Option<String>,
    /// Pin the occasion tag instead of deriving the best fit.
    pub occasion: Option<Occasion>,
    pub season: Option<Season>,
    pub weather: Option<Weather>,
    /// Let a dress or jumpsuit stand in for a missing top or bottom.
    pub allow_substitutes: bool,
    /// Chance that each optional slot (accessory, outerwear) is attempted.
    pub optional_probability: f64,
    pub max_items: usize,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            count: 3,
            archetype: None,
            occasion: None,
            season: None,
            weather: None,
            allow_substitutes: true,
            optional_probability: 0.5,
            max_items: 5,
        }
    }
}

lazy_static! {
    static ref ARCHETYPE_TAGS: HashMap<&'static str, &'static [&'static str]> = {
        let mut tags: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        tags.insert("klassiek", &["elegant", "tijdloos", "verfijnd", "klassiek"]);
        tags.insert(
            "casual_chic",
            &["relaxed", "comfortable", "effortless", "modern"],
        );
        tags.insert("urban", &["functional", "practical", "edgy", "modern"]);
        tags.insert("streetstyle", &["trendy", "bold", "authentic", "creative"]);
        tags.insert("retro", &["vintage", "nostalgic", "unique", "timeless"]);
        tags.insert("luxury", &["premium", "exclusive", "sophisticated", "quality"]);
        tags
    };
}

fn season_tags(season: Season) -> &'static [&'static str] {
    match season {
        Season::Spring => &["spring", "lente", "fresh", "light"],
        Season::Summer => &["summer", "zomer", "light", "breathable"],
        Season::Autumn => &["autumn", "herfst", "layered", "cozy"],
        Season::Winter => &["winter", "warm", "cozy", "layered"],
    }
}

/// Required and optional slots for a season. Autumn and winter promote
/// outerwear to a required slot.
fn slot_plan(season: Season) -> (Vec<Category>, Vec<Category>) {
    let mut required: Vec<Category> = REQUIRED_CATEGORIES.to_vec();
    let mut optional = vec![Category::Accessory, Category::Outerwear];

    if matches!(season, Season::Autumn | Season::Winter) {
        optional.retain(|c| *c != Category::Outerwear);
        required.push(Category::Outerwear);
    }

    (required, optional)
}

/// Assemble up to `options.count` outfits from scored items. Items are never
/// reused across the returned outfits.
pub fn assemble<R: Rng>(
    scored: &[ScoredItem],
    options: &AssembleOptions,
    rng: &mut R,
) -> Vec<Outfit> {
    let season = options.season.unwrap_or_else(Season::current);
    let weather = options.weather.unwrap_or_else(|| season.typical_weather());
    let (required, optional) = slot_plan(season);

    debug!(
        candidates = scored.len(),
        season = season.as_ref(),
        weather = weather.as_ref(),
        requested = options.count,
        "assembling outfits"
    );

    let mut used: HashSet<String> = HashSet::new();
    let mut outfits = Vec::new();

    for _ in 0..options.count {
        let pools = build_pools(scored, rng);
        match assemble_one(&pools, &required, &optional, options, season, weather, &mut used, rng)
        {
            Some(outfit) => outfits.push(outfit),
            None => {
                warn!(
                    assembled = outfits.len(),
                    "not enough items left for another outfit"
                );
                break;
            }
        }
    }

    outfits
}

/// Per-category candidate lists, shuffled then stably sorted by score so
/// equal scores keep a randomized relative order.
fn build_pools<R: Rng>(
    scored: &[ScoredItem],
    rng: &mut R,
) -> HashMap<Category, Vec<ScoredItem>> {
    let mut pools: HashMap<Category, Vec<ScoredItem>> = HashMap::new();
    for category in ALL_CATEGORIES {
        pools.insert(category, Vec::new());
    }
    for entry in scored {
        pools
            .entry(entry.item.resolved_category())
            .or_default()
            .push(entry.clone());
    }
    for pool in pools.values_mut() {
        pool.shuffle(rng);
        pool.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    }
    pools
}

fn take_best(
    pools: &HashMap<Category, Vec<ScoredItem>>,
    category: Category,
    used: &HashSet<String>,
) -> Option<ScoredItem> {
    pools
        .get(&category)?
        .iter()
        .find(|entry| !used.contains(&entry.item.id))
        .cloned()
}

#[allow(clippy::too_many_arguments)]
fn assemble_one<R: Rng>(
    pools: &HashMap<Category, Vec<ScoredItem>>,
    required: &[Category],
    optional: &[Category],
    options: &AssembleOptions,
    season: Season,
    weather: Weather,
    used: &mut HashSet<String>,
    rng: &mut R,
) -> Option<Outfit> {
    let mut picked: Vec<ScoredItem> = Vec::new();
    let mut covered: Vec<Category> = Vec::new();

    for &category in required {
        if covered.contains(&category) {
            continue;
        }

        if let Some(entry) = take_best(pools, category, used) {
            used.insert(entry.item.id.clone());
            picked.push(entry);
            covered.push(category);
            continue;
        }

        // A dress or jumpsuit can cover both top and bottom at once.
        let substitutable = matches!(category, Category::Top | Category::Bottom);
        let already_substituted = covered
            .iter()
            .any(|c| matches!(c, Category::Dress | Category::Jumpsuit));
        if substitutable && options.allow_substitutes && !already_substituted {
            for substitute in [Category::Dress, Category::Jumpsuit] {
                if let Some(entry) = take_best(pools, substitute, used) {
                    used.insert(entry.item.id.clone());
                    picked.push(entry);
                    covered.push(substitute);
                    for replaced in substitute_coverage(substitute) {
                        if !covered.contains(replaced) {
                            covered.push(*replaced);
                        }
                    }
                    debug!(
                        substitute = substitute.as_ref(),
                        missing = category.as_ref(),
                        "substituted for missing slot"
                    );
                    break;
                }
            }
        }
    }

    for &category in optional {
        if picked.len() >= options.max_items || covered.contains(&category) {
            continue;
        }
        if !rng.gen_bool(options.optional_probability.clamp(0.0, 1.0)) {
            continue;
        }
        if let Some(entry) = take_best(pools, category, used) {
            used.insert(entry.item.id.clone());
            picked.push(entry);
            covered.push(category);
        }
    }

    if picked.len() < MIN_OUTFIT_ITEMS {
        // Release reservations so a later, smaller slot plan could still use them.
        for entry in &picked {
            used.remove(&entry.item.id);
        }
        return None;
    }

    let essentials_present = REQUIRED_CATEGORIES
        .iter()
        .filter(|c| covered.contains(c))
        .count();
    let completeness =
        ((essentials_present as f64 / REQUIRED_CATEGORIES.len() as f64) * 100.0).round() as u8;

    let mean_score = picked.iter().map(|e| e.score).sum::<f64>() / picked.len() as f64;
    let match_percentage = (mean_score * 100.0).round().min(100.0) as u8;

    let items: Vec<_> = picked.into_iter().map(|e| e.item).collect();
    let category_ratio = CategoryRatio::from_items(&items);

    let mut outfit = Outfit {
        id: format!("outfit-{}", Ulid::new().to_string().to_lowercase()),
        archetype: options.archetype.clone(),
        structure: covered,
        category_ratio,
        completeness,
        match_percentage,
        season,
        weather,
        occasion: None,
        tags: vec![],
        items,
    };

    let occasion = options
        .occasion
        .unwrap_or_else(|| best_occasion(&outfit).0);
    outfit.occasion = Some(occasion);
    outfit.tags = build_tags(options.archetype.as_deref(), occasion, season);

    Some(outfit)
}

fn build_tags(archetype: Option<&str>, occasion: Occasion, season: Season) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();

    if let Some(archetype) = archetype {
        tags.push(archetype.to_string());
        if let Some(extra) = ARCHETYPE_TAGS.get(archetype) {
            tags.extend(extra.iter().map(|t| t.to_string()));
        }
    }
    tags.push(occasion.as_ref().to_string());
    tags.extend(season_tags(season).iter().map(|t| t.to_string()));

    let mut seen = HashSet::new();
    tags.retain(|tag| seen.insert(tag.clone()));
    tags
}
