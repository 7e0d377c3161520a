pub mod advisor;
pub mod assembly;
pub mod catalog;
pub mod category;
pub mod logging;
pub mod matching;
pub mod rules;
pub mod season;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use crate::category::Category;
use crate::rules::occasion::Occasion;
use crate::season::{Season, Weather};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumString,
    PartialOrd,
    Ord,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Gender {
    Male,
    Female,
    Unisex,
}

/// Catalog item as delivered by a provider feed.
///
/// Fields stay optional on purpose: structural validation happens in the
/// filter pipeline, not at deserialization time, so a half-broken feed entry
/// can still be counted and reported instead of failing the whole load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub brand: Option<String>,
    pub retailer: Option<String>,
    /// Free-text product type from the source feed, e.g. "broek" or "sneaker".
    pub kind: Option<String>,
    /// Free-text category from the source feed; takes precedence over `kind`
    /// when resolving the closed [`Category`].
    pub category: Option<String>,
    pub gender: Option<Gender>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub image_url: Option<String>,
    pub colors: Vec<String>,
    /// Empty means suitable for all seasons.
    pub seasons: Vec<Season>,
    /// Archetype id -> 0..1 affinity. Usually a handful of entries.
    pub archetype_match: HashMap<String, f64>,
    pub tags: Vec<String>,
}

impl Item {
    /// Resolve the closed category from the free-text `category` field,
    /// falling back to `kind`.
    pub fn resolved_category(&self) -> Category {
        match self.category.as_deref() {
            Some(c) if !c.trim().is_empty() => category::resolve(c),
            _ => category::resolve(self.kind.as_deref().unwrap_or("")),
        }
    }

    pub fn in_season(&self, season: Season) -> bool {
        self.seasons.is_empty() || self.seasons.contains(&season)
    }

    pub fn suits_weather(&self, weather: Weather) -> bool {
        if self.seasons.is_empty() {
            return true;
        }
        let suitable = weather.suitable_seasons();
        self.seasons.iter().any(|s| suitable.contains(s))
    }
}

/// Weighted mixture over style archetypes for one user. Weights are
/// non-negative and need not sum to 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleProfile {
    pub weights: HashMap<String, f64>,
}

impl StyleProfile {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            weights: pairs.into_iter().collect(),
        }
    }

    /// True when no archetype carries a positive weight. Scoring degenerates
    /// to a neutral constant in that case.
    pub fn is_degenerate(&self) -> bool {
        !self.weights.values().any(|w| *w > 0.0)
    }

    /// Archetype with the largest weight, used for outfit tagging.
    pub fn primary_archetype(&self) -> Option<&str> {
        self.weights
            .iter()
            .filter(|(_, w)| **w > 0.0)
            .max_by(|a, b| {
                a.1.partial_cmp(b.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| b.0.cmp(a.0))
            })
            .map(|(name, _)| name.as_str())
    }
}

/// Item plus its fusion score and the reasons the score was non-zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub item: Item,
    /// 0..1 fusion score.
    pub score: f64,
    /// Archetype names that contributed meaningfully, for explanation layers.
    pub matched_signals: Vec<String>,
    /// Set when color-season scoring ran for this item.
    pub color_season_score: Option<f64>,
}

/// Integer percentage of outfit items per category. Each field is rounded
/// independently, so the fields are not guaranteed to sum to exactly 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRatio {
    pub top: u8,
    pub bottom: u8,
    pub footwear: u8,
    pub accessory: u8,
    pub outerwear: u8,
    pub dress: u8,
    pub jumpsuit: u8,
    pub other: u8,
}

impl CategoryRatio {
    pub fn from_items(items: &[Item]) -> Self {
        let mut counts: HashMap<Category, usize> = HashMap::new();
        for item in items {
            *counts.entry(item.resolved_category()).or_insert(0) += 1;
        }

        let total = items.len().max(1) as f64;
        let pct = |category: Category| -> u8 {
            let count = counts.get(&category).copied().unwrap_or(0) as f64;
            (count / total * 100.0).round() as u8
        };

        Self {
            top: pct(Category::Top),
            bottom: pct(Category::Bottom),
            footwear: pct(Category::Footwear),
            accessory: pct(Category::Accessory),
            outerwear: pct(Category::Outerwear),
            dress: pct(Category::Dress),
            jumpsuit: pct(Category::Jumpsuit),
            other: pct(Category::Other),
        }
    }
}

/// Assembled outfit. Derived fields are computed once at construction and
/// never mutated; re-scored variants are new values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outfit {
    pub id: String,
    pub archetype: Option<String>,
    pub items: Vec<Item>,
    /// Categories covered, including those satisfied through substitution.
    pub structure: Vec<Category>,
    pub category_ratio: CategoryRatio,
    /// Percentage of {top, bottom, footwear} present: 0, 33, 67, or 100.
    pub completeness: u8,
    /// Mean fusion score of the items, scaled to 0..100.
    pub match_percentage: u8,
    pub season: Season,
    pub weather: Weather,
    pub occasion: Option<Occasion>,
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_item() -> Item {
        Item {
            id: "item-1".into(),
            name: "Slim jeans".into(),
            kind: Some("jeans".into()),
            price: Some(79.95),
            ..Item::default()
        }
    }

    #[test]
    fn category_field_wins_over_kind() {
        let mut item = base_item();
        item.category = Some("schoenen".into());

        assert_eq!(item.resolved_category(), Category::Footwear);
    }

    #[test]
    fn blank_category_falls_back_to_kind() {
        let mut item = base_item();
        item.category = Some("  ".into());

        assert_eq!(item.resolved_category(), Category::Bottom);
    }

    #[test]
    fn empty_season_list_means_all_seasons() {
        let item = base_item();

        assert!(item.in_season(Season::Winter));
        assert!(item.suits_weather(Weather::Snowy));
    }

    #[test]
    fn degenerate_profile_detection() {
        assert!(StyleProfile::default().is_degenerate());
        assert!(StyleProfile::from_pairs([("urban".to_string(), 0.0)]).is_degenerate());
        assert!(!StyleProfile::from_pairs([("urban".to_string(), 0.4)]).is_degenerate());
    }

    #[test]
    fn primary_archetype_is_heaviest_weight() {
        let profile = StyleProfile::from_pairs([
            ("klassiek".to_string(), 0.7),
            ("urban".to_string(), 0.3),
        ]);

        assert_eq!(profile.primary_archetype(), Some("klassiek"));
    }

    #[test]
    fn category_ratio_rounds_per_category() {
        let items = vec![
            Item {
                kind: Some("trui".into()),
                ..base_item()
            },
            Item {
                kind: Some("broek".into()),
                ..base_item()
            },
            Item {
                kind: Some("sneaker".into()),
                ..base_item()
            },
        ];

        let ratio = CategoryRatio::from_items(&items);
        assert_eq!(ratio.top, 33);
        assert_eq!(ratio.bottom, 33);
        assert_eq!(ratio.footwear, 33);
        // Independent rounding: the fields do not sum to 100 here.
        assert_eq!(ratio.top + ratio.bottom + ratio.footwear, 99);
    }
}
