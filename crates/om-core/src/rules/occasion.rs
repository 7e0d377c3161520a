//! Occasion formality rules.
//!
//! Seven occasion profiles, each with a target formality and style/color/
//! category keyword preferences. Keyword matching is substring-based over the
//! free-text fields, mirroring the feed vocabulary.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use crate::{Item, Outfit};

/// Minimum occasion score an outfit needs to survive occasion filtering.
pub const DEFAULT_OCCASION_THRESHOLD: f64 = 0.6;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Occasion {
    Work,
    Casual,
    Formal,
    Date,
    Party,
    Sports,
    Travel,
}

/// Fixed evaluation order. `best_occasion` resolves ties to the earliest
/// entry, so this order is part of the behavioral contract.
pub const ALL_OCCASIONS: [Occasion; 7] = [
    Occasion::Work,
    Occasion::Casual,
    Occasion::Formal,
    Occasion::Date,
    Occasion::Party,
    Occasion::Sports,
    Occasion::Travel,
];

#[derive(Debug, Clone, Copy)]
pub struct OccasionRules {
    /// Target formality in [0,1], 1 = most formal.
    pub required_formality: f64,
    pub preferred_styles: &'static [&'static str],
    pub avoid_styles: &'static [&'static str],
    pub avoid_colors: &'static [&'static str],
    /// A single "any" entry disables the preferred-color bonus.
    pub prefer_colors: &'static [&'static str],
    pub required_categories: &'static [&'static str],
    pub avoid_categories: &'static [&'static str],
    pub prefer_categories: &'static [&'static str],
}

static WORK: OccasionRules = OccasionRules {
    required_formality: 0.7,
    preferred_styles: &["klassiek", "minimal", "sophisticated", "elegant"],
    avoid_styles: &["streetstyle", "sporty"],
    avoid_colors: &["neon", "bright pink", "hot pink", "lime"],
    prefer_colors: &["navy", "black", "grey", "white", "beige", "burgundy", "forest"],
    required_categories: &[],
    avoid_categories: &["athletic", "sportswear"],
    prefer_categories: &["blazer", "trousers", "blouse", "shirt"],
};

static CASUAL: OccasionRules = OccasionRules {
    required_formality: 0.3,
    preferred_styles: &["casual_chic", "streetstyle", "urban", "relaxed"],
    avoid_styles: &[],
    avoid_colors: &[],
    prefer_colors: &["any"],
    required_categories: &[],
    avoid_categories: &[],
    prefer_categories: &["jeans", "sneakers", "t-shirt", "sweater", "hoodie"],
};

static FORMAL: OccasionRules = OccasionRules {
    required_formality: 0.9,
    preferred_styles: &["klassiek", "elegant", "sophisticated"],
    avoid_styles: &["streetstyle", "casual_chic", "sporty"],
    avoid_colors: &["neon", "bright"],
    prefer_colors: &["black", "navy", "burgundy", "forest", "gold"],
    required_categories: &["dress"],
    avoid_categories: &["sneakers", "jeans", "t-shirt", "hoodie"],
    prefer_categories: &[],
};

static DATE: OccasionRules = OccasionRules {
    required_formality: 0.6,
    preferred_styles: &["romantic", "elegant", "casual_chic", "sophisticated"],
    avoid_styles: &[],
    avoid_colors: &[],
    prefer_colors: &["red", "burgundy", "black", "navy", "rose", "blush"],
    required_categories: &[],
    avoid_categories: &[],
    prefer_categories: &["dress", "blouse", "heels", "accessories"],
};

static PARTY: OccasionRules = OccasionRules {
    required_formality: 0.5,
    preferred_styles: &["bold", "statement", "trendy", "festive"],
    avoid_styles: &[],
    avoid_colors: &[],
    prefer_colors: &["black", "gold", "silver", "sequin", "metallic"],
    required_categories: &[],
    avoid_categories: &[],
    prefer_categories: &["dress", "heels", "statement accessories", "bold top"],
};

static SPORTS: OccasionRules = OccasionRules {
    required_formality: 0.1,
    preferred_styles: &["athletic", "sporty", "functional"],
    avoid_styles: &[],
    avoid_colors: &[],
    prefer_colors: &[],
    required_categories: &["athletic wear", "sneakers"],
    avoid_categories: &[],
    prefer_categories: &["leggings", "sports bra", "tank top", "shorts"],
};

static TRAVEL: OccasionRules = OccasionRules {
    required_formality: 0.4,
    preferred_styles: &["comfortable", "practical", "casual_chic"],
    avoid_styles: &[],
    avoid_colors: &[],
    prefer_colors: &["navy", "black", "grey", "versatile neutrals"],
    required_categories: &[],
    avoid_categories: &["delicate", "dry-clean only"],
    prefer_categories: &["comfortable", "layerable", "wrinkle-resistant"],
};

impl Occasion {
    pub fn rules(self) -> &'static OccasionRules {
        match self {
            Occasion::Work => &WORK,
            Occasion::Casual => &CASUAL,
            Occasion::Formal => &FORMAL,
            Occasion::Date => &DATE,
            Occasion::Party => &PARTY,
            Occasion::Sports => &SPORTS,
            Occasion::Travel => &TRAVEL,
        }
    }
}

lazy_static! {
    /// Type/category keyword -> formality. Checked in order, first hit wins,
    /// so the more specific "t-shirt" sits before "shirt".
    static ref FORMALITY_TABLE: Vec<(&'static str, f64)> = vec![
        ("suit", 0.9),
        ("blazer", 0.8),
        ("jacket", 0.7),
        ("dress", 0.7),
        ("t-shirt", 0.3),
        ("shirt", 0.6),
        ("blouse", 0.6),
        ("trousers", 0.6),
        ("skirt", 0.6),
        ("heels", 0.7),
        ("oxford", 0.7),
        ("loafers", 0.6),
        ("sweater", 0.5),
        ("jeans", 0.4),
        ("sneakers", 0.3),
        ("hoodie", 0.2),
        ("athletic", 0.1),
    ];
}

const BASE_FORMALITY: f64 = 0.5;

/// Derive a 0..1 formality score for one item from its category/type keywords,
/// adjusted by style tags and clamped.
pub fn item_formality(item: &Item) -> f64 {
    let category = item
        .category
        .as_deref()
        .unwrap_or("")
        .to_lowercase();
    let kind = item.kind.as_deref().unwrap_or("").to_lowercase();

    let mut formality = BASE_FORMALITY;
    for (keyword, value) in FORMALITY_TABLE.iter() {
        if category.contains(keyword) || kind.contains(keyword) {
            formality = *value;
            break;
        }
    }

    let tags: Vec<String> = item.tags.iter().map(|t| t.to_lowercase()).collect();
    if tags.iter().any(|t| t.contains("formal") || t.contains("elegant")) {
        formality += 0.2;
    }
    if tags.iter().any(|t| t.contains("casual") || t.contains("relaxed")) {
        formality -= 0.2;
    }
    if tags.iter().any(|t| t.contains("athletic") || t.contains("sport")) {
        formality -= 0.3;
    }

    formality.clamp(0.0, 1.0)
}

/// Mean item formality; 0.5 for an empty item list.
pub fn outfit_formality(items: &[Item]) -> f64 {
    if items.is_empty() {
        return BASE_FORMALITY;
    }
    items.iter().map(item_formality).sum::<f64>() / items.len() as f64
}

fn hits_any(haystacks: &[String], needles: &[&str]) -> bool {
    haystacks
        .iter()
        .any(|value| needles.iter().any(|needle| value.contains(&needle.to_lowercase())))
}

/// Score how well an outfit fits an occasion, starting from 1.0 and applying
/// signed adjustments for formality deviation, style, colors, and categories.
/// Always clamped to [0,1].
pub fn occasion_match(outfit: &Outfit, occasion: Occasion) -> f64 {
    let rules = occasion.rules();
    let mut score = 1.0_f64;

    let formality_diff = (outfit_formality(&outfit.items) - rules.required_formality).abs();
    score -= formality_diff * 0.4;

    if let Some(archetype) = outfit.archetype.as_deref() {
        let archetype = archetype.to_lowercase();
        if rules
            .preferred_styles
            .iter()
            .any(|style| archetype.contains(&style.to_lowercase()))
        {
            score += 0.1;
        } else if rules
            .avoid_styles
            .iter()
            .any(|style| archetype.contains(&style.to_lowercase()))
        {
            score -= 0.3;
        }
    }

    let outfit_colors: Vec<String> = outfit
        .items
        .iter()
        .flat_map(|item| item.colors.iter())
        .map(|c| c.to_lowercase())
        .collect();

    if hits_any(&outfit_colors, rules.avoid_colors) {
        score -= 0.15;
    }
    if rules.prefer_colors.first() != Some(&"any") && hits_any(&outfit_colors, rules.prefer_colors)
    {
        score += 0.05;
    }

    let outfit_categories: Vec<String> = outfit
        .items
        .iter()
        .map(|item| {
            format!(
                "{} {}",
                item.category.as_deref().unwrap_or(""),
                item.kind.as_deref().unwrap_or("")
            )
            .to_lowercase()
        })
        .collect();

    if hits_any(&outfit_categories, rules.avoid_categories) {
        score -= 0.15;
    }
    if hits_any(&outfit_categories, rules.prefer_categories) {
        score += 0.05;
    }
    let required_met = rules.required_categories.iter().all(|required| {
        let required = required.to_lowercase();
        outfit_categories.iter().any(|cat| cat.contains(&required))
    });
    if !required_met {
        score -= 0.2;
    }

    score.clamp(0.0, 1.0)
}

/// Keep outfits at or above the threshold, best first.
pub fn filter_outfits_by_occasion(
    outfits: Vec<Outfit>,
    occasion: Occasion,
    min_score: f64,
) -> Vec<Outfit> {
    let mut scored: Vec<(Outfit, f64)> = outfits
        .into_iter()
        .map(|outfit| {
            let score = occasion_match(&outfit, occasion);
            (outfit, score)
        })
        .filter(|(_, score)| *score >= min_score)
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().map(|(outfit, _)| outfit).collect()
}

/// Arg-max over [`ALL_OCCASIONS`]; ties resolve to the earliest occasion in
/// that fixed order.
pub fn best_occasion(outfit: &Outfit) -> (Occasion, f64) {
    let mut best = Occasion::Casual;
    let mut best_score = 0.0_f64;

    for occasion in ALL_OCCASIONS {
        let score = occasion_match(outfit, occasion);
        if score > best_score {
            best_score = score;
            best = occasion;
        }
    }

    (best, best_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::{Season, Weather};
    use crate::CategoryRatio;

    fn item_of_kind(kind: &str) -> Item {
        Item {
            id: format!("i-{kind}"),
            name: kind.to_string(),
            kind: Some(kind.to_string()),
            ..Item::default()
        }
    }

    fn base_outfit(items: Vec<Item>) -> Outfit {
        Outfit {
            id: "outfit-1".into(),
            archetype: None,
            structure: vec![],
            category_ratio: CategoryRatio::from_items(&items),
            completeness: 0,
            match_percentage: 0,
            season: Season::Autumn,
            weather: Weather::Mild,
            occasion: None,
            tags: vec![],
            items,
        }
    }

    #[test]
    fn formality_table_is_keyword_based() {
        assert_eq!(item_formality(&item_of_kind("suit")), 0.9);
        assert_eq!(item_formality(&item_of_kind("hoodie")), 0.2);
        assert_eq!(item_formality(&item_of_kind("t-shirt")), 0.3);
        // Unknown types sit at the base.
        assert_eq!(item_formality(&item_of_kind("sok")), 0.5);
    }

    #[test]
    fn tags_adjust_formality_with_clamping() {
        let mut item = item_of_kind("jeans");
        item.tags = vec!["Elegant fit".into()];
        assert!((item_formality(&item) - 0.6).abs() < 1e-9);

        let mut item = item_of_kind("hoodie");
        item.tags = vec!["sportief".into(), "casual".into()];
        assert_eq!(item_formality(&item), 0.0);
    }

    #[test]
    fn work_deducts_proportional_formality_gap() {
        // One hoodie gives outfit formality 0.2; work targets 0.7 so the
        // formality deduction alone is 0.5 * 0.4 = 0.2.
        let outfit = base_outfit(vec![item_of_kind("hoodie")]);
        let score = occasion_match(&outfit, Occasion::Work);
        assert!((score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn pathological_outfit_clamps_to_zero() {
        let mut hoodie = item_of_kind("hoodie");
        hoodie.tags = vec!["athletic".into()];
        hoodie.colors = vec!["neon green".into()];

        let mut outfit = base_outfit(vec![hoodie]);
        outfit.archetype = Some("streetstyle".into());

        assert_eq!(occasion_match(&outfit, Occasion::Formal), 0.0);
    }

    #[test]
    fn missing_required_category_costs_a_fifth() {
        // Sports requires athletic wear and sneakers; an empty outfit misses
        // both. Formality 0.5 vs target 0.1 deducts 0.16 on top.
        let outfit = base_outfit(vec![]);
        let score = occasion_match(&outfit, Occasion::Sports);
        assert!((score - (1.0 - 0.16 - 0.2)).abs() < 1e-9);
    }

    #[test]
    fn preferred_archetype_earns_bonus() {
        let mut outfit = base_outfit(vec![item_of_kind("skirt")]);
        outfit.archetype = Some("casual_chic".into());

        let plain = occasion_match(&base_outfit(vec![item_of_kind("skirt")]), Occasion::Casual);
        let boosted = occasion_match(&outfit, Occasion::Casual);
        assert!((boosted - plain - 0.1).abs() < 1e-9);
    }

    #[test]
    fn best_occasion_prefers_earliest_on_tie() {
        // Empty outfit: formality 0.5 matches party's target exactly and no
        // other occasion reaches 1.0, so party wins.
        let outfit = base_outfit(vec![]);
        let (occasion, score) = best_occasion(&outfit);
        assert_eq!(occasion, Occasion::Party);
        assert!((score - 1.0).abs() < 1e-9);

        assert_eq!(ALL_OCCASIONS[0], Occasion::Work);
        assert_eq!(ALL_OCCASIONS[6], Occasion::Travel);
    }

    #[test]
    fn occasion_filter_sorts_descending_and_applies_threshold() {
        let casual_fit = base_outfit(vec![item_of_kind("jeans"), item_of_kind("sneakers")]);
        let formal_fit = base_outfit(vec![item_of_kind("suit"), item_of_kind("oxford")]);

        let kept = filter_outfits_by_occasion(
            vec![formal_fit.clone(), casual_fit.clone()],
            Occasion::Casual,
            DEFAULT_OCCASION_THRESHOLD,
        );

        assert!(!kept.is_empty());
        assert_eq!(kept[0].items[0].kind, casual_fit.items[0].kind);
        let scores: Vec<f64> = kept
            .iter()
            .map(|o| occasion_match(o, Occasion::Casual))
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }
}
