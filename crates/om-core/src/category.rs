//! Closed product categories and the keyword mapping that resolves them from
//! the free-text type/category strings carried by retailer feeds.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use strum::AsRefStr;

use crate::Item;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Top,
    Bottom,
    Footwear,
    Outerwear,
    Accessory,
    Dress,
    Jumpsuit,
    Other,
}

/// Fixed iteration order for grouping and shuffling.
pub const ALL_CATEGORIES: [Category; 8] = [
    Category::Top,
    Category::Bottom,
    Category::Footwear,
    Category::Outerwear,
    Category::Accessory,
    Category::Dress,
    Category::Jumpsuit,
    Category::Other,
];

/// Categories every outfit should cover.
pub const REQUIRED_CATEGORIES: [Category; 3] =
    [Category::Top, Category::Bottom, Category::Footwear];

/// Categories that can stand in for several required ones at once.
pub fn substitute_coverage(category: Category) -> &'static [Category] {
    match category {
        Category::Dress | Category::Jumpsuit => &[Category::Top, Category::Bottom],
        _ => &[],
    }
}

lazy_static! {
    /// Ordered keyword table; the first group with a substring hit wins.
    /// Mostly Dutch feed vocabulary with the common English aliases.
    static ref CATEGORY_KEYWORDS: Vec<(&'static str, Category)> = vec![
        ("trui", Category::Top),
        ("shirt", Category::Top),
        ("blouse", Category::Top),
        ("top", Category::Top),
        ("t-shirt", Category::Top),
        ("polo", Category::Top),
        ("broek", Category::Bottom),
        ("jeans", Category::Bottom),
        ("rok", Category::Bottom),
        ("short", Category::Bottom),
        ("legging", Category::Bottom),
        ("schoen", Category::Footwear),
        ("sneaker", Category::Footwear),
        ("laars", Category::Footwear),
        ("pump", Category::Footwear),
        ("sandaal", Category::Footwear),
        ("jas", Category::Outerwear),
        ("jack", Category::Outerwear),
        ("coat", Category::Outerwear),
        ("blazer", Category::Outerwear),
        ("jasje", Category::Outerwear),
        ("accessoire", Category::Accessory),
        ("tas", Category::Accessory),
        ("riem", Category::Accessory),
        ("sjaal", Category::Accessory),
        ("zonnebril", Category::Accessory),
        ("horloge", Category::Accessory),
        ("sieraad", Category::Accessory),
        ("handschoen", Category::Accessory),
        ("muts", Category::Accessory),
        ("pet", Category::Accessory),
        ("jurk", Category::Dress),
        ("dress", Category::Dress),
        ("jumpsuit", Category::Jumpsuit),
        ("overall", Category::Jumpsuit),
    ];
}

/// Map a free-text type or category string onto the closed category set.
/// Unknown or empty input resolves to [`Category::Other`], which can still be
/// ranked but never fills an outfit slot.
pub fn resolve(type_or_category: &str) -> Category {
    let lower = type_or_category.to_lowercase();
    if lower.trim().is_empty() {
        return Category::Other;
    }

    for (keyword, category) in CATEGORY_KEYWORDS.iter() {
        if lower.contains(keyword) {
            return *category;
        }
    }

    Category::Other
}

pub fn group_by_category(items: &[Item]) -> HashMap<Category, Vec<Item>> {
    let mut groups: HashMap<Category, Vec<Item>> = HashMap::new();
    for category in ALL_CATEGORIES {
        groups.entry(category).or_default();
    }
    for item in items {
        groups
            .entry(item.resolved_category())
            .or_default()
            .push(item.clone());
    }
    groups
}

pub fn category_counts(items: &[Item]) -> HashMap<Category, usize> {
    let mut counts = HashMap::new();
    for item in items {
        *counts.entry(item.resolved_category()).or_insert(0) += 1;
    }
    counts
}
