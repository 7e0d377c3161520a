//! Multi-stage catalog filter pipeline.
//!
//! Stages run in a fixed order (gender, budget, validation, excluded ids,
//! category/brand allow-lists, minimum rating), each operating only on the
//! survivors of the previous stage. Every drop is logged with a reason string
//! so the advisor can explain the outcome afterwards.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{Gender, Item};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub gender: Option<Gender>,
    pub budget: Option<Budget>,
    pub exclude_ids: Vec<String>,
    /// Exact free-text category/type allow-list; empty means no restriction.
    pub categories: Vec<String>,
    /// Brand allow-list, matched case-insensitively; empty means no restriction.
    pub brands: Vec<String>,
    pub min_rating: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    pub initial: usize,
    pub after_gender: usize,
    pub after_budget: usize,
    pub after_validation: usize,
    pub final_count: usize,
}

impl FilterStats {
    /// Share of items that survived the whole pipeline, in 0..1.
    pub fn retention_rate(&self) -> f64 {
        if self.initial == 0 {
            return 0.0;
        }
        self.final_count as f64 / self.initial as f64
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemovedItems {
    pub gender: Vec<String>,
    pub budget: Vec<String>,
    pub validation: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterResult {
    pub items: Vec<Item>,
    pub stats: FilterStats,
    pub removed: RemovedItems,
}

/// Run the full filter pipeline over a catalog.
pub fn filter_items(items: &[Item], criteria: &FilterCriteria) -> FilterResult {
    let mut stats = FilterStats {
        initial: items.len(),
        ..FilterStats::default()
    };
    let mut removed = RemovedItems::default();

    debug!(initial = stats.initial, "starting filter pipeline");

    let mut filtered = filter_by_gender(items.to_vec(), criteria.gender, &mut removed.gender);
    stats.after_gender = filtered.len();
    debug!(
        kept = stats.after_gender,
        dropped = stats.initial - stats.after_gender,
        "gender stage done"
    );

    filtered = filter_by_budget(filtered, criteria.budget, &mut removed.budget);
    stats.after_budget = filtered.len();
    debug!(
        kept = stats.after_budget,
        dropped = stats.after_gender - stats.after_budget,
        "budget stage done"
    );

    filtered = filter_by_validation(filtered, &mut removed.validation);
    stats.after_validation = filtered.len();
    debug!(
        kept = stats.after_validation,
        dropped = stats.after_budget - stats.after_validation,
        "validation stage done"
    );

    if !criteria.exclude_ids.is_empty() {
        let exclude: HashSet<&str> = criteria.exclude_ids.iter().map(String::as_str).collect();
        filtered.retain(|item| !exclude.contains(item.id.as_str()));
        debug!(kept = filtered.len(), "id exclusion done");
    }

    if !criteria.categories.is_empty() {
        filtered.retain(|item| {
            criteria.categories.iter().any(|wanted| {
                item.category.as_deref() == Some(wanted.as_str())
                    || item.kind.as_deref() == Some(wanted.as_str())
            })
        });
        debug!(kept = filtered.len(), "category allow-list done");
    }

    if !criteria.brands.is_empty() {
        let brands: HashSet<String> = criteria.brands.iter().map(|b| b.to_lowercase()).collect();
        filtered.retain(|item| {
            item.brand
                .as_deref()
                .map(|b| brands.contains(&b.to_lowercase()))
                .unwrap_or(false)
        });
        debug!(kept = filtered.len(), "brand allow-list done");
    }

    if let Some(min_rating) = criteria.min_rating {
        filtered.retain(|item| item.rating.map(|r| r >= min_rating).unwrap_or(false));
        debug!(kept = filtered.len(), "rating stage done");
    }

    stats.final_count = filtered.len();

    info!(
        initial = stats.initial,
        final_count = stats.final_count,
        removed_gender = removed.gender.len(),
        removed_budget = removed.budget.len(),
        removed_validation = removed.validation.len(),
        retention = format!("{:.1}%", stats.retention_rate() * 100.0),
        "filter pipeline done"
    );

    FilterResult {
        items: filtered,
        stats,
        removed,
    }
}

/// Keep items with no gender, unisex items, and exact matches. No criteria
/// gender (or unisex) passes everything through.
fn filter_by_gender(
    items: Vec<Item>,
    gender: Option<Gender>,
    removed: &mut Vec<String>,
) -> Vec<Item> {
    let wanted = match gender {
        None | Some(Gender::Unisex) => return items,
        Some(g) => g,
    };

    items
        .into_iter()
        .filter(|item| match item.gender {
            None | Some(Gender::Unisex) => true,
            Some(g) if g == wanted => true,
            Some(g) => {
                removed.push(format!(
                    "{} ({}): gender mismatch - wanted {}, got {}",
                    item.id,
                    item.name,
                    wanted.as_ref(),
                    g.as_ref()
                ));
                false
            }
        })
        .collect()
}

/// Items without a usable price pass through; validation warns about them.
fn filter_by_budget(
    items: Vec<Item>,
    budget: Option<Budget>,
    removed: &mut Vec<String>,
) -> Vec<Item> {
    let budget = match budget {
        Some(b) if b.min.is_some() || b.max.is_some() => b,
        _ => return items,
    };

    items
        .into_iter()
        .filter(|item| {
            let price = match item.price {
                Some(p) if p > 0.0 => p,
                _ => return true,
            };

            if let Some(max) = budget.max {
                if price > max {
                    removed.push(format!(
                        "{} ({}): €{price} exceeds max budget €{max}",
                        item.id, item.name
                    ));
                    return false;
                }
            }
            if let Some(min) = budget.min {
                if price < min {
                    removed.push(format!(
                        "{} ({}): €{price} below min budget €{min}",
                        item.id, item.name
                    ));
                    return false;
                }
            }
            true
        })
        .collect()
}

/// Drop items missing id, name, or category; warn (but keep) on missing
/// image or price, which a fallback-image collaborator papers over.
fn filter_by_validation(items: Vec<Item>, removed: &mut Vec<String>) -> Vec<Item> {
    items
        .into_iter()
        .filter(|item| {
            if item.id.trim().is_empty() {
                removed.push("item missing id".into());
                return false;
            }
            if item.name.trim().is_empty() {
                removed.push(format!("{}: missing name", item.id));
                return false;
            }
            let has_category = item
                .category
                .as_deref()
                .map(|c| !c.trim().is_empty())
                .unwrap_or(false)
                || item
                    .kind
                    .as_deref()
                    .map(|k| !k.trim().is_empty())
                    .unwrap_or(false);
            if !has_category {
                removed.push(format!("{} ({}): missing category", item.id, item.name));
                return false;
            }

            if item.image_url.is_none() {
                warn!(item = %item.id, "missing image url");
            }
            if !matches!(item.price, Some(p) if p > 0.0) {
                warn!(item = %item.id, "missing or invalid price");
            }

            true
        })
        .collect()
}

/// Render a filter result as a multi-line diagnostic report with capped
/// removal examples.
pub fn filtering_report(result: &FilterResult) -> String {
    let mut lines = vec![
        "=== Catalog Filtering Stats ===".to_string(),
        format!("Initial items: {}", result.stats.initial),
        format!(
            "After gender filter: {} ({} removed)",
            result.stats.after_gender,
            result.removed.gender.len()
        ),
        format!(
            "After budget filter: {} ({} removed)",
            result.stats.after_budget,
            result.removed.budget.len()
        ),
        format!(
            "After validation: {} ({} removed)",
            result.stats.after_validation,
            result.removed.validation.len()
        ),
        format!("Final items: {}", result.stats.final_count),
        format!(
            "Retention rate: {:.1}%",
            result.stats.retention_rate() * 100.0
        ),
    ];

    for (label, reasons) in [
        ("gender", &result.removed.gender),
        ("budget", &result.removed.budget),
        ("validation", &result.removed.validation),
    ] {
        if reasons.is_empty() {
            continue;
        }
        lines.push(format!("\nRemoved by {label}:"));
        for reason in reasons.iter().take(5) {
            lines.push(format!("  - {reason}"));
        }
        if reasons.len() > 5 {
            lines.push(format!("  ... and {} more", reasons.len() - 5));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_item() -> Item {
        Item {
            id: "p-1".into(),
            name: "Basic shirt".into(),
            kind: Some("shirt".into()),
            brand: Some("Arket".into()),
            price: Some(40.0),
            rating: Some(4.2),
            image_url: Some("https://example.test/p-1.jpg".into()),
            ..Item::default()
        }
    }

    fn criteria() -> FilterCriteria {
        FilterCriteria::default()
    }

    #[test]
    fn stage_counts_are_monotonically_non_increasing() {
        let items = vec![
            base_item(),
            Item {
                id: "p-2".into(),
                gender: Some(Gender::Female),
                ..base_item()
            },
            Item {
                id: "p-3".into(),
                price: Some(900.0),
                ..base_item()
            },
            Item {
                id: "p-4".into(),
                name: " ".into(),
                ..base_item()
            },
        ];
        let criteria = FilterCriteria {
            gender: Some(Gender::Male),
            budget: Some(Budget {
                min: None,
                max: Some(100.0),
            }),
            ..criteria()
        };

        let result = filter_items(&items, &criteria);
        let s = result.stats;
        assert!(s.initial >= s.after_gender);
        assert!(s.after_gender >= s.after_budget);
        assert!(s.after_budget >= s.after_validation);
        assert!(s.after_validation >= s.final_count);
        assert_eq!(result.items.len(), s.final_count);
    }

    #[test]
    fn female_item_dropped_for_male_criteria() {
        let item = Item {
            kind: Some("broek".into()),
            price: Some(40.0),
            gender: Some(Gender::Female),
            ..base_item()
        };
        let criteria = FilterCriteria {
            gender: Some(Gender::Male),
            ..criteria()
        };

        let result = filter_items(&[item], &criteria);
        assert!(result.stats.after_gender < result.stats.initial);
        assert!(result.items.is_empty());
        assert!(result.removed.gender[0].contains("gender mismatch"));
    }

    #[test]
    fn unisex_and_untagged_items_always_pass_gender() {
        let unisex = Item {
            id: "u".into(),
            gender: Some(Gender::Unisex),
            ..base_item()
        };
        let untagged = Item {
            id: "n".into(),
            gender: None,
            ..base_item()
        };
        let criteria = FilterCriteria {
            gender: Some(Gender::Female),
            ..criteria()
        };

        let result = filter_items(&[unisex, untagged], &criteria);
        assert_eq!(result.items.len(), 2);
    }

    #[test]
    fn missing_price_survives_budget_stage() {
        let unpriced = Item {
            price: None,
            ..base_item()
        };
        let criteria = FilterCriteria {
            budget: Some(Budget {
                min: Some(10.0),
                max: Some(20.0),
            }),
            ..criteria()
        };

        let result = filter_items(&[unpriced], &criteria);
        assert_eq!(result.items.len(), 1);
    }

    #[test]
    fn budget_bounds_are_inclusive() {
        let at_max = Item {
            price: Some(100.0),
            ..base_item()
        };
        let above = Item {
            id: "p-9".into(),
            price: Some(100.01),
            ..base_item()
        };
        let criteria = FilterCriteria {
            budget: Some(Budget {
                min: None,
                max: Some(100.0),
            }),
            ..criteria()
        };

        let result = filter_items(&[at_max, above], &criteria);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.removed.budget.len(), 1);
        assert!(result.removed.budget[0].contains("exceeds max budget"));
    }

    #[test]
    fn validation_drops_structurally_broken_items() {
        let no_id = Item {
            id: "".into(),
            ..base_item()
        };
        let no_name = Item {
            id: "p-2".into(),
            name: "".into(),
            ..base_item()
        };
        let no_category = Item {
            id: "p-3".into(),
            kind: None,
            category: None,
            ..base_item()
        };

        let result = filter_items(&[no_id, no_name, no_category], &criteria());
        assert!(result.items.is_empty());
        assert_eq!(result.removed.validation.len(), 3);
    }

    #[test]
    fn optional_stages_apply_when_specified() {
        let other_brand = Item {
            id: "p-2".into(),
            brand: Some("Zara".into()),
            ..base_item()
        };
        let low_rating = Item {
            id: "p-3".into(),
            rating: Some(2.0),
            ..base_item()
        };
        let excluded = Item {
            id: "p-4".into(),
            ..base_item()
        };
        let criteria = FilterCriteria {
            exclude_ids: vec!["p-4".into()],
            brands: vec!["arket".into()],
            min_rating: Some(4.0),
            ..criteria()
        };

        let result = filter_items(&[base_item(), other_brand, low_rating, excluded], &criteria);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].id, "p-1");
    }

    #[test]
    fn filtering_is_idempotent() {
        let items = vec![
            base_item(),
            Item {
                id: "p-2".into(),
                gender: Some(Gender::Female),
                ..base_item()
            },
            Item {
                id: "p-3".into(),
                price: Some(500.0),
                ..base_item()
            },
        ];
        let criteria = FilterCriteria {
            gender: Some(Gender::Male),
            budget: Some(Budget {
                min: None,
                max: Some(100.0),
            }),
            min_rating: Some(4.0),
            ..criteria()
        };

        let first = filter_items(&items, &criteria);
        let second = filter_items(&first.items, &criteria);

        assert_eq!(first.items, second.items);
        assert_eq!(second.stats.initial, second.stats.final_count);
        assert!(second.removed.gender.is_empty());
        assert!(second.removed.budget.is_empty());
    }

    #[test]
    fn report_caps_removal_examples() {
        let items: Vec<Item> = (0..10)
            .map(|i| Item {
                id: format!("p-{i}"),
                gender: Some(Gender::Female),
                ..base_item()
            })
            .collect();
        let criteria = FilterCriteria {
            gender: Some(Gender::Male),
            ..criteria()
        };

        let report = filtering_report(&filter_items(&items, &criteria));
        assert!(report.contains("Removed by gender:"));
        assert!(report.contains("... and 5 more"));
        assert!(report.contains("Retention rate: 0.0%"));
    }
}
