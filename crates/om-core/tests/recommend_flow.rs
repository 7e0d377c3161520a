//! End-to-end flow over a realistic mixed catalog.

use std::collections::HashMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use om_core::advisor::SuggestionReason;
use om_core::matching::filter::{Budget, FilterCriteria};
use om_core::matching::pipeline::{EngineConfig, RecommendRequest, RecommendationEngine};
use om_core::rules::occasion::Occasion;
use om_core::season::Season;
use om_core::{Gender, Item, StyleProfile};

fn affinities(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs
        .iter()
        .map(|(name, score)| (name.to_string(), *score))
        .collect()
}

fn item(id: &str, kind: &str, price: f64, gender: Option<Gender>) -> Item {
    Item {
        id: id.into(),
        name: format!("Product {id}"),
        kind: Some(kind.into()),
        brand: Some("Arket".into()),
        retailer: Some("Zalando".into()),
        price: Some(price),
        gender,
        image_url: Some(format!("https://example.test/{id}.jpg")),
        archetype_match: affinities(&[("klassiek", 0.85), ("casual_chic", 0.6)]),
        ..Item::default()
    }
}

fn mixed_catalog() -> Vec<Item> {
    vec![
        item("t1", "trui", 45.0, Some(Gender::Female)),
        item("t2", "blouse", 39.0, Some(Gender::Female)),
        item("t3", "shirt", 25.0, Some(Gender::Male)),
        item("b1", "broek", 65.0, Some(Gender::Female)),
        item("b2", "jeans", 59.0, None),
        item("f1", "pump", 85.0, Some(Gender::Female)),
        item("f2", "sneaker", 75.0, Some(Gender::Unisex)),
        item("f3", "laars", 110.0, Some(Gender::Female)),
        item("a1", "tas", 49.0, Some(Gender::Female)),
        item("o1", "blazer", 95.0, Some(Gender::Female)),
        // Broken entry the validation stage must absorb.
        Item {
            id: "broken".into(),
            name: "Nameless".into(),
            ..Item::default()
        },
    ]
}

fn female_request() -> RecommendRequest {
    RecommendRequest {
        profile: StyleProfile::from_pairs([
            ("klassiek".to_string(), 0.7),
            ("casual_chic".to_string(), 0.3),
        ]),
        criteria: FilterCriteria {
            gender: Some(Gender::Female),
            budget: Some(Budget {
                min: None,
                max: Some(120.0),
            }),
            ..FilterCriteria::default()
        },
        season: Some(Season::Summer),
        ..RecommendRequest::default()
    }
}

#[test]
fn female_catalog_produces_complete_outfits() {
    let engine = RecommendationEngine::with_defaults();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    let rec = engine.recommend(&mixed_catalog(), &female_request(), &mut rng);

    assert!(rec.suggestion.is_none());
    assert!(!rec.outfits.is_empty());

    for outfit in &rec.outfits {
        assert!(outfit.items.len() >= 2);
        assert!(outfit.completeness <= 100);
        assert!(outfit.match_percentage <= 100);
        // The male-only shirt must never appear.
        assert!(outfit.items.iter().all(|i| i.id != "t3"));
        assert!(outfit.items.iter().all(|i| i.id != "broken"));
    }

    // Filter accounting: one gender drop, one validation drop.
    assert_eq!(rec.filter.stats.initial, 11);
    assert_eq!(rec.filter.removed.gender.len(), 1);
    assert_eq!(rec.filter.removed.validation.len(), 1);
}

#[test]
fn no_item_is_shared_between_outfits_and_alternatives() {
    let engine = RecommendationEngine::with_defaults();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let rec = engine.recommend(&mixed_catalog(), &female_request(), &mut rng);

    let worn: Vec<&str> = rec
        .outfits
        .iter()
        .flat_map(|o| o.items.iter().map(|i| i.id.as_str()))
        .collect();
    for alt in &rec.alternatives {
        assert!(!worn.contains(&alt.id.as_str()));
    }
}

#[test]
fn impossible_budget_triggers_joint_diagnosis() {
    let engine = RecommendationEngine::with_defaults();
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let mut req = female_request();
    req.criteria.budget = Some(Budget {
        min: None,
        max: Some(2.0),
    });

    let rec = engine.recommend(&mixed_catalog(), &req, &mut rng);

    assert!(rec.outfits.is_empty());
    let suggestion = rec.suggestion.expect("diagnosis expected");
    assert_eq!(
        suggestion.reason,
        SuggestionReason::BudgetAndGenderTooRestrictive
    );
    assert!(!suggestion.can_continue);
}

#[test]
fn occasion_request_tags_outfits() {
    let engine = RecommendationEngine::new(EngineConfig {
        // Low bar so the small fixture catalog passes the occasion gate.
        occasion_threshold: 0.1,
        ..EngineConfig::default()
    });
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    let mut req = female_request();
    req.occasion = Some(Occasion::Casual);

    let rec = engine.recommend(&mixed_catalog(), &req, &mut rng);
    assert!(!rec.outfits.is_empty());
    for outfit in &rec.outfits {
        assert_eq!(outfit.occasion, Some(Occasion::Casual));
        assert!(outfit.tags.contains(&"casual".to_string()));
    }
}
