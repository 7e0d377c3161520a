//! Archetype fusion scoring.
//!
//! An item's score against a style profile is the weight-normalized sum of
//! weight × affinity over the profile's archetypes. Pure and order
//! independent; ranking ties are broken downstream.

use std::collections::HashMap;

use crate::{Item, StyleProfile};

/// Score returned when scoring cannot discriminate (degenerate profile).
pub const NEUTRAL_SCORE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct FusionScore {
    /// 0..1 weighted, normalized archetype match.
    pub total: f64,
    /// Archetypes contributing more than the signal threshold, name-sorted.
    pub matched_signals: Vec<String>,
}

fn get_signal_threshold() -> f64 {
    std::env::var("OM_SIGNAL_THRESHOLD")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.15)
}

/// Default mix attributed to items that carry no archetype data at all, so
/// unscored catalog entries are not systematically excluded.
pub fn default_baseline_mix() -> HashMap<String, f64> {
    [
        "klassiek",
        "casual_chic",
        "urban",
        "streetstyle",
        "retro",
        "luxury",
    ]
    .into_iter()
    .map(|name| (name.to_string(), 0.5))
    .collect()
}

#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Minimum share of the final score an archetype must contribute before
    /// it is emitted as a matched signal.
    pub signal_threshold: f64,
    /// Affinities substituted for items without archetype data.
    pub baseline: HashMap<String, f64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            signal_threshold: get_signal_threshold(),
            baseline: default_baseline_mix(),
        }
    }
}

pub struct FusionScorer {
    config: ScoringConfig,
}

impl FusionScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(ScoringConfig::default())
    }

    /// Score one item against a style profile.
    ///
    /// Signals are collected in archetype-name order so the list is
    /// deterministic regardless of map iteration order.
    pub fn score(&self, item: &Item, profile: &StyleProfile) -> FusionScore {
        if profile.is_degenerate() {
            return FusionScore {
                total: NEUTRAL_SCORE,
                matched_signals: vec![],
            };
        }

        let affinities: &HashMap<String, f64> = if item.archetype_match.is_empty() {
            &self.config.baseline
        } else {
            &item.archetype_match
        };

        let mut entries: Vec<(&str, f64)> = profile
            .weights
            .iter()
            .filter(|(_, weight)| **weight > 0.0)
            .map(|(name, weight)| (name.as_str(), *weight))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let mut weight_sum = 0.0;
        let mut weighted_sum = 0.0;
        let mut contributions: Vec<(&str, f64)> = Vec::with_capacity(entries.len());

        for (name, weight) in entries {
            let affinity = affinities.get(name).copied().unwrap_or(0.0);
            let contribution = weight * affinity;
            weight_sum += weight;
            weighted_sum += contribution;
            contributions.push((name, contribution));
        }

        let total = weighted_sum / weight_sum;

        let matched_signals = if weighted_sum > 0.0 {
            contributions
                .into_iter()
                .filter(|(_, contribution)| {
                    contribution / weighted_sum > self.config.signal_threshold
                })
                .map(|(name, _)| name.to_string())
                .collect()
        } else {
            vec![]
        };

        FusionScore {
            total,
            matched_signals,
        }
    }
}
