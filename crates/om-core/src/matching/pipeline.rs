//! End-to-end recommendation pipeline.
//!
//! Filter the catalog, score what survives, narrow to the season and weather
//! at hand, assemble outfits, and fall back to a diagnosis when the catalog
//! cannot support the request.

use std::cmp::Ordering;
use std::collections::HashSet;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::advisor::{diagnose, Suggestion};
use crate::assembly::assembler::{assemble, AssembleOptions};
use crate::assembly::diversity::{select_diverse, shuffle_by_category};
use crate::matching::filter::{filter_items, FilterCriteria, FilterResult};
use crate::matching::scoring::FusionScorer;
use crate::rules::color_season::{apply_color_season, ColorSeason};
use crate::rules::occasion::{
    filter_outfits_by_occasion, Occasion, DEFAULT_OCCASION_THRESHOLD,
};
use crate::season::{Season, Weather};
use crate::{Item, Outfit, ScoredItem, StyleProfile};

/// Items scoring below this never reach assembly.
fn get_match_threshold() -> f64 {
    std::env::var("OM_MATCH_THRESHOLD")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.1)
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub min_score: f64,
    pub outfit_count: usize,
    /// Drop items with a blocked color instead of merely down-scoring them.
    pub color_strict: bool,
    pub occasion_threshold: f64,
    /// Smallest candidate pool the season/weather narrowing may leave behind
    /// before it falls back to a broader one.
    pub min_pool: usize,
    /// Diverse alternatives returned alongside the outfits.
    pub alternative_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_score: get_match_threshold(),
            outfit_count: 3,
            color_strict: true,
            occasion_threshold: DEFAULT_OCCASION_THRESHOLD,
            min_pool: 4,
            alternative_count: 6,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecommendRequest {
    pub profile: StyleProfile,
    pub criteria: FilterCriteria,
    pub color_season: Option<ColorSeason>,
    pub occasion: Option<Occasion>,
    pub season: Option<Season>,
    pub weather: Option<Weather>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub outfits: Vec<Outfit>,
    /// Diverse leftovers the user can swap in.
    pub alternatives: Vec<Item>,
    /// Present when no outfit could be assembled.
    pub suggestion: Option<Suggestion>,
    pub filter: FilterResult,
}

pub struct RecommendationEngine {
    config: EngineConfig,
    scorer: FusionScorer,
}

impl RecommendationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            scorer: FusionScorer::with_defaults(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    /// Run the full pipeline over a catalog.
    pub fn recommend<R: Rng>(
        &self,
        catalog: &[Item],
        request: &RecommendRequest,
        rng: &mut R,
    ) -> Recommendation {
        let season = request.season.unwrap_or_else(Season::current);
        let weather = request.weather.unwrap_or_else(|| season.typical_weather());

        let filter = filter_items(catalog, &request.criteria);

        let colored: Vec<(Item, Option<f64>)> = match request.color_season {
            Some(color_season) => {
                apply_color_season(filter.items.clone(), color_season, self.config.color_strict)
                    .into_iter()
                    .map(|(item, score)| (item, Some(score)))
                    .collect()
            }
            None => filter.items.iter().cloned().map(|i| (i, None)).collect(),
        };

        let mut scored: Vec<ScoredItem> = colored
            .into_iter()
            .map(|(item, color_season_score)| {
                let fusion = self.scorer.score(&item, &request.profile);
                ScoredItem {
                    item,
                    score: fusion.total,
                    matched_signals: fusion.matched_signals,
                    color_season_score,
                }
            })
            .filter(|entry| entry.score >= self.config.min_score)
            .collect();

        rank_items(&mut scored);
        debug!(candidates = scored.len(), "scored and ranked");

        let pool = self.narrow_to_conditions(scored, season, weather);

        let options = AssembleOptions {
            count: self.config.outfit_count,
            archetype: request.profile.primary_archetype().map(str::to_string),
            occasion: request.occasion,
            season: Some(season),
            weather: Some(weather),
            ..AssembleOptions::default()
        };
        let mut outfits = assemble(&pool, &options, rng);

        if let Some(occasion) = request.occasion {
            let kept = filter_outfits_by_occasion(
                outfits.clone(),
                occasion,
                self.config.occasion_threshold,
            );
            if kept.is_empty() && !outfits.is_empty() {
                warn!(
                    occasion = occasion.as_ref(),
                    "no outfit met the occasion threshold, keeping unfiltered set"
                );
            } else {
                outfits = kept;
            }
        }

        let suggestion = if outfits.is_empty() {
            Some(diagnose(&filter.stats, &request.criteria, &filter.items))
        } else {
            None
        };

        let worn: HashSet<&str> = outfits
            .iter()
            .flat_map(|o| o.items.iter().map(|i| i.id.as_str()))
            .collect();
        let leftovers: Vec<Item> = pool
            .iter()
            .filter(|entry| !worn.contains(entry.item.id.as_str()))
            .map(|entry| entry.item.clone())
            .collect();
        let alternatives = select_diverse(
            &shuffle_by_category(&leftovers, rng),
            self.config.alternative_count,
            rng,
        );

        info!(
            outfits = outfits.len(),
            alternatives = alternatives.len(),
            insufficient = suggestion.is_some(),
            "recommendation done"
        );

        Recommendation {
            outfits,
            alternatives,
            suggestion,
            filter,
        }
    }

    /// Prefer items suited to the weather, then to the season, then give up
    /// on narrowing. Each step only applies when it leaves a workable pool.
    fn narrow_to_conditions(
        &self,
        scored: Vec<ScoredItem>,
        season: Season,
        weather: Weather,
    ) -> Vec<ScoredItem> {
        let by_weather: Vec<ScoredItem> = scored
            .iter()
            .filter(|e| e.item.suits_weather(weather))
            .cloned()
            .collect();
        if by_weather.len() >= self.config.min_pool {
            return by_weather;
        }

        let by_season: Vec<ScoredItem> = scored
            .iter()
            .filter(|e| e.item.in_season(season))
            .cloned()
            .collect();
        if by_season.len() >= self.config.min_pool {
            warn!(
                weather = weather.as_ref(),
                pool = by_weather.len(),
                "weather narrowing too strict, falling back to season"
            );
            return by_season;
        }

        warn!(
            season = season.as_ref(),
            pool = by_season.len(),
            "season narrowing too strict, using full candidate pool"
        );
        scored
    }
}

/// Sort by score descending, then price ascending so equal matches surface
/// the cheaper item first.
pub fn rank_items(scored: &mut [ScoredItem]) {
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                let pa = a.item.price.unwrap_or(f64::MAX);
                let pb = b.item.price.unwrap_or(f64::MAX);
                pa.partial_cmp(&pb).unwrap_or(Ordering::Equal)
            })
    });
}
