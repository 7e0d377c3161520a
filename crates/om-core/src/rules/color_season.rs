//! Seasonal color analysis rules.
//!
//! Each of the four color seasons carries a recommended/avoid/neutral palette.
//! Matching is substring-based in both directions so compound feed names like
//! "dark navy" still hit the "navy" entry. Avoid-list membership is a hard
//! block and wins over every other match.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};
use tracing::debug;

use crate::Item;

/// Score for an item or color with no usable color data.
pub const NEUTRAL_COLOR_SCORE: f64 = 0.5;
/// Score for an item that carries no colors at all.
pub const NO_COLOR_DATA_SCORE: f64 = 0.3;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ColorSeason {
    /// Light, warm, bright.
    Lente,
    /// Light, cool, soft.
    Zomer,
    /// Deep, warm, muted.
    Herfst,
    /// Deep, cool, clear.
    Winter,
}

#[derive(Debug, Clone, Copy)]
pub struct SeasonPalette {
    pub recommended: &'static [&'static str],
    pub avoid: &'static [&'static str],
    pub neutrals: &'static [&'static str],
}

static LENTE: SeasonPalette = SeasonPalette {
    recommended: &[
        "wit", "beige", "cream", "ivory", "sand", "camel", "peach", "coral", "salmon", "apricot",
        "light blue", "turquoise", "aqua", "mint", "lime", "apple green", "grass green",
        "buttercup yellow", "warm yellow", "gold", "warm pink", "rose pink", "warm taupe",
        "warm beige",
    ],
    avoid: &[
        "zwart",
        "black",
        "pure white",
        "charcoal",
        "dark grey",
        "burgundy",
        "wine",
        "navy",
        "dark blue",
        "forest green",
        "dark green",
        "purple",
        "deep purple",
    ],
    neutrals: &["beige", "camel", "cream", "warm grey", "light brown"],
};

static ZOMER: SeasonPalette = SeasonPalette {
    recommended: &[
        "soft white",
        "off-white",
        "grey",
        "light grey",
        "powder blue",
        "sky blue",
        "periwinkle",
        "lavender",
        "lilac",
        "soft purple",
        "rose pink",
        "mauve",
        "dusty rose",
        "mint",
        "sage green",
        "seafoam",
        "soft yellow",
        "lemon",
        "cool taupe",
        "dove grey",
        "denim blue",
        "chambray",
    ],
    avoid: &[
        "zwart",
        "black",
        "orange",
        "rust",
        "warm yellow",
        "gold",
        "olive green",
        "tomato red",
        "warm brown",
    ],
    neutrals: &["grey", "light grey", "cool taupe", "soft white"],
};

static HERFST: SeasonPalette = SeasonPalette {
    recommended: &[
        "rust",
        "terracotta",
        "brick red",
        "burnt orange",
        "warm brown",
        "chocolate",
        "camel",
        "cognac",
        "olive green",
        "moss green",
        "forest green",
        "mustard",
        "gold",
        "amber",
        "warm beige",
        "khaki",
        "burgundy",
        "wine",
        "teal",
        "petrol blue",
    ],
    avoid: &[
        "pure white",
        "icy blue",
        "pastel blue",
        "pink",
        "baby pink",
        "lavender",
        "purple",
        "grey",
        "cool grey",
    ],
    neutrals: &["brown", "warm beige", "camel", "olive", "cream"],
};

static WINTER: SeasonPalette = SeasonPalette {
    recommended: &[
        "zwart",
        "black",
        "pure white",
        "bright white",
        "navy",
        "royal blue",
        "cobalt",
        "emerald green",
        "pine green",
        "magenta",
        "fuchsia",
        "hot pink",
        "ruby red",
        "true red",
        "purple",
        "violet",
        "icy blue",
        "icy pink",
        "icy yellow",
        "charcoal",
        "dark grey",
        "silver",
    ],
    avoid: &[
        "orange",
        "rust",
        "warm yellow",
        "gold",
        "olive green",
        "warm brown",
        "camel",
        "peach",
        "coral",
    ],
    neutrals: &["black", "white", "charcoal", "navy", "grey"],
};

impl ColorSeason {
    pub fn palette(self) -> &'static SeasonPalette {
        match self {
            ColorSeason::Lente => &LENTE,
            ColorSeason::Zomer => &ZOMER,
            ColorSeason::Herfst => &HERFST,
            ColorSeason::Winter => &WINTER,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorMatch {
    pub score: f64,
    pub is_allowed: bool,
    pub reason: Option<String>,
}

fn list_hit(color: &str, list: &[&str]) -> bool {
    list.iter().any(|entry| {
        let entry = entry.to_lowercase();
        color.contains(&entry) || entry.contains(color)
    })
}

/// Match one free-text color name against a seasonal palette.
///
/// Decision order is strict: avoid beats everything, then recommended (1.0),
/// then neutral (0.8), then unknown-but-allowed (0.4). An empty color name is
/// a neutral pass-through.
pub fn matches_color_season(color: &str, season: ColorSeason) -> ColorMatch {
    let color_lower = color.to_lowercase().trim().to_string();
    if color_lower.is_empty() {
        return ColorMatch {
            score: NEUTRAL_COLOR_SCORE,
            is_allowed: true,
            reason: None,
        };
    }

    let palette = season.palette();
    let season_name = season.as_ref();

    if list_hit(&color_lower, palette.avoid) {
        return ColorMatch {
            score: 0.0,
            is_allowed: false,
            reason: Some(format!(
                "{color} is not flattering for {season_name} season"
            )),
        };
    }

    if list_hit(&color_lower, palette.recommended) {
        return ColorMatch {
            score: 1.0,
            is_allowed: true,
            reason: Some(format!("{color} is perfect for {season_name} season")),
        };
    }

    if list_hit(&color_lower, palette.neutrals) {
        return ColorMatch {
            score: 0.8,
            is_allowed: true,
            reason: Some(format!(
                "{color} is a good neutral for {season_name} season"
            )),
        };
    }

    ColorMatch {
        score: 0.4,
        is_allowed: true,
        reason: Some(format!(
            "{color} compatibility unknown for {season_name} season"
        )),
    }
}

/// Score every item against the palette and keep the best score among its
/// colors. In strict mode an item with at least one hard-blocked color is
/// dropped even when another of its colors would pass.
pub fn apply_color_season(
    items: Vec<Item>,
    season: ColorSeason,
    strict: bool,
) -> Vec<(Item, f64)> {
    let initial = items.len();

    let scored: Vec<(Item, f64)> = items
        .into_iter()
        .filter_map(|item| {
            if item.colors.is_empty() {
                return Some((item, NO_COLOR_DATA_SCORE));
            }

            let mut best = 0.0_f64;
            let mut block_reason: Option<String> = None;
            for color in &item.colors {
                let result = matches_color_season(color, season);
                if !result.is_allowed && block_reason.is_none() {
                    block_reason = result.reason.clone();
                }
                if result.score > best {
                    best = result.score;
                }
            }

            if strict {
                if let Some(reason) = block_reason {
                    debug!(item = %item.id, %reason, "blocked by color season");
                    return None;
                }
            }

            Some((item, best))
        })
        .collect();

    debug!(
        season = season.as_ref(),
        initial,
        kept = scored.len(),
        "color season filtering done"
    );

    scored
}

/// Average compatibility over all of an item's colors, used when callers want
/// a single aggregate number instead of best-of.
pub fn score_color_compatibility(item: &Item, season: Option<ColorSeason>) -> f64 {
    let Some(season) = season else {
        return NEUTRAL_COLOR_SCORE;
    };

    if item.colors.is_empty() {
        return NO_COLOR_DATA_SCORE;
    }

    let sum: f64 = item
        .colors
        .iter()
        .map(|color| matches_color_season(color, season).score)
        .sum();
    sum / item.colors.len() as f64
}
