//! Seasons and weather conditions, with the date-based derivation used when a
//! request does not pin a season explicitly.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Weather {
    Cold,
    Mild,
    Warm,
    Hot,
    Rainy,
    Snowy,
    Windy,
}

impl Season {
    /// Northern-hemisphere season for a 1-based month.
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    pub fn current() -> Self {
        Self::from_month(Utc::now().month())
    }

    pub fn next(self) -> Self {
        match self {
            Season::Spring => Season::Summer,
            Season::Summer => Season::Autumn,
            Season::Autumn => Season::Winter,
            Season::Winter => Season::Spring,
        }
    }

    pub fn dutch_name(self) -> &'static str {
        match self {
            Season::Spring => "lente",
            Season::Summer => "zomer",
            Season::Autumn => "herfst",
            Season::Winter => "winter",
        }
    }

    pub fn typical_weather(self) -> Weather {
        match self {
            Season::Spring | Season::Autumn => Weather::Mild,
            Season::Summer => Weather::Warm,
            Season::Winter => Weather::Cold,
        }
    }
}

impl Weather {
    /// Seasons an item should cover to be wearable in this weather.
    pub fn suitable_seasons(self) -> &'static [Season] {
        match self {
            Weather::Cold => &[Season::Winter, Season::Autumn],
            Weather::Mild => &[Season::Spring, Season::Autumn],
            Weather::Warm => &[Season::Spring, Season::Summer],
            Weather::Hot => &[Season::Summer],
            Weather::Rainy => &[Season::Spring, Season::Autumn, Season::Winter],
            Weather::Snowy => &[Season::Winter],
            Weather::Windy => &[Season::Autumn, Season::Winter, Season::Spring],
        }
    }

    pub fn dutch_description(self) -> &'static str {
        match self {
            Weather::Cold => "koud",
            Weather::Mild => "mild",
            Weather::Warm => "warm",
            Weather::Hot => "heet",
            Weather::Rainy => "regenachtig",
            Weather::Snowy => "sneeuwachtig",
            Weather::Windy => "winderig",
        }
    }
}
