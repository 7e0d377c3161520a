//! Catalog loading, caching, and feed diagnostics.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::{Gender, Item};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Anything that can produce the current item catalog.
pub trait CatalogSource {
    fn load(&self) -> Result<Vec<Item>, CatalogError>;
}

/// Load a catalog from a JSON file holding an array of items.
pub fn load_items_json(path: impl AsRef<Path>) -> Result<Vec<Item>, CatalogError> {
    let raw = std::fs::read_to_string(path.as_ref())?;
    let items: Vec<Item> = serde_json::from_str(&raw)?;
    info!(
        path = %path.as_ref().display(),
        items = items.len(),
        "catalog loaded"
    );
    Ok(items)
}

pub struct FileCatalog {
    path: std::path::PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for FileCatalog {
    fn load(&self) -> Result<Vec<Item>, CatalogError> {
        load_items_json(&self.path)
    }
}

/// In-memory catalog snapshot with a fixed time-to-live.
pub struct CatalogCache {
    items: Vec<Item>,
    fetched_at: DateTime<Utc>,
    ttl: Duration,
}

impl CatalogCache {
    pub fn new(items: Vec<Item>, ttl: Duration) -> Self {
        Self {
            items,
            fetched_at: Utc::now(),
            ttl,
        }
    }

    pub fn is_stale(&self) -> bool {
        Utc::now() - self.fetched_at > self.ttl
    }

    /// Cached items, or `None` once the snapshot has expired.
    pub fn get(&self) -> Option<&[Item]> {
        if self.is_stale() {
            debug!(fetched_at = %self.fetched_at, "catalog cache stale");
            return None;
        }
        Some(&self.items)
    }

    pub fn refresh(&mut self, items: Vec<Item>) {
        self.items = items;
        self.fetched_at = Utc::now();
    }
}

/// How the catalog splits across gender tags. Useful when a gender filter
/// wipes out most of a feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderDistribution {
    pub male: usize,
    pub female: usize,
    pub unisex: usize,
    pub untagged: usize,
}

pub fn gender_distribution(items: &[Item]) -> GenderDistribution {
    let mut counts: HashMap<Option<Gender>, usize> = HashMap::new();
    for item in items {
        *counts.entry(item.gender).or_insert(0) += 1;
    }

    GenderDistribution {
        male: counts.get(&Some(Gender::Male)).copied().unwrap_or(0),
        female: counts.get(&Some(Gender::Female)).copied().unwrap_or(0),
        unisex: counts.get(&Some(Gender::Unisex)).copied().unwrap_or(0),
        untagged: counts.get(&None).copied().unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, gender: Option<Gender>) -> Item {
        Item {
            id: id.into(),
            name: id.into(),
            kind: Some("shirt".into()),
            gender,
            ..Item::default()
        }
    }

    #[test]
    fn json_catalog_round_trips_optional_fields() {
        let raw = r#"[
            {"id": "p-1", "name": "Shirt", "kind": "shirt", "price": 29.95,
             "colors": ["navy"], "archetype_match": {"urban": 0.7}},
            {"id": "p-2", "name": "Broek"}
        ]"#;

        let items: Vec<Item> = serde_json::from_str(raw).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].price, Some(29.95));
        assert!(items[1].price.is_none());
        assert!(items[1].colors.is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_items_json("/nonexistent/catalog.json").unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }

    #[test]
    fn fresh_cache_serves_items() {
        let cache = CatalogCache::new(vec![item("a", None)], Duration::minutes(30));
        assert!(!cache.is_stale());
        assert_eq!(cache.get().unwrap().len(), 1);
    }

    #[test]
    fn zero_ttl_cache_is_stale() {
        let cache = CatalogCache::new(vec![item("a", None)], Duration::zero());
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(cache.is_stale());
        assert!(cache.get().is_none());
    }

    #[test]
    fn refresh_resets_the_clock() {
        let mut cache = CatalogCache::new(vec![], Duration::minutes(30));
        cache.refresh(vec![item("a", None), item("b", None)]);
        assert_eq!(cache.get().unwrap().len(), 2);
    }

    #[test]
    fn gender_distribution_counts_every_bucket() {
        let items = vec![
            item("a", Some(Gender::Male)),
            item("b", Some(Gender::Female)),
            item("c", Some(Gender::Female)),
            item("d", Some(Gender::Unisex)),
            item("e", None),
        ];

        let dist = gender_distribution(&items);
        assert_eq!(dist.male, 1);
        assert_eq!(dist.female, 2);
        assert_eq!(dist.unisex, 1);
        assert_eq!(dist.untagged, 1);
    }
}
