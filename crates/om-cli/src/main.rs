//! Command-line front end for the outfit matching engine.
//!
//! Loads a JSON catalog, runs the recommendation pipeline once, and prints
//! the outfits, the filtering report, and any insufficiency advice.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use om_core::advisor::format_suggestion;
use om_core::catalog::load_items_json;
use om_core::logging::{init_tracing_subscriber, install_tracing_panic_hook};
use om_core::matching::filter::{filtering_report, Budget, FilterCriteria};
use om_core::matching::pipeline::{EngineConfig, RecommendRequest, RecommendationEngine};
use om_core::rules::color_season::ColorSeason;
use om_core::rules::occasion::Occasion;
use om_core::season::{Season, Weather};
use om_core::{Gender, StyleProfile};

const APP_NAME: &str = "outfit-match";

#[derive(Parser, Debug)]
#[command(name = "outfit-match")]
#[command(about = "Archetype-based outfit recommendations from a JSON catalog")]
#[command(version)]
struct Args {
    /// Path to a JSON file holding an array of catalog items
    catalog: PathBuf,

    /// Style profile as comma-separated archetype=weight pairs,
    /// e.g. "klassiek=0.7,urban=0.3"
    #[arg(short, long, value_parser = parse_profile)]
    profile: StyleProfile,

    #[arg(long)]
    gender: Option<Gender>,

    /// Minimum price per item
    #[arg(long)]
    budget_min: Option<f64>,

    /// Maximum price per item
    #[arg(long)]
    budget_max: Option<f64>,

    #[arg(long)]
    season: Option<Season>,

    #[arg(long)]
    weather: Option<Weather>,

    #[arg(long)]
    occasion: Option<Occasion>,

    /// Personal color season (lente, zomer, herfst, winter)
    #[arg(long)]
    color_season: Option<ColorSeason>,

    /// Number of outfits to generate
    #[arg(short, long, default_value = "3")]
    count: usize,

    /// Seed for reproducible output; omit for a random run
    #[arg(long)]
    seed: Option<u64>,

    /// Keep items with blocked colors instead of dropping them
    #[arg(long)]
    lenient_colors: bool,

    /// Print the full filtering report
    #[arg(long)]
    report: bool,
}

fn parse_profile(raw: &str) -> Result<StyleProfile, String> {
    let mut pairs = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (name, weight) = part
            .split_once('=')
            .ok_or_else(|| format!("expected archetype=weight, got '{part}'"))?;
        let weight: f64 = weight
            .trim()
            .parse()
            .map_err(|_| format!("invalid weight in '{part}'"))?;
        if weight < 0.0 {
            return Err(format!("negative weight in '{part}'"));
        }
        pairs.push((name.trim().to_string(), weight));
    }
    if pairs.is_empty() {
        return Err("profile must name at least one archetype".into());
    }
    Ok(StyleProfile::from_pairs(pairs))
}

fn main() -> ExitCode {
    init_tracing_subscriber(APP_NAME);
    install_tracing_panic_hook(APP_NAME);

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), om_core::catalog::CatalogError> {
    let catalog = load_items_json(&args.catalog)?;
    info!(items = catalog.len(), "catalog ready");

    let budget = if args.budget_min.is_some() || args.budget_max.is_some() {
        Some(Budget {
            min: args.budget_min,
            max: args.budget_max,
        })
    } else {
        None
    };

    let request = RecommendRequest {
        profile: args.profile,
        criteria: FilterCriteria {
            gender: args.gender,
            budget,
            ..FilterCriteria::default()
        },
        color_season: args.color_season,
        occasion: args.occasion,
        season: args.season,
        weather: args.weather,
    };

    let engine = RecommendationEngine::new(EngineConfig {
        outfit_count: args.count,
        color_strict: !args.lenient_colors,
        ..EngineConfig::default()
    });

    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let recommendation = engine.recommend(&catalog, &request, &mut rng);

    if args.report {
        println!("{}\n", filtering_report(&recommendation.filter));
    }

    for (i, outfit) in recommendation.outfits.iter().enumerate() {
        println!(
            "Outfit {} [{}] — match {}%, completeness {}%, {} / {}",
            i + 1,
            outfit.id,
            outfit.match_percentage,
            outfit.completeness,
            outfit.season.as_ref(),
            outfit
                .occasion
                .map(|o| o.as_ref().to_string())
                .unwrap_or_else(|| "-".into()),
        );
        for item in &outfit.items {
            let price = item
                .price
                .map(|p| format!("€{p:.2}"))
                .unwrap_or_else(|| "-".into());
            println!(
                "  - {} ({}) {}",
                item.name,
                item.resolved_category().as_ref(),
                price
            );
        }
        if !outfit.tags.is_empty() {
            println!("  tags: {}", outfit.tags.join(", "));
        }
        println!();
    }

    if !recommendation.alternatives.is_empty() {
        println!("Alternatives:");
        for item in &recommendation.alternatives {
            println!("  - {} ({})", item.name, item.resolved_category().as_ref());
        }
        println!();
    }

    if let Some(suggestion) = &recommendation.suggestion {
        println!("{}", format_suggestion(suggestion));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_parsing_accepts_pairs() {
        let profile = parse_profile("klassiek=0.7, urban=0.3").unwrap();
        assert_eq!(profile.weights.len(), 2);
        assert_eq!(profile.weights["klassiek"], 0.7);
    }

    #[test]
    fn profile_parsing_rejects_garbage() {
        assert!(parse_profile("").is_err());
        assert!(parse_profile("klassiek").is_err());
        assert!(parse_profile("klassiek=abc").is_err());
        assert!(parse_profile("klassiek=-1").is_err());
    }
}
