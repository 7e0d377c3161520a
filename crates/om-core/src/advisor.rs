//! Insufficient-catalog advisor.
//!
//! When filtering leaves too little to build outfits from, this module turns
//! the filter statistics into a user-facing diagnosis: which constraint bit
//! hardest, what to say, and which remediations to offer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::AsRefStr;
use tracing::info;

use crate::category::{category_counts, Category, REQUIRED_CATEGORIES};
use crate::matching::filter::{FilterCriteria, FilterStats};
use crate::{Gender, Item};

/// Below this retention the criteria themselves are the problem.
const SEVERE_RETENTION: f64 = 0.05;
/// Below this retention the budget is flagged as too tight.
const LOW_RETENTION: f64 = 0.20;
/// A required category needs at least this many candidates to be usable.
const MIN_PER_REQUIRED_CATEGORY: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SuggestionReason {
    BudgetAndGenderTooRestrictive,
    BudgetTooRestrictive,
    MissingCategories,
    GeneralInsufficient,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemediationOption {
    pub action: &'static str,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub reason: SuggestionReason,
    /// Message shown to the end user, in the product's own language.
    pub user_message: String,
    pub options: Vec<RemediationOption>,
    /// Whether outfit generation can proceed anyway. Currently always false:
    /// callers stop and present the options instead.
    pub can_continue: bool,
}

fn gender_label(gender: Gender) -> &'static str {
    match gender {
        Gender::Female => "dames",
        Gender::Male => "heren",
        Gender::Unisex => "unisex",
    }
}

fn max_budget(criteria: &FilterCriteria) -> Option<f64> {
    criteria.budget.and_then(|b| b.max)
}

/// Diagnose why the surviving catalog cannot support outfit generation and
/// propose a way out.
pub fn diagnose(
    stats: &FilterStats,
    criteria: &FilterCriteria,
    survivors: &[Item],
) -> Suggestion {
    let retention = stats.retention_rate();
    let counts = category_counts(survivors);

    let suggestion = if retention < SEVERE_RETENTION && criteria.gender.is_some() {
        budget_and_gender_suggestion(criteria)
    } else if retention < LOW_RETENTION {
        budget_suggestion(criteria)
    } else if let Some(category) = scarce_required_category(&counts) {
        missing_categories_suggestion(category, &counts)
    } else {
        general_suggestion(stats)
    };

    info!(
        reason = suggestion.reason.as_ref(),
        retention = format!("{:.1}%", retention * 100.0),
        survivors = survivors.len(),
        "catalog diagnosed as insufficient"
    );

    suggestion
}

fn scarce_required_category(counts: &HashMap<Category, usize>) -> Option<Category> {
    REQUIRED_CATEGORIES
        .into_iter()
        .find(|c| counts.get(c).copied().unwrap_or(0) < MIN_PER_REQUIRED_CATEGORY)
}

fn budget_and_gender_suggestion(criteria: &FilterCriteria) -> Suggestion {
    let label = criteria
        .gender
        .map(gender_label)
        .unwrap_or("unisex");
    let budget = max_budget(criteria);

    let user_message = match budget {
        Some(max) => format!(
            "We hebben momenteel beperkte {label}producten binnen jouw budget van \
             €{max:.0} per item."
        ),
        None => format!("We hebben momenteel beperkte {label}producten beschikbaar."),
    };

    let mut options = vec![];
    if let Some(max) = budget {
        let raised = (max * 1.5).ceil();
        options.push(RemediationOption {
            action: "increase_budget",
            description: format!("Verhoog je budget naar €{raised:.0} per item"),
        });
    }
    options.push(RemediationOption {
        action: "include_more_retailers",
        description: "Bekijk ook producten van andere webshops".into(),
    });
    options.push(RemediationOption {
        action: "notify_when_available",
        description: format!("Krijg bericht zodra er nieuwe {label}producten zijn"),
    });

    Suggestion {
        reason: SuggestionReason::BudgetAndGenderTooRestrictive,
        user_message,
        options,
        can_continue: false,
    }
}

fn budget_suggestion(criteria: &FilterCriteria) -> Suggestion {
    let budget = max_budget(criteria);

    let user_message = match budget {
        Some(max) => format!(
            "Binnen jouw budget van €{max:.0} per item vonden we te weinig producten \
             voor een complete outfit."
        ),
        None => "We vonden te weinig producten voor een complete outfit.".to_string(),
    };

    let mut options = vec![];
    if let Some(max) = budget {
        let raised = (max * 1.3).ceil();
        options.push(RemediationOption {
            action: "flexible_budget",
            description: format!("Probeer een budget van €{raised:.0} per item"),
        });
    }
    options.push(RemediationOption {
        action: "see_all",
        description: "Bekijk alle beschikbare producten zonder budgetfilter".into(),
    });
    options.push(RemediationOption {
        action: "expand_criteria",
        description: "Versoepel je filters en probeer opnieuw".into(),
    });

    Suggestion {
        reason: SuggestionReason::BudgetTooRestrictive,
        user_message,
        options,
        can_continue: false,
    }
}

fn missing_categories_suggestion(
    scarce: Category,
    counts: &HashMap<Category, usize>,
) -> Suggestion {
    let missing: Vec<&str> = REQUIRED_CATEGORIES
        .iter()
        .filter(|c| counts.get(c).copied().unwrap_or(0) < MIN_PER_REQUIRED_CATEGORY)
        .map(|c| c.as_ref())
        .collect();

    Suggestion {
        reason: SuggestionReason::MissingCategories,
        user_message: format!(
            "We missen voldoende producten in de categorie {} om een complete outfit \
             samen te stellen.",
            scarce.as_ref()
        ),
        options: vec![
            RemediationOption {
                action: "see_available",
                description: format!(
                    "Bekijk wat er wel beschikbaar is (te weinig: {})",
                    missing.join(", ")
                ),
            },
            RemediationOption {
                action: "notify_new_stock",
                description: "Krijg bericht zodra deze categorieën zijn aangevuld".into(),
            },
            RemediationOption {
                action: "relax_filters",
                description: "Versoepel je filters voor meer keuze".into(),
            },
        ],
        can_continue: false,
    }
}

fn general_suggestion(stats: &FilterStats) -> Suggestion {
    Suggestion {
        reason: SuggestionReason::GeneralInsufficient,
        user_message: format!(
            "We konden geen complete outfit samenstellen uit de {} gevonden producten.",
            stats.final_count
        ),
        options: vec![
            RemediationOption {
                action: "try_different_style",
                description: "Probeer een ander stijlprofiel".into(),
            },
            RemediationOption {
                action: "expand_criteria",
                description: "Versoepel je filters en probeer opnieuw".into(),
            },
            RemediationOption {
                action: "contact_support",
                description: "Neem contact op als dit blijft gebeuren".into(),
            },
        ],
        can_continue: false,
    }
}

/// Render a suggestion as plain text with a numbered option list.
pub fn format_suggestion(suggestion: &Suggestion) -> String {
    let mut lines = vec![suggestion.user_message.clone(), "Je kunt:".to_string()];
    for (i, option) in suggestion.options.iter().enumerate() {
        lines.push(format!("  {}. {}", i + 1, option.description));
    }
    lines.join("\n")
}
