//! # Multi-Tier Food Resolver
//!
//! Resolves a free-text food name or image label to a canonical
//! [`NutritionRecord`] by trying, in strict order:
//!
//! 1. **Local exact match** — case-insensitive equality against any indexed
//!    name or alias
//! 2. **Local contains** — input is a substring of a candidate's name
//! 3. **Local reverse-contains** — a candidate's name is a substring of the
//!    input
//! 4. **Local category-keyword fallback** — if the category hint is known
//!    and the input contains one of that category's keywords, the first
//!    dataset-order record of the category wins
//! 5. **CNF tier** (if enabled) — Canadian Nutrient File API
//! 6. **USDA tier** (if enabled) — USDA FoodData Central API
//!
//! The first success wins. External tiers are injected collaborators behind
//! the [`NutrientLookup`] trait; any tier I/O error is logged at the tier
//! boundary and treated as "no result", so resolution always falls through
//! to the next tier instead of aborting. A fully-missed name is not an
//! error either — the caller records it as unresolved.

use crate::category::{infer_category_from_nutrients, keywords_for};
use crate::dataset::FoodDataset;
use crate::errors::{error_logging, AppResult};
use crate::nutrition::{FoodCategory, NutrientProfile, NutrientSource, NutritionRecord};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One external nutrient lookup tier (CNF, USDA, or a test fake).
///
/// `nutrition_for` returns per-100g nutrition for a free-text food name:
/// `Ok(Some(_))` on a hit, `Ok(None)` when the tier has no match, and
/// `Err(_)` for I/O-level failures. The resolver treats the last two
/// identically apart from logging; implementations must not panic on
/// malformed payloads.
#[async_trait]
pub trait NutrientLookup: Send + Sync {
    /// Tier name used in logs
    fn tier_name(&self) -> &'static str;

    /// Source tag applied to records this tier produces
    fn source(&self) -> NutrientSource;

    /// Look up per-100g nutrition for a food name.
    async fn nutrition_for(&self, name: &str) -> AppResult<Option<NutrientProfile>>;
}

/// Which resolution tiers are consulted.
#[derive(Debug, Clone, Copy)]
pub struct TierSet {
    pub local: bool,
    pub cnf: bool,
    pub usda: bool,
}

impl Default for TierSet {
    fn default() -> Self {
        Self {
            local: true,
            cnf: true,
            usda: true,
        }
    }
}

/// Multi-tier food resolver with injected tier collaborators.
///
/// Constructed once at process start and shared across requests; the local
/// dataset is read-only and the tier clients manage their own caches.
pub struct FoodResolver {
    dataset: Arc<FoodDataset>,
    cnf: Option<Arc<dyn NutrientLookup>>,
    usda: Option<Arc<dyn NutrientLookup>>,
    tiers: TierSet,
}

impl FoodResolver {
    /// Create a resolver over the local dataset only.
    pub fn new(dataset: Arc<FoodDataset>) -> Self {
        Self {
            dataset,
            cnf: None,
            usda: None,
            tiers: TierSet::default(),
        }
    }

    /// Attach the Canadian Nutrient File tier.
    pub fn with_cnf(mut self, tier: Arc<dyn NutrientLookup>) -> Self {
        self.cnf = Some(tier);
        self
    }

    /// Attach the USDA FoodData Central tier.
    pub fn with_usda(mut self, tier: Arc<dyn NutrientLookup>) -> Self {
        self.usda = Some(tier);
        self
    }

    /// Restrict which tiers are consulted.
    pub fn with_tiers(mut self, tiers: TierSet) -> Self {
        self.tiers = tiers;
        self
    }

    /// Shared handle to the local dataset.
    pub fn dataset(&self) -> &Arc<FoodDataset> {
        &self.dataset
    }

    /// Resolve a food name or label to a nutrition record.
    ///
    /// Returns `None` when no enabled tier matches; the caller records the
    /// item as unresolved and continues.
    pub async fn resolve(
        &self,
        name: &str,
        category_hint: Option<FoodCategory>,
    ) -> Option<NutritionRecord> {
        let name_lower = name.trim().to_lowercase();
        if name_lower.is_empty() {
            return None;
        }

        if self.tiers.local {
            if let Some(record) = self.resolve_local(&name_lower, category_hint) {
                debug!(name = %name, matched = %record.name, "Resolved food from local dataset");
                metrics::counter!("food_resolutions_total", "tier" => "local").increment(1);
                return Some(record);
            }
        }

        if self.tiers.cnf {
            if let Some(tier) = &self.cnf {
                if let Some(record) = self.resolve_external(tier.as_ref(), &name_lower).await {
                    metrics::counter!("food_resolutions_total", "tier" => "cnf").increment(1);
                    return Some(record);
                }
            }
        }

        if self.tiers.usda {
            if let Some(tier) = &self.usda {
                if let Some(record) = self.resolve_external(tier.as_ref(), &name_lower).await {
                    metrics::counter!("food_resolutions_total", "tier" => "usda").increment(1);
                    return Some(record);
                }
            }
        }

        debug!(name = %name, "No tier resolved food");
        metrics::counter!("food_resolutions_unresolved_total").increment(1);
        None
    }

    /// Local dataset matching, levels 1–4.
    fn resolve_local(
        &self,
        name_lower: &str,
        category_hint: Option<FoodCategory>,
    ) -> Option<NutritionRecord> {
        // Level 1: exact match on name or alias
        if let Some(food) = self.dataset.lookup(name_lower) {
            return Some(food.clone());
        }

        // Level 2: input is a substring of a food name
        if let Some(food) = self.dataset.find_name_containing(name_lower) {
            return Some(food.clone());
        }

        // Level 3: a food name is a substring of the input
        if let Some(food) = self.dataset.find_name_contained_in(name_lower) {
            return Some(food.clone());
        }

        // Level 4: category keyword fallback. First record of the hinted
        // category in dataset order wins; see FoodDataset::first_in_category.
        if let Some(hint) = category_hint {
            if let Some(keyword) = keywords_for(hint)
                .iter()
                .copied()
                .find(|keyword| name_lower.contains(*keyword))
            {
                if let Some(food) = self.dataset.first_in_category(hint) {
                    info!(
                        name = %name_lower,
                        matched = %food.name,
                        keyword = %keyword,
                        "Category-keyword fallback match"
                    );
                    return Some(food.clone());
                }
            }
        }

        None
    }

    /// One external tier lookup. Tier errors are logged and collapse to
    /// `None` so resolution falls through.
    async fn resolve_external(
        &self,
        tier: &dyn NutrientLookup,
        name_lower: &str,
    ) -> Option<NutritionRecord> {
        match tier.nutrition_for(name_lower).await {
            Ok(Some(nutrition)) => {
                let category = infer_category_from_nutrients(&nutrition);
                info!(
                    name = %name_lower,
                    tier = tier.tier_name(),
                    category = %category,
                    "Resolved food from external tier"
                );
                Some(NutritionRecord {
                    name: name_lower.to_string(),
                    category,
                    nutrition,
                    aliases: Vec::new(),
                    source: tier.source(),
                })
            }
            Ok(None) => {
                debug!(name = %name_lower, tier = tier.tier_name(), "External tier had no match");
                None
            }
            Err(e) => {
                error_logging::log_tier_error(&e, tier.tier_name(), "nutrition_for", Some(name_lower));
                warn!(
                    name = %name_lower,
                    tier = tier.tier_name(),
                    "External tier failed, treating as no match"
                );
                None
            }
        }
    }
}
