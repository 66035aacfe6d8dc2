//! # USDA FoodData Central Client
//!
//! Lookup tier backed by the USDA FoodData Central API (500,000+ foods),
//! consulted after the local dataset and the Canadian Nutrient File. A
//! lookup is two calls — `/foods/search` for the best-ranked FDC id, then
//! `/food/{id}` for its nutrients — and the two are not atomic: a search
//! hit whose detail fetch fails is a tier failure, not a partial result.
//!
//! Nutrient payloads are normalized by USDA nutrient id and cached by FDC
//! id for the process lifetime.

use crate::cache::LookupCache;
use crate::circuit_breaker::{BreakerConfig, CircuitBreaker};
use crate::errors::{AppError, AppResult};
use crate::nutrition::{NutrientProfile, NutrientSource};
use crate::resolver::NutrientLookup;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";

/// Search results page. A payload without the `foods` field is malformed
/// and surfaces as a tier failure, not an empty result.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    foods: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "fdcId")]
    fdc_id: Option<u64>,
    #[serde(default)]
    #[allow(dead_code)]
    description: String,
}

/// Food detail payload, reduced to the nutrient list. A payload without
/// `foodNutrients` is malformed and surfaces as a tier failure.
#[derive(Debug, Deserialize)]
struct FoodDetails {
    #[serde(rename = "foodNutrients")]
    food_nutrients: Vec<FoodNutrient>,
}

#[derive(Debug, Deserialize)]
struct FoodNutrient {
    #[serde(default)]
    nutrient: Option<NutrientRef>,
    #[serde(default)]
    amount: f64,
}

#[derive(Debug, Deserialize)]
struct NutrientRef {
    id: Option<u64>,
}

/// Client for the USDA FoodData Central API.
pub struct UsdaClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    /// Nutrition per FDC id, immutable once computed
    nutrition_cache: LookupCache<u64, NutrientProfile>,
    breaker: CircuitBreaker,
}

impl UsdaClient {
    /// Create a client using the production base URL. The API key comes
    /// from configuration (`USDA_API_KEY`, DEMO_KEY by default).
    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self::with_base_url(http, api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (used by tests).
    pub fn with_base_url(
        http: reqwest::Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            nutrition_cache: LookupCache::new(),
            breaker: CircuitBreaker::new(BreakerConfig::default()),
        }
    }

    /// Search for the best-ranked food matching `query`.
    async fn search_food(&self, query: &str) -> AppResult<Option<u64>> {
        let url = format!("{}/foods/search", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", query),
                ("pageSize", "1"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let page: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Network(format!("Malformed USDA search payload: {}", e)))?;

        Ok(page.foods.first().and_then(|hit| hit.fdc_id))
    }

    /// Fetch and normalize nutrients for an FDC id, consulting the cache.
    async fn fetch_nutrition(&self, fdc_id: u64) -> AppResult<NutrientProfile> {
        if let Some(cached) = self.nutrition_cache.get(&fdc_id) {
            debug!(fdc_id, "USDA nutrition cache hit");
            return Ok(cached);
        }

        let url = format!("{}/food/{}", self.base_url, fdc_id);
        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let details: FoodDetails = response
            .json()
            .await
            .map_err(|e| AppError::Network(format!("Malformed USDA food payload: {}", e)))?;

        let nutrition = normalize_nutrients(&details.food_nutrients);
        Ok(self.nutrition_cache.insert_if_absent(fdc_id, nutrition))
    }
}

/// Map USDA nutrient ids into the canonical schema (values are per 100g).
/// Unmapped nutrients are ignored; unreported fields stay at 0.
fn normalize_nutrients(nutrients: &[FoodNutrient]) -> NutrientProfile {
    let mut nutrition = NutrientProfile::default();

    for row in nutrients {
        let id = match row.nutrient.as_ref().and_then(|n| n.id) {
            Some(id) => id,
            None => continue,
        };
        let value = row.amount;
        match id {
            1008 => nutrition.calories = value,     // Energy (kcal)
            1003 => nutrition.protein_g = value,    // Protein
            1005 => nutrition.carbs_g = value,      // Carbohydrate, by difference
            1004 => nutrition.fat_g = value,        // Total lipid (fat)
            1079 => nutrition.fiber_g = value,      // Fiber, total dietary
            1093 => nutrition.sodium_mg = value,    // Sodium
            1162 => nutrition.vitamin_c_mg = value, // Vitamin C
            1087 => nutrition.calcium_mg = value,   // Calcium
            1089 => nutrition.iron_mg = value,      // Iron
            _ => {}
        }
    }

    nutrition
}

#[async_trait]
impl NutrientLookup for UsdaClient {
    fn tier_name(&self) -> &'static str {
        "usda"
    }

    fn source(&self) -> NutrientSource {
        NutrientSource::Usda
    }

    async fn nutrition_for(&self, name: &str) -> AppResult<Option<NutrientProfile>> {
        if self.breaker.is_open() {
            debug!(name = %name, "USDA circuit open, skipping tier");
            return Ok(None);
        }

        let result = async {
            let fdc_id = match self.search_food(name).await? {
                Some(id) => id,
                None => return Ok(None),
            };
            self.fetch_nutrition(fdc_id).await.map(Some)
        }
        .await;

        match &result {
            Ok(_) => self.breaker.record_success(),
            Err(_) => self.breaker.record_failure(),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_maps_nutrient_ids() {
        let nutrients = vec![
            FoodNutrient {
                nutrient: Some(NutrientRef { id: Some(1008) }),
                amount: 206.0,
            },
            FoodNutrient {
                nutrient: Some(NutrientRef { id: Some(1003) }),
                amount: 22.0,
            },
            FoodNutrient {
                nutrient: Some(NutrientRef { id: Some(9999) }),
                amount: 42.0,
            },
            FoodNutrient {
                nutrient: None,
                amount: 1.0,
            },
        ];

        let nutrition = normalize_nutrients(&nutrients);
        assert_eq!(nutrition.calories, 206.0);
        assert_eq!(nutrition.protein_g, 22.0);
        assert_eq!(nutrition.carbs_g, 0.0);
        assert_eq!(nutrition.iron_mg, 0.0);
    }
}
