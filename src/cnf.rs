//! # Canadian Nutrient File Client
//!
//! Lookup tier backed by Health Canada's Canadian Nutrient File API
//! (roughly 5,700 foods). The full food list is downloaded once per process
//! and searched in memory (exact → contains → reverse-contains over food
//! descriptions); per-food nutrient amounts are fetched on demand and
//! cached by food code for the process lifetime.
//!
//! All network failures surface as `AppError::Network` and are demoted to
//! tier misses by the resolver; a circuit breaker skips the API entirely
//! after repeated failures.

use crate::cache::LookupCache;
use crate::circuit_breaker::{BreakerConfig, CircuitBreaker};
use crate::errors::{AppError, AppResult};
use crate::nutrition::{NutrientProfile, NutrientSource};
use crate::resolver::NutrientLookup;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const DEFAULT_BASE_URL: &str = "https://food-nutrition.canada.ca/api/canadian-nutrient-file";

/// Retry schedule for the one-shot food-list download
const LIST_DOWNLOAD_MAX_ATTEMPTS: u32 = 3;
const LIST_RETRY_BASE_DELAY_MS: u64 = 500;
const LIST_RETRY_MAX_DELAY_MS: u64 = 4_000;

/// One entry of the CNF food list
#[derive(Debug, Clone, Deserialize)]
pub struct CnfFood {
    pub food_code: u32,
    pub food_description: String,
}

/// One nutrient amount row for a food code
#[derive(Debug, Deserialize)]
struct CnfNutrientAmount {
    #[serde(default)]
    nutrient_web_name: String,
    #[serde(default)]
    nutrient_value: f64,
}

/// Client for the Canadian Nutrient File API.
pub struct CnfClient {
    http: reqwest::Client,
    base_url: String,
    /// Food list, downloaded once per process
    foods_list: RwLock<Option<Arc<Vec<CnfFood>>>>,
    /// Nutrition per food code, immutable once computed
    nutrition_cache: LookupCache<u32, NutrientProfile>,
    breaker: CircuitBreaker,
}

impl CnfClient {
    /// Create a client using the production base URL. The `reqwest` client
    /// must carry its own request timeout.
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_base_url(http, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (used by tests).
    pub fn with_base_url(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            foods_list: RwLock::new(None),
            nutrition_cache: LookupCache::new(),
            breaker: CircuitBreaker::new(BreakerConfig::default()),
        }
    }

    /// Get the food list, downloading it on first use.
    async fn foods_list(&self) -> AppResult<Arc<Vec<CnfFood>>> {
        if let Some(list) = self.foods_list.read().clone() {
            return Ok(list);
        }

        let list = Arc::new(self.download_foods_list().await?);

        let mut guard = self.foods_list.write();
        // A concurrent download may have won; keep the first stored list
        if let Some(existing) = guard.clone() {
            return Ok(existing);
        }
        *guard = Some(Arc::clone(&list));
        Ok(list)
    }

    /// Download the full food list with bounded retries.
    ///
    /// Uses exponential backoff with jitter between attempts:
    /// `delay = min(base * 2^(attempt-1), max) + random(0, delay/4)`.
    async fn download_foods_list(&self) -> AppResult<Vec<CnfFood>> {
        let url = format!("{}/food/", self.base_url);

        let mut last_error = AppError::Network("CNF food list download not attempted".to_string());
        for attempt in 1..=LIST_DOWNLOAD_MAX_ATTEMPTS {
            info!(url = %url, attempt, "Downloading CNF food list");

            match self.fetch_foods_list(&url).await {
                Ok(foods) => {
                    info!(foods = foods.len(), "Downloaded CNF food list");
                    return Ok(foods);
                }
                Err(e) => {
                    warn!(error = %e, attempt, "CNF food list download failed");
                    last_error = e;
                    if attempt < LIST_DOWNLOAD_MAX_ATTEMPTS {
                        let delay = retry_delay_ms(attempt);
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                    }
                }
            }
        }

        Err(last_error)
    }

    async fn fetch_foods_list(&self, url: &str) -> AppResult<Vec<CnfFood>> {
        let response = self
            .http
            .get(url)
            .query(&[("lang", "en"), ("type", "json")])
            .send()
            .await?
            .error_for_status()?;

        let foods: Vec<CnfFood> = response
            .json()
            .await
            .map_err(|e| AppError::Network(format!("Malformed CNF food list: {}", e)))?;
        Ok(foods)
    }

    /// Search the food list by name: exact → contains → reverse-contains
    /// over descriptions, first hit wins.
    pub async fn search_food(&self, query: &str) -> AppResult<Option<u32>> {
        let query_lower = query.trim().to_lowercase();
        if query_lower.is_empty() {
            return Ok(None);
        }

        let foods = self.foods_list().await?;

        // Exact match first
        for food in foods.iter() {
            if query_lower == food.food_description.to_lowercase() {
                return Ok(Some(food.food_code));
            }
        }

        // Contains match
        for food in foods.iter() {
            if food.food_description.to_lowercase().contains(&query_lower) {
                return Ok(Some(food.food_code));
            }
        }

        // Reverse contains (query contains food description)
        for food in foods.iter() {
            if query_lower.contains(&food.food_description.to_lowercase()) {
                return Ok(Some(food.food_code));
            }
        }

        Ok(None)
    }

    /// Fetch nutrient amounts for a food code, consulting the cache first.
    async fn fetch_nutrition(&self, food_code: u32) -> AppResult<NutrientProfile> {
        if let Some(cached) = self.nutrition_cache.get(&food_code) {
            debug!(food_code, "CNF nutrition cache hit");
            return Ok(cached);
        }

        let url = format!("{}/nutrientamount/", self.base_url);
        let code = food_code.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[("id", code.as_str()), ("lang", "en"), ("type", "json")])
            .send()
            .await?
            .error_for_status()?;

        let rows: Vec<CnfNutrientAmount> = response
            .json()
            .await
            .map_err(|e| AppError::Network(format!("Malformed CNF nutrient payload: {}", e)))?;

        let nutrition = normalize_nutrients(&rows);
        Ok(self.nutrition_cache.insert_if_absent(food_code, nutrition))
    }
}

/// Map CNF nutrient rows into the canonical schema. Nutrients the API does
/// not report stay at 0.
fn normalize_nutrients(rows: &[CnfNutrientAmount]) -> NutrientProfile {
    let mut nutrition = NutrientProfile::default();

    for row in rows {
        let value = row.nutrient_value;
        match row.nutrient_web_name.as_str() {
            "Energy (kcal)" => nutrition.calories = value,
            "Protein" => nutrition.protein_g = value,
            "Carbohydrate" => nutrition.carbs_g = value,
            "Total Fat" => nutrition.fat_g = value,
            "Fibre, total dietary" => nutrition.fiber_g = value,
            "Sodium, Na" => nutrition.sodium_mg = value,
            "Vitamin C" => nutrition.vitamin_c_mg = value,
            "Calcium, Ca" => nutrition.calcium_mg = value,
            "Iron, Fe" => nutrition.iron_mg = value,
            _ => {}
        }
    }

    nutrition
}

/// Exponential backoff delay with jitter, in milliseconds.
fn retry_delay_ms(attempt: u32) -> u64 {
    let exponential = LIST_RETRY_BASE_DELAY_MS.saturating_mul(1 << (attempt - 1));
    let delay = exponential.min(LIST_RETRY_MAX_DELAY_MS);
    let jitter = if delay >= 4 {
        rand::random::<u64>() % (delay / 4)
    } else {
        0
    };
    delay + jitter
}

#[async_trait]
impl NutrientLookup for CnfClient {
    fn tier_name(&self) -> &'static str {
        "cnf"
    }

    fn source(&self) -> NutrientSource {
        NutrientSource::Cnf
    }

    async fn nutrition_for(&self, name: &str) -> AppResult<Option<NutrientProfile>> {
        if self.breaker.is_open() {
            debug!(name = %name, "CNF circuit open, skipping tier");
            return Ok(None);
        }

        let result = async {
            let food_code = match self.search_food(name).await? {
                Some(code) => code,
                None => return Ok(None),
            };
            self.fetch_nutrition(food_code).await.map(Some)
        }
        .await;

        match &result {
            Ok(_) => self.breaker.record_success(),
            Err(_) => self.breaker.record_failure(),
        }
        result
    }
}
