//! # Local Nutrition Dataset
//!
//! Loads the static food dataset from JSON at process start and indexes it
//! for case-insensitive lookup by canonical name and every alias. The
//! dataset is read-only after construction and safe to share across
//! concurrent requests behind an `Arc`.
//!
//! Dataset order is meaningful: the resolver's category-keyword fallback
//! returns the *first* record of a category in dataset order, so the JSON
//! array order is part of the dataset's contract.

use crate::errors::{error_logging, AppError, AppResult};
use crate::nutrition::{FoodCategory, NutritionRecord};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use tracing::{debug, info, warn};

/// On-disk dataset file shape
#[derive(Debug, Deserialize)]
struct DatasetFile {
    foods: Vec<NutritionRecord>,
}

/// In-memory nutrition dataset with a case-folded name/alias index.
#[derive(Debug)]
pub struct FoodDataset {
    /// Records in dataset (JSON array) order
    records: Vec<NutritionRecord>,
    /// Case-folded name and alias → position in `records`
    index: HashMap<String, usize>,
}

impl FoodDataset {
    /// Load the dataset from the configured path.
    ///
    /// Tries the `NUTRITION_DB_PATH` environment variable first, then a
    /// fixed list of fallback paths. A missing or unparsable dataset is a
    /// startup error; the service cannot resolve anything without it.
    pub fn load() -> AppResult<Self> {
        if let Ok(db_path) = std::env::var("NUTRITION_DB_PATH") {
            info!(
                "Loading nutrition dataset from environment variable: {}",
                db_path
            );
            return Self::load_from_path(&db_path);
        }

        let possible_paths = [
            "/app/data/nutrition_db.json", // Docker path
            "data/nutrition_db.json",      // Local development path
            "../data/nutrition_db.json",   // Test path
        ];

        for db_path in &possible_paths {
            match fs::read_to_string(db_path) {
                Ok(content) => {
                    info!(
                        "Loading nutrition dataset from fallback path: {}",
                        db_path
                    );
                    return Self::from_json_str(&content);
                }
                Err(_) => continue, // Try next path
            }
        }

        let err = AppError::Dataset(
            "No nutrition dataset found in any expected location. Set NUTRITION_DB_PATH."
                .to_string(),
        );
        error_logging::log_dataset_error(&err, "load", None);
        Err(err)
    }

    fn load_from_path(path: &str) -> AppResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            let err = AppError::Dataset(format!("Failed to read dataset '{}': {}", path, e));
            error_logging::log_dataset_error(&err, "read", Some(path));
            err
        })?;
        Self::from_json_str(&content)
    }

    /// Parse a dataset from a JSON string and build the lookup index.
    pub fn from_json_str(content: &str) -> AppResult<Self> {
        let file: DatasetFile = serde_json::from_str(content)
            .map_err(|e| AppError::Dataset(format!("Failed to parse dataset JSON: {}", e)))?;

        if file.foods.is_empty() {
            return Err(AppError::Dataset(
                "Nutrition dataset contains no foods".to_string(),
            ));
        }

        Ok(Self::from_records(file.foods))
    }

    /// Build a dataset directly from records (used by tests).
    pub fn from_records(records: Vec<NutritionRecord>) -> Self {
        let mut index = HashMap::new();

        for (position, food) in records.iter().enumerate() {
            // Canonical name first, then aliases; on key collision the
            // earliest record keeps the key
            for key in std::iter::once(&food.name).chain(food.aliases.iter()) {
                let folded = key.to_lowercase();
                if let Some(existing) = index.insert(folded.clone(), position) {
                    if existing != position {
                        warn!(
                            key = %folded,
                            kept = %records[existing].name,
                            dropped = %food.name,
                            "Duplicate dataset key, keeping earliest record"
                        );
                        index.insert(folded, existing);
                    }
                }
            }
        }

        debug!(
            foods = records.len(),
            index_keys = index.len(),
            "Nutrition dataset indexed"
        );

        Self { records, index }
    }

    /// Number of food records (not index keys).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Exact lookup by name or alias, case-insensitive.
    pub fn lookup(&self, name: &str) -> Option<&NutritionRecord> {
        self.index
            .get(&name.to_lowercase())
            .map(|&position| &self.records[position])
    }

    /// Whether `name` is a known canonical name or alias. Used by the meal
    /// parser to decide if a token (or 2-token phrase) is a known food.
    pub fn contains_name(&self, name: &str) -> bool {
        self.index.contains_key(&name.to_lowercase())
    }

    /// First record (dataset order) whose canonical name contains `needle`.
    /// `needle` must already be lowercase.
    pub fn find_name_containing(&self, needle: &str) -> Option<&NutritionRecord> {
        self.records
            .iter()
            .find(|food| food.name.to_lowercase().contains(needle))
    }

    /// First record (dataset order) whose canonical name is contained in
    /// `haystack`. `haystack` must already be lowercase.
    pub fn find_name_contained_in(&self, haystack: &str) -> Option<&NutritionRecord> {
        self.records
            .iter()
            .find(|food| haystack.contains(&food.name.to_lowercase()))
    }

    /// First record of `category` in dataset order.
    ///
    /// Deliberately positional: the dataset is a versioned JSON array whose
    /// order is stable across loads, and "first in dataset wins" is the
    /// documented tie-break for the category-keyword fallback.
    pub fn first_in_category(&self, category: FoodCategory) -> Option<&NutritionRecord> {
        self.records.iter().find(|food| food.category == category)
    }

    /// Iterate records in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = &NutritionRecord> {
        self.records.iter()
    }
}
