//! # Nutrition Data Model
//!
//! Fixed-shape types shared by the resolution, aggregation, and rule
//! evaluation pipeline. Every entity the pipeline exchanges is a closed
//! struct or tagged enum so a typo in a field name is a compile error,
//! not a silently-zero nutrient.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse food classification used for serving-size assignment and
/// category-based insights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodCategory {
    Protein,
    Grain,
    Fruit,
    Vegetable,
    Dairy,
    Fat,
    Other,
}

impl FoodCategory {
    /// Lowercase wire name, matching the dataset and response JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodCategory::Protein => "protein",
            FoodCategory::Grain => "grain",
            FoodCategory::Fruit => "fruit",
            FoodCategory::Vegetable => "vegetable",
            FoodCategory::Dairy => "dairy",
            FoodCategory::Fat => "fat",
            FoodCategory::Other => "other",
        }
    }
}

impl fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which resolution tier produced a nutrition record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutrientSource {
    /// Static dataset shipped with the service
    Local,
    /// Canadian Nutrient File API
    Cnf,
    /// USDA FoodData Central API
    Usda,
}

impl fmt::Display for NutrientSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NutrientSource::Local => "local",
            NutrientSource::Cnf => "cnf",
            NutrientSource::Usda => "usda",
        };
        f.write_str(name)
    }
}

/// Nutrient facts for one food: per standard serving for local records,
/// per 100g for external-tier records.
///
/// Every field defaults to 0.0 so partially-populated external payloads
/// deserialize cleanly instead of failing the whole lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientProfile {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub carbs_g: f64,
    #[serde(default)]
    pub fat_g: f64,
    #[serde(default)]
    pub fiber_g: f64,
    #[serde(default)]
    pub sodium_mg: f64,
    #[serde(default)]
    pub vitamin_c_mg: f64,
    #[serde(default)]
    pub calcium_mg: f64,
    #[serde(default)]
    pub iron_mg: f64,
}

impl NutrientProfile {
    /// Add `other` scaled by `quantity` into this profile, field by field.
    pub fn add_scaled(&mut self, other: &NutrientProfile, quantity: f64) {
        self.calories += other.calories * quantity;
        self.protein_g += other.protein_g * quantity;
        self.carbs_g += other.carbs_g * quantity;
        self.fat_g += other.fat_g * quantity;
        self.fiber_g += other.fiber_g * quantity;
        self.sodium_mg += other.sodium_mg * quantity;
        self.vitamin_c_mg += other.vitamin_c_mg * quantity;
        self.calcium_mg += other.calcium_mg * quantity;
        self.iron_mg += other.iron_mg * quantity;
    }

    /// Round every field to 1 decimal place using `f64::round`
    /// (round-half-away-from-zero).
    pub fn round_to_tenths(&mut self) {
        let round1 = |v: f64| (v * 10.0).round() / 10.0;
        self.calories = round1(self.calories);
        self.protein_g = round1(self.protein_g);
        self.carbs_g = round1(self.carbs_g);
        self.fat_g = round1(self.fat_g);
        self.fiber_g = round1(self.fiber_g);
        self.sodium_mg = round1(self.sodium_mg);
        self.vitamin_c_mg = round1(self.vitamin_c_mg);
        self.calcium_mg = round1(self.calcium_mg);
        self.iron_mg = round1(self.iron_mg);
    }

    /// Read a nutrient by its wire key. Unknown keys behave as 0, mirroring
    /// the "missing nutrient" contract of the rule engine.
    pub fn get(&self, key: &str) -> f64 {
        match key {
            "calories" => self.calories,
            "protein_g" => self.protein_g,
            "carbs_g" => self.carbs_g,
            "fat_g" => self.fat_g,
            "fiber_g" => self.fiber_g,
            "sodium_mg" => self.sodium_mg,
            "vitamin_c_mg" => self.vitamin_c_mg,
            "calcium_mg" => self.calcium_mg,
            "iron_mg" => self.iron_mg,
            _ => 0.0,
        }
    }
}

fn default_source() -> NutrientSource {
    NutrientSource::Local
}

/// Canonical nutrition facts for one food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    /// Lowercase canonical food name
    pub name: String,
    /// Always populated; inferred from the nutrient profile for external
    /// records that arrive without one
    pub category: FoodCategory,
    /// Nutrient facts (per serving for local, per 100g for external)
    pub nutrition: NutrientProfile,
    /// Alternate names indexed alongside the canonical name
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Resolution tier that produced this record
    #[serde(default = "default_source")]
    pub source: NutrientSource,
}

fn default_quantity() -> f64 {
    1.0
}

/// One food occurrence to account for (text or direct API path).
/// `quantity` means "servings", not grams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
}

impl MealItem {
    /// Convenience constructor for a single serving.
    pub fn one(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: 1.0,
        }
    }
}

/// One detection from the external image-labelling collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedLabel {
    pub label: String,
    pub confidence: f64,
    /// Category hint supplied by the labelling service; inferred from the
    /// label text when absent
    #[serde(default)]
    pub category: Option<FoodCategory>,
}

/// Per-label outcome of the image path, ready for response formatting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DetectedFood {
    Found {
        label: String,
        confidence: f64,
        food_name: String,
        serving_size_grams: u32,
        category: FoodCategory,
        source: NutrientSource,
    },
    NotFound {
        label: String,
        confidence: f64,
        category: Option<FoodCategory>,
        message: String,
    },
}

/// Share of total caloric content attributable to each macronutrient.
///
/// Percentages are rounded independently, so they may sum to 99–101; that
/// is expected and never corrected to force exactly 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroPercentages {
    pub protein_pct: u32,
    pub carbs_pct: u32,
    pub fat_pct: u32,
}

/// Aggregated nutrition for one meal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    /// Quantity-weighted nutrient totals, each rounded to 1 decimal
    pub total_nutrition: NutrientProfile,
    pub macro_percentages: MacroPercentages,
    /// Categories present in the meal, first-seen order, deduplicated
    pub food_categories: Vec<FoodCategory>,
    /// Names no tier could resolve, in input order, duplicates preserved
    #[serde(rename = "unknown_foods", skip_serializing_if = "Vec::is_empty")]
    pub unknown_items: Vec<String>,
}

impl AggregationResult {
    /// Human-readable notice for unresolved foods, if any.
    pub fn warning(&self) -> Option<String> {
        if self.unknown_items.is_empty() {
            None
        } else {
            Some(format!(
                "Could not find nutrition data for: {}",
                self.unknown_items.join(", ")
            ))
        }
    }
}
