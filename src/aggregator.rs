//! # Nutrition Aggregator
//!
//! Sums per-item nutrient contributions into meal totals. Each item is
//! resolved through the multi-tier resolver; unresolved items contribute
//! nothing and are recorded separately — they are a notice in the result,
//! never an error. An empty (or fully unresolved) meal aggregates to
//! all-zero totals and percentages.

use crate::nutrition::{AggregationResult, MacroPercentages, MealItem, NutrientProfile};
use crate::resolver::FoodResolver;
use tracing::{debug, warn};

/// Calories per gram of each macronutrient (standard Atwater factors)
const CALORIES_PER_GRAM_PROTEIN: f64 = 4.0;
const CALORIES_PER_GRAM_CARBS: f64 = 4.0;
const CALORIES_PER_GRAM_FAT: f64 = 9.0;

/// Aggregate a list of meal items into nutrition totals.
///
/// For each item: resolve; on a miss append the raw name to
/// `unknown_items` (order-preserving, duplicates kept) and continue; on a
/// hit record a novel category in first-seen order and add the record's
/// nutrition scaled by the item quantity. Totals are rounded to 1 decimal
/// (`f64::round`, half-away-from-zero) after all items are processed, and
/// macro percentages are computed from the rounded totals.
pub async fn aggregate(items: &[MealItem], resolver: &FoodResolver) -> AggregationResult {
    let mut total_nutrition = NutrientProfile::default();
    let mut food_categories = Vec::new();
    let mut unknown_items = Vec::new();

    for item in items {
        match resolver.resolve(&item.name, None).await {
            Some(food) => {
                if !food_categories.contains(&food.category) {
                    food_categories.push(food.category);
                }
                total_nutrition.add_scaled(&food.nutrition, item.quantity);
                debug!(
                    name = %item.name,
                    matched = %food.name,
                    quantity = item.quantity,
                    source = %food.source,
                    "Aggregated food item"
                );
            }
            None => {
                warn!(name = %item.name, "Food not resolved, recording as unknown");
                unknown_items.push(item.name.clone());
            }
        }
    }

    total_nutrition.round_to_tenths();

    let macro_percentages = calculate_macro_percentages(
        total_nutrition.protein_g,
        total_nutrition.carbs_g,
        total_nutrition.fat_g,
    );

    AggregationResult {
        total_nutrition,
        macro_percentages,
        food_categories,
        unknown_items,
    }
}

/// Calculate the percentage of calories contributed by each macronutrient.
///
/// Grams convert to calories at 4 kcal/g for protein and carbs and
/// 9 kcal/g for fat. Each percentage is rounded independently with
/// `f64::round` (half-away-from-zero), so the three may sum to 99–101;
/// that variance is expected and is not corrected. A zero caloric total
/// yields all-zero percentages rather than dividing by zero.
pub fn calculate_macro_percentages(protein_g: f64, carbs_g: f64, fat_g: f64) -> MacroPercentages {
    let protein_cal = protein_g * CALORIES_PER_GRAM_PROTEIN;
    let carbs_cal = carbs_g * CALORIES_PER_GRAM_CARBS;
    let fat_cal = fat_g * CALORIES_PER_GRAM_FAT;

    let total_cal = protein_cal + carbs_cal + fat_cal;

    if total_cal == 0.0 {
        return MacroPercentages::default();
    }

    MacroPercentages {
        protein_pct: (protein_cal / total_cal * 100.0).round() as u32,
        carbs_pct: (carbs_cal / total_cal * 100.0).round() as u32,
        fat_pct: (fat_cal / total_cal * 100.0).round() as u32,
    }
}
