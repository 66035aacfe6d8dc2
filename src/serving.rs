//! Standard serving sizes for image-detected foods.
//!
//! Image detections carry no portion information, so each one is assigned
//! the standard serving mass of its category. Text-path items are never
//! converted to grams; their per-serving nutrition is scaled directly by
//! the supplied quantity multiplier.

use crate::nutrition::FoodCategory;

/// Standard serving mass in grams for a food category.
///
/// protein = 85 (3 oz cooked meat/fish), grain = 50 (1/2 cup cooked rice,
/// 1 slice bread), fruit = 150 (1 medium fruit), vegetable = 85 (1 cup raw
/// leafy), dairy = 240 (1 cup milk/yogurt). Everything else gets the
/// default 100g serving.
pub fn serving_grams(category: FoodCategory) -> u32 {
    match category {
        FoodCategory::Protein => 85,
        FoodCategory::Grain => 50,
        FoodCategory::Fruit => 150,
        FoodCategory::Vegetable => 85,
        FoodCategory::Dairy => 240,
        FoodCategory::Fat | FoodCategory::Other => 100,
    }
}
