//! # Food Category Inference
//!
//! Two pure, deterministic heuristics for assigning a coarse food category:
//!
//! - **Label path**: keyword containment against per-category keyword sets,
//!   tested in a fixed priority order. Used for image labels where only the
//!   text is known.
//! - **Nutrient path**: a threshold cascade over the nutrient profile. Used
//!   for external-tier records that arrive without a category.
//!
//! Both orderings are load-bearing: foods near multiple thresholds (or whose
//! labels contain keywords from several sets) classify differently if the
//! order changes.

use crate::nutrition::{FoodCategory, NutrientProfile};
use lazy_static::lazy_static;

lazy_static! {
    /// Per-category label keywords, in the priority order they are tested.
    pub static ref CATEGORY_KEYWORDS: Vec<(FoodCategory, &'static [&'static str])> = vec![
        (
            FoodCategory::Protein,
            &[
                "chicken", "beef", "pork", "fish", "salmon", "tuna", "turkey", "egg", "meat",
                "poultry", "seafood", "shrimp", "steak",
            ][..],
        ),
        (
            FoodCategory::Grain,
            &[
                "rice", "pasta", "bread", "grain", "quinoa", "oat", "cereal", "wheat", "noodle",
            ][..],
        ),
        (
            FoodCategory::Fruit,
            &[
                "apple", "banana", "orange", "berry", "strawberry", "blueberry", "grape",
                "melon", "peach", "pear", "fruit",
            ][..],
        ),
        (
            FoodCategory::Vegetable,
            &[
                "broccoli", "carrot", "lettuce", "tomato", "spinach", "pepper", "onion",
                "cucumber", "vegetable", "salad",
            ][..],
        ),
        (
            FoodCategory::Dairy,
            &["cheese", "milk", "yogurt", "dairy", "butter", "cream"][..],
        ),
    ];
}

/// Keywords associated with one category, used by the resolver's
/// category-keyword fallback. Empty for categories without a keyword set
/// (fat, other).
pub fn keywords_for(category: FoodCategory) -> &'static [&'static str] {
    CATEGORY_KEYWORDS
        .iter()
        .find(|(cat, _)| *cat == category)
        .map(|(_, words)| *words)
        .unwrap_or(&[])
}

/// Infer a food category from a free-text label.
///
/// Lowercases the label and tests substring containment (not whole-word)
/// against the keyword sets in fixed order protein → grain → fruit →
/// vegetable → dairy; first match wins. Labels matching no set are `Other`.
pub fn infer_category_from_label(label: &str) -> FoodCategory {
    let label_lower = label.to_lowercase();

    for (category, keywords) in CATEGORY_KEYWORDS.iter() {
        if keywords.iter().any(|word| label_lower.contains(*word)) {
            return *category;
        }
    }

    FoodCategory::Other
}

/// Infer a food category from a per-100g nutrient profile.
///
/// Threshold cascade, evaluated in this exact order; each branch
/// short-circuits:
///
/// 1. protein_g > 15 → protein
/// 2. calcium_mg > 100 → dairy
/// 3. fat_g > 40 → fat
/// 4. vitamin_c_mg > 20 → fruit
/// 5. calories < 100 && fiber_g > 2 → vegetable
/// 6. carbs_g > 50 → grain
/// 7. calories < 50 → vegetable (low-calorie items that missed the fiber test)
/// 8. → grain (final default)
pub fn infer_category_from_nutrients(nutrition: &NutrientProfile) -> FoodCategory {
    if nutrition.protein_g > 15.0 {
        return FoodCategory::Protein;
    }

    if nutrition.calcium_mg > 100.0 {
        return FoodCategory::Dairy;
    }

    if nutrition.fat_g > 40.0 {
        return FoodCategory::Fat;
    }

    if nutrition.vitamin_c_mg > 20.0 {
        return FoodCategory::Fruit;
    }

    if nutrition.calories < 100.0 && nutrition.fiber_g > 2.0 {
        return FoodCategory::Vegetable;
    }

    if nutrition.carbs_g > 50.0 {
        return FoodCategory::Grain;
    }

    if nutrition.calories < 50.0 {
        return FoodCategory::Vegetable;
    }

    FoodCategory::Grain
}
