//! # Virtual Dietitian
//!
//! Webhook backend for a conversational nutrition-tracking assistant.
//! Resolves food names and image labels to nutrition records through a
//! three-tier lookup chain (local dataset → Canadian Nutrient File →
//! USDA FoodData Central), aggregates meal totals, and derives
//! deterministic dietary insights from a fixed rule set.

pub mod aggregator;
pub mod analyzer;
pub mod cache;
pub mod category;
pub mod circuit_breaker;
pub mod cnf;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod nutrition;
pub mod parser;
pub mod resolver;
pub mod rules;
pub mod serving;
pub mod usda;
pub mod webhook;

// Re-export types for easier access
pub use analyzer::{MealAnalysis, MealAnalyzer};
pub use dataset::FoodDataset;
pub use nutrition::{
    AggregationResult, DetectedFood, DetectedLabel, FoodCategory, MacroPercentages, MealItem,
    NutrientProfile, NutrientSource, NutritionRecord,
};
pub use resolver::{FoodResolver, NutrientLookup, TierSet};
pub use rules::{Insight, InsightKind, Rule, RuleEngine};
