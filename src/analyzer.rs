//! # Meal Analyzer
//!
//! Dependency-injected facade over the whole pipeline: resolution,
//! aggregation, and rule evaluation. Constructed once at process start
//! with its collaborators (dataset, tier clients, rule set) and shared by
//! reference into each request-scoped call, so tests can inject fakes per
//! tier instead of reaching for ambient globals.
//!
//! Three input paths converge here:
//! - **text**: a free-text meal description, tokenized by the parser
//! - **direct**: pre-structured `(name, quantity)` items
//! - **image**: `(label, confidence, category hint)` triples from the
//!   external labelling collaborator

use crate::aggregator;
use crate::category::infer_category_from_label;
use crate::dataset::FoodDataset;
use crate::nutrition::{AggregationResult, DetectedFood, DetectedLabel, MealItem};
use crate::parser::parse_meal_description;
use crate::resolver::FoodResolver;
use crate::rules::{self, Insight, RuleEngine};
use crate::serving::serving_grams;
use std::sync::Arc;
use tracing::{info, warn};

/// Complete outcome of analyzing one meal.
#[derive(Debug, Clone, PartialEq)]
pub struct MealAnalysis {
    pub aggregation: AggregationResult,
    pub insights: Vec<Insight>,
    pub follow_up: String,
}

/// The assembled pipeline.
pub struct MealAnalyzer {
    resolver: FoodResolver,
    rules: RuleEngine,
}

impl MealAnalyzer {
    pub fn new(resolver: FoodResolver, rules: RuleEngine) -> Self {
        Self { resolver, rules }
    }

    /// The local dataset backing the resolver and the parser.
    pub fn dataset(&self) -> &Arc<FoodDataset> {
        self.resolver.dataset()
    }

    /// Parse a free-text meal description into candidate items. Exposed so
    /// the boundary layer can reject descriptions yielding no items before
    /// aggregation.
    pub fn parse_description(&self, description: &str) -> Vec<MealItem> {
        parse_meal_description(description, self.dataset())
    }

    /// Analyze a meal description (text path).
    pub async fn analyze_description(&self, description: &str) -> MealAnalysis {
        let items = self.parse_description(description);
        info!(items = items.len(), "Parsed meal description");
        self.analyze_items(&items).await
    }

    /// Analyze pre-structured food items (direct API path).
    pub async fn analyze_items(&self, items: &[MealItem]) -> MealAnalysis {
        let aggregation = aggregator::aggregate(items, &self.resolver).await;

        let insights = self.rules.evaluate_all(
            &aggregation.total_nutrition,
            &aggregation.macro_percentages,
            &aggregation.food_categories,
        );
        let follow_up = rules::follow_up(&insights);

        MealAnalysis {
            aggregation,
            insights,
            follow_up,
        }
    }

    /// Map detected image labels to foods with standard serving sizes
    /// (image path).
    ///
    /// Each label keeps its position in the output: a resolvable label
    /// becomes `Found` with its serving mass, an unresolvable one becomes
    /// `NotFound` with a notice. Labels missing a category hint get one
    /// inferred from the label text.
    pub async fn map_labels(&self, labels: &[DetectedLabel]) -> Vec<DetectedFood> {
        let mut detected = Vec::with_capacity(labels.len());

        for item in labels {
            let category = item
                .category
                .unwrap_or_else(|| infer_category_from_label(&item.label));

            match self.resolver.resolve(&item.label, Some(category)).await {
                Some(food) => {
                    let grams = serving_grams(category);
                    info!(
                        label = %item.label,
                        food = %food.name,
                        grams,
                        source = %food.source,
                        "Mapped detected label to food"
                    );
                    detected.push(DetectedFood::Found {
                        label: item.label.clone(),
                        confidence: item.confidence,
                        food_name: food.name,
                        serving_size_grams: grams,
                        category,
                        source: food.source,
                    });
                }
                None => {
                    warn!(label = %item.label, "Detected label not in any nutrition tier");
                    detected.push(DetectedFood::NotFound {
                        label: item.label.clone(),
                        confidence: item.confidence,
                        category: item.category,
                        message: format!(
                            "'{}' detected but not in nutrition database",
                            item.label
                        ),
                    });
                }
            }
        }

        detected
    }

    /// Analyze detected image labels end to end: map each label, then
    /// aggregate the found foods as one serving each and evaluate rules.
    pub async fn analyze_labels(&self, labels: &[DetectedLabel]) -> (Vec<DetectedFood>, MealAnalysis) {
        let detected = self.map_labels(labels).await;

        let items: Vec<MealItem> = detected
            .iter()
            .filter_map(|food| match food {
                DetectedFood::Found { food_name, .. } => Some(MealItem::one(food_name.clone())),
                DetectedFood::NotFound { .. } => None,
            })
            .collect();

        let analysis = self.analyze_items(&items).await;
        (detected, analysis)
    }
}
