//! # Nutrition Rule Engine
//!
//! Deterministic business rules over aggregated nutrition data — same
//! input always produces the same insights, no model involved. Three rule
//! shapes cover the whole rule language:
//!
//! - **Category**: a food category present in the meal triggers a fixed
//!   insight ("fruit → excellent source of Vitamin C")
//! - **Threshold**: a nutrient total compared against a bound
//!   ("sodium_mg > 800 → high-sodium warning")
//! - **MacroRatio**: a macro's share of calories outside a healthy range
//!   triggers a below/above recommendation
//!
//! Rules live in one fixed ordered list; every rule is evaluated, every
//! triggering rule emits, and insights come back in rule-declaration
//! order. The rule kinds are a closed enum so the evaluator is
//! exhaustively checked at compile time.

use crate::errors::{AppError, AppResult};
use crate::nutrition::{FoodCategory, MacroPercentages, NutrientProfile};
use serde::Serialize;
use std::str::FromStr;

/// Classification of an insight, serialized as its lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Benefit,
    Warning,
    Recommendation,
    Info,
}

/// One deterministic, human-readable observation about a meal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub message: String,
}

/// Comparison operator for threshold rules.
///
/// Parsed strictly from the conventional symbols; anything else is a rule
/// definition bug and fails rule construction rather than evaluating wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Gt,
    Lt,
    Ge,
    Le,
}

impl Comparator {
    /// Apply the comparison to (value, threshold).
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparator::Gt => value > threshold,
            Comparator::Lt => value < threshold,
            Comparator::Ge => value >= threshold,
            Comparator::Le => value <= threshold,
        }
    }
}

impl FromStr for Comparator {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s {
            ">" => Ok(Comparator::Gt),
            "<" => Ok(Comparator::Lt),
            ">=" => Ok(Comparator::Ge),
            "<=" => Ok(Comparator::Le),
            other => Err(AppError::Config(format!(
                "Invalid rule comparator '{}'. Expected one of: > < >= <=",
                other
            ))),
        }
    }
}

/// Macronutrient addressed by a ratio rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroName {
    Protein,
    Carbs,
    Fat,
}

impl MacroName {
    fn pct(self, macros: &MacroPercentages) -> u32 {
        match self {
            MacroName::Protein => macros.protein_pct,
            MacroName::Carbs => macros.carbs_pct,
            MacroName::Fat => macros.fat_pct,
        }
    }
}

/// One nutrition rule. A closed sum type rather than an open hierarchy:
/// there are exactly three rule shapes and the evaluator matches them all.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Triggers iff the category is present in the meal
    Category {
        category: FoodCategory,
        kind: InsightKind,
        message: String,
    },
    /// Triggers iff `comparator(total[nutrient], threshold)` holds;
    /// an unknown nutrient key reads as 0
    Threshold {
        nutrient: String,
        threshold: f64,
        comparator: Comparator,
        kind: InsightKind,
        message: String,
    },
    /// Triggers below `min_pct` or above `max_pct`; values on either
    /// boundary (inclusive) do not trigger. Emits as a recommendation.
    MacroRatio {
        macro_name: MacroName,
        min_pct: u32,
        max_pct: u32,
        below_message: String,
        above_message: String,
    },
}

impl Rule {
    /// Evaluate this rule against aggregated nutrition data. Returns the
    /// insight if the rule triggers.
    pub fn evaluate(
        &self,
        total_nutrition: &NutrientProfile,
        macro_percentages: &MacroPercentages,
        food_categories: &[FoodCategory],
    ) -> Option<Insight> {
        match self {
            Rule::Category {
                category,
                kind,
                message,
            } => {
                if food_categories.contains(category) {
                    Some(Insight {
                        kind: *kind,
                        message: message.clone(),
                    })
                } else {
                    None
                }
            }
            Rule::Threshold {
                nutrient,
                threshold,
                comparator,
                kind,
                message,
            } => {
                let value = total_nutrition.get(nutrient);
                if comparator.holds(value, *threshold) {
                    Some(Insight {
                        kind: *kind,
                        message: message.clone(),
                    })
                } else {
                    None
                }
            }
            Rule::MacroRatio {
                macro_name,
                min_pct,
                max_pct,
                below_message,
                above_message,
            } => {
                let value = macro_name.pct(macro_percentages);
                if value < *min_pct {
                    Some(Insight {
                        kind: InsightKind::Recommendation,
                        message: below_message.clone(),
                    })
                } else if value > *max_pct {
                    Some(Insight {
                        kind: InsightKind::Recommendation,
                        message: above_message.clone(),
                    })
                } else {
                    None
                }
            }
        }
    }
}

/// Stateless evaluator over a fixed, ordered rule list.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<Rule>,
}

impl RuleEngine {
    /// Build an engine over a custom rule list (used by tests).
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The canonical rule set. Order matters: insights are emitted in this
    /// declaration order.
    pub fn with_default_rules() -> Self {
        Self::new(vec![
            // Category detection rules
            Rule::Category {
                category: FoodCategory::Fruit,
                kind: InsightKind::Benefit,
                message: "Excellent source of Vitamin C and antioxidants".to_string(),
            },
            Rule::Category {
                category: FoodCategory::Grain,
                kind: InsightKind::Benefit,
                message: "Good source of fiber for digestive health".to_string(),
            },
            Rule::Category {
                category: FoodCategory::Vegetable,
                kind: InsightKind::Benefit,
                message: "Rich in vitamins, minerals, and antioxidants".to_string(),
            },
            // Threshold warning rules
            Rule::Threshold {
                nutrient: "sodium_mg".to_string(),
                threshold: 800.0,
                comparator: Comparator::Gt,
                kind: InsightKind::Warning,
                message: "This meal is high in sodium. Consider reducing salt or \
                          choosing lower-sodium options."
                    .to_string(),
            },
            Rule::Threshold {
                nutrient: "fiber_g".to_string(),
                threshold: 5.0,
                comparator: Comparator::Lt,
                kind: InsightKind::Recommendation,
                message: "This meal is low in fiber. Consider adding vegetables, \
                          fruits, or whole grains."
                    .to_string(),
            },
            // Macro ratio recommendation rules (USDA Dietary Guidelines ranges)
            Rule::MacroRatio {
                macro_name: MacroName::Protein,
                min_pct: 15,
                max_pct: 35,
                below_message: "Consider adding more protein (chicken, fish, eggs, tofu, beans) \
                                to reach 15-35% of calories."
                    .to_string(),
                above_message: "This meal is very high in protein. Consider balancing with more \
                                carbs or healthy fats."
                    .to_string(),
            },
            Rule::MacroRatio {
                macro_name: MacroName::Fat,
                min_pct: 20,
                max_pct: 35,
                below_message: "Consider adding healthy fats (avocado, nuts, olive oil) \
                                to reach 20-35% of calories."
                    .to_string(),
                above_message: "This meal is high in fat. Consider choosing leaner proteins or \
                                reducing added fats."
                    .to_string(),
            },
        ])
    }

    /// Evaluate every rule in declared order; all triggering rules emit.
    pub fn evaluate_all(
        &self,
        total_nutrition: &NutrientProfile,
        macro_percentages: &MacroPercentages,
        food_categories: &[FoodCategory],
    ) -> Vec<Insight> {
        self.rules
            .iter()
            .filter_map(|rule| rule.evaluate(total_nutrition, macro_percentages, food_categories))
            .collect()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

/// Pick a contextual follow-up question from the insight list.
///
/// The first insight that is a warning or a recommendation decides the
/// question; purely positive insights get the benefits follow-up.
pub fn follow_up(insights: &[Insight]) -> String {
    if insights.is_empty() {
        return "Would you like nutritional suggestions for your next meal?".to_string();
    }

    for insight in insights {
        match insight.kind {
            InsightKind::Warning => {
                return "Would you like suggestions for lower-sodium alternatives?".to_string();
            }
            InsightKind::Recommendation => {
                return "Would you like ideas for adding more protein to your meals?".to_string();
            }
            _ => {}
        }
    }

    "Would you like to know more about the health benefits of your meal?".to_string()
}
