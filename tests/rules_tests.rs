#[cfg(test)]
mod tests {
    use virtual_dietitian::nutrition::{FoodCategory, MacroPercentages, NutrientProfile};
    use virtual_dietitian::rules::{
        follow_up, Comparator, Insight, InsightKind, MacroName, Rule, RuleEngine,
    };

    fn balanced_macros() -> MacroPercentages {
        MacroPercentages {
            protein_pct: 25,
            carbs_pct: 50,
            fat_pct: 25,
        }
    }

    fn totals(sodium_mg: f64, fiber_g: f64) -> NutrientProfile {
        NutrientProfile {
            sodium_mg,
            fiber_g,
            ..NutrientProfile::default()
        }
    }

    #[test]
    fn test_category_rule_triggers_on_presence() {
        let engine = RuleEngine::with_default_rules();
        let insights = engine.evaluate_all(
            &totals(0.0, 6.0),
            &balanced_macros(),
            &[FoodCategory::Fruit],
        );

        assert!(insights
            .iter()
            .any(|i| i.kind == InsightKind::Benefit && i.message.contains("Vitamin C")));
    }

    #[test]
    fn test_category_rule_silent_when_absent() {
        let engine = RuleEngine::with_default_rules();
        let insights = engine.evaluate_all(
            &totals(0.0, 6.0),
            &balanced_macros(),
            &[FoodCategory::Protein],
        );

        assert!(!insights.iter().any(|i| i.kind == InsightKind::Benefit));
    }

    #[test]
    fn test_high_sodium_warning() {
        let engine = RuleEngine::with_default_rules();
        let insights = engine.evaluate_all(&totals(900.0, 6.0), &balanced_macros(), &[]);

        let warning = insights
            .iter()
            .find(|i| i.kind == InsightKind::Warning)
            .expect("sodium warning should trigger");
        assert!(warning.message.contains("sodium"));
    }

    #[test]
    fn test_sodium_at_threshold_does_not_trigger() {
        let engine = RuleEngine::with_default_rules();
        let insights = engine.evaluate_all(&totals(800.0, 6.0), &balanced_macros(), &[]);

        assert!(!insights.iter().any(|i| i.kind == InsightKind::Warning));
    }

    #[test]
    fn test_low_fiber_recommendation() {
        let engine = RuleEngine::with_default_rules();
        let insights = engine.evaluate_all(&totals(0.0, 3.0), &balanced_macros(), &[]);

        assert!(insights
            .iter()
            .any(|i| i.kind == InsightKind::Recommendation && i.message.contains("fiber")));
    }

    #[test]
    fn test_fiber_at_threshold_does_not_trigger() {
        let engine = RuleEngine::with_default_rules();
        let insights = engine.evaluate_all(&totals(0.0, 5.0), &balanced_macros(), &[]);

        assert!(!insights.iter().any(|i| i.message.contains("fiber")));
    }

    fn protein_ratio_engine() -> RuleEngine {
        RuleEngine::new(vec![Rule::MacroRatio {
            macro_name: MacroName::Protein,
            min_pct: 15,
            max_pct: 35,
            below_message: "add protein".to_string(),
            above_message: "too much protein".to_string(),
        }])
    }

    fn macros_with_protein(protein_pct: u32) -> MacroPercentages {
        MacroPercentages {
            protein_pct,
            carbs_pct: 50,
            fat_pct: 25,
        }
    }

    #[test]
    fn test_macro_ratio_below_range() {
        let insights = protein_ratio_engine().evaluate_all(
            &NutrientProfile::default(),
            &macros_with_protein(12),
            &[],
        );

        assert_eq!(
            insights,
            vec![Insight {
                kind: InsightKind::Recommendation,
                message: "add protein".to_string(),
            }]
        );
    }

    #[test]
    fn test_macro_ratio_within_range() {
        let insights = protein_ratio_engine().evaluate_all(
            &NutrientProfile::default(),
            &macros_with_protein(25),
            &[],
        );
        assert!(insights.is_empty());
    }

    #[test]
    fn test_macro_ratio_above_range() {
        let insights = protein_ratio_engine().evaluate_all(
            &NutrientProfile::default(),
            &macros_with_protein(40),
            &[],
        );

        assert_eq!(insights[0].message, "too much protein");
        assert_eq!(insights[0].kind, InsightKind::Recommendation);
    }

    #[test]
    fn test_macro_ratio_boundaries_inclusive() {
        let engine = protein_ratio_engine();
        let at_min =
            engine.evaluate_all(&NutrientProfile::default(), &macros_with_protein(15), &[]);
        let at_max =
            engine.evaluate_all(&NutrientProfile::default(), &macros_with_protein(35), &[]);

        assert!(at_min.is_empty());
        assert!(at_max.is_empty());
    }

    #[test]
    fn test_missing_nutrient_key_reads_as_zero() {
        let engine = RuleEngine::new(vec![Rule::Threshold {
            nutrient: "sugar_g".to_string(),
            threshold: 5.0,
            comparator: Comparator::Lt,
            kind: InsightKind::Info,
            message: "low sugar".to_string(),
        }]);

        // Unknown key behaves as 0, and 0 < 5 triggers
        let insights =
            engine.evaluate_all(&NutrientProfile::default(), &balanced_macros(), &[]);
        assert_eq!(insights.len(), 1);
    }

    #[test]
    fn test_all_triggering_rules_emit_in_declared_order() {
        let engine = RuleEngine::with_default_rules();
        let macros = MacroPercentages {
            protein_pct: 50,
            carbs_pct: 40,
            fat_pct: 10,
        };
        let insights = engine.evaluate_all(
            &totals(900.0, 1.0),
            &macros,
            &[FoodCategory::Fruit, FoodCategory::Grain, FoodCategory::Vegetable],
        );

        // fruit, grain, vegetable benefits; sodium warning; fiber
        // recommendation; protein above; fat below — all, in rule order
        assert_eq!(insights.len(), 7);
        assert_eq!(insights[0].kind, InsightKind::Benefit);
        assert!(insights[0].message.contains("Vitamin C"));
        assert_eq!(insights[3].kind, InsightKind::Warning);
        assert!(insights[3].message.contains("sodium"));
        assert!(insights[4].message.contains("fiber"));
        assert!(insights[5].message.contains("high in protein"));
        assert!(insights[6].message.contains("healthy fats"));
    }

    #[test]
    fn test_comparator_parsing() {
        assert_eq!(">".parse::<Comparator>().unwrap(), Comparator::Gt);
        assert_eq!("<".parse::<Comparator>().unwrap(), Comparator::Lt);
        assert_eq!(">=".parse::<Comparator>().unwrap(), Comparator::Ge);
        assert_eq!("<=".parse::<Comparator>().unwrap(), Comparator::Le);
        assert!("=>".parse::<Comparator>().is_err());
        assert!("".parse::<Comparator>().is_err());
    }

    #[test]
    fn test_insight_wire_shape() {
        let insight = Insight {
            kind: InsightKind::Warning,
            message: "too salty".to_string(),
        };
        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["type"], "warning");
        assert_eq!(json["message"], "too salty");
    }

    #[test]
    fn test_follow_up_defaults_without_insights() {
        assert!(follow_up(&[]).contains("next meal"));
    }

    #[test]
    fn test_follow_up_prioritizes_first_warning_or_recommendation() {
        let warning = Insight {
            kind: InsightKind::Warning,
            message: "salty".to_string(),
        };
        let recommendation = Insight {
            kind: InsightKind::Recommendation,
            message: "more protein".to_string(),
        };
        let benefit = Insight {
            kind: InsightKind::Benefit,
            message: "nice fruit".to_string(),
        };

        assert!(follow_up(&[benefit.clone(), warning.clone()]).contains("lower-sodium"));
        assert!(follow_up(&[recommendation, warning]).contains("protein"));
        assert!(follow_up(&[benefit]).contains("health benefits"));
    }
}
