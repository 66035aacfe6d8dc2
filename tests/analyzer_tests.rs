#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use virtual_dietitian::analyzer::MealAnalyzer;
    use virtual_dietitian::dataset::FoodDataset;
    use virtual_dietitian::nutrition::{
        DetectedFood, DetectedLabel, FoodCategory, MealItem, NutrientSource,
    };
    use virtual_dietitian::resolver::FoodResolver;
    use virtual_dietitian::rules::{InsightKind, RuleEngine};

    fn analyzer() -> MealAnalyzer {
        let dataset =
            Arc::new(FoodDataset::load().expect("dataset should load from data/nutrition_db.json"));
        MealAnalyzer::new(
            FoodResolver::new(dataset),
            RuleEngine::with_default_rules(),
        )
    }

    fn label(text: &str, confidence: f64, category: Option<FoodCategory>) -> DetectedLabel {
        DetectedLabel {
            label: text.to_string(),
            confidence,
            category,
        }
    }

    #[tokio::test]
    async fn test_analyze_items_oatmeal_scenario() {
        let analyzer = analyzer();
        let analysis = analyzer.analyze_items(&[MealItem::one("oatmeal")]).await;

        assert_eq!(analysis.aggregation.total_nutrition.calories, 150.0);
        assert!(analysis
            .aggregation
            .food_categories
            .contains(&FoodCategory::Grain));
        // The grain benefit rule fires for this meal
        assert!(analysis
            .insights
            .iter()
            .any(|i| i.kind == InsightKind::Benefit && i.message.contains("fiber")));
        assert!(!analysis.follow_up.is_empty());
    }

    #[tokio::test]
    async fn test_unresolved_item_is_non_fatal() {
        let analyzer = analyzer();
        let items = [MealItem::one("chicken"), MealItem::one("pizza")];
        let analysis = analyzer.analyze_items(&items).await;

        // The resolved item still sums correctly
        assert_eq!(analysis.aggregation.total_nutrition.calories, 165.0);
        assert_eq!(analysis.aggregation.unknown_items, vec!["pizza"]);
        assert!(analysis
            .aggregation
            .warning()
            .expect("warning for unresolved item")
            .contains("pizza"));
    }

    #[tokio::test]
    async fn test_analyze_description_text_path() {
        let analyzer = analyzer();
        let analysis = analyzer
            .analyze_description("oatmeal with blueberries and almond butter")
            .await;

        assert_eq!(analysis.aggregation.total_nutrition.calories, 332.0);
        assert_eq!(
            analysis.aggregation.food_categories,
            vec![FoodCategory::Grain, FoodCategory::Fruit, FoodCategory::Fat]
        );
    }

    #[tokio::test]
    async fn test_map_labels_found_with_serving_size() {
        let analyzer = analyzer();
        let detected = analyzer
            .map_labels(&[label("Chicken", 0.94, Some(FoodCategory::Protein))])
            .await;

        assert_eq!(detected.len(), 1);
        match &detected[0] {
            DetectedFood::Found {
                food_name,
                serving_size_grams,
                category,
                source,
                confidence,
                ..
            } => {
                assert_eq!(food_name, "grilled chicken breast");
                assert_eq!(*serving_size_grams, 85);
                assert_eq!(*category, FoodCategory::Protein);
                assert_eq!(*source, NutrientSource::Local);
                assert_eq!(*confidence, 0.94);
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_map_labels_infers_missing_category_hint() {
        let analyzer = analyzer();
        let detected = analyzer.map_labels(&[label("Salad", 0.88, None)]).await;

        match &detected[0] {
            DetectedFood::Found {
                food_name,
                serving_size_grams,
                category,
                ..
            } => {
                assert_eq!(food_name, "mixed green salad");
                assert_eq!(*category, FoodCategory::Vegetable);
                assert_eq!(*serving_size_grams, 85);
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_map_labels_not_found_keeps_position() {
        let analyzer = analyzer();
        let labels = [
            label("Chicken", 0.94, Some(FoodCategory::Protein)),
            label("Unidentifiable object", 0.81, None),
        ];
        let detected = analyzer.map_labels(&labels).await;

        assert_eq!(detected.len(), 2);
        assert!(matches!(detected[0], DetectedFood::Found { .. }));
        match &detected[1] {
            DetectedFood::NotFound { message, .. } => {
                assert!(message.contains("Unidentifiable object"));
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_analyze_labels_aggregates_found_foods() {
        let analyzer = analyzer();
        let labels = [
            label("Chicken", 0.94, Some(FoodCategory::Protein)),
            label("Rice", 0.87, Some(FoodCategory::Grain)),
        ];
        let (detected, analysis) = analyzer.analyze_labels(&labels).await;

        assert_eq!(detected.len(), 2);
        // Grilled chicken breast 165 + white rice 205, one serving each
        assert_eq!(analysis.aggregation.total_nutrition.calories, 370.0);
        assert_eq!(
            analysis.aggregation.food_categories,
            vec![FoodCategory::Protein, FoodCategory::Grain]
        );
    }

    #[tokio::test]
    async fn test_parse_description_rejects_nothing_useful() {
        let analyzer = analyzer();
        // Boundary layer uses an empty parse to return a 400
        assert!(analyzer.parse_description("and the of").is_empty());
    }
}
