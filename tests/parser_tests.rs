#[cfg(test)]
mod tests {
    use virtual_dietitian::dataset::FoodDataset;
    use virtual_dietitian::parser::parse_meal_description;

    fn dataset() -> FoodDataset {
        FoodDataset::load().expect("dataset should load from data/nutrition_db.json")
    }

    fn names(description: &str) -> Vec<String> {
        parse_meal_description(description, &dataset())
            .into_iter()
            .map(|item| item.name)
            .collect()
    }

    // English descriptions

    #[test]
    fn test_single_food_english() {
        let result = names("I had oatmeal");
        assert_eq!(result, vec!["oatmeal"]);
    }

    #[test]
    fn test_multiple_foods_english() {
        let result = names("oatmeal with blueberries and banana");
        assert_eq!(result.len(), 3);
        assert!(result.contains(&"oatmeal".to_string()));
        assert!(result.contains(&"blueberries".to_string()));
        assert!(result.contains(&"banana".to_string()));
    }

    #[test]
    fn test_two_word_phrase_english() {
        let result = names("I had almond butter");
        assert_eq!(result, vec!["almond butter"]);
    }

    #[test]
    fn test_two_word_phrase_preferred_over_single() {
        // "almond" alone is a known alias, but the 2-word phrase must win
        let result = names("almond butter");
        assert_eq!(result, vec!["almond butter"]);
    }

    #[test]
    fn test_mixed_single_and_two_word() {
        let result = names("chicken breast with rice");
        assert!(result.contains(&"chicken breast".to_string()));
        assert!(result.contains(&"rice".to_string()));
    }

    // French descriptions

    #[test]
    fn test_single_food_french() {
        let result = names("avoine");
        assert_eq!(result, vec!["oatmeal"]);
    }

    #[test]
    fn test_multiple_foods_french() {
        let result = names("avoine et myrtilles");
        assert_eq!(result.len(), 2);
        assert!(result.contains(&"oatmeal".to_string()));
        assert!(result.contains(&"blueberries".to_string()));
    }

    #[test]
    fn test_french_with_contractions() {
        let result = names("J'ai mangé de l'avoine");
        assert_eq!(result, vec!["oatmeal"]);
    }

    #[test]
    fn test_french_full_sentence() {
        let result = names("J'ai mangé de l'avoine et des myrtilles");
        assert_eq!(result.len(), 2);
        assert!(result.contains(&"oatmeal".to_string()));
        assert!(result.contains(&"blueberries".to_string()));
    }

    #[test]
    fn test_french_poulet_et_riz() {
        let result = names("poulet et riz");
        assert_eq!(result.len(), 2);
        assert!(result.contains(&"chicken".to_string()));
        assert!(result.contains(&"rice".to_string()));
    }

    #[test]
    fn test_french_with_accents() {
        let result = names("œuf et pomme");
        assert_eq!(result.len(), 2);
        assert!(result.contains(&"egg".to_string()));
        assert!(result.contains(&"apple".to_string()));
    }

    #[test]
    fn test_french_accent_variations() {
        assert_eq!(names("œuf"), vec!["egg"]);
        assert_eq!(names("oeuf"), vec!["egg"]);
    }

    // Spanish descriptions

    #[test]
    fn test_single_food_spanish() {
        let result = names("avena");
        assert_eq!(result, vec!["oatmeal"]);
    }

    #[test]
    fn test_multiple_foods_spanish() {
        let result = names("avena y arándanos");
        assert_eq!(result.len(), 2);
        assert!(result.contains(&"oatmeal".to_string()));
        assert!(result.contains(&"blueberries".to_string()));
    }

    #[test]
    fn test_spanish_full_sentence() {
        let result = names("Comí avena y arándanos");
        assert_eq!(result.len(), 2);
        assert!(result.contains(&"oatmeal".to_string()));
        assert!(result.contains(&"blueberries".to_string()));
    }

    #[test]
    fn test_spanish_pollo_y_arroz() {
        let result = names("pollo y arroz");
        assert_eq!(result.len(), 2);
        assert!(result.contains(&"chicken".to_string()));
        assert!(result.contains(&"rice".to_string()));
    }

    #[test]
    fn test_spanish_accent_variations() {
        assert_eq!(names("arándanos"), vec!["blueberries"]);
        assert_eq!(names("arandanos"), vec!["blueberries"]);
    }

    #[test]
    fn test_spanish_with_accents() {
        let result = names("plátano y manzana");
        assert_eq!(result.len(), 2);
        assert!(result.contains(&"banana".to_string()));
        assert!(result.contains(&"apple".to_string()));
    }

    #[test]
    fn test_spanish_accent_variations_platano() {
        assert_eq!(names("plátano"), vec!["banana"]);
        assert_eq!(names("platano"), vec!["banana"]);
    }

    // Edge cases

    #[test]
    fn test_unknown_food_passes_through() {
        // Unknown tokens go to the resolver, which may hit external tiers
        let result = names("pizza");
        assert_eq!(result, vec!["pizza"]);
    }

    #[test]
    fn test_mixed_known_unknown() {
        let result = names("chicken and pizza");
        assert_eq!(result.len(), 2);
        assert!(result.contains(&"chicken".to_string()));
        assert!(result.contains(&"pizza".to_string()));
    }

    #[test]
    fn test_empty_string() {
        assert!(names("").is_empty());
    }

    #[test]
    fn test_punctuation_handling() {
        let result = names("chicken, rice, and broccoli.");
        assert_eq!(result.len(), 3);
        assert!(result.contains(&"chicken".to_string()));
        assert!(result.contains(&"rice".to_string()));
        assert!(result.contains(&"broccoli".to_string()));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(names("CHICKEN"), names("chicken"));
        assert_eq!(names("Chicken"), names("chicken"));
    }

    #[test]
    fn test_all_quantities_default_to_one() {
        let items = parse_meal_description("chicken rice broccoli", &dataset());
        assert_eq!(items.len(), 3);
        for item in items {
            assert_eq!(item.quantity, 1.0);
        }
    }

    #[test]
    fn test_external_tier_candidate_passes_through() {
        // "gouda" is not in the local dataset but should survive for the
        // CNF tier to resolve
        let result = names("I ate gouda");
        assert_eq!(result, vec!["gouda"]);
    }

    #[test]
    fn test_stopwords_filtered() {
        let result = names("I had some cheese");
        assert_eq!(result, vec!["cheese"]);
    }

    #[test]
    fn test_short_words_filtered() {
        // "I" and "an" are under 3 characters, "ate" is a stop-word
        let result = names("I ate an apple");
        assert_eq!(result, vec!["apple"]);
    }

    #[test]
    fn test_mixed_local_and_passthrough_foods() {
        let result = names("oatmeal with gouda and crackers");
        assert_eq!(result.len(), 3);
        assert!(result.contains(&"oatmeal".to_string()));
        assert!(result.contains(&"gouda".to_string()));
        assert!(result.contains(&"crackers".to_string()));
    }
}
