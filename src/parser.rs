//! # Meal Description Parser
//!
//! Turns a free-text meal description ("J'ai mangé de l'avoine et des
//! myrtilles") into candidate food items for the resolver. The approach is
//! deliberately literal — no NLU beyond token and phrase matching:
//!
//! 1. lowercase the description
//! 2. strip leading possessive/article contractions (l', d', j', ...) at
//!    word starts, for both ASCII and typographic apostrophes
//! 3. replace commas and periods with spaces, split on whitespace
//! 4. strip residual apostrophe-like characters from each token
//! 5. translate tokens through a closed multilingual term table
//!    (French/Spanish → English, accented and accent-stripped spellings)
//! 6. scan the translated tokens preferring 2-token phrases found in the
//!    known-name index, then 1-token known names, then pass unrecognized
//!    tokens of length ≥ 3 that are not stop-words through unchanged so a
//!    later tier can still resolve them
//!
//! Every emitted item has quantity 1.0; portion estimation is out of scope
//! for the text path.

use crate::dataset::FoodDataset;
use crate::nutrition::MealItem;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use tracing::debug;

lazy_static! {
    /// Leading contractions stripped at word starts: l'avoine → avoine
    static ref CONTRACTION_RE: Regex =
        Regex::new(r"\b(?:qu|l|d|j|m|n|s|t|c)['\u{2019}\u{02BC}]").expect("contraction pattern should be valid");

    /// Commas and periods normalized to spaces before tokenizing
    static ref PUNCT_RE: Regex = Regex::new(r"[,.]").expect("punctuation pattern should be valid");

    /// Closed multilingual food-term table. Both accented and
    /// accent-stripped spellings are listed so either input form works.
    static ref TRANSLATIONS: HashMap<&'static str, &'static str> = {
        let mut table = HashMap::new();
        // French
        table.insert("avoine", "oatmeal");
        table.insert("myrtille", "blueberry");
        table.insert("myrtilles", "blueberries");
        table.insert("poulet", "chicken");
        table.insert("riz", "rice");
        table.insert("œuf", "egg");
        table.insert("oeuf", "egg");
        table.insert("œufs", "eggs");
        table.insert("oeufs", "eggs");
        table.insert("pomme", "apple");
        table.insert("pommes", "apples");
        table.insert("fromage", "cheese");
        table.insert("lait", "milk");
        table.insert("pain", "bread");
        table.insert("banane", "banana");
        table.insert("bananes", "bananas");
        table.insert("fraise", "strawberry");
        table.insert("fraises", "strawberries");
        table.insert("saumon", "salmon");
        table.insert("brocoli", "broccoli");
        table.insert("épinards", "spinach");
        table.insert("epinards", "spinach");
        table.insert("tomate", "tomato");
        table.insert("tomates", "tomatoes");
        table.insert("carotte", "carrot");
        table.insert("carottes", "carrots");
        table.insert("beurre", "butter");
        table.insert("yaourt", "yogurt");
        table.insert("raisin", "grape");
        table.insert("raisins", "grapes");
        table.insert("pâtes", "pasta");
        table.insert("pates", "pasta");
        table.insert("avocat", "avocado");
        table.insert("thon", "tuna");
        table.insert("dinde", "turkey");
        table.insert("crevettes", "shrimp");
        table.insert("bœuf", "beef");
        table.insert("boeuf", "beef");
        table.insert("porc", "pork");
        table.insert("haricots", "beans");
        table.insert("lentilles", "lentils");
        // Spanish
        table.insert("avena", "oatmeal");
        table.insert("arándanos", "blueberries");
        table.insert("arandanos", "blueberries");
        table.insert("pollo", "chicken");
        table.insert("arroz", "rice");
        table.insert("huevo", "egg");
        table.insert("huevos", "eggs");
        table.insert("manzana", "apple");
        table.insert("manzanas", "apples");
        table.insert("plátano", "banana");
        table.insert("platano", "banana");
        table.insert("plátanos", "bananas");
        table.insert("platanos", "bananas");
        table.insert("queso", "cheese");
        table.insert("leche", "milk");
        table.insert("pan", "bread");
        table.insert("fresa", "strawberry");
        table.insert("fresas", "strawberries");
        table.insert("salmón", "salmon");
        table.insert("brócoli", "broccoli");
        table.insert("espinacas", "spinach");
        table.insert("zanahoria", "carrot");
        table.insert("zanahorias", "carrots");
        table.insert("mantequilla", "butter");
        table.insert("yogur", "yogurt");
        table.insert("naranja", "orange");
        table.insert("uvas", "grapes");
        table.insert("aguacate", "avocado");
        table.insert("atún", "tuna");
        table.insert("atun", "tuna");
        table.insert("pavo", "turkey");
        table.insert("camarones", "shrimp");
        table.insert("cerdo", "pork");
        table.insert("frijoles", "beans");
        table.insert("lentejas", "lentils");
        table
    };

    /// Filler words never treated as candidate foods. Tokens shorter than
    /// 3 characters are dropped regardless, so two-letter articles (de, la,
    /// un, et, y, ...) need no entry here.
    static ref STOP_WORDS: HashSet<&'static str> = [
        // English
        "the", "and", "with", "had", "have", "has", "ate", "eat", "was", "some", "for",
        "this", "that", "then", "also", "today", "morning", "evening", "breakfast",
        "lunch", "dinner", "meal", "snack", "bowl", "cup", "cups", "plate", "glass",
        "slice", "piece",
        // French
        "des", "les", "une", "avec", "mange", "mangé", "manger", "pour", "mon", "mes",
        "puis", "repas", "petit", "déjeuner", "dejeuner", "dîner", "diner", "souper",
        "est", "dans", "sur",
        // Spanish
        "con", "una", "uno", "comí", "comi", "como", "comer", "para", "mis", "luego",
        "desayuno", "almuerzo", "cena", "comida", "los", "las",
    ]
    .into_iter()
    .collect();
}

/// Parse a natural-language meal description into food items.
///
/// `known` supplies the known-name index used for phrase and token
/// matching. Unrecognized tokens of length ≥ 3 that are not stop-words are
/// passed through so the resolver's external tiers get a chance at them.
pub fn parse_meal_description(description: &str, known: &FoodDataset) -> Vec<MealItem> {
    let text = description.to_lowercase();
    let text = CONTRACTION_RE.replace_all(&text, "");
    let text = PUNCT_RE.replace_all(&text, " ");

    let tokens: Vec<String> = text
        .split_whitespace()
        .map(|token| {
            let cleaned = token.trim_matches(|c| matches!(c, '\'' | '\u{2019}' | '\u{02BC}' | '`'));
            match TRANSLATIONS.get(cleaned) {
                Some(translated) => (*translated).to_string(),
                None => cleaned.to_string(),
            }
        })
        .filter(|token| !token.is_empty())
        .collect();

    let mut found_foods = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        // Prefer 2-token phrases (e.g. "almond butter", "chicken breast")
        if i + 1 < tokens.len() {
            let phrase = format!("{} {}", tokens[i], tokens[i + 1]);
            if known.contains_name(&phrase) {
                found_foods.push(MealItem::one(phrase));
                i += 2;
                continue;
            }
        }

        let token = &tokens[i];
        if known.contains_name(token) {
            found_foods.push(MealItem::one(token.clone()));
        } else if token.chars().count() >= 3 && !STOP_WORDS.contains(token.as_str()) {
            // Unknown but plausible food word: pass through for the
            // external tiers
            debug!(token = %token, "Passing unrecognized token through to resolver");
            found_foods.push(MealItem::one(token.clone()));
        }
        i += 1;
    }

    found_foods
}
