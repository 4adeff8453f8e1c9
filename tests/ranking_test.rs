use pantry::recommend::{
    self, rank_for_ingredient, rank_for_pantry, score_for_pantry, CorpusEntry,
};
use std::collections::HashSet;

fn entry<'a>(name: &'a str, ingredients: &'a str) -> CorpusEntry<'a> {
    CorpusEntry {
        name,
        ingredients: Some(ingredients),
        image_url: None,
    }
}

fn corpus() -> Vec<CorpusEntry<'static>> {
    vec![
        entry("Masoor Dal", "red lentils, onion, garlic, turmeric, cumin seeds"),
        entry("Jeera Rice", "basmati rice, cumin seeds, ghee, salt"),
        entry("Aloo Gobi", "potato, cauliflower, onion, turmeric, ginger"),
        entry("Palak Paneer", "spinach, paneer, onion, garlic, cream"),
        entry("Fruit Salad", "apple, banana, orange juice"),
    ]
}

#[test]
fn test_pantry_ranking_is_sorted_and_bounded() {
    let pantry = vec!["onion".to_string(), "garlic".to_string()];
    let ranked = score_for_pantry(&corpus(), &pantry);

    assert!(!ranked.is_empty());
    for pair in ranked.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    for m in &ranked {
        assert!(m.score > 0.0 && m.score <= 1.0);
    }
    assert!(ranked.iter().all(|m| m.name != "Fruit Salad"));
}

#[test]
fn test_ranking_is_deterministic() {
    let pantry = vec!["cumin seeds", "turmeric"];
    let first = score_for_pantry(&corpus(), &pantry);
    let second = score_for_pantry(&corpus(), &pantry);
    assert_eq!(first, second);
}

#[test]
fn test_empty_inputs_yield_empty_rankings() {
    let pantry: Vec<String> = Vec::new();
    let page = rank_for_pantry(&corpus(), &pantry, 1, 15);
    assert!(page.items.is_empty());
    assert_eq!(page.total_pages, 0);

    assert!(rank_for_ingredient(&[], "onion").is_empty());
    assert!(score_for_pantry(&[], &["onion"]).is_empty());
}

#[test]
fn test_stop_word_only_pantry_matches_nothing() {
    // "the" and "and" are both stop words
    let ranked = score_for_pantry(&corpus(), &["the", "and"]);
    assert!(ranked.is_empty());
}

#[test]
fn test_ingredient_ranking_dedupes_names() {
    let recipes = vec![
        entry("Dal Tadka", "toor dal, onion, tomato"),
        entry("Dal Tadka", "onion only"),
        entry("Onion Pakoda", "onion, gram flour"),
    ];
    let ranked = rank_for_ingredient(&recipes, "onion");

    let names: Vec<&str> = ranked.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Dal Tadka"));
    assert!(names.contains(&"Onion Pakoda"));
}

#[test]
fn test_scores_match_hand_computed_cosine() {
    let recipes = vec![
        entry("Banana Toast", "apple banana"),
        entry("Cherry Tart", "apple cherry"),
    ];

    // apple occurs in both documents, banana and cherry in one each
    let idf_apple = 1.0;
    let idf_single = (3.0f64 / 2.0).ln() + 1.0;
    let row_norm = (idf_apple * idf_apple + idf_single * idf_single).sqrt();

    let ranked = score_for_pantry(&recipes, &["banana"]);
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].name, "Banana Toast");
    assert!((ranked[0].score - idf_single / row_norm).abs() < 1e-9);
    assert!((ranked[0].score - 0.814_802).abs() < 1e-6);

    // Cherry Tart shares only apple with the query
    let ranked = score_for_pantry(&recipes, &["apple", "banana"]);
    assert_eq!(ranked.len(), 2);
    assert!((ranked[0].score - 1.0).abs() < 1e-9);
    let expected = idf_apple * idf_apple / (row_norm * row_norm);
    assert_eq!(ranked[1].name, "Cherry Tart");
    assert!((ranked[1].score - expected).abs() < 1e-9);
}

#[test]
fn test_missing_ingredients() {
    let pantry: HashSet<String> = ["egg", "sugar"].iter().map(|s| s.to_string()).collect();

    assert_eq!(
        recommend::missing_ingredient_count("egg, Flour , sugar", &pantry),
        1
    );
    assert_eq!(
        recommend::missing_ingredients("egg, Flour , sugar, , milk", &pantry),
        vec!["Flour", "milk"]
    );
    assert_eq!(recommend::missing_ingredient_count("", &pantry), 0);
}
