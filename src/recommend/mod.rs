//! Recipe ranking by ingredient-text similarity.
//!
//! Every call fits a fresh [`TfidfModel`] over the corpus it is given, so
//! concurrent requests never share model state.

pub mod stopwords;
pub mod tfidf;

use crate::db::models::Recipe;
use serde::Serialize;
use std::collections::HashSet;
use tfidf::TfidfModel;
use tracing::debug;

/// One recipe as seen by the ranker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorpusEntry<'a> {
    pub name: &'a str,
    pub ingredients: Option<&'a str>,
    pub image_url: Option<&'a str>,
}

impl<'a> From<&'a Recipe> for CorpusEntry<'a> {
    fn from(recipe: &'a Recipe) -> Self {
        Self {
            name: &recipe.name,
            ingredients: recipe.ingredients.as_deref(),
            image_url: recipe.image_url.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PantryMatch {
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientMatch {
    pub name: String,
    pub score: f64,
    pub image_url: Option<String>,
}

/// A slice of a ranked list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn prev_page(&self) -> usize {
        self.page.saturating_sub(1).max(1)
    }

    pub fn next_page(&self) -> usize {
        self.page + 1
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

/// Slice `items` to the requested 1-based page. A page past the end is empty.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let page = page.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(page_size);
    let start = (page - 1).saturating_mul(page_size);

    Page {
        items: items.into_iter().skip(start).take(page_size).collect(),
        page,
        page_size,
        total,
        total_pages,
    }
}

/// Like [`paginate`], but clamps the page into `[1, total_pages]` first
pub fn paginate_clamped<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let total_pages = items.len().div_ceil(page_size.max(1));
    paginate(items, page.clamp(1, total_pages.max(1)), page_size)
}

/// Fit a model over the corpus and return `(corpus index, score)` for every
/// positive score, best first. Ties keep corpus order.
fn rank_indices(documents: &[&str], query: &str) -> Vec<(usize, f64)> {
    let model = match TfidfModel::fit(documents) {
        Ok(model) => model,
        Err(e) => {
            debug!("Skipping ranking: {}", e);
            return Vec::new();
        }
    };

    let query = model.transform(query);
    let mut scored: Vec<(usize, f64)> = model
        .similarities(&query)
        .into_iter()
        .enumerate()
        .filter(|(_, score)| *score > 0.0)
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored
}

/// Rank the whole corpus against the pantry, without pagination
pub fn score_for_pantry<S: AsRef<str>>(recipes: &[CorpusEntry<'_>], pantry: &[S]) -> Vec<PantryMatch> {
    if recipes.is_empty() || pantry.is_empty() {
        return Vec::new();
    }

    let documents: Vec<&str> = recipes.iter().map(|r| r.ingredients.unwrap_or("")).collect();
    let query = pantry
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",");

    rank_indices(&documents, &query)
        .into_iter()
        .map(|(i, score)| PantryMatch {
            name: recipes[i].name.to_string(),
            score,
        })
        .collect()
}

/// Rank recipes against every owned ingredient and return one page
pub fn rank_for_pantry<S: AsRef<str>>(
    recipes: &[CorpusEntry<'_>],
    pantry: &[S],
    page: usize,
    page_size: usize,
) -> Page<PantryMatch> {
    paginate(score_for_pantry(recipes, pantry), page, page_size)
}

/// Rank recipes that mention `ingredient` against that ingredient alone.
///
/// `recipes` must already be filtered to those whose ingredient text contains
/// the ingredient. Duplicate names are scored once, first occurrence wins.
pub fn rank_for_ingredient(recipes: &[CorpusEntry<'_>], ingredient: &str) -> Vec<IngredientMatch> {
    if recipes.is_empty() {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let unique: Vec<&CorpusEntry<'_>> = recipes.iter().filter(|r| seen.insert(r.name)).collect();

    let documents: Vec<&str> = unique.iter().map(|r| r.ingredients.unwrap_or("")).collect();

    rank_indices(&documents, ingredient)
        .into_iter()
        .map(|(i, score)| IngredientMatch {
            name: unique[i].name.to_string(),
            score,
            image_url: unique[i].image_url.map(str::to_string),
        })
        .collect()
}

fn normalized_tokens(cleaned: &str) -> impl Iterator<Item = String> + '_ {
    cleaned
        .split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
}

/// Count recipe ingredients the pantry does not hold.
///
/// `pantry` must contain lowercase names.
pub fn missing_ingredient_count(cleaned: &str, pantry: &HashSet<String>) -> usize {
    normalized_tokens(cleaned)
        .filter(|t| !pantry.contains(t))
        .count()
}

/// The missing ingredients themselves, trimmed, in recipe order
pub fn missing_ingredients(cleaned: &str, pantry: &HashSet<String>) -> Vec<String> {
    cleaned
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty() && !pantry.contains(&t.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Missing count for a looked-up recipe; `None` when the recipe was not found
pub fn missing_for_recipe(recipe: Option<&Recipe>, pantry: &HashSet<String>) -> Option<usize> {
    recipe.map(|r| missing_ingredient_count(r.cleaned_ingredients.as_deref().unwrap_or(""), pantry))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry<'a>(name: &'a str, ingredients: &'a str) -> CorpusEntry<'a> {
        CorpusEntry {
            name,
            ingredients: Some(ingredients),
            image_url: None,
        }
    }

    fn corpus() -> Vec<CorpusEntry<'static>> {
        vec![
            entry("Tomato Rice", "rice, tomato, onion, mustard seeds"),
            entry("Jeera Aloo", "potato, cumin, turmeric"),
            entry("Onion Pakora", "onion, gram flour, chilli"),
            entry("Kheer", "milk, rice, sugar, cardamom"),
            CorpusEntry {
                name: "Mystery",
                ingredients: None,
                image_url: None,
            },
        ]
    }

    fn pantry(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pantry_results_sorted_and_positive() {
        let ranked = score_for_pantry(&corpus(), &["onion", "rice", "tomato"]);
        assert!(!ranked.is_empty());
        assert_eq!(ranked[0].name, "Tomato Rice");
        assert!(ranked.iter().all(|m| m.score > 0.0 && m.score <= 1.0));
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(!ranked.iter().any(|m| m.name == "Jeera Aloo" || m.name == "Mystery"));
    }

    #[test]
    fn test_empty_pantry_and_corpus() {
        let empty: [&str; 0] = [];
        let page = rank_for_pantry(&corpus(), &empty, 1, 15);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);

        let page = rank_for_pantry(&[], &["onion"], 1, 15);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_pantry_without_known_terms() {
        let page = rank_for_pantry(&corpus(), &["saffron"], 1, 15);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let pantry = ["onion", "milk", "rice", "potato"];
        let first = rank_for_pantry(&corpus(), &pantry, 1, 2);
        let second = rank_for_pantry(&corpus(), &pantry, 1, 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let corpus = vec![
            entry("B", "garlic"),
            entry("A", "garlic"),
            entry("C", "ginger"),
        ];
        let ranked = score_for_pantry(&corpus, &["garlic"]);
        let names: Vec<_> = ranked.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_ingredient_ranking_dedupes_names() {
        let corpus = vec![
            CorpusEntry {
                name: "Dal Tadka",
                ingredients: Some("toor dal, ghee, cumin"),
                image_url: Some("https://example.com/dal.jpg"),
            },
            entry("Dal Tadka", "toor dal, ghee"),
            entry("Moong Dal", "moong dal, turmeric"),
        ];

        let ranked = rank_for_ingredient(&corpus, "dal");
        assert_eq!(ranked.len(), 2);
        let dal = ranked.iter().find(|m| m.name == "Dal Tadka").unwrap();
        assert_eq!(dal.image_url.as_deref(), Some("https://example.com/dal.jpg"));
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_ingredient_ranking_empty_input() {
        assert!(rank_for_ingredient(&[], "paneer").is_empty());
    }

    #[test]
    fn test_missing_ingredient_count() {
        let pantry = pantry(&["egg", "sugar"]);
        assert_eq!(missing_ingredient_count("egg, Flour , sugar", &pantry), 1);
        assert_eq!(missing_ingredient_count(" , egg,,", &pantry), 0);
        assert_eq!(missing_ingredient_count("", &pantry), 0);
    }

    #[test]
    fn test_missing_ingredients_list() {
        let pantry = pantry(&["egg", "sugar"]);
        assert_eq!(
            missing_ingredients("egg, Flour , sugar, Milk", &pantry),
            vec!["Flour", "Milk"]
        );
    }

    #[test]
    fn test_missing_for_unknown_recipe() {
        assert_eq!(missing_for_recipe(None, &pantry(&["egg"])), None);
    }

    #[test]
    fn test_pagination() {
        let items: Vec<usize> = (0..37).collect();

        let page = paginate(items.clone(), 3, 15);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 7);

        let past_end = paginate(items.clone(), 4, 15);
        assert!(past_end.items.is_empty());

        let clamped = paginate_clamped(items.clone(), 4, 15);
        assert_eq!(clamped.page, 3);
        assert_eq!(clamped.items, page.items);

        let clamped = paginate_clamped(items, 0, 15);
        assert_eq!(clamped.page, 1);
        assert!(!clamped.has_prev());
        assert!(clamped.has_next());
    }

    #[test]
    fn test_pagination_of_nothing() {
        let page = paginate_clamped(Vec::<u8>::new(), 5, 10);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next());
    }
}
