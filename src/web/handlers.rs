use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{
    api::{
        handlers::{ingredient_recommendations, AppState},
        models::{PageParams, RecommendationRow},
    },
    db,
    recommend::{self, Page},
    utils::{path_segment, validation},
    web::session::SessionId,
    Result,
};

fn render<T: Template>(template: &T) -> Result<Html<String>> {
    Ok(Html(template.render()?))
}

/// Previous/next links for paginated pages
#[derive(Clone)]
struct PagerData {
    page: usize,
    total_pages: usize,
    has_prev: bool,
    has_next: bool,
    prev_page: usize,
    next_page: usize,
}

impl<T> From<&Page<T>> for PagerData {
    fn from(page: &Page<T>) -> Self {
        Self {
            page: page.page,
            total_pages: page.total_pages,
            has_prev: page.has_prev(),
            has_next: page.has_next(),
            prev_page: page.prev_page(),
            next_page: page.next_page(),
        }
    }
}

#[derive(Clone)]
#[allow(dead_code)] // Fields are used by Askama templates
struct RecipeCardData {
    name: String,
    name_path: String,
    score: String,
    missing: String,
    image_url: String,
    url: String,
}

impl From<RecommendationRow> for RecipeCardData {
    fn from(row: RecommendationRow) -> Self {
        Self {
            name_path: path_segment(&row.name),
            score: format!("{:.3}", row.score),
            missing: row
                .missing_ingredients
                .map(|n| n.to_string())
                .unwrap_or_else(|| "?".to_string()),
            image_url: row.image_url.unwrap_or_default(),
            url: row.url.unwrap_or_default(),
            name: row.name,
        }
    }
}

/// Home page template
#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    ingredients: Vec<String>,
}

/// GET / - Pantry overview with the recommend button
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let ingredients = db::pantry::pantry_names(&state.pool).await?;
    render(&IndexTemplate { ingredients })
}

/// Recipes for one ingredient template
#[derive(Template)]
#[template(path = "recipes_for_ingredient.html")]
struct IngredientRecipesTemplate {
    ingredient: String,
    ingredient_path: String,
    recipes: Vec<RecipeCardData>,
    total: usize,
    pager: PagerData,
}

/// GET /recipes/:ingredient - Recipes ranked against one ingredient
pub async fn ingredient_recipes_page(
    State(state): State<AppState>,
    Path(ingredient): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse> {
    let ingredient = validation::validate_ingredient_name(&ingredient)?;
    let page = ingredient_recommendations(&state, &ingredient, params.page).await?;

    let template = IngredientRecipesTemplate {
        ingredient_path: path_segment(&ingredient),
        ingredient,
        total: page.total,
        pager: PagerData::from(&page),
        recipes: page.items.into_iter().map(RecipeCardData::from).collect(),
    };
    render(&template)
}

/// Missing ingredients template
#[derive(Template)]
#[template(path = "missing_ingredients.html")]
struct MissingTemplate {
    recipe_name: String,
    recipe_path: String,
    url: String,
    missing: Vec<String>,
}

/// Unknown recipe template
#[derive(Template)]
#[template(path = "recipe_not_found.html")]
struct RecipeNotFoundTemplate {
    recipe_name: String,
}

/// GET /missing-ingredients/:recipe - Ingredients of a recipe the pantry lacks
pub async fn missing_ingredients_page(
    State(state): State<AppState>,
    Path(recipe_name): Path<String>,
) -> Result<Response> {
    let Some(recipe) = db::recipes::find_recipe_by_name(&state.pool, &recipe_name).await? else {
        let page = render(&RecipeNotFoundTemplate { recipe_name })?;
        return Ok((StatusCode::NOT_FOUND, page).into_response());
    };

    let pantry = db::pantry::pantry_set(&state.pool).await?;
    let missing = recommend::missing_ingredients(
        recipe.cleaned_ingredients.as_deref().unwrap_or(""),
        &pantry,
    );

    let template = MissingTemplate {
        recipe_path: path_segment(&recipe.name),
        recipe_name: recipe.name,
        url: recipe.url.unwrap_or_default(),
        missing,
    };
    Ok(render(&template)?.into_response())
}

/// Shopping list template
#[derive(Template)]
#[template(path = "shopping_list.html")]
struct ShoppingListTemplate {
    items: Vec<String>,
}

/// GET /shopping-list - The caller's shopping list
pub async fn shopping_list_page(
    State(state): State<AppState>,
    session: SessionId,
) -> Result<impl IntoResponse> {
    let items = db::shopping_list::list_items(&state.pool, session.as_str()).await?;
    render(&ShoppingListTemplate { items })
}

#[derive(Clone)]
#[allow(dead_code)] // Fields are used by Askama templates
struct IngredientLink {
    name: String,
    path: String,
}

/// Pantry management template
#[derive(Template)]
#[template(path = "ingredients.html")]
struct IngredientsTemplate {
    ingredients: Vec<IngredientLink>,
}

/// GET /ingredients - Manage owned ingredients
pub async fn ingredients_page(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let ingredients = db::pantry::pantry_names(&state.pool)
        .await?
        .into_iter()
        .map(|name| IngredientLink {
            path: path_segment(&name),
            name,
        })
        .collect();
    render(&IngredientsTemplate { ingredients })
}

#[derive(Clone)]
#[allow(dead_code)] // Fields are used by Askama templates
struct FavoriteCardData {
    name: String,
    name_path: String,
    missing: usize,
    image_url: String,
    url: String,
}

/// Favorites template
#[derive(Template)]
#[template(path = "favorite_recipes.html")]
struct FavoritesTemplate {
    recipes: Vec<FavoriteCardData>,
    total: usize,
    pager: PagerData,
}

/// GET /favorite-recipes - Bookmarked recipes
pub async fn favorites_page(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse> {
    let limit = state.settings.pagination.favorites_page_size;
    let total = db::favorites::count_favorites(&state.pool).await?;
    let total_pages = (total as usize)
        .div_ceil(limit)
        .min(state.settings.pagination.max_pages);
    let page = params.page.clamp(1, total_pages.max(1));
    let offset = (page - 1) * limit;

    let favorites = db::favorites::list_favorites(&state.pool, limit as i64, offset as i64).await?;
    let pantry = db::pantry::pantry_set(&state.pool).await?;

    let items: Vec<FavoriteCardData> = favorites
        .into_iter()
        .map(|f| FavoriteCardData {
            name_path: path_segment(&f.name),
            missing: recommend::missing_ingredient_count(
                f.cleaned_ingredients.as_deref().unwrap_or(""),
                &pantry,
            ),
            image_url: f.image_url.unwrap_or_default(),
            url: f.url.unwrap_or_default(),
            name: f.name,
        })
        .collect();

    let page = Page {
        items,
        page,
        page_size: limit,
        total: total as usize,
        total_pages,
    };

    render(&FavoritesTemplate {
        pager: PagerData::from(&page),
        total: page.total,
        recipes: page.items,
    })
}

/// About page template
#[derive(Template)]
#[template(path = "about.html")]
struct AboutTemplate {}

/// GET /about - About page
pub async fn about_page() -> Result<impl IntoResponse> {
    render(&AboutTemplate {})
}
