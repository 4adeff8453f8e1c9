use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use crate::{
    api::models::*,
    db::{self, models::Recipe},
    recommend::{self, CorpusEntry, Page},
    utils::validation,
    web::session::SessionId,
    Error, Result,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::SqlitePool,
    pub settings: crate::config::Settings,
}

impl AppState {
    /// Keep user-supplied page numbers inside the configured bound
    fn bounded_page(&self, page: usize) -> usize {
        page.clamp(1, self.settings.pagination.max_pages.max(1))
    }
}

fn lowercase_set(names: &[String]) -> HashSet<String> {
    names.iter().map(|n| n.to_lowercase()).collect()
}

fn enrich(
    name: String,
    score: f64,
    image_url: Option<String>,
    by_name: &HashMap<&str, &Recipe>,
    pantry: &HashSet<String>,
) -> RecommendationRow {
    let recipe = by_name.get(name.as_str()).copied();
    RecommendationRow {
        missing_ingredients: recommend::missing_for_recipe(recipe, pantry),
        url: recipe.and_then(|r| r.url.clone()),
        image_url: image_url.or_else(|| recipe.and_then(|r| r.image_url.clone())),
        name,
        score,
    }
}

/// Rank the whole corpus against the pantry and return one enriched page;
/// the page is clamped into range
pub async fn pantry_recommendations(state: &AppState, page: usize) -> Result<Page<RecommendationRow>> {
    // Two independent snapshot reads
    let recipes = db::recipes::list_all_recipes(&state.pool).await?;
    let pantry = db::pantry::pantry_names(&state.pool).await?;

    let corpus: Vec<CorpusEntry<'_>> = recipes.iter().map(CorpusEntry::from).collect();
    let ranked = recommend::paginate_clamped(
        recommend::score_for_pantry(&corpus, &pantry),
        state.bounded_page(page),
        state.settings.pagination.recommend_page_size,
    );
    debug!(
        "Pantry of {} ranked {} of {} recipes",
        pantry.len(),
        ranked.total,
        recipes.len()
    );

    let by_name: HashMap<&str, &Recipe> = recipes.iter().map(|r| (r.name.as_str(), r)).collect();
    let pantry = lowercase_set(&pantry);

    Ok(ranked.map(|m| enrich(m.name, m.score, None, &by_name, &pantry)))
}

/// Rank recipes mentioning one ingredient; the page is clamped into range
pub async fn ingredient_recommendations(
    state: &AppState,
    ingredient: &str,
    page: usize,
) -> Result<Page<RecommendationRow>> {
    let candidates = db::recipes::list_recipes_containing(&state.pool, ingredient).await?;
    let corpus: Vec<CorpusEntry<'_>> = candidates.iter().map(CorpusEntry::from).collect();
    let ranked = recommend::rank_for_ingredient(&corpus, ingredient);
    debug!(
        "Ingredient '{}' matched {} recipes, {} ranked",
        ingredient,
        candidates.len(),
        ranked.len()
    );

    let page = recommend::paginate_clamped(
        ranked,
        state.bounded_page(page),
        state.settings.pagination.ingredient_page_size,
    );

    let pantry = db::pantry::pantry_set(&state.pool).await?;
    // First occurrence wins, matching the ranker
    let mut by_name: HashMap<&str, &Recipe> = HashMap::new();
    for recipe in &candidates {
        by_name.entry(recipe.name.as_str()).or_insert(recipe);
    }

    Ok(page.map(|m| enrich(m.name, m.score, m.image_url, &by_name, &pantry)))
}

fn into_response(page: Page<RecommendationRow>) -> RecommendResponse {
    RecommendResponse {
        page: page.page,
        total: page.total,
        total_pages: page.total_pages,
        recommendations: page.items,
    }
}

/// POST /api/recommend - Recipes ranked against the whole pantry
pub async fn recommend(
    State(state): State<AppState>,
    body: Option<Json<RecommendRequest>>,
) -> Result<Json<RecommendResponse>> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    debug!("Recommend request: {:?}", request);

    let page = pantry_recommendations(&state, request.page).await?;
    Ok(Json(into_response(page)))
}

/// GET /api/ingredients/:name/recipes - Recipes ranked against one ingredient
pub async fn ingredient_recipes(
    State(state): State<AppState>,
    Path(ingredient): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<RecommendResponse>> {
    let ingredient = validation::validate_ingredient_name(&ingredient)?;
    let page = ingredient_recommendations(&state, &ingredient, params.page).await?;
    Ok(Json(into_response(page)))
}

/// GET /api/recipes/:name/missing - Ingredients of a recipe not in the pantry
pub async fn missing_ingredients(
    State(state): State<AppState>,
    Path(recipe_name): Path<String>,
) -> Result<Json<MissingResponse>> {
    let recipe = db::recipes::get_recipe_by_name(&state.pool, &recipe_name).await?;
    let pantry = db::pantry::pantry_set(&state.pool).await?;

    let missing = recommend::missing_ingredients(
        recipe.cleaned_ingredients.as_deref().unwrap_or(""),
        &pantry,
    );

    Ok(Json(MissingResponse {
        recipe: recipe.name,
        url: recipe.url,
        missing,
    }))
}

/// GET /api/pantry - Owned ingredients
pub async fn list_pantry(State(state): State<AppState>) -> Result<Json<PantryResponse>> {
    let ingredients = db::pantry::pantry_names(&state.pool).await?;
    Ok(Json(PantryResponse { ingredients }))
}

/// POST /api/pantry - Add one or more ingredients
pub async fn add_pantry(
    State(state): State<AppState>,
    Json(request): Json<AddPantryRequest>,
) -> Result<Json<ActionResponse>> {
    let mut names = request.names;
    names.extend(request.name);
    if names.is_empty() {
        return Err(Error::Validation("No ingredient given".to_string()));
    }

    let names = validation::validate_ingredient_names(&names)?;
    let added = db::pantry::add_ingredients(&state.pool, &names).await?;
    info!("Added {} ingredients to the pantry", added.len());

    Ok(Json(ActionResponse::ok(format!(
        "{} ingredient(s) added to the pantry",
        added.len()
    ))))
}

/// POST /api/pantry/delete - Remove an ingredient
pub async fn delete_pantry(
    State(state): State<AppState>,
    Json(request): Json<DeletePantryRequest>,
) -> Result<Json<ActionResponse>> {
    if db::pantry::remove_ingredient(&state.pool, &request.ingredient_name).await? {
        Ok(Json(ActionResponse::ok("Ingredient deleted successfully")))
    } else {
        Ok(Json(ActionResponse::failed("Ingredient not found")))
    }
}

/// POST /api/favorites - Bookmark a recipe
pub async fn add_favorite(
    State(state): State<AppState>,
    Json(request): Json<RecipeNameRequest>,
) -> Result<Json<ActionResponse>> {
    if db::favorites::add_favorite(&state.pool, &request.recipe_name).await? {
        Ok(Json(ActionResponse::ok("Recipe added to favorites")))
    } else {
        Ok(Json(ActionResponse::failed("Recipe not found in the database")))
    }
}

/// POST /api/favorites/remove - Drop a bookmark
pub async fn remove_favorite(
    State(state): State<AppState>,
    Json(request): Json<RecipeNameRequest>,
) -> Result<Json<ActionResponse>> {
    if db::favorites::remove_favorite(&state.pool, &request.recipe_name).await? {
        Ok(Json(ActionResponse::ok("Recipe removed from favorites")))
    } else {
        Ok(Json(ActionResponse::failed("Recipe not found in favorites")))
    }
}

/// POST /api/favorites/check - Whether a recipe is bookmarked
pub async fn check_favorite(
    State(state): State<AppState>,
    Json(request): Json<RecipeNameRequest>,
) -> Result<Json<FavoriteStatus>> {
    let is_favorite = db::favorites::is_favorite(&state.pool, &request.recipe_name).await?;
    Ok(Json(FavoriteStatus { is_favorite }))
}

/// GET /api/shopping-list - The caller's shopping list
pub async fn get_shopping_list(
    State(state): State<AppState>,
    session: SessionId,
) -> Result<Json<ShoppingListResponse>> {
    let shopping_list = db::shopping_list::list_items(&state.pool, session.as_str()).await?;
    Ok(Json(ShoppingListResponse {
        message: format!("{} item(s)", shopping_list.len()),
        shopping_list,
    }))
}

/// POST /api/shopping-list - Add ingredients to the caller's list
pub async fn add_to_shopping_list(
    State(state): State<AppState>,
    session: SessionId,
    Json(request): Json<ShoppingListRequest>,
) -> Result<Json<ShoppingListResponse>> {
    let items = validation::validate_ingredient_names(&request.ingredients)?;
    db::shopping_list::add_items(&state.pool, session.as_str(), &items).await?;
    info!("Selected ingredients added to shopping list: {:?}", items);

    let shopping_list = db::shopping_list::list_items(&state.pool, session.as_str()).await?;
    Ok(Json(ShoppingListResponse {
        message: "Ingredients added to the shopping list".to_string(),
        shopping_list,
    }))
}

/// POST /api/shopping-list/delete - Remove one ingredient from the caller's list
pub async fn delete_from_shopping_list(
    State(state): State<AppState>,
    session: SessionId,
    Json(request): Json<ShoppingItemRequest>,
) -> Result<Json<ActionResponse>> {
    if db::shopping_list::remove_item(&state.pool, session.as_str(), &request.ingredient).await? {
        Ok(Json(ActionResponse::ok("Ingredient deleted successfully")))
    } else {
        Ok(Json(ActionResponse::failed(
            "Ingredient not found in the shopping list",
        )))
    }
}

/// POST /api/shopping-list/move-to-pantry - Move bought items into the pantry
pub async fn move_to_pantry(
    State(state): State<AppState>,
    session: SessionId,
    Json(request): Json<ShoppingListRequest>,
) -> Result<Json<ShoppingListResponse>> {
    let items = validation::validate_ingredient_names(&request.ingredients)?;
    let shopping_list =
        db::shopping_list::move_to_pantry(&state.pool, session.as_str(), &items).await?;

    Ok(Json(ShoppingListResponse {
        message: "Ingredients added to ingredients database successfully!".to_string(),
        shopping_list,
    }))
}

/// GET /api/stats - Get system statistics
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Stats>> {
    debug!("Get stats request");

    Ok(Json(Stats {
        total_recipes: db::recipes::count_all_recipes(&state.pool).await?,
        pantry_ingredients: db::pantry::count_ingredients(&state.pool).await?,
        favorites: db::favorites::count_favorites(&state.pool).await?,
    }))
}

/// GET /health - Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

/// GET /ready - Readiness check endpoint
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<ReadinessResponse>> {
    let db_healthy = sqlx::query("SELECT 1").fetch_one(&state.pool).await.is_ok();

    Ok(Json(ReadinessResponse {
        ready: db_healthy,
        database: if db_healthy { "ok" } else { "error" }.to_string(),
    }))
}
