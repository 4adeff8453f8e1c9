use crate::db::{models::*, recipes, DbPool};
use crate::error::Result;
use chrono::Utc;
use tracing::{debug, info};

/// Bookmark a recipe. Returns `false` when no recipe has that name.
pub async fn add_favorite(pool: &DbPool, recipe_name: &str) -> Result<bool> {
    let Some(recipe) = recipes::find_recipe_by_name(pool, recipe_name).await? else {
        debug!("Cannot favorite unknown recipe: {}", recipe_name);
        return Ok(false);
    };

    sqlx::query("INSERT OR IGNORE INTO favorite_recipes (recipe_id, created_at) VALUES (?, ?)")
        .bind(recipe.id)
        .bind(Utc::now())
        .execute(pool)
        .await?;

    info!("Recipe added to favorites: {}", recipe.name);
    Ok(true)
}

/// Remove a bookmark, returning whether one existed
pub async fn remove_favorite(pool: &DbPool, recipe_name: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM favorite_recipes
        WHERE recipe_id IN (SELECT id FROM recipes WHERE name = ?)
        "#,
    )
    .bind(recipe_name)
    .execute(pool)
    .await?;

    let removed = result.rows_affected() > 0;
    if removed {
        info!("Recipe removed from favorites: {}", recipe_name);
    }
    Ok(removed)
}

/// Check whether a recipe is bookmarked
pub async fn is_favorite(pool: &DbPool, recipe_name: &str) -> Result<bool> {
    let found: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT f.id
        FROM favorite_recipes f
        JOIN recipes r ON r.id = f.recipe_id
        WHERE r.name = ?
        "#,
    )
    .bind(recipe_name)
    .fetch_optional(pool)
    .await?;

    Ok(found.is_some())
}

/// List favorites, oldest bookmark first
pub async fn list_favorites(pool: &DbPool, limit: i64, offset: i64) -> Result<Vec<FavoriteRecipe>> {
    let favorites = sqlx::query_as::<_, FavoriteRecipe>(
        r#"
        SELECT r.id AS recipe_id, r.name, r.cleaned_ingredients, r.url, r.image_url,
               f.created_at AS favorited_at
        FROM favorite_recipes f
        JOIN recipes r ON r.id = f.recipe_id
        ORDER BY f.id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(favorites)
}

/// Count favorites
pub async fn count_favorites(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM favorite_recipes")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}
