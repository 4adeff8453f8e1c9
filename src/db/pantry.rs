use crate::db::{models::*, DbPool};
use crate::error::Result;
use chrono::Utc;
use std::collections::HashSet;
use tracing::debug;

/// Normalize ingredient name (lowercase, trim, collapse inner whitespace)
pub fn normalize_ingredient(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Add an ingredient to the pantry, returning the existing row if already owned
pub async fn add_ingredient(pool: &DbPool, name: &str) -> Result<PantryIngredient> {
    let normalized = normalize_ingredient(name);

    let existing =
        sqlx::query_as::<_, PantryIngredient>("SELECT * FROM pantry_ingredients WHERE name = ?")
            .bind(&normalized)
            .fetch_optional(pool)
            .await?;

    if let Some(ingredient) = existing {
        return Ok(ingredient);
    }

    let ingredient = sqlx::query_as::<_, PantryIngredient>(
        "INSERT INTO pantry_ingredients (name, created_at) VALUES (?, ?) RETURNING *",
    )
    .bind(&normalized)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    debug!("Added pantry ingredient: {}", ingredient.name);
    Ok(ingredient)
}

/// Add several ingredients, skipping blank names
pub async fn add_ingredients<S: AsRef<str>>(
    pool: &DbPool,
    names: &[S],
) -> Result<Vec<PantryIngredient>> {
    let mut added = Vec::with_capacity(names.len());
    for name in names {
        if name.as_ref().trim().is_empty() {
            continue;
        }
        added.push(add_ingredient(pool, name.as_ref()).await?);
    }
    Ok(added)
}

/// Remove an ingredient, returning whether it was in the pantry
pub async fn remove_ingredient(pool: &DbPool, name: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM pantry_ingredients WHERE name = ?")
        .bind(normalize_ingredient(name))
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// List pantry ingredients in the order they were added
pub async fn list_ingredients(pool: &DbPool) -> Result<Vec<PantryIngredient>> {
    let ingredients =
        sqlx::query_as::<_, PantryIngredient>("SELECT * FROM pantry_ingredients ORDER BY id")
            .fetch_all(pool)
            .await?;

    Ok(ingredients)
}

/// Pantry ingredient names in insertion order
pub async fn pantry_names(pool: &DbPool) -> Result<Vec<String>> {
    let names: Vec<String> =
        sqlx::query_scalar("SELECT name FROM pantry_ingredients ORDER BY id")
            .fetch_all(pool)
            .await?;

    Ok(names)
}

/// Pantry as a lowercase set, for membership tests
pub async fn pantry_set(pool: &DbPool) -> Result<HashSet<String>> {
    Ok(pantry_names(pool)
        .await?
        .into_iter()
        .map(|n| n.to_lowercase())
        .collect())
}

/// Count pantry ingredients
pub async fn count_ingredients(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pantry_ingredients")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[test]
    fn test_normalize_ingredient() {
        assert_eq!(normalize_ingredient("  Green   Chilli "), "green chilli");
        assert_eq!(normalize_ingredient("EGG"), "egg");
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let pool = test_pool().await;

        let first = add_ingredient(&pool, "Tomato").await.unwrap();
        let second = add_ingredient(&pool, " tomato ").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(count_ingredients(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_add_list_remove() {
        let pool = test_pool().await;

        add_ingredients(&pool, &["Onion", "", "Garlic", "Ginger"])
            .await
            .unwrap();
        assert_eq!(
            pantry_names(&pool).await.unwrap(),
            vec!["onion", "garlic", "ginger"]
        );

        assert!(remove_ingredient(&pool, "GARLIC").await.unwrap());
        assert!(!remove_ingredient(&pool, "garlic").await.unwrap());

        let set = pantry_set(&pool).await.unwrap();
        assert!(set.contains("onion"));
        assert!(!set.contains("garlic"));
        assert_eq!(list_ingredients(&pool).await.unwrap().len(), 2);
    }
}
