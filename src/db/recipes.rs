use crate::db::{models::*, DbPool};
use crate::error::{Error, Result};
use chrono::Utc;

/// Create a new recipe
pub async fn create_recipe(pool: &DbPool, new_recipe: &NewRecipe) -> Result<Recipe> {
    let now = Utc::now();

    let recipe = sqlx::query_as::<_, Recipe>(
        r#"
        INSERT INTO recipes (
            name, ingredients, cleaned_ingredients, url, image_url,
            content_hash, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(new_recipe.name.trim())
    .bind(&new_recipe.ingredients)
    .bind(&new_recipe.cleaned_ingredients)
    .bind(&new_recipe.url)
    .bind(&new_recipe.image_url)
    .bind(&new_recipe.content_hash)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(recipe)
}

/// Insert a recipe or overwrite the one with the same name
pub async fn upsert_recipe(pool: &DbPool, new_recipe: &NewRecipe) -> Result<Recipe> {
    let now = Utc::now();

    let recipe = sqlx::query_as::<_, Recipe>(
        r#"
        INSERT INTO recipes (
            name, ingredients, cleaned_ingredients, url, image_url,
            content_hash, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(name) DO UPDATE SET
            ingredients = excluded.ingredients,
            cleaned_ingredients = excluded.cleaned_ingredients,
            url = excluded.url,
            image_url = excluded.image_url,
            content_hash = excluded.content_hash,
            updated_at = excluded.updated_at
        RETURNING *
        "#,
    )
    .bind(new_recipe.name.trim())
    .bind(&new_recipe.ingredients)
    .bind(&new_recipe.cleaned_ingredients)
    .bind(&new_recipe.url)
    .bind(&new_recipe.image_url)
    .bind(&new_recipe.content_hash)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(recipe)
}

/// Find a recipe by its name
pub async fn find_recipe_by_name(pool: &DbPool, name: &str) -> Result<Option<Recipe>> {
    let recipe = sqlx::query_as::<_, Recipe>("SELECT * FROM recipes WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    Ok(recipe)
}

/// Get a recipe by its name
pub async fn get_recipe_by_name(pool: &DbPool, name: &str) -> Result<Recipe> {
    find_recipe_by_name(pool, name)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Recipe '{name}' not found")))
}

/// List the whole corpus in insertion order
pub async fn list_all_recipes(pool: &DbPool) -> Result<Vec<Recipe>> {
    let recipes = sqlx::query_as::<_, Recipe>("SELECT * FROM recipes ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(recipes)
}

/// List recipes whose ingredient text contains `needle`, ignoring case.
///
/// Case is folded with Unicode rules, which SQLite's `lower()` does not do.
pub async fn list_recipes_containing(pool: &DbPool, needle: &str) -> Result<Vec<Recipe>> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return Ok(Vec::new());
    }

    let recipes = list_all_recipes(pool)
        .await?
        .into_iter()
        .filter(|recipe| {
            recipe
                .ingredients
                .as_deref()
                .is_some_and(|text| text.to_lowercase().contains(&needle))
        })
        .collect();

    Ok(recipes)
}

/// Count all recipes
pub async fn count_all_recipes(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

/// Delete a recipe by name, returning whether it existed
pub async fn delete_recipe(pool: &DbPool, name: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM recipes WHERE name = ?")
        .bind(name)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
pub(crate) fn sample_recipe(name: &str, ingredients: &str) -> NewRecipe {
    NewRecipe {
        name: name.to_string(),
        ingredients: Some(ingredients.to_string()),
        cleaned_ingredients: Some(ingredients.to_string()),
        url: Some(format!("https://example.com/{}", name.replace(' ', "-"))),
        image_url: None,
        content_hash: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_recipe_crud() {
        let pool = test_pool().await;

        let recipe = create_recipe(&pool, &sample_recipe("Aloo Gobi", "potato, cauliflower"))
            .await
            .unwrap();
        assert_eq!(recipe.name, "Aloo Gobi");

        let retrieved = get_recipe_by_name(&pool, "Aloo Gobi").await.unwrap();
        assert_eq!(retrieved.id, recipe.id);

        assert!(matches!(
            get_recipe_by_name(&pool, "Missing").await,
            Err(Error::NotFound(_))
        ));

        assert!(delete_recipe(&pool, "Aloo Gobi").await.unwrap());
        assert!(!delete_recipe(&pool, "Aloo Gobi").await.unwrap());
        assert_eq!(count_all_recipes(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_upsert_overwrites_by_name() {
        let pool = test_pool().await;

        let first = upsert_recipe(&pool, &sample_recipe("Poha", "flattened rice"))
            .await
            .unwrap();
        let second = upsert_recipe(&pool, &sample_recipe("Poha", "flattened rice, peanuts"))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.ingredients.as_deref(), Some("flattened rice, peanuts"));
        assert_eq!(count_all_recipes(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_substring_filter_ignores_case() {
        let pool = test_pool().await;
        create_recipe(&pool, &sample_recipe("Paneer Tikka", "Paneer, Yogurt"))
            .await
            .unwrap();
        create_recipe(&pool, &sample_recipe("Raita", "yogurt, cucumber"))
            .await
            .unwrap();
        let mut bare = sample_recipe("Water", "");
        bare.ingredients = None;
        create_recipe(&pool, &bare).await.unwrap();

        let matches = list_recipes_containing(&pool, "YOGURT").await.unwrap();
        let names: Vec<_> = matches.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Paneer Tikka", "Raita"]);

        assert!(list_recipes_containing(&pool, "   ").await.unwrap().is_empty());
        assert!(list_recipes_containing(&pool, "100%").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_substring_filter_folds_non_ascii_case() {
        let pool = test_pool().await;
        create_recipe(&pool, &sample_recipe("Salsa", "2 JALAPEÑO peppers, tomato"))
            .await
            .unwrap();
        create_recipe(&pool, &sample_recipe("Crème Brûlée", "cream, sugar"))
            .await
            .unwrap();

        let matches = list_recipes_containing(&pool, "jalapeño").await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Salsa");

        let matches = list_recipes_containing(&pool, "Jalapeño Peppers").await.unwrap();
        assert_eq!(matches.len(), 1);
    }
}
