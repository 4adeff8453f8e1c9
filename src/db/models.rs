use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub ingredients: Option<String>,
    pub cleaned_ingredients: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub content_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecipe {
    pub name: String,
    pub ingredients: Option<String>,
    pub cleaned_ingredients: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub content_hash: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PantryIngredient {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A favorited recipe joined with its recipe row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FavoriteRecipe {
    pub recipe_id: i64,
    pub name: String,
    pub cleaned_ingredients: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub favorited_at: DateTime<Utc>,
}
