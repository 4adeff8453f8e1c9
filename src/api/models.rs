use serde::{Deserialize, Serialize};

/// POST /api/recommend body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendRequest {
    #[serde(default = "default_page")]
    pub page: usize,
}

impl Default for RecommendRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
        }
    }
}

/// Page query parameter
#[derive(Debug, Clone, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: usize,
}

pub(crate) fn default_page() -> usize {
    1
}

/// A ranked recipe enriched for presentation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRow {
    pub name: String,
    pub score: f64,
    /// `None` when the recipe could not be looked up
    pub missing_ingredients: Option<usize>,
    pub url: Option<String>,
    pub image_url: Option<String>,
}

/// Ranked recipes with pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<RecommendationRow>,
    pub page: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Missing ingredients for one recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingResponse {
    pub recipe: String,
    pub url: Option<String>,
    pub missing: Vec<String>,
}

/// POST /api/pantry body: either one `name` or a list of `names`
#[derive(Debug, Clone, Deserialize)]
pub struct AddPantryRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeletePantryRequest {
    pub ingredient_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PantryResponse {
    pub ingredients: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecipeNameRequest {
    pub recipe_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteStatus {
    pub is_favorite: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShoppingListRequest {
    pub ingredients: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShoppingItemRequest {
    pub ingredient: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingListResponse {
    pub message: String,
    pub shopping_list: Vec<String>,
}

/// Outcome of a mutation that may target a missing row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// System statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub total_recipes: i64,
    pub pantry_ingredients: i64,
    pub favorites: i64,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub database: String,
}
