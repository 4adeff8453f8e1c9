// Validation utilities
use crate::error::{Error, Result};
use crate::utils::sanitize::clean_text;

pub const MAX_INGREDIENT_NAME_LEN: usize = 100;
pub const MAX_RECIPE_NAME_LEN: usize = 300;
pub const MAX_BATCH_SIZE: usize = 200;

/// Validate and clean a user-supplied ingredient name
pub fn validate_ingredient_name(name: &str) -> Result<String> {
    let cleaned = clean_text(name);

    if cleaned.is_empty() {
        return Err(Error::Validation(
            "Ingredient name cannot be empty".to_string(),
        ));
    }

    if cleaned.chars().count() > MAX_INGREDIENT_NAME_LEN {
        return Err(Error::Validation(format!(
            "Ingredient name exceeds {MAX_INGREDIENT_NAME_LEN} characters"
        )));
    }

    Ok(cleaned)
}

/// Validate a batch of ingredient names, rejecting oversized batches
pub fn validate_ingredient_names<S: AsRef<str>>(names: &[S]) -> Result<Vec<String>> {
    if names.len() > MAX_BATCH_SIZE {
        return Err(Error::Validation(format!(
            "At most {MAX_BATCH_SIZE} ingredients per request"
        )));
    }

    names
        .iter()
        .map(|n| validate_ingredient_name(n.as_ref()))
        .collect()
}

/// Validate a recipe name used as a lookup key
pub fn validate_recipe_name(name: &str) -> Result<()> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(Error::Validation("Recipe name cannot be empty".to_string()));
    }

    if trimmed.chars().count() > MAX_RECIPE_NAME_LEN {
        return Err(Error::Validation(format!(
            "Recipe name exceeds {MAX_RECIPE_NAME_LEN} characters"
        )));
    }

    if trimmed.chars().any(char::is_control) {
        return Err(Error::Validation(
            "Recipe name contains control characters".to_string(),
        ));
    }

    Ok(())
}
