use crate::config::catalog::{CatalogEntry, RecipeCatalog};
use crate::db::{self, models::*, DbPool};
use crate::error::Result;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Report of catalog synchronization results
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub added: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub errors: Vec<String>,
}

impl SyncReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_summary(&self) {
        info!(
            "Recipe sync completed: {} added, {} updated, {} unchanged, {} errors",
            self.added,
            self.updated,
            self.unchanged,
            self.errors.len()
        );

        if !self.errors.is_empty() {
            warn!("Sync errors:");
            for error in &self.errors {
                warn!("  - {}", error);
            }
        }
    }
}

/// Synchronize recipes from a catalog into the database.
///
/// Recipes are matched by name. Rows absent from the catalog are left alone,
/// so several catalogs can be imported side by side.
pub async fn sync_recipes_from_catalog(pool: &DbPool, catalog: &RecipeCatalog) -> Result<SyncReport> {
    let mut report = SyncReport::new();

    info!("Starting recipe sync: {} recipes", catalog.total_recipes());

    let existing: HashMap<String, Option<String>> = db::recipes::list_all_recipes(pool)
        .await?
        .into_iter()
        .map(|r| (r.name, r.content_hash))
        .collect();

    debug!("Loaded {} existing recipes from database", existing.len());

    for entry in &catalog.recipes {
        if let Err(e) = sync_recipe(pool, entry, &existing, &mut report).await {
            let error_msg = format!("Failed to sync recipe '{}': {}", entry.name, e);
            warn!("{}", error_msg);
            report.errors.push(error_msg);
        }
    }

    report.log_summary();
    Ok(report)
}

async fn sync_recipe(
    pool: &DbPool,
    entry: &CatalogEntry,
    existing: &HashMap<String, Option<String>>,
    report: &mut SyncReport,
) -> Result<()> {
    let name = entry.name.trim();
    let hash = entry.content_hash();

    let is_update = match existing.get(name) {
        Some(Some(current)) if *current == hash => {
            report.unchanged += 1;
            return Ok(());
        }
        Some(_) => true,
        None => false,
    };

    let new_recipe = NewRecipe {
        name: name.to_string(),
        ingredients: entry.ingredients.clone(),
        cleaned_ingredients: entry.cleaned_ingredients.clone(),
        url: non_empty(&entry.url),
        image_url: non_empty(&entry.image_url),
        content_hash: Some(hash),
    };
    db::recipes::upsert_recipe(pool, &new_recipe).await?;

    if is_update {
        report.updated += 1;
    } else {
        report.added += 1;
    }
    debug!("Synced recipe: {}", name);
    Ok(())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
