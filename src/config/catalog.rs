use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use url::Url;

/// A recipe collection that can be imported into the database.
///
/// Catalogs are YAML or JSON documents:
///
/// ```yaml
/// version: 1
/// recipes:
///   - name: Masala Karela
///     ingredients: "6 Karela (Bitter Gourd), 1 Onion, Salt to taste"
///     cleaned_ingredients: "karela, onion, salt"
///     url: https://example.com/masala-karela
///     image_url: https://example.com/masala-karela.jpg
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeCatalog {
    pub version: u32,
    pub recipes: Vec<CatalogEntry>,
    #[serde(default)]
    pub validation: CatalogValidation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(default)]
    pub ingredients: Option<String>,
    #[serde(default)]
    pub cleaned_ingredients: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogValidation {
    #[serde(default = "default_max_recipes")]
    pub max_recipes: usize,
    #[serde(default = "default_protocols")]
    pub allowed_protocols: Vec<String>,
}

impl Default for CatalogValidation {
    fn default() -> Self {
        Self {
            max_recipes: default_max_recipes(),
            allowed_protocols: default_protocols(),
        }
    }
}

fn default_max_recipes() -> usize {
    100_000
}

fn default_protocols() -> Vec<String> {
    vec!["https".to_string(), "http".to_string()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CatalogFormat {
    Yaml,
    Json,
}

impl CatalogFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => CatalogFormat::Json,
            _ => CatalogFormat::Yaml,
        }
    }
}

impl CatalogEntry {
    /// SHA-256 over every catalog field, used to detect changed recipes on re-import
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for field in [
            Some(self.name.as_str()),
            self.ingredients.as_deref(),
            self.cleaned_ingredients.as_deref(),
            self.url.as_deref(),
            self.image_url.as_deref(),
        ] {
            match field {
                Some(value) => {
                    hasher.update([1u8]);
                    hasher.update(value.as_bytes());
                }
                None => hasher.update([0u8]),
            }
            hasher.update([0x1f]);
        }
        format!("{:x}", hasher.finalize())
    }
}

impl RecipeCatalog {
    /// Load a catalog from a YAML or JSON file (chosen by extension)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Catalog(format!(
                "Failed to read recipe catalog from {}: {}",
                path.display(),
                e
            ))
        })?;

        let catalog = Self::parse(&content, CatalogFormat::from_path(path)).map_err(|e| {
            Error::Catalog(format!(
                "Failed to parse recipe catalog from {}: {}",
                path.display(),
                e
            ))
        })?;

        catalog.validate()?;
        Ok(catalog)
    }

    fn parse(content: &str, format: CatalogFormat) -> std::result::Result<Self, String> {
        match format {
            CatalogFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            CatalogFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        }
    }

    pub fn total_recipes(&self) -> usize {
        self.recipes.len()
    }

    /// Validate the entire catalog
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(Error::Catalog(format!(
                "Unsupported catalog version: {}. Expected version 1",
                self.version
            )));
        }

        if self.recipes.len() > self.validation.max_recipes {
            return Err(Error::Catalog(format!(
                "Too many recipes: {} > {}",
                self.recipes.len(),
                self.validation.max_recipes
            )));
        }

        // Recipe names are the lookup key
        let mut seen = HashSet::new();
        for recipe in &self.recipes {
            if !seen.insert(recipe.name.trim()) {
                return Err(Error::Catalog(format!(
                    "Duplicate recipe name: {}",
                    recipe.name
                )));
            }
        }

        for (index, recipe) in self.recipes.iter().enumerate() {
            self.validate_entry(recipe).map_err(|e| {
                Error::Catalog(format!("Recipe #{} ({}): {}", index + 1, recipe.name, e))
            })?;
        }

        Ok(())
    }

    fn validate_entry(&self, recipe: &CatalogEntry) -> Result<()> {
        crate::utils::validation::validate_recipe_name(&recipe.name)?;

        for url in [&recipe.url, &recipe.image_url].into_iter().flatten() {
            if url.trim().is_empty() {
                continue;
            }
            let parsed = Url::parse(url)
                .map_err(|e| Error::Catalog(format!("Invalid URL '{url}': {e}")))?;

            if !self
                .validation
                .allowed_protocols
                .contains(&parsed.scheme().to_string())
            {
                return Err(Error::Catalog(format!(
                    "Invalid protocol '{}'. Allowed protocols: {}",
                    parsed.scheme(),
                    self.validation.allowed_protocols.join(", ")
                )));
            }

            if parsed.host_str().is_none() {
                return Err(Error::Catalog("URL must have a valid host".to_string()));
            }
        }

        Ok(())
    }
}
