use crate::api::models::{MissingResponse, RecommendRequest, RecommendResponse};
use crate::config::{catalog::RecipeCatalog, sync::{self, SyncReport}};
use crate::db::DbPool;
use crate::utils::{path_segment, sanitize::truncate};
use crate::{Error, Result};
use reqwest::{Client, StatusCode};
use std::path::Path;
use tracing::info;

/// Fetch one page of pantry recommendations from a running server
pub async fn fetch_recommendations(server_url: &str, page: usize) -> Result<RecommendResponse> {
    let client = Client::new();
    let url = format!("{}/api/recommend", server_url.trim_end_matches('/'));

    let response = client
        .post(&url)
        .json(&RecommendRequest { page })
        .send()
        .await?
        .error_for_status()?;

    Ok(response.json().await?)
}

/// Print pantry recommendations
pub async fn recommend(server_url: &str, page: usize) -> Result<()> {
    let results = fetch_recommendations(server_url, page).await?;
    print_recommendations(&results);
    Ok(())
}

/// Fetch the ingredients a recipe needs that the pantry lacks
pub async fn fetch_missing(server_url: &str, recipe: &str) -> Result<MissingResponse> {
    let client = Client::new();
    let url = format!(
        "{}/api/recipes/{}/missing",
        server_url.trim_end_matches('/'),
        path_segment(recipe)
    );

    let response = client.get(&url).send().await?;
    if response.status() == StatusCode::NOT_FOUND {
        return Err(Error::NotFound(format!("Recipe '{recipe}' not found")));
    }

    Ok(response.error_for_status()?.json().await?)
}

/// Print a recipe's missing ingredients
pub async fn missing(server_url: &str, recipe: &str) -> Result<()> {
    let result = fetch_missing(server_url, recipe).await?;

    if result.missing.is_empty() {
        println!("✓ You have everything for {}", result.recipe);
    } else {
        println!("\nMissing for {}:", result.recipe);
        for ingredient in &result.missing {
            println!("  - {ingredient}");
        }
    }
    if let Some(url) = &result.url {
        println!("\nRecipe: {url}");
    }

    Ok(())
}

/// Load, validate and sync a catalog file
pub async fn import(pool: &DbPool, path: &Path) -> Result<SyncReport> {
    let catalog = RecipeCatalog::from_file(path)?;
    info!(
        "Loaded catalog {} with {} recipes",
        path.display(),
        catalog.total_recipes()
    );

    sync::sync_recipes_from_catalog(pool, &catalog).await
}

fn print_recommendations(results: &RecommendResponse) {
    if results.recommendations.is_empty() {
        println!("No recipes found");
        return;
    }

    println!("\nFound {} recipes:\n", results.total);
    println!("{:<50} {:>8} {:>8}", "Recipe", "Score", "Missing");
    println!("{}", "-".repeat(68));

    for row in &results.recommendations {
        let missing = row
            .missing_ingredients
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_string());

        println!(
            "{:<50} {:>8.3} {:>8}",
            truncate(&row.name, 48),
            row.score,
            missing
        );
    }

    println!("\nPage {} of {}", results.page, results.total_pages);
    println!("\nTo see what a recipe needs: pantry missing \"<RECIPE>\"");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_recommendations() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/recommend")
            .match_body(mockito::Matcher::Json(serde_json::json!({ "page": 2 })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"recommendations":[{"name":"Dal","score":0.8,"missing_ingredients":1,"url":null,"image_url":null}],"page":2,"total":16,"total_pages":2}"#,
            )
            .create_async()
            .await;

        let results = fetch_recommendations(&server.url(), 2).await.unwrap();
        mock.assert_async().await;

        assert_eq!(results.page, 2);
        assert_eq!(results.total_pages, 2);
        assert_eq!(results.recommendations[0].name, "Dal");
        assert_eq!(results.recommendations[0].missing_ingredients, Some(1));
    }

    #[tokio::test]
    async fn test_fetch_missing_encodes_name() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/recipes/Aloo%20Gobi/missing")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"recipe":"Aloo Gobi","url":null,"missing":["cauliflower"]}"#)
            .create_async()
            .await;

        let result = fetch_missing(&server.url(), "Aloo Gobi").await.unwrap();
        mock.assert_async().await;
        assert_eq!(result.missing, vec!["cauliflower"]);
    }

    #[tokio::test]
    async fn test_fetch_missing_unknown_recipe() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/recipes/Nope/missing")
            .with_status(404)
            .with_body(r#"{"error":"Recipe not found"}"#)
            .create_async()
            .await;

        let err = fetch_missing(&server.url(), "Nope").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/recommend")
            .with_status(500)
            .create_async()
            .await;

        let err = fetch_recommendations(&server.url(), 1).await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }

    #[tokio::test]
    async fn test_import_catalog() {
        use std::io::Write;

        let pool = crate::db::test_pool().await;
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            r#"version: 1
recipes:
  - name: Masoor Dal
    ingredients: "1 cup red lentils, 1 onion"
    cleaned_ingredients: "red lentils, onion"
"#
        )
        .unwrap();

        let report = import(&pool, file.path()).await.unwrap();
        assert_eq!(report.added, 1);

        let report = import(&pool, file.path()).await.unwrap();
        assert_eq!(report.added, 0);
        assert_eq!(report.unchanged, 1);
    }
}
