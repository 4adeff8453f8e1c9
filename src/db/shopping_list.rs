//! Shopping lists, keyed explicitly by browser session id.

use crate::db::{pantry, DbPool};
use crate::error::Result;
use chrono::Utc;
use tracing::debug;

/// Append ingredients to a session's list. Blank and already-listed items are skipped.
pub async fn add_items<S: AsRef<str>>(pool: &DbPool, session_id: &str, items: &[S]) -> Result<()> {
    let now = Utc::now();
    for item in items {
        let item = item.as_ref().trim();
        if item.is_empty() {
            continue;
        }
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO shopping_list_items (session_id, ingredient, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(session_id)
        .bind(item)
        .bind(now)
        .execute(pool)
        .await?;
    }

    debug!("Added {} items to shopping list {}", items.len(), session_id);
    Ok(())
}

/// Remove one ingredient, returning whether it was listed
pub async fn remove_item(pool: &DbPool, session_id: &str, item: &str) -> Result<bool> {
    let result =
        sqlx::query("DELETE FROM shopping_list_items WHERE session_id = ? AND ingredient = ?")
            .bind(session_id)
            .bind(item.trim())
            .execute(pool)
            .await?;

    Ok(result.rows_affected() > 0)
}

/// List a session's items in the order they were added
pub async fn list_items(pool: &DbPool, session_id: &str) -> Result<Vec<String>> {
    let items: Vec<String> = sqlx::query_scalar(
        "SELECT ingredient FROM shopping_list_items WHERE session_id = ? ORDER BY id",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

/// Move bought items from the list into the pantry, returning what is left on the list.
///
/// All items move in one transaction, so a failure leaves both tables untouched.
pub async fn move_to_pantry<S: AsRef<str>>(
    pool: &DbPool,
    session_id: &str,
    items: &[S],
) -> Result<Vec<String>> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    for item in items {
        let item = item.as_ref().trim();
        if item.is_empty() {
            continue;
        }

        sqlx::query("DELETE FROM shopping_list_items WHERE session_id = ? AND ingredient = ?")
            .bind(session_id)
            .bind(item)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT OR IGNORE INTO pantry_ingredients (name, created_at) VALUES (?, ?)")
            .bind(pantry::normalize_ingredient(item))
            .bind(now)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    debug!("Moved {} items to the pantry for {}", items.len(), session_id);

    list_items(pool, session_id).await
}
