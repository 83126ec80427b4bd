//! Repository for the `categories` table.

use sqlx::SqlitePool;

use crate::models::category::Category;

/// Read access to the seeded category list. There is no write path;
/// new category names arrive only as free text on book rows.
pub struct CategoryRepo;

impl CategoryRepo {
    /// List all categories ordered by name ascending (SQLite's default
    /// BINARY collation, i.e. case-sensitive byte order).
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name")
            .fetch_all(pool)
            .await
    }
}
