//! Repository for the `books` table.

use maktaba_core::catalog::DEFAULT_CATEGORY;
use maktaba_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::book::{Book, CreateBook};

/// Column list for `books` queries.
const BOOK_COLUMNS: &str = "\
    id, title, author, description, category, \
    filename, original_name, rating, created_at";

/// Provides CRUD operations for books. Rows are only ever created by a
/// successful upload and mutated by rating updates; there is no delete.
pub struct BookRepo;

impl BookRepo {
    /// Insert a book for a freshly stored file. `rating` takes its schema
    /// default of 0 and `created_at` is set here, once, in UTC.
    pub async fn insert(
        pool: &SqlitePool,
        input: &CreateBook,
        filename: &str,
        original_name: &str,
    ) -> Result<Book, sqlx::Error> {
        let category = input
            .category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_CATEGORY);

        let query = format!(
            "INSERT INTO books (title, author, description, category, filename, original_name, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) \
             RETURNING {BOOK_COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(&input.title)
            .bind(&input.author)
            .bind(input.description.as_deref())
            .bind(category)
            .bind(filename)
            .bind(original_name)
            .bind(chrono::Utc::now())
            .fetch_one(pool)
            .await
    }

    /// List all books, newest first. Unbounded by design; pagination is a
    /// known scaling limit at this catalog's size.
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Book>, sqlx::Error> {
        let query = format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Book>(&query).fetch_all(pool).await
    }

    /// Find a book by ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Book>, sqlx::Error> {
        let query = format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite a book's rating unconditionally (last write wins).
    ///
    /// Returns `false` when no row matched the ID.
    pub async fn update_rating(
        pool: &SqlitePool,
        id: DbId,
        rating: f64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE books SET rating = ? WHERE id = ?")
            .bind(rating)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
