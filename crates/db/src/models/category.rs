use maktaba_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `categories` table. Seeded at migration time; new
/// names only ever appear as free text on books.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
}
