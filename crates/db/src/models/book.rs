//! Book catalog models and DTOs.

use maktaba_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `books` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Book {
    pub id: DbId,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    /// Free text, no foreign key into `categories`.
    pub category: String,
    /// Server-generated storage name under the upload directory.
    pub filename: String,
    /// Filename as supplied by the uploader, used for download naming.
    pub original_name: String,
    pub rating: f64,
    pub created_at: Timestamp,
}

/// Metadata fields of an upload request. The file itself is handled by
/// the file store; its storage name is passed to the insert separately.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub category: Option<String>,
}
