//! Handlers for the book catalog: list, upload, download, rating.

use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tokio_util::io::ReaderStream;

use maktaba_core::catalog;
use maktaba_core::error::CoreError;
use maktaba_core::types::DbId;
use maktaba_db::models::book::{Book, CreateBook};
use maktaba_db::repositories::BookRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /api/books
// ---------------------------------------------------------------------------

/// List all books, newest first.
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = BookRepo::list_all(&state.pool).await?;
    Ok(Json(books))
}

// ---------------------------------------------------------------------------
// POST /api/books
// ---------------------------------------------------------------------------

/// Upload a book: multipart metadata fields plus exactly one file.
///
/// Validation happens strictly before any storage mutation; the file is
/// written to disk before the row insert, and the write is unwound on
/// insert failure so a rejected upload leaves no trace.
pub async fn upload_book(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<serde_json::Value>> {
    let mut input = CreateBook::default();
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "title" => input.title = read_text(field).await?,
            "author" => input.author = read_text(field).await?,
            "description" => input.description = Some(read_text(field).await?),
            "category" => input.category = Some(read_text(field).await?),
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                // Accumulate chunk by chunk so an oversize upload fails
                // with the store's size message as soon as it crosses the
                // limit, instead of aborting inside the multipart parser
                // when the body limit fires.
                let mut data = Vec::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?
                {
                    data.extend_from_slice(&chunk);
                    catalog::validate_size(data.len() as u64, state.files.max_bytes())?;
                }
                file = Some((filename, data));
            }
            _ => {} // ignore unknown fields
        }
    }

    let (original_name, data) =
        file.ok_or_else(|| AppError::BadRequest("Please upload a book file.".into()))?;

    if input.title.trim().is_empty() || input.author.trim().is_empty() {
        return Err(AppError::BadRequest("Title and author are required.".into()));
    }
    input.description = catalog::non_empty(input.description.take());

    // Extension and size checks happen inside the store, before any write.
    let stored = state.files.save(&original_name, &data).await?;

    let book = match BookRepo::insert(&state.pool, &input, &stored.filename, &original_name).await {
        Ok(book) => book,
        Err(e) => {
            // The row never landed, so unwind the file write instead of
            // leaving an orphan on disk.
            state.files.remove(&stored.filename).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        book_id = book.id,
        title = %book.title,
        filename = %book.filename,
        "Book uploaded",
    );

    Ok(Json(json!({
        "message": "Book uploaded successfully!",
        "id": book.id,
    })))
}

/// Read a text field, mapping multipart decode errors to 400.
async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

// ---------------------------------------------------------------------------
// GET /api/books/{id}/download
// ---------------------------------------------------------------------------

/// Stream a stored book file back, suggesting the original filename.
///
/// A missing row and a missing backing file are distinct 404s: the
/// latter means the catalog is inconsistent with the disk.
pub async fn download_book(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let book = BookRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Book", id }))?;

    let path = state.files.resolve(&book.filename);
    let metadata = match tokio::fs::metadata(&path).await {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(book_id = id, path = %path.display(), "Backing file missing");
            return Err(AppError::Core(CoreError::NotFound { entity: "File", id }));
        }
        Err(e) => return Err(AppError::InternalError(e.to_string())),
    };

    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    let stream = ReaderStream::new(file);

    let response = Response::builder()
        .header(header::CONTENT_TYPE, content_type_for(&book.filename))
        .header(header::CONTENT_LENGTH, metadata.len().to_string())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&book.original_name, &book.filename),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    Ok(response)
}

/// Content type derived from the stored extension.
fn content_type_for(filename: &str) -> &'static str {
    match catalog::file_extension(filename).as_deref() {
        Some("pdf") => "application/pdf",
        Some("epub") => "application/epub+zip",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Build a `Content-Disposition: attachment` value that survives
/// non-ASCII original names (RFC 5987 `filename*`), with the ASCII
/// storage name as the plain-filename fallback.
fn content_disposition(original_name: &str, storage_name: &str) -> String {
    format!(
        "attachment; filename=\"{storage_name}\"; filename*=UTF-8''{}",
        urlencoding::encode(original_name)
    )
}

// ---------------------------------------------------------------------------
// PUT /api/books/{id}/rating
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct UpdateRating {
    pub rating: f64,
}

/// Overwrite a book's rating. Out-of-range values are rejected before
/// storage is touched; concurrent raters simply overwrite each other.
pub async fn update_rating(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRating>,
) -> AppResult<Json<serde_json::Value>> {
    catalog::validate_rating(input.rating)?;

    let updated = BookRepo::update_rating(&state.pool, id, input.rating).await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound { entity: "Book", id }));
    }

    tracing::info!(book_id = id, rating = input.rating, "Rating updated");

    Ok(Json(json!({ "message": "Rating updated successfully!" })))
}
