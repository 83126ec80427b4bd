pub mod health;

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{books, categories};
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /books                  list (GET), upload (POST multipart)
/// /books/{id}/download    stream stored file (GET)
/// /books/{id}/rating      overwrite rating (PUT)
/// /categories             list seeded categories (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/books", get(books::list_books).post(books::upload_book))
        .route("/books/{id}/download", get(books::download_book))
        .route("/books/{id}/rating", put(books::update_rating))
        .route("/categories", get(categories::list_categories))
}
