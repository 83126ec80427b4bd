//! Handler for the category list.

use axum::extract::State;
use axum::Json;

use maktaba_db::models::category::Category;
use maktaba_db::repositories::CategoryRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/categories
///
/// List all categories ordered by name ascending.
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let categories = CategoryRepo::list_all(&state.pool).await?;
    Ok(Json(categories))
}
