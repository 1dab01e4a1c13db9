// ============================
// crates/backend-lib/src/handlers/ratings.rs
// ============================
//! Rating endpoints.

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;
use bookshelf_common::{RatingRequest, RatingResponse};
use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::models::Rating;
use crate::validation;
use crate::AppState;

/// `POST /api/v1/ratings`
///
/// The rating is attributed to the authenticated caller; the request body
/// names only the book and the value.
pub async fn create_rating(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(request): Json<RatingRequest>,
) -> Result<(StatusCode, Json<RatingResponse>), AppError> {
    validation::validate_rating_value(request.value)
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;

    if state.books.find_by_id(request.book_id).await?.is_none() {
        return Err(AppError::BookNotFound);
    }

    let rating = state
        .ratings
        .insert(Rating {
            id: Uuid::new_v4(),
            user_id: identity.id(),
            book_id: request.book_id,
            value: request.value,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RatingResponse {
            id: rating.id,
            user_id: rating.user_id,
            book_id: rating.book_id,
            value: rating.value,
        }),
    ))
}
