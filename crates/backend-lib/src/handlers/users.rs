// ============================
// crates/backend-lib/src/handlers/users.rs
// ============================
//! Private profile endpoints.

use axum::{extract::State, Json};
use bookshelf_common::{BookReadRequest, UserResponse};
use crate::error::AppError;
use crate::handlers::user_response;
use crate::middleware::CurrentUser;
use crate::AppState;

/// `GET /api/v1/private/user`
pub async fn current_profile(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> Result<Json<UserResponse>, AppError> {
    // Re-read the account so the profile reflects writes made after the
    // identity snapshot was taken
    let user = state
        .users
        .find_by_id(identity.id())
        .await?
        .ok_or(AppError::UserNotFound)?;

    Ok(Json(user_response(user)))
}

/// `POST /api/v1/private/user/books`
pub async fn add_read_book(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(request): Json<BookReadRequest>,
) -> Result<Json<UserResponse>, AppError> {
    if state.books.find_by_id(request.book_id).await?.is_none() {
        return Err(AppError::BookNotFound);
    }

    let mut user = state
        .users
        .find_by_id(identity.id())
        .await?
        .ok_or(AppError::UserNotFound)?;
    user.read_books.insert(request.book_id);

    let user = state.users.update(user).await?;
    Ok(Json(user_response(user)))
}

/// `DELETE /api/v1/private/user/books`
pub async fn remove_read_book(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(request): Json<BookReadRequest>,
) -> Result<Json<UserResponse>, AppError> {
    if state.books.find_by_id(request.book_id).await?.is_none() {
        return Err(AppError::BookNotFound);
    }

    let mut user = state
        .users
        .find_by_id(identity.id())
        .await?
        .ok_or(AppError::UserNotFound)?;
    user.read_books.remove(&request.book_id);

    let user = state.users.update(user).await?;
    Ok(Json(user_response(user)))
}
