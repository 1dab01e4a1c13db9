// ============================
// crates/backend-lib/src/handlers/books.rs
// ============================
//! Public catalog endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use bookshelf_common::{BookResponse, PaginatedResponse};
use crate::error::AppError;
use crate::handlers::book_response;
use crate::AppState;

const DEFAULT_PAGE_SIZE: usize = 20;
const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_size")]
    pub size: usize,
}

fn default_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// `GET /api/v1/books?page=&size=`
pub async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<PaginatedResponse<BookResponse>>, AppError> {
    let size = params.size.clamp(1, MAX_PAGE_SIZE);
    let page = params.page;

    let (books, total_items) = state.books.list(page, size).await?;

    let mut items = Vec::with_capacity(books.len());
    for book in books {
        let average = state.ratings.average_for_book(book.id).await?;
        items.push(book_response(book, average));
    }

    let total_pages = total_items.div_ceil(size);
    Ok(Json(PaginatedResponse {
        items,
        page,
        size,
        total_items,
        total_pages,
        last: page + 1 >= total_pages,
    }))
}

/// `GET /api/v1/books/{id}`
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookResponse>, AppError> {
    let book = state
        .books
        .find_by_id(id)
        .await?
        .ok_or(AppError::BookNotFound)?;
    let average = state.ratings.average_for_book(id).await?;

    Ok(Json(book_response(book, average)))
}
