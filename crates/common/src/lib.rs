// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! exchanged between the Bookshelf client and server.
//! This module defines the HTTP request/response bodies and supporting types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for account registration
/// # Fields
/// * `email` - Email address, doubles as the login username
/// * `password` - Plaintext password, hashed server-side and never stored
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Request body for login
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response to successful registration or login
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthResponse {
    /// Account identifier
    pub id: Uuid,
    /// Display name (the email at registration time)
    pub username: String,
    /// Account email
    pub email: String,
    /// Signed bearer token to present on subsequent requests
    pub token: String,
}

/// A single book as returned by the catalog endpoints
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BookResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_year: Option<i32>,
    pub image_url: Option<String>,
    pub genre: Option<String>,
    /// Mean rating across all users, floored to two decimals;
    /// `None` when the book has no ratings yet
    pub average_rating: Option<f64>,
}

/// Page envelope for list endpoints
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    /// Zero-based page number
    pub page: usize,
    /// Requested page size
    pub size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    /// Whether this is the final page
    pub last: bool,
}

/// Request body for creating a rating.
/// The rating is recorded against the authenticated caller; there is no
/// client-supplied user id.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RatingRequest {
    pub book_id: Uuid,
    /// Star value, 1 through 5
    pub value: u8,
}

/// Response to a created rating
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RatingResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub value: u8,
}

/// A user profile as returned by the private endpoints
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Role name, e.g. "USER" or "ADMIN"
    pub role: String,
    /// Whether the account was seeded from the books dataset
    pub is_from_dataset: bool,
    /// Ids of books the user has marked as read
    pub read_books: Vec<Uuid>,
}

/// Request body for adding or removing a book from the read list
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BookReadRequest {
    pub book_id: Uuid,
}

/// Error body returned by all failing endpoints
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Machine-readable error code plus a human-readable message
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
