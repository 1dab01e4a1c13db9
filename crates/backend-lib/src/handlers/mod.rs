// crates/backend-lib/src/handlers/mod.rs

//! HTTP handlers, grouped by resource.

pub mod auth;
pub mod books;
pub mod ratings;
pub mod users;

use bookshelf_common::{BookResponse, UserResponse};
use crate::models::{Book, User};

/// Shape a book plus its mean rating for the wire.
/// The average is floored to two decimals, matching the catalog's display
/// rounding.
pub(crate) fn book_response(book: Book, average: Option<f64>) -> BookResponse {
    BookResponse {
        id: book.id,
        title: book.title,
        author: book.author,
        isbn: book.isbn,
        publication_year: book.publication_year,
        image_url: book.image_url,
        genre: book.genre,
        average_rating: average.map(|avg| (avg * 100.0).floor() / 100.0),
    }
}

/// Shape a user profile for the wire; the password hash never leaves the
/// server
pub(crate) fn user_response(user: User) -> UserResponse {
    let mut read_books: Vec<_> = user.read_books.into_iter().collect();
    read_books.sort();

    UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        role: user.role.as_str().to_string(),
        is_from_dataset: user.is_from_dataset,
        read_books,
    }
}
