// ============================
// bookshelf-backend-lib/src/dataset.rs
// ============================
//! Catalog dataset seeding.
//!
//! The catalog can be pre-populated at startup from a JSON dataset file.
//! Seeded accounts are marked `is_from_dataset` and carry an empty
//! password hash, which can never verify, so they cannot be logged into.
use std::collections::HashSet;
use std::path::Path;
use serde::Deserialize;
use uuid::Uuid;
use crate::error::AppError;
use crate::models::{Book, Role, User};
use crate::store::{BookStore, UserStore};

/// On-disk dataset layout
#[derive(Debug, Deserialize)]
pub struct DatasetFile {
    #[serde(default)]
    pub books: Vec<BookRecord>,
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

/// One book row in the dataset
#[derive(Debug, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
}

/// One account row in the dataset
#[derive(Debug, Deserialize)]
pub struct UserRecord {
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Counts of what a seeding pass inserted
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub books: usize,
    pub users: usize,
}

/// Load a dataset file and insert its contents into the stores.
/// Duplicate seeded emails are skipped, not fatal.
pub async fn seed(
    path: &Path,
    books: &dyn BookStore,
    users: &dyn UserStore,
) -> Result<SeedReport, AppError> {
    let content = tokio::fs::read_to_string(path).await?;
    let dataset: DatasetFile = serde_json::from_str(&content)?;

    let mut report = SeedReport::default();

    for record in dataset.books {
        books
            .insert(Book {
                id: Uuid::new_v4(),
                title: record.title,
                author: record.author,
                isbn: record.isbn,
                publication_year: record.publication_year,
                image_url: record.image_url,
                genre: record.genre,
            })
            .await?;
        report.books += 1;
    }

    for record in dataset.users {
        let user = User {
            id: Uuid::new_v4(),
            username: record.username.unwrap_or_else(|| record.email.clone()),
            email: record.email,
            // empty hash: never verifies, dataset accounts cannot log in
            password_hash: String::new(),
            role: Role::User,
            is_from_dataset: true,
            read_books: HashSet::new(),
        };
        match users.insert(user).await? {
            Ok(_) => report.users += 1,
            Err(_) => {
                tracing::warn!("skipping dataset account with duplicate email");
            },
        }
    }

    tracing::info!(books = report.books, users = report.users, "dataset seeded");
    Ok(report)
}
