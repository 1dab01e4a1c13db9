// ============================
// bookshelf-backend-lib/src/store.rs
// ============================
//! Store abstractions with in-memory implementations.
use std::sync::Arc;
use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;
use crate::error::AppError;
use crate::models::{Book, Rating, User};

/// Error returned by `UserStore::insert` when the email is already taken.
/// This is the storage-layer uniqueness constraint that closes the
/// check-then-insert race in the registration workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateEmail;

/// Trait for account persistence
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Insert a new account; fails with `DuplicateEmail` if the email is
    /// already registered, atomically with respect to concurrent inserts
    async fn insert(&self, user: User) -> Result<Result<User, DuplicateEmail>, AppError>;

    /// Replace an existing account record
    async fn update(&self, user: User) -> Result<User, AppError>;
}

/// Trait for catalog persistence
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn insert(&self, book: Book) -> Result<Book, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, AppError>;

    /// Page through the catalog; returns the page plus the total item count
    async fn list(&self, page: usize, size: usize) -> Result<(Vec<Book>, usize), AppError>;
}

/// Trait for rating persistence
#[async_trait]
pub trait RatingStore: Send + Sync {
    async fn insert(&self, rating: Rating) -> Result<Rating, AppError>;

    /// Mean rating for a book; `None` when it has no ratings
    async fn average_for_book(&self, book_id: Uuid) -> Result<Option<f64>, AppError>;
}

/// In-memory implementation of the `UserStore` trait
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<DashMap<Uuid, User>>,
    /// email -> id index; `entry` insertion on this map is the atomic
    /// uniqueness check
    by_email: Arc<DashMap<String, Uuid>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let id = match self.by_email.get(email) {
            Some(entry) => *entry.value(),
            None => return Ok(None),
        };
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn insert(&self, user: User) -> Result<Result<User, DuplicateEmail>, AppError> {
        use dashmap::mapref::entry::Entry;

        // Claim the email first; losing the race means the email is taken
        match self.by_email.entry(user.email.clone()) {
            Entry::Occupied(_) => return Ok(Err(DuplicateEmail)),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            },
        }
        self.users.insert(user.id, user.clone());
        Ok(Ok(user))
    }

    async fn update(&self, user: User) -> Result<User, AppError> {
        if !self.users.contains_key(&user.id) {
            return Err(AppError::UserNotFound);
        }
        self.users.insert(user.id, user.clone());
        Ok(user)
    }
}

/// In-memory implementation of the `BookStore` trait
#[derive(Clone, Default)]
pub struct MemoryBookStore {
    books: Arc<DashMap<Uuid, Book>>,
    /// Insertion order, so pages are stable across calls
    order: Arc<std::sync::Mutex<Vec<Uuid>>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn insert(&self, book: Book) -> Result<Book, AppError> {
        self.books.insert(book.id, book.clone());
        self.order
            .lock()
            .map_err(|_| AppError::Internal("book order lock poisoned".to_string()))?
            .push(book.id);
        Ok(book)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, AppError> {
        Ok(self.books.get(&id).map(|b| b.value().clone()))
    }

    async fn list(&self, page: usize, size: usize) -> Result<(Vec<Book>, usize), AppError> {
        let order = self
            .order
            .lock()
            .map_err(|_| AppError::Internal("book order lock poisoned".to_string()))?;
        let total = order.len();

        let items = order
            .iter()
            .skip(page.saturating_mul(size))
            .take(size)
            .filter_map(|id| self.books.get(id).map(|b| b.value().clone()))
            .collect();

        Ok((items, total))
    }
}

/// In-memory implementation of the `RatingStore` trait
#[derive(Clone, Default)]
pub struct MemoryRatingStore {
    ratings: Arc<DashMap<Uuid, Rating>>,
}

impl MemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RatingStore for MemoryRatingStore {
    async fn insert(&self, rating: Rating) -> Result<Rating, AppError> {
        self.ratings.insert(rating.id, rating.clone());
        Ok(rating)
    }

    async fn average_for_book(&self, book_id: Uuid) -> Result<Option<f64>, AppError> {
        let mut sum = 0u64;
        let mut count = 0u64;
        for entry in self.ratings.iter() {
            if entry.value().book_id == book_id {
                sum += u64::from(entry.value().value);
                count += 1;
            }
        }

        if count == 0 {
            return Ok(None);
        }
        Ok(Some(sum as f64 / count as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User::registered(email.to_string(), "hash".to_string())
    }

    #[tokio::test]
    async fn test_user_insert_and_lookup() {
        let store = MemoryUserStore::new();
        let alice = store.insert(user("alice@x.com")).await.unwrap().unwrap();

        let by_email = store.find_by_email("alice@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, alice.id);

        let by_id = store.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "alice@x.com");

        assert!(store.find_by_email("bob@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_insert_duplicate_email() {
        let store = MemoryUserStore::new();
        store.insert(user("alice@x.com")).await.unwrap().unwrap();

        let second = store.insert(user("alice@x.com")).await.unwrap();
        assert_eq!(second.unwrap_err(), DuplicateEmail);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_insert_one_winner() {
        let store = Arc::new(MemoryUserStore::new());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.insert(user("race@x.com")).await.unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_book_pagination() {
        let store = MemoryBookStore::new();
        for i in 0..5 {
            store
                .insert(Book {
                    id: Uuid::new_v4(),
                    title: format!("Book {i}"),
                    author: "Author".to_string(),
                    isbn: format!("isbn-{i}"),
                    publication_year: Some(2000 + i),
                    image_url: None,
                    genre: None,
                })
                .await
                .unwrap();
        }

        let (first, total) = store.list(0, 2).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].title, "Book 0");

        let (last, _) = store.list(2, 2).await.unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].title, "Book 4");

        let (past_end, _) = store.list(9, 2).await.unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn test_rating_average() {
        let store = MemoryRatingStore::new();
        let book_id = Uuid::new_v4();

        assert!(store.average_for_book(book_id).await.unwrap().is_none());

        for value in [3u8, 4, 5] {
            store
                .insert(Rating {
                    id: Uuid::new_v4(),
                    user_id: Uuid::new_v4(),
                    book_id,
                    value,
                })
                .await
                .unwrap();
        }

        let avg = store.average_for_book(book_id).await.unwrap().unwrap();
        assert!((avg - 4.0).abs() < f64::EPSILON);
    }
}
