// ============================
// bookshelf-backend-lib/src/models.rs
// ============================
//! Persisted entities and the request-scoped identity derived from them.

use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Authority strings granted by this role
    pub fn authorities(self) -> Vec<String> {
        match self {
            Role::User => vec!["ROLE_USER".to_string()],
            Role::Admin => vec!["ROLE_USER".to_string(), "ROLE_ADMIN".to_string()],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

/// A registered account.
/// `password_hash` is always the output of the password hasher, never raw
/// input. `email` is globally unique, enforced by the user store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    /// True for accounts seeded from the books dataset, false for
    /// human registrations; fixed at creation
    pub is_from_dataset: bool,
    /// Books the user has marked as read
    pub read_books: HashSet<Uuid>,
}

impl User {
    /// Construct a freshly registered account. The email doubles as the
    /// initial display name, matching the registration flow.
    pub fn registered(email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: email.clone(),
            email,
            password_hash,
            role: Role::User,
            is_from_dataset: false,
            read_books: HashSet::new(),
        }
    }
}

/// A catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_year: Option<i32>,
    pub image_url: Option<String>,
    pub genre: Option<String>,
}

/// A single user's star rating of a book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    /// 1 through 5
    pub value: u8,
}

/// Request-scoped authenticated identity: the resolved account plus its
/// role-derived authorities. Built once per request by the identity filter
/// and dropped when the request completes.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub authorities: Vec<String>,
}

impl AuthenticatedUser {
    pub fn new(user: User) -> Self {
        let authorities = user.role.authorities();
        Self { user, authorities }
    }

    pub fn id(&self) -> Uuid {
        self.user.id
    }

    pub fn has_role(&self, role: Role) -> bool {
        match role {
            Role::User => true,
            Role::Admin => self.user.role == Role::Admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_user_defaults() {
        let user = User::registered("alice@x.com".to_string(), "hash".to_string());

        assert_eq!(user.username, "alice@x.com");
        assert_eq!(user.email, "alice@x.com");
        assert_eq!(user.role, Role::User);
        assert!(!user.is_from_dataset);
        assert!(user.read_books.is_empty());
    }

    #[test]
    fn test_role_authorities() {
        assert_eq!(Role::User.authorities(), vec!["ROLE_USER".to_string()]);
        assert!(Role::Admin
            .authorities()
            .contains(&"ROLE_ADMIN".to_string()));
    }

    #[test]
    fn test_authenticated_user_roles() {
        let mut user = User::registered("a@x.com".to_string(), "h".to_string());
        let identity = AuthenticatedUser::new(user.clone());
        assert!(identity.has_role(Role::User));
        assert!(!identity.has_role(Role::Admin));

        user.role = Role::Admin;
        let identity = AuthenticatedUser::new(user);
        assert!(identity.has_role(Role::Admin));
    }
}
