use serde::{Deserialize, Serialize};

use crate::model::{Book, User, Wishlist};
use crate::types::{BookId, UserId, WishlistId};

/// Persisted representation of a user (table: `user`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRow {
    /// Numeric identity carried in tokens.
    pub user_id: i64,
    /// Unique login name.
    pub username: String,
    /// Argon2 PHC string.
    pub password_hash: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.user_id),
            username: row.username,
            password_hash: row.password_hash,
        }
    }
}

/// Persisted representation of a wishlist (table: `wishlist`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistRow {
    pub wishlist_id: i64,
    /// Owning user's numeric identity.
    pub user_id: i64,
    pub name: String,
}

impl From<WishlistRow> for Wishlist {
    fn from(row: WishlistRow) -> Self {
        Self {
            id: WishlistId::new(row.wishlist_id),
            owner_id: UserId::new(row.user_id),
            name: row.name,
        }
    }
}

/// Persisted representation of a book (table: `book`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRow {
    pub book_id: i64,
    /// Parent wishlist's numeric identity.
    pub wishlist_id: i64,
    pub title: String,
    pub author: String,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: BookId::new(row.book_id),
            wishlist_id: WishlistId::new(row.wishlist_id),
            title: row.title,
            author: row.author,
        }
    }
}

/// Current value of a per-table ID counter (table: `sequence`).
#[derive(Debug, Clone, Deserialize)]
pub struct SequenceRow {
    pub value: i64,
}

/// Counter names, one per table with allocated IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sequence {
    User,
    Wishlist,
    Book,
}

impl Sequence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Wishlist => "wishlist",
            Self::Book => "book",
        }
    }
}
