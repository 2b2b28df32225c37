use serde::{Deserialize, Serialize};

use crate::types::{BookId, UserId, WishlistId};

// A registered user. The password hash is opaque and never leaves the
// service layer; API responses use `UserSummary`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Payload for inserting a user; the store allocates the ID.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wishlist {
    pub id: WishlistId,
    pub owner_id: UserId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub wishlist_id: WishlistId,
    pub title: String,
    pub author: String,
}

/// Payload for inserting a book into an already-owned wishlist.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
}
