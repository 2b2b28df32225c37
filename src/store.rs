//! Persistence capabilities required by the service layer.
//!
//! Business rules are written against these traits only, so the backing
//! technology can change without touching ownership logic. Every wishlist
//! lookup takes the owner alongside the ID; implementations must apply both
//! in a single predicate.

use std::fmt;
use std::future::Future;

use crate::model::{Book, NewBook, NewUser, User, Wishlist};
use crate::types::{BookId, UserId, WishlistId};

/// Errors surfaced by a store implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    Conflict(String),
    /// Any other backend failure
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict(msg) => write!(f, "Conflict: {}", msg),
            Self::Backend(msg) => write!(f, "Store error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// User records and password hashes.
pub trait CredentialStore: Send + Sync {
    fn find_user_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;

    /// Insert a user. Fails with [`StoreError::Conflict`] if the username is taken.
    fn insert_user(&self, user: NewUser) -> impl Future<Output = Result<User, StoreError>> + Send;

    fn list_users(&self) -> impl Future<Output = Result<Vec<User>, StoreError>> + Send;
}

/// Wishlists and the books inside them.
pub trait WishlistStore: Send + Sync {
    fn insert_wishlist(
        &self,
        owner: UserId,
        name: String,
    ) -> impl Future<Output = Result<Wishlist, StoreError>> + Send;

    fn list_wishlists(
        &self,
        owner: UserId,
    ) -> impl Future<Output = Result<Vec<Wishlist>, StoreError>> + Send;

    /// Find a wishlist matching both `id` and `owner`.
    fn find_wishlist(
        &self,
        owner: UserId,
        id: WishlistId,
    ) -> impl Future<Output = Result<Option<Wishlist>, StoreError>> + Send;

    /// Atomically delete the wishlist matching both `id` and `owner`, plus
    /// its books. Returns whether a wishlist was removed.
    fn delete_wishlist(
        &self,
        owner: UserId,
        id: WishlistId,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    fn insert_book(
        &self,
        wishlist: WishlistId,
        book: NewBook,
    ) -> impl Future<Output = Result<Book, StoreError>> + Send;

    fn list_books(
        &self,
        wishlist: WishlistId,
    ) -> impl Future<Output = Result<Vec<Book>, StoreError>> + Send;

    /// Delete the book matching both `id` and `wishlist`. Returns whether a
    /// book was removed.
    fn delete_book(
        &self,
        wishlist: WishlistId,
        id: BookId,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;
}
