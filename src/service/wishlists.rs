use tracing::{debug, info};

use crate::auth::AuthenticatedUser;
use crate::error::{ServiceError, ServiceResult};
use crate::model::{Book, NewBook, Wishlist};
use crate::store::WishlistStore;
use crate::types::{BookId, WishlistId};

/// Wishlist and book operations scoped to the authenticated owner.
#[derive(Clone)]
pub struct WishlistService<S> {
    store: S,
}

impl<S: WishlistStore> WishlistService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create_wishlist(
        &self,
        user: &AuthenticatedUser,
        name: &str,
    ) -> ServiceResult<Wishlist> {
        let wishlist = self
            .store
            .insert_wishlist(user.user_id(), name.to_string())
            .await?;
        info!("User {} created wishlist {}", user.user_id(), wishlist.id);
        Ok(wishlist)
    }

    pub async fn list_wishlists(&self, user: &AuthenticatedUser) -> ServiceResult<Vec<Wishlist>> {
        Ok(self.store.list_wishlists(user.user_id()).await?)
    }

    /// Delete a wishlist and its books.
    ///
    /// Succeeds whether or not anything matched, so a missing wishlist and
    /// another user's wishlist look the same.
    pub async fn delete_wishlist(
        &self,
        user: &AuthenticatedUser,
        id: WishlistId,
    ) -> ServiceResult<()> {
        let removed = self.store.delete_wishlist(user.user_id(), id).await?;
        if removed {
            info!("User {} deleted wishlist {}", user.user_id(), id);
        } else {
            debug!("User {} delete of wishlist {} matched nothing", user.user_id(), id);
        }
        Ok(())
    }

    pub async fn add_book(
        &self,
        user: &AuthenticatedUser,
        wishlist: WishlistId,
        title: &str,
        author: &str,
    ) -> ServiceResult<Book> {
        let wishlist = self.owned_wishlist(user, wishlist).await?;
        let book = self
            .store
            .insert_book(
                wishlist.id,
                NewBook {
                    title: title.to_string(),
                    author: author.to_string(),
                },
            )
            .await?;
        info!(
            "User {} added book {} to wishlist {}",
            user.user_id(),
            book.id,
            wishlist.id
        );
        Ok(book)
    }

    pub async fn list_books(
        &self,
        user: &AuthenticatedUser,
        wishlist: WishlistId,
    ) -> ServiceResult<Vec<Book>> {
        let wishlist = self.owned_wishlist(user, wishlist).await?;
        Ok(self.store.list_books(wishlist.id).await?)
    }

    pub async fn remove_book(
        &self,
        user: &AuthenticatedUser,
        wishlist: WishlistId,
        book: BookId,
    ) -> ServiceResult<()> {
        let wishlist = self.owned_wishlist(user, wishlist).await?;
        if !self.store.delete_book(wishlist.id, book).await? {
            return Err(ServiceError::NotFound);
        }
        info!(
            "User {} removed book {} from wishlist {}",
            user.user_id(),
            book,
            wishlist.id
        );
        Ok(())
    }

    // Absent and foreign wishlists both come back as NotFound.
    async fn owned_wishlist(
        &self,
        user: &AuthenticatedUser,
        id: WishlistId,
    ) -> ServiceResult<Wishlist> {
        self.store
            .find_wishlist(user.user_id(), id)
            .await?
            .ok_or(ServiceError::NotFound)
    }
}
