//! Business operations, written against the store capability traits.
//!
//! Every wishlist and book operation takes the caller's [`AuthenticatedUser`]
//! and scopes its store queries by that identity.
//!
//! [`AuthenticatedUser`]: crate::auth::AuthenticatedUser

mod users;
mod wishlists;

pub use users::UserService;
pub use wishlists::WishlistService;
