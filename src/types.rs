//! NewType wrappers for strong typing throughout the service.
//!
//! These types prevent accidental mixing of semantically different numeric
//! identifiers (e.g., passing a book ID where a wishlist ID is expected).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate a numeric NewType identifier with standard trait implementations.
macro_rules! newtype_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new instance.
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Get the raw numeric value.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(v: i64) -> Self {
                Self(v)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

newtype_id!(
    /// Identifier of a registered user.
    ///
    /// This is the value carried in the `user_id` claim of issued tokens and
    /// the owner key of every wishlist.
    UserId
);

newtype_id!(
    /// Identifier of a wishlist.
    WishlistId
);

newtype_id!(
    /// Identifier of a book stored inside a wishlist.
    BookId
);
