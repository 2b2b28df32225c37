// SurrealDB implementation of the store capabilities.
//
// Every wishlist query carries the owner in its WHERE clause next to the ID;
// there is no path that looks a wishlist up by ID alone.

use surrealdb::RecordId;
use tracing::debug;

use crate::db::Db;
use crate::db::schema::{BookRow, Sequence, SequenceRow, UserRow, WishlistRow};
use crate::model::{Book, NewBook, NewUser, User, Wishlist};
use crate::store::{CredentialStore, StoreError, WishlistStore};
use crate::types::{BookId, UserId, WishlistId};

impl From<surrealdb::Error> for StoreError {
    fn from(e: surrealdb::Error) -> Self {
        let msg = e.to_string();
        // Unique index violations read "Database index `x` already contains ..."
        if msg.contains("already contains") {
            StoreError::Conflict(msg)
        } else {
            StoreError::Backend(msg)
        }
    }
}

/// Store backed by a SurrealDB connection.
#[derive(Clone)]
pub struct SurrealStore {
    db: Db,
}

impl SurrealStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    /// Allocate the next numeric ID for `seq`.
    ///
    /// The counter record is created on first use; the UPSERT is a single
    /// statement, so concurrent callers never receive the same value.
    /// `RETURN value` would parse as `RETURN VALUE <expr>`, so the whole
    /// record comes back instead.
    async fn next_id(&self, seq: Sequence) -> Result<i64, StoreError> {
        let mut res = self
            .db
            .query("UPSERT $seq SET value += 1 RETURN AFTER")
            .bind(("seq", RecordId::from_table_key("sequence", seq.as_str())))
            .await?;

        let rows: Vec<SequenceRow> = res.take(0)?;
        rows.into_iter().next().map(|r| r.value).ok_or_else(|| {
            StoreError::Backend(format!("sequence `{}` returned no value", seq.as_str()))
        })
    }
}

impl CredentialStore for SurrealStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let query = r#"
            SELECT user_id, username, password_hash FROM user
            WHERE username = $username
            LIMIT 1
        "#;

        let mut res = self
            .db
            .query(query)
            .bind(("username", username.to_string()))
            .await?;

        let users: Vec<UserRow> = res.take(0)?;
        Ok(users.into_iter().next().map(User::from))
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let user_id = self.next_id(Sequence::User).await?;

        let query = r#"
            CREATE user CONTENT {
                user_id: $user_id,
                username: $username,
                password_hash: $password_hash
            } RETURN user_id, username, password_hash
        "#;

        let mut res = self
            .db
            .query(query)
            .bind(("user_id", user_id))
            .bind(("username", user.username))
            .bind(("password_hash", user.password_hash))
            .await?;

        let users: Vec<UserRow> = res.take(0)?;
        users
            .into_iter()
            .next()
            .map(User::from)
            .ok_or_else(|| StoreError::Backend("Failed to create user".to_string()))
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut res = self
            .db
            .query("SELECT user_id, username, password_hash FROM user ORDER BY user_id")
            .await?;

        let users: Vec<UserRow> = res.take(0)?;
        Ok(users.into_iter().map(User::from).collect())
    }
}

impl WishlistStore for SurrealStore {
    async fn insert_wishlist(&self, owner: UserId, name: String) -> Result<Wishlist, StoreError> {
        let wishlist_id = self.next_id(Sequence::Wishlist).await?;

        let query = r#"
            CREATE wishlist CONTENT {
                wishlist_id: $wishlist_id,
                user_id: $user_id,
                name: $name
            } RETURN wishlist_id, user_id, name
        "#;

        let mut res = self
            .db
            .query(query)
            .bind(("wishlist_id", wishlist_id))
            .bind(("user_id", owner.get()))
            .bind(("name", name))
            .await?;

        let rows: Vec<WishlistRow> = res.take(0)?;
        rows.into_iter()
            .next()
            .map(Wishlist::from)
            .ok_or_else(|| StoreError::Backend("Failed to create wishlist".to_string()))
    }

    async fn list_wishlists(&self, owner: UserId) -> Result<Vec<Wishlist>, StoreError> {
        let query = r#"
            SELECT wishlist_id, user_id, name FROM wishlist
            WHERE user_id = $user_id
            ORDER BY wishlist_id
        "#;

        let mut res = self
            .db
            .query(query)
            .bind(("user_id", owner.get()))
            .await?;

        let rows: Vec<WishlistRow> = res.take(0)?;
        Ok(rows.into_iter().map(Wishlist::from).collect())
    }

    async fn find_wishlist(
        &self,
        owner: UserId,
        id: WishlistId,
    ) -> Result<Option<Wishlist>, StoreError> {
        let query = r#"
            SELECT wishlist_id, user_id, name FROM wishlist
            WHERE wishlist_id = $wishlist_id
              AND user_id = $user_id
            LIMIT 1
        "#;

        let mut res = self
            .db
            .query(query)
            .bind(("wishlist_id", id.get()))
            .bind(("user_id", owner.get()))
            .await?;

        let rows: Vec<WishlistRow> = res.take(0)?;
        Ok(rows.into_iter().next().map(Wishlist::from))
    }

    async fn delete_wishlist(&self, owner: UserId, id: WishlistId) -> Result<bool, StoreError> {
        // Both deletes carry the owner predicate and commit together.
        let query = r#"
            BEGIN TRANSACTION;
            DELETE book WHERE wishlist_id IN (
                SELECT VALUE wishlist_id FROM wishlist
                WHERE wishlist_id = $wishlist_id
                  AND user_id = $user_id
            );
            DELETE wishlist
                WHERE wishlist_id = $wishlist_id
                  AND user_id = $user_id
                RETURN BEFORE;
            COMMIT TRANSACTION;
        "#;

        let mut res = self
            .db
            .query(query)
            .bind(("wishlist_id", id.get()))
            .bind(("user_id", owner.get()))
            .await?
            .check()?;

        let last = res.num_statements().saturating_sub(1);
        let removed: Vec<WishlistRow> = res.take(last)?;
        debug!(
            "delete_wishlist owner={} id={} removed={}",
            owner,
            id,
            removed.len()
        );

        Ok(!removed.is_empty())
    }

    async fn insert_book(&self, wishlist: WishlistId, book: NewBook) -> Result<Book, StoreError> {
        let book_id = self.next_id(Sequence::Book).await?;

        let query = r#"
            CREATE book CONTENT {
                book_id: $book_id,
                wishlist_id: $wishlist_id,
                title: $title,
                author: $author
            } RETURN book_id, wishlist_id, title, author
        "#;

        let mut res = self
            .db
            .query(query)
            .bind(("book_id", book_id))
            .bind(("wishlist_id", wishlist.get()))
            .bind(("title", book.title))
            .bind(("author", book.author))
            .await?;

        let rows: Vec<BookRow> = res.take(0)?;
        rows.into_iter()
            .next()
            .map(Book::from)
            .ok_or_else(|| StoreError::Backend("Failed to create book".to_string()))
    }

    async fn list_books(&self, wishlist: WishlistId) -> Result<Vec<Book>, StoreError> {
        let query = r#"
            SELECT book_id, wishlist_id, title, author FROM book
            WHERE wishlist_id = $wishlist_id
            ORDER BY book_id
        "#;

        let mut res = self
            .db
            .query(query)
            .bind(("wishlist_id", wishlist.get()))
            .await?;

        let rows: Vec<BookRow> = res.take(0)?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn delete_book(&self, wishlist: WishlistId, id: BookId) -> Result<bool, StoreError> {
        let query = r#"
            DELETE book
                WHERE book_id = $book_id
                  AND wishlist_id = $wishlist_id
                RETURN BEFORE
        "#;

        let mut res = self
            .db
            .query(query)
            .bind(("book_id", id.get()))
            .bind(("wishlist_id", wishlist.get()))
            .await?;

        let removed: Vec<BookRow> = res.take(0)?;
        Ok(!removed.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DatabaseConfig, create_connection, ensure_schema};

    async fn setup_store() -> SurrealStore {
        let config = DatabaseConfig {
            url: "memory".to_string(),
            ..Default::default()
        };
        let db = create_connection(config).await.unwrap();
        ensure_schema(&db).await.unwrap();
        SurrealStore::new(db)
    }

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    fn new_book(title: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: "Anon".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_allocated_sequentially_per_table() {
        let store = setup_store().await;

        let a = store.insert_user(new_user("a")).await.unwrap();
        let b = store.insert_user(new_user("b")).await.unwrap();
        let w = store.insert_wishlist(a.id, "w".to_string()).await.unwrap();
        let first = store.insert_book(w.id, new_book("One")).await.unwrap();
        let second = store.insert_book(w.id, new_book("Two")).await.unwrap();

        assert_eq!(a.id, UserId::new(1));
        assert_eq!(b.id, UserId::new(2));
        assert_eq!(w.id, WishlistId::new(1));
        assert_eq!(first.id, BookId::new(1));
        assert_eq!(second.id, BookId::new(2));
    }

    #[tokio::test]
    async fn test_find_user_by_username() {
        let store = setup_store().await;
        let created = store.insert_user(new_user("alice")).await.unwrap();

        let found = store.find_user_by_username("alice").await.unwrap();
        assert_eq!(found, Some(created));
        assert!(store.find_user_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let store = setup_store().await;
        store.insert_user(new_user("dup")).await.unwrap();

        let result = store.insert_user(new_user("dup")).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_wishlist_requires_owner_match() {
        let store = setup_store().await;
        let owner = UserId::new(1);
        let other = UserId::new(2);
        let w = store.insert_wishlist(owner, "Mine".to_string()).await.unwrap();

        assert_eq!(
            store.find_wishlist(owner, w.id).await.unwrap(),
            Some(w.clone())
        );
        assert!(store.find_wishlist(other, w.id).await.unwrap().is_none());
        assert!(
            store
                .find_wishlist(owner, WishlistId::new(999))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_list_wishlists_filters_by_owner() {
        let store = setup_store().await;
        store.insert_wishlist(UserId::new(1), "a".to_string()).await.unwrap();
        store.insert_wishlist(UserId::new(2), "b".to_string()).await.unwrap();
        store.insert_wishlist(UserId::new(1), "c".to_string()).await.unwrap();

        let names: Vec<String> = store
            .list_wishlists(UserId::new(1))
            .await
            .unwrap()
            .into_iter()
            .map(|w| w.name)
            .collect();
        assert_eq!(names, vec!["a".to_string(), "c".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_wishlist_cascades_books() {
        let store = setup_store().await;
        let owner = UserId::new(1);
        let keep = store.insert_wishlist(owner, "keep".to_string()).await.unwrap();
        let doomed = store.insert_wishlist(owner, "doomed".to_string()).await.unwrap();
        store.insert_book(keep.id, new_book("Kept")).await.unwrap();
        store.insert_book(doomed.id, new_book("Gone")).await.unwrap();

        assert!(store.delete_wishlist(owner, doomed.id).await.unwrap());

        assert!(store.list_books(doomed.id).await.unwrap().is_empty());
        assert_eq!(store.list_books(keep.id).await.unwrap().len(), 1);
        assert_eq!(store.list_wishlists(owner).await.unwrap(), vec![keep]);
    }

    #[tokio::test]
    async fn test_delete_wishlist_of_other_owner_touches_nothing() {
        let store = setup_store().await;
        let owner = UserId::new(1);
        let w = store.insert_wishlist(owner, "safe".to_string()).await.unwrap();
        store.insert_book(w.id, new_book("Safe")).await.unwrap();

        assert!(!store.delete_wishlist(UserId::new(2), w.id).await.unwrap());

        assert_eq!(store.list_wishlists(owner).await.unwrap().len(), 1);
        assert_eq!(store.list_books(w.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_book_requires_wishlist_match() {
        let store = setup_store().await;
        let owner = UserId::new(1);
        let w1 = store.insert_wishlist(owner, "one".to_string()).await.unwrap();
        let w2 = store.insert_wishlist(owner, "two".to_string()).await.unwrap();
        let book = store.insert_book(w1.id, new_book("Dune")).await.unwrap();

        assert!(!store.delete_book(w2.id, book.id).await.unwrap());
        assert_eq!(store.list_books(w1.id).await.unwrap().len(), 1);

        assert!(store.delete_book(w1.id, book.id).await.unwrap());
        assert!(store.list_books(w1.id).await.unwrap().is_empty());
    }
}
