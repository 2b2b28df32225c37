// HTTP surface of the wishlist service

mod error;
mod extractors;
mod handlers;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthConfig, AuthExtractor, require_auth};
use crate::db::SurrealStore;
use crate::search::BookSearchClient;
use crate::service::{UserService, WishlistService};

pub use handlers::{LoginResponse, health_check};

/// Shared state handed to every handler.
///
/// All members are cheap to clone and safe for concurrent use; there is no
/// lock around the store.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService<SurrealStore>,
    pub wishlists: WishlistService<SurrealStore>,
    pub search: BookSearchClient,
    pub auth: Arc<AuthExtractor>,
}

impl AppState {
    pub fn new(store: SurrealStore, auth: &AuthConfig, search: BookSearchClient) -> Self {
        Self {
            users: UserService::new(store.clone(), auth.issuer()),
            wishlists: WishlistService::new(store),
            search,
            auth: Arc::new(AuthExtractor::new(auth.verifier())),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/wishlists",
            post(handlers::create_wishlist).get(handlers::list_wishlists),
        )
        .route("/wishlists/{id}", delete(handlers::delete_wishlist))
        .route(
            "/wishlists/{id}/books",
            post(handlers::add_book).get(handlers::list_books),
        )
        .route(
            "/wishlists/{id}/books/{book_id}",
            delete(handlers::remove_book),
        )
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            require_auth,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/users/register", post(handlers::register))
        .route("/users/login", post(handlers::login))
        .route("/books/search", get(handlers::search_books))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
