use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::AppState;
use crate::api::extractors::{extract_json, extract_path};
use crate::auth::AuthenticatedUser;
use crate::error::ServiceError;
use crate::model::{Book, UserSummary, Wishlist};
use crate::search::{SearchError, SearchResult};
use crate::types::{BookId, WishlistId};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateWishlistRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddBookRequest {
    pub title: String,
    pub author: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

pub async fn health_check() -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339()
    }))
}

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserSummary>), ServiceError> {
    let payload = extract_json(body)?;
    let user = state
        .users
        .register(&payload.username, &payload.password)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ServiceError> {
    let payload = extract_json(body)?;
    let issued = state
        .users
        .authenticate(&payload.username, &payload.password)
        .await?;
    Ok(Json(LoginResponse {
        access_token: issued.token,
        token_type: "Bearer".to_string(),
        expires_at: issued.expires_at,
    }))
}

pub async fn create_wishlist(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: Result<Json<CreateWishlistRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Wishlist>), ServiceError> {
    let payload = extract_json(body)?;
    let wishlist = state.wishlists.create_wishlist(&user, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(wishlist)))
}

pub async fn list_wishlists(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Wishlist>>, ServiceError> {
    Ok(Json(state.wishlists.list_wishlists(&user).await?))
}

pub async fn delete_wishlist(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    path: Result<Path<WishlistId>, PathRejection>,
) -> Result<StatusCode, ServiceError> {
    let id = extract_path(path)?;
    state.wishlists.delete_wishlist(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_book(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    path: Result<Path<WishlistId>, PathRejection>,
    body: Result<Json<AddBookRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), ServiceError> {
    let id = extract_path(path)?;
    let payload = extract_json(body)?;
    let book = state
        .wishlists
        .add_book(&user, id, &payload.title, &payload.author)
        .await?;
    Ok((StatusCode::CREATED, Json(book)))
}

pub async fn list_books(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    path: Result<Path<WishlistId>, PathRejection>,
) -> Result<Json<Vec<Book>>, ServiceError> {
    let id = extract_path(path)?;
    Ok(Json(state.wishlists.list_books(&user, id).await?))
}

pub async fn remove_book(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    path: Result<Path<(WishlistId, BookId)>, PathRejection>,
) -> Result<StatusCode, ServiceError> {
    let (id, book_id) = extract_path(path)?;
    state.wishlists.remove_book(&user, id, book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn search_books(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchResult>>, SearchError> {
    let query = params.q.unwrap_or_default();
    Ok(Json(state.search.search(&query).await?))
}
