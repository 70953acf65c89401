//! HTTP handlers translating requests into [`BookStore`] calls.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookshelf_http::error::AppError;

use super::models::{Book, StatusMessage};
use super::store::{BookStore, StoreError};

pub type SharedStore = Arc<dyn BookStore>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::not_found("book not found"),
            StoreError::InvalidIdentifier(_) => AppError::bad_request("invalid book id"),
            StoreError::MalformedInput(message) => {
                AppError::bad_request_with_code(message, "malformed_body")
            }
            StoreError::Storage(source) => AppError::Internal(anyhow::Error::new(source)),
        }
    }
}

/// `/` and `/{id}` relative to the module mount point
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(store)
}

async fn list_books(State(store): State<SharedStore>) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(store.list().await?))
}

async fn create_book(
    State(store): State<SharedStore>,
    payload: Result<Json<Book>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let Json(book) = payload?;
    let created = store.create(book).await?;
    tracing::info!(backend = store.backend(), book_id = %created.id, "book created");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_book(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(store.get(&id).await?))
}

async fn update_book(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    payload: Result<Json<Book>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let Json(book) = payload?;
    let updated = store.update(&id, book).await?;
    tracing::info!(backend = store.backend(), book_id = %id, "book updated");
    Ok(Json(updated))
}

async fn delete_book(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<StatusMessage>, AppError> {
    store.delete(&id).await?;
    tracing::info!(backend = store.backend(), book_id = %id, "book deleted");
    Ok(Json(StatusMessage::new("book deleted successfully")))
}
