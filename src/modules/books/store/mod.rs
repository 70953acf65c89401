//! Book storage behind one trait, with an in-memory and a PostgreSQL variant.

mod memory;
mod postgres;

pub use memory::InMemoryBookStore;
pub use postgres::PostgresBookStore;

use async_trait::async_trait;
use thiserror::Error;

use super::models::{Book, BookId};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("book not found")]
    NotFound,

    #[error("invalid book id '{0}'")]
    InvalidIdentifier(String),

    /// The body's id has the wrong JSON type for this store
    #[error("{0}")]
    MalformedInput(String),

    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence contract for books.
///
/// `id` arguments are the raw path segment; each store interprets it in its own id space
/// and reports [`StoreError::InvalidIdentifier`] when it cannot.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Short backend name for logs
    fn backend(&self) -> &'static str;

    /// Every stored book. An empty store yields an empty list.
    async fn list(&self) -> StoreResult<Vec<Book>>;

    /// Store a book and return it with its resolved id.
    async fn create(&self, book: Book) -> StoreResult<Book>;

    async fn get(&self, id: &str) -> StoreResult<Book>;

    /// Replace every field of the book stored under `id`.
    async fn update(&self, id: &str, book: Book) -> StoreResult<Book>;

    async fn delete(&self, id: &str) -> StoreResult<()>;
}

/// Reject a body id that is neither absent nor of the store's id type.
pub(crate) fn expect_id_shape(id: &BookId, serial: bool) -> StoreResult<()> {
    match (id, serial) {
        (BookId::Serial(_), false) => Err(StoreError::MalformedInput(
            "book id must be a string".to_string(),
        )),
        (BookId::Key(key), true) if !key.is_empty() => Err(StoreError::MalformedInput(
            "book id must be an integer".to_string(),
        )),
        _ => Ok(()),
    }
}
