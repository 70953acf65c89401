use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{expect_id_shape, BookStore, StoreError, StoreResult};
use crate::modules::books::models::{self, Book};

/// Ordered, process-local book storage.
///
/// Insertion order is listing order. Ids are taken from the client as-is and are not
/// checked for uniqueness; lookups resolve to the first book whose id matches.
#[derive(Debug, Default)]
pub struct InMemoryBookStore {
    books: RwLock<Vec<Book>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            books: RwLock::new(books),
        }
    }

    /// Store pre-filled with [`models::sample_books`]
    pub fn seeded() -> Self {
        Self::with_books(models::sample_books())
    }
}

fn position(books: &[Book], id: &str) -> StoreResult<usize> {
    books
        .iter()
        .position(|book| book.id.to_string() == id)
        .ok_or(StoreError::NotFound)
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> StoreResult<Vec<Book>> {
        Ok(self.books.read().await.clone())
    }

    async fn create(&self, book: Book) -> StoreResult<Book> {
        expect_id_shape(&book.id, false)?;
        let mut books = self.books.write().await;
        books.push(book.clone());
        tracing::debug!(backend = "memory", book_id = %book.id, total = books.len(), "book stored");
        Ok(book)
    }

    async fn get(&self, id: &str) -> StoreResult<Book> {
        let books = self.books.read().await;
        let index = position(&books, id)?;
        Ok(books[index].clone())
    }

    // The body's id is stored verbatim, even when it differs from `id`.
    async fn update(&self, id: &str, book: Book) -> StoreResult<Book> {
        expect_id_shape(&book.id, false)?;
        let mut books = self.books.write().await;
        let index = position(&books, id)?;
        books[index] = book.clone();
        tracing::debug!(backend = "memory", book_id = %id, "book replaced");
        Ok(book)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut books = self.books.write().await;
        let index = position(&books, id)?;
        books.remove(index);
        tracing::debug!(backend = "memory", book_id = %id, total = books.len(), "book removed");
        Ok(())
    }
}
