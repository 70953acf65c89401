use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use super::{expect_id_shape, BookStore, StoreError, StoreResult};
use crate::modules::books::models::{Book, BookId};

// `price` is NUMERIC(10, 2) in the table and f64 on the wire; the casts keep
// the conversion inside PostgreSQL.
const SELECT_ALL: &str = "SELECT id, title, author, price::FLOAT8 AS price FROM books";
const SELECT_ONE: &str =
    "SELECT id, title, author, price::FLOAT8 AS price FROM books WHERE id = $1";
const INSERT: &str =
    "INSERT INTO books (title, author, price) VALUES ($1, $2, $3::FLOAT8) RETURNING id";
const UPDATE: &str =
    "UPDATE books SET title = $1, author = $2, price = $3::FLOAT8 WHERE id = $4";
const DELETE: &str = "DELETE FROM books WHERE id = $1";

#[derive(Debug, FromRow)]
struct BookRow {
    id: i32,
    title: String,
    author: String,
    price: f64,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: BookId::Serial(row.id),
            title: row.title,
            author: row.author,
            price: row.price,
        }
    }
}

/// Parse a path segment into the table's serial key.
pub(crate) fn parse_id(id: &str) -> StoreResult<i32> {
    id.parse::<i32>()
        .map_err(|_| StoreError::InvalidIdentifier(id.to_string()))
}

/// Book storage in the `books` table.
///
/// Ids are generated by the table. Every operation is one autocommit statement;
/// listing order is whatever PostgreSQL returns.
#[derive(Debug, Clone)]
pub struct PostgresBookStore {
    pool: PgPool,
}

impl PostgresBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for PostgresBookStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn list(&self) -> StoreResult<Vec<Book>> {
        let rows: Vec<BookRow> = sqlx::query_as(SELECT_ALL).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn create(&self, mut book: Book) -> StoreResult<Book> {
        expect_id_shape(&book.id, true)?;
        let id: i32 = sqlx::query_scalar(INSERT)
            .bind(&book.title)
            .bind(&book.author)
            .bind(book.price)
            .fetch_one(&self.pool)
            .await?;

        book.id = BookId::Serial(id);
        tracing::debug!(backend = "postgres", book_id = id, "book inserted");
        Ok(book)
    }

    async fn get(&self, id: &str) -> StoreResult<Book> {
        let id = parse_id(id)?;
        let row: Option<BookRow> = sqlx::query_as(SELECT_ONE)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Book::from).ok_or(StoreError::NotFound)
    }

    async fn update(&self, id: &str, mut book: Book) -> StoreResult<Book> {
        let id = parse_id(id)?;
        expect_id_shape(&book.id, true)?;
        book.id = BookId::Serial(id);

        let result = sqlx::query(UPDATE)
            .bind(&book.title)
            .bind(&book.author)
            .bind(book.price)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        tracing::debug!(backend = "postgres", book_id = id, "book updated");
        Ok(book)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let id = parse_id(id)?;
        let result = sqlx::query(DELETE).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        tracing::debug!(backend = "postgres", book_id = id, "book deleted");
        Ok(())
    }
}
