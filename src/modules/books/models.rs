use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a book.
///
/// The PostgreSQL store assigns serial integers; the in-memory store keeps whatever
/// string the client supplied. Both serialize as the bare JSON value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookId {
    Serial(i32),
    Key(String),
}

impl Default for BookId {
    fn default() -> Self {
        BookId::Key(String::new())
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookId::Serial(id) => write!(f, "{}", id),
            BookId::Key(key) => f.write_str(key),
        }
    }
}

impl From<i32> for BookId {
    fn from(id: i32) -> Self {
        BookId::Serial(id)
    }
}

impl From<&str> for BookId {
    fn from(key: &str) -> Self {
        BookId::Key(key.to_string())
    }
}

/// `null` reads as an absent id.
fn id_or_default<'de, D>(deserializer: D) -> Result<BookId, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BookId>::deserialize(deserializer)?.unwrap_or_default())
}

/// A book in the catalogue.
///
/// Absent fields decode to their zero value; nothing is validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    /// Optional on input; stores decide whether to keep or assign it
    #[serde(deserialize_with = "id_or_default")]
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub price: f64,
}

impl Book {
    pub fn new(
        id: impl Into<BookId>,
        title: impl Into<String>,
        author: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            price,
        }
    }
}

/// Plain confirmation body, e.g. after a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

impl StatusMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Books the in-memory store starts with when seeding is enabled.
pub fn sample_books() -> Vec<Book> {
    vec![
        Book::new("1", "The Lord of the Rings", "J.R.R. Tolkien", 25.99),
        Book::new("2", "Pride and Prejudice", "Jane Austen", 12.50),
        Book::new("3", "1984", "George Orwell", 15.00),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_id_defaults_to_empty_key() {
        let book: Book = serde_json::from_value(json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "price": 18.99
        }))
        .unwrap();

        assert_eq!(book.id, BookId::Key(String::new()));
        assert_eq!(book.title, "Dune");
    }

    #[test]
    fn numeric_and_string_ids_keep_their_json_shape() {
        let serial = serde_json::to_value(Book::new(7, "a", "b", 1.0)).unwrap();
        assert_eq!(serial["id"], json!(7));

        let key = serde_json::to_value(Book::new("7", "a", "b", 1.0)).unwrap();
        assert_eq!(key["id"], json!("7"));
    }

    #[test]
    fn absent_fields_decode_to_zero_values() {
        let book: Book = serde_json::from_value(json!({"title": "Dune"})).unwrap();
        assert_eq!(
            book,
            Book {
                id: BookId::default(),
                title: "Dune".to_string(),
                author: String::new(),
                price: 0.0,
            }
        );
    }

    #[test]
    fn null_id_reads_as_absent() {
        let book: Book = serde_json::from_value(json!({
            "id": null,
            "title": "Dune",
            "author": "Frank Herbert",
            "price": 18.99
        }))
        .unwrap();
        assert_eq!(book.id, BookId::default());
    }

    #[test]
    fn wrongly_typed_field_is_rejected() {
        let result: Result<Book, _> = serde_json::from_value(json!({"title": 12}));
        assert!(result.is_err());
    }
}
