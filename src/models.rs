use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A book as served by the library API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub isbn: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub genre: String,
    pub available: bool,
}

/// A library member. Fields the client does not use are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A loan or return record. Only counted by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_id: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Wrapper shared by every API response
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /books/search`
#[derive(Debug, Serialize)]
pub struct SearchRequest<'a> {
    pub title: &'a str,
}

/// Body of `POST /books/loan` and `POST /books/return`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequest<'a> {
    pub user_id: &'a str,
    pub book_id: &'a str,
}

/// Aggregate counters shown above the book list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_books: usize,
    pub available_books: usize,
    pub total_users: usize,
    pub total_transactions: usize,
}

impl Stats {
    /// Computes the counters from the three full listings
    #[must_use]
    pub fn from_listings(books: &[Book], users: &[User], transactions: &[Transaction]) -> Self {
        Self {
            total_books: books.len(),
            available_books: books.iter().filter(|book| book.available).count(),
            total_users: users.len(),
            total_transactions: transactions.len(),
        }
    }
}
