// Mock library API used by the integration tests.
// Serves the same envelope format as the real backend on an ephemeral port.

#![allow(dead_code)]

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use bookdesk::config::Config;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// How an endpoint should misbehave
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    /// `{success: false, message}` with a 500 status
    Envelope,
    /// An HTML error page instead of JSON
    NotJson,
}

#[derive(Default)]
pub struct MockState {
    pub books: Mutex<Vec<Value>>,
    pub users: Mutex<Vec<Value>>,
    pub transactions: Mutex<Vec<Value>>,
    pub failures: Mutex<HashMap<&'static str, Failure>>,
    pub hits: Mutex<Vec<String>>,
    /// Loans and returns succeed without a `message`
    pub terse: AtomicBool,
}

pub struct MockLibrary {
    pub base: String,
    pub state: Arc<MockState>,
}

impl MockLibrary {
    pub async fn start(state: MockState) -> Self {
        let state = Arc::new(state);
        let app = Router::new()
            .route("/api/books", get(all_books))
            .route("/api/books/available", get(available_books))
            .route("/api/books/search", post(search))
            .route("/api/books/loan", post(loan))
            .route("/api/books/return", post(return_book))
            .route("/api/users", get(users))
            .route("/api/users/:id/recommendations", get(recommendations))
            .route("/api/transactions", get(transactions))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock library server");
        let addr = listener
            .local_addr()
            .expect("Failed to get local address of mock library server");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock library server failed");
        });

        Self {
            base: format!("http://{addr}/api"),
            state,
        }
    }

    pub async fn with_fixture() -> Self {
        Self::start(fixture()).await
    }

    /// Client configuration pointing at this server, with a short debounce window
    pub fn config(&self) -> Config {
        Config {
            api_base: self.base.clone(),
            search_debounce_ms: 100,
            ..Config::default()
        }
    }

    pub fn fail(&self, endpoint: &'static str, failure: Failure) {
        self.state.failures.lock().unwrap().insert(endpoint, failure);
    }

    pub fn recover(&self, endpoint: &'static str) {
        self.state.failures.lock().unwrap().remove(endpoint);
    }

    pub fn terse_confirmations(&self) {
        self.state.terse.store(true, Ordering::SeqCst);
    }

    pub fn hits(&self, endpoint: &str) -> usize {
        self.state
            .hits
            .lock()
            .unwrap()
            .iter()
            .filter(|hit| hit.as_str() == endpoint)
            .count()
    }

    /// Titles received by the search endpoint, in arrival order
    pub fn searches(&self) -> Vec<String> {
        self.state
            .hits
            .lock()
            .unwrap()
            .iter()
            .filter_map(|hit| hit.strip_prefix("search:").map(str::to_string))
            .collect()
    }
}

fn book(isbn: &str, title: &str, author: &str, year: i32, genre: &str, available: bool) -> Value {
    json!({
        "isbn": isbn,
        "title": title,
        "authors": [author],
        "publicationYear": year,
        "genre": genre,
        "available": available,
    })
}

/// 10 books (6 available), 4 users, 2 transactions
pub fn fixture() -> MockState {
    let books = vec![
        book("978-0441013593", "Dune", "Frank Herbert", 1965, "Science Fiction", true),
        book("978-0451524935", "1984", "George Orwell", 1949, "Dystopia", false),
        book("978-2070612758", "Le Petit Prince", "Antoine de Saint-Exupéry", 1943, "Tale", true),
        book("978-0061120084", "To Kill a Mockingbird", "Harper Lee", 1960, "Novel", true),
        book("978-0141439518", "Pride and Prejudice", "Jane Austen", 1813, "Romance", false),
        book("978-0547928227", "The Hobbit", "J.R.R. Tolkien", 1937, "Fantasy", true),
        book("978-0316769488", "The Catcher in the Rye", "J.D. Salinger", 1951, "Novel", false),
        book("978-0060850524", "Brave New World", "Aldous Huxley", 1932, "Dystopia", true),
        book("978-0743273565", "The Great Gatsby", "F. Scott Fitzgerald", 1925, "Novel", false),
        book("978-0553293357", "Foundation", "Isaac Asimov", 1951, "Science Fiction", true),
    ];
    let users = vec![
        json!({"id": "U001", "name": "Alice Martin", "email": "alice@example.com"}),
        json!({"id": "U002", "name": "Bruno Petit"}),
        json!({"id": "U003", "name": "Chloé Durand"}),
        json!({"id": "U004", "name": "David Leroy", "borrowedBooks": []}),
    ];
    let transactions = vec![
        json!({"id": 1, "userId": "U002", "bookId": "978-0451524935", "type": "loan", "date": "2024-03-01T09:00:00Z"}),
        json!({"id": 2, "userId": "U003", "bookId": "978-0141439518", "type": "loan", "date": "2024-03-02T10:30:00Z"}),
    ];

    MockState {
        books: Mutex::new(books),
        users: Mutex::new(users),
        transactions: Mutex::new(transactions),
        ..MockState::default()
    }
}

fn respond(state: &MockState, endpoint: &'static str, data: impl FnOnce() -> Value) -> Response {
    state.hits.lock().unwrap().push(endpoint.to_string());
    let failure = state.failures.lock().unwrap().get(endpoint).copied();
    match failure {
        Some(Failure::Envelope) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false, "message": format!("{endpoint} unavailable")})),
        )
            .into_response(),
        Some(Failure::NotJson) => {
            (StatusCode::BAD_GATEWAY, "<html>502 Bad Gateway</html>").into_response()
        }
        None => Json(json!({"success": true, "data": data()})).into_response(),
    }
}

async fn all_books(State(state): State<Arc<MockState>>) -> Response {
    respond(&state, "books", || Value::Array(state.books.lock().unwrap().clone()))
}

async fn available_books(State(state): State<Arc<MockState>>) -> Response {
    respond(&state, "available", || {
        Value::Array(
            state
                .books
                .lock()
                .unwrap()
                .iter()
                .filter(|book| book["available"] == json!(true))
                .cloned()
                .collect(),
        )
    })
}

async fn search(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let title = body["title"].as_str().unwrap_or_default().to_string();
    state.hits.lock().unwrap().push(format!("search:{title}"));

    // "slow <term>" answers late, to exercise out-of-order responses
    let term = match title.strip_prefix("slow ") {
        Some(rest) => {
            tokio::time::sleep(Duration::from_millis(300)).await;
            rest.to_lowercase()
        }
        None => title.to_lowercase(),
    };

    respond(&state, "search", || {
        Value::Array(
            state
                .books
                .lock()
                .unwrap()
                .iter()
                .filter(|book| {
                    book["title"]
                        .as_str()
                        .is_some_and(|t| t.to_lowercase().contains(&term))
                })
                .cloned()
                .collect(),
        )
    })
}

fn set_availability(state: &MockState, body: &Value, kind: &str, available: bool) -> Response {
    let book_id = body["bookId"].as_str().unwrap_or_default();
    let user_id = body["userId"].as_str().unwrap_or_default();

    let changed = {
        let mut books = state.books.lock().unwrap();
        match books
            .iter_mut()
            .find(|book| book["isbn"] == json!(book_id) && book["available"] == json!(!available))
        {
            Some(book) => {
                book["available"] = json!(available);
                true
            }
            None => false,
        }
    };

    if !changed {
        let message = if available {
            "This book is not on loan"
        } else {
            "Book not available"
        };
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "message": message})),
        )
            .into_response();
    }

    let mut transactions = state.transactions.lock().unwrap();
    let id = transactions.len() + 1;
    transactions.push(json!({"id": id, "userId": user_id, "bookId": book_id, "type": kind}));

    if state.terse.load(Ordering::SeqCst) {
        return Json(json!({"success": true})).into_response();
    }
    let message = if available {
        "Book returned"
    } else {
        "Book borrowed"
    };
    Json(json!({"success": true, "message": message})).into_response()
}

async fn loan(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.hits.lock().unwrap().push("loan".to_string());
    set_availability(&state, &body, "loan", false)
}

async fn return_book(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.hits.lock().unwrap().push("return".to_string());
    set_availability(&state, &body, "return", true)
}

async fn users(State(state): State<Arc<MockState>>) -> Response {
    respond(&state, "users", || Value::Array(state.users.lock().unwrap().clone()))
}

async fn recommendations(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
) -> Response {
    let known = state
        .users
        .lock()
        .unwrap()
        .iter()
        .any(|user| user["id"] == json!(id));
    if !known {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "User not found"})),
        )
            .into_response();
    }

    respond(&state, "recommendations", || {
        Value::Array(
            state
                .books
                .lock()
                .unwrap()
                .iter()
                .filter(|book| book["available"] == json!(true))
                .take(2)
                .cloned()
                .collect(),
        )
    })
}

async fn transactions(State(state): State<Arc<MockState>>) -> Response {
    respond(&state, "transactions", || {
        Value::Array(state.transactions.lock().unwrap().clone())
    })
}
