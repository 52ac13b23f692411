//! Plain-text rendering of the view state
//!
//! Rendering is a pure function of [`ViewState`]: nothing here talks to the API
//! or mutates the view.

use crate::alerts::AlertKind;
use crate::models::{Book, Stats, Transaction};
use crate::utils::{capitalize_first, format_date};
use crate::view::ViewState;
use std::fmt::Write;

/// Renders the whole view: alerts, statistics, then the book list
#[must_use]
pub fn render(view: &ViewState) -> String {
    let mut out = String::new();

    for alert in view.alerts.active() {
        let marker = match alert.kind {
            AlertKind::Success => "ok",
            AlertKind::Error => "!!",
        };
        let _ = writeln!(out, "[{marker}] #{} {}", alert.id, alert.message);
    }

    if let Some(stats) = &view.stats {
        out.push_str(&render_stats(stats));
    }

    if let Some(user) = &view.user_id {
        let _ = writeln!(out, "Acting as user {user}");
    }

    if view.loading {
        out.push_str("Loading...\n");
    }

    if let Some(shown) = &view.books {
        let _ = writeln!(
            out,
            "== {} ({}) ==",
            shown.listing.heading(),
            shown.books.len()
        );
        if shown.books.is_empty() {
            out.push_str("No books found\n");
        }
        for book in &shown.books {
            out.push_str(&render_book(book));
        }
    }

    out
}

#[must_use]
pub fn render_stats(stats: &Stats) -> String {
    format!(
        "Books: {} | Available: {} | Users: {} | Transactions: {}\n",
        stats.total_books, stats.available_books, stats.total_users, stats.total_transactions
    )
}

/// One book card, with the action that applies to it
#[must_use]
pub fn render_book(book: &Book) -> String {
    let year = book
        .publication_year
        .map_or_else(|| "?".to_string(), |year| year.to_string());
    let (badge, action) = if book.available {
        ("Available", "loan")
    } else {
        ("On loan", "return")
    };

    format!(
        "- {title}\n    Author(s): {authors}\n    Year: {year}  Genre: {genre}  ISBN: {isbn}\n    [{badge}] > {action} {isbn}\n",
        title = book.title,
        authors = book.authors.join(", "),
        genre = book.genre,
        isbn = book.isbn,
    )
}

/// One line of the transaction history
#[must_use]
pub fn render_transaction(transaction: &Transaction) -> String {
    let kind = transaction
        .kind
        .as_deref()
        .map_or_else(|| "Transaction".to_string(), capitalize_first);
    let date = transaction.date.as_deref().map(format_date).unwrap_or_default();
    format!(
        "{kind} {date} user={} book={}\n",
        transaction.user_id.as_deref().unwrap_or("?"),
        transaction.book_id.as_deref().unwrap_or("?"),
    )
}
