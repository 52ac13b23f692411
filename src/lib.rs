//! # Bookdesk Library
//!
//! This library is a client for a library-management REST API. It keeps a view of
//! the catalogue, the members and a few aggregate statistics, and drives that view
//! from user actions: typing a search, borrowing and returning books, asking for
//! recommendations.
//!
//! ## Overview
//!
//! - `throttle`: debounces search typing so only settled input reaches the API
//! - `query`: decides whether a settled query searches, resets or does nothing
//! - `app`: orchestrates requests, fan-out refreshes and alerts
//! - `api`: typed wrappers over the REST endpoints and their response envelope
//! - `view`: the injectable view state, with per-slot request epochs
//! - `alerts`: dismissible, auto-expiring notifications
//! - `render`: plain-text rendering of the view state
//! - `cli`: line commands of the terminal front end
//! - `config`: configuration loading and validation
//! - `error`: the crate error type
//! - `utils`: small formatting helpers
//!
//! ## Getting Started
//!
//! ```no_run
//! use bookdesk::{app::LibraryApp, config::Config, render::render, view::with_view};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), bookdesk::error::BookdeskError> {
//!     let config = Config::load(None)?;
//!     let app = LibraryApp::from_config(&config)?;
//!
//!     app.initial_load().await;
//!     app.on_search_input("dune");
//!
//!     let text = with_view(app.view(), |view| render(view));
//!     println!("{text}");
//!     Ok(())
//! }
//! ```

/// Custom error types module
///
/// Defines the `BookdeskError` enum shared by the API client, configuration loading
/// and the orchestrator.
pub mod error;

/// Configuration management module
///
/// Loads `config.json5`, fills in defaults and validates the API base URL.
pub mod config;

/// Wire types of the library API
pub mod models;

/// REST client module
///
/// One method per endpoint. Responses are unwrapped from their envelope so callers
/// only see data or an error.
pub mod api;

/// Input throttling
///
/// A debouncer holding at most one pending delayed invocation.
pub mod throttle;

/// Search policy applied once typing settles
pub mod query;

/// Alert board
pub mod alerts;

/// View state module
///
/// Holds the last results of every fetch, the selected user, the search field and
/// the alerts. Fetches carry epochs so late responses cannot overwrite newer ones.
pub mod view;

/// Orchestration module
///
/// Runs user actions against the API: debounced search, loans and returns with their
/// follow-up refreshes, and the start-up fan-out.
pub mod app;

/// Text rendering of the view state
pub mod render;

/// Command parsing and dispatch for the terminal front end
pub mod cli;

/// Utility functions module
///
/// Date formatting and text helpers used by the renderer.
pub mod utils;
