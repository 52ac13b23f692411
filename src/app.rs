//! Orchestration of user actions against the library API
//!
//! [`LibraryApp`] turns user intents into API calls and writes the results into the
//! shared [`ViewState`](crate::view::ViewState). Its public operations never return
//! errors: failures are logged and surfaced as alerts, and the previous view stays
//! on screen.

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::{BookdeskError, Result};
use crate::models::{Stats, Transaction};
use crate::query::SearchIntent;
use crate::throttle::Debouncer;
use crate::view::{with_view, Listing, SharedView, Slot, ViewState};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const CONNECTION_ERROR: &str = "Could not connect to the server";

/// Refreshes requested after a successful loan or return
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshEffects {
    /// Book list to reload, if any
    pub refresh_list: Option<Listing>,
    /// Whether to recompute the statistics
    pub refresh_stats: bool,
}

impl RefreshEffects {
    /// After a loan the available list is what changed
    #[must_use]
    pub fn after_loan() -> Self {
        Self {
            refresh_list: Some(Listing::Available),
            refresh_stats: true,
        }
    }

    /// After a return the full list shows the book coming back
    #[must_use]
    pub fn after_return() -> Self {
        Self {
            refresh_list: Some(Listing::All),
            refresh_stats: true,
        }
    }
}

/// A mutating action on a book, with its user-facing wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mutation {
    Loan,
    Return,
}

impl Mutation {
    /// Shown when the server confirms without a message
    fn confirmation(self) -> &'static str {
        match self {
            Mutation::Loan => "Book borrowed",
            Mutation::Return => "Book returned",
        }
    }

    fn fallback(self) -> &'static str {
        match self {
            Mutation::Loan => "Failed to borrow the book",
            Mutation::Return => "Failed to return the book",
        }
    }

    fn effects(self) -> RefreshEffects {
        match self {
            Mutation::Loan => RefreshEffects::after_loan(),
            Mutation::Return => RefreshEffects::after_return(),
        }
    }
}

/// Which refreshes of an [`RefreshEffects`] ran and succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub list_refreshed: bool,
    pub stats_refreshed: bool,
}

/// Outcome of the start-up fan-out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialLoad {
    pub users: bool,
    pub books: bool,
    pub stats: bool,
}

impl InitialLoad {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.users && self.books && self.stats
    }
}

/// Drives the view state from user actions
#[derive(Debug, Clone)]
pub struct LibraryApp {
    api: ApiClient,
    view: SharedView,
    search_input: Arc<Debouncer>,
    min_search_len: usize,
}

impl LibraryApp {
    /// Builds the client and an empty view from the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built
    pub fn from_config(config: &Config) -> Result<Self> {
        let api = ApiClient::new(config)?;
        let view = ViewState::shared(config.alert_ttl());
        if let Some(user) = &config.default_user {
            with_view(&view, |view| view.user_id = Some(user.clone()));
        }
        Ok(Self::new(api, view, config))
    }

    /// Wires an existing client and view together
    #[must_use]
    pub fn new(api: ApiClient, view: SharedView, config: &Config) -> Self {
        Self {
            api,
            view,
            search_input: Arc::new(Debouncer::new(config.search_debounce())),
            min_search_len: config.min_search_len,
        }
    }

    #[must_use]
    pub fn view(&self) -> &SharedView {
        &self.view
    }

    /// Copy of the app for work the debouncer runs later. It shares the client and
    /// the view but not the search debouncer, so dropping the app still drops the
    /// waiting search.
    fn detached(&self) -> Self {
        Self {
            api: self.api.clone(),
            view: self.view.clone(),
            search_input: Arc::new(Debouncer::new(self.search_input.window())),
            min_search_len: self.min_search_len,
        }
    }

    fn update<R>(&self, f: impl FnOnce(&mut ViewState) -> R) -> R {
        with_view(&self.view, f)
    }

    fn alert_error(&self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.update(|view| view.alerts.error(message));
    }

    fn alert_failure(&self, err: &BookdeskError, fallback: &str) {
        error!("{fallback}: {err}");
        let message = match err {
            BookdeskError::Transport(_) => CONNECTION_ERROR,
            _ => fallback,
        };
        self.update(|view| view.alerts.error(message));
    }

    /// Selects the user acting on loans, returns and recommendations
    pub fn set_user(&self, user_id: &str) {
        let user_id = user_id.trim();
        self.update(|view| {
            view.user_id = (!user_id.is_empty()).then(|| user_id.to_string());
        });
    }

    fn require_user(&self) -> Option<String> {
        let user = self.update(|view| view.user_id.clone());
        if user.is_none() {
            self.alert_error("Please enter your user ID");
        }
        user
    }

    /// Dismisses an alert before it expires
    pub fn dismiss_alert(&self, id: u64) -> bool {
        self.update(|view| view.alerts.dismiss(id))
    }

    /// Start-up fan-out: users, available books and statistics, concurrently.
    ///
    /// Waits for all three to settle. Whatever loaded stays on screen; any failure
    /// raises a single alert.
    pub async fn initial_load(&self) -> InitialLoad {
        info!("Loading initial data");
        let (users, books, stats) = tokio::join!(
            self.fetch_users(),
            self.fetch_listing(Listing::Available),
            self.fetch_stats(),
        );

        let outcome = InitialLoad {
            users: log_outcome("users", users.map(|_| ())),
            books: log_outcome("available books", books.map(|_| ())),
            stats: log_outcome("statistics", stats),
        };

        if !outcome.is_complete() {
            self.alert_error("Failed to load initial data");
        }
        outcome
    }

    /// Runs the requested refreshes concurrently. Neither waits on nor undoes the other.
    pub async fn after_mutation(&self, effects: RefreshEffects) -> RefreshOutcome {
        let RefreshEffects {
            refresh_list,
            refresh_stats,
        } = effects;

        let list = async move {
            match refresh_list {
                Some(listing) => self.load_listing(listing).await.is_some(),
                None => false,
            }
        };
        let stats = async move { refresh_stats && self.load_stats().await };

        let (list_refreshed, stats_refreshed) = tokio::join!(list, stats);
        RefreshOutcome {
            list_refreshed,
            stats_refreshed,
        }
    }

    /// Replaces the search field without searching
    pub fn set_query(&self, raw: &str) {
        self.update(|view| view.query = raw.to_string());
    }

    /// Records a keystroke in the search field and schedules the debounced search
    pub fn on_search_input(&self, raw: &str) {
        self.set_query(raw);

        let app = self.detached();
        self.search_input.schedule(move || async move {
            let query = app.update(|view| view.query.clone());
            match SearchIntent::classify(&query, app.min_search_len) {
                SearchIntent::Search(term) => {
                    app.search(&term).await;
                }
                SearchIntent::Reset => {
                    app.load_available_books().await;
                }
                SearchIntent::Ignore => debug!("Query too short to search: {query:?}"),
            }
        });
    }

    /// Explicit submission of the search field. Replaces any debounced search still
    /// waiting, since both would read the same field.
    pub async fn submit_search(&self) {
        self.search_input.cancel();
        let query = self.update(|view| view.query.clone());
        self.search(&query).await;
    }

    /// Searches by title and shows the results
    pub async fn search(&self, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            self.alert_error("Please enter a search term");
            return;
        }

        if self.load_listing(Listing::Search(term.to_string())).await == Some(0) {
            self.alert_error("No books found for this search");
        }
    }

    /// Shows the recommendations for the selected user
    pub async fn recommendations(&self) {
        let Some(user_id) = self.require_user() else {
            return;
        };

        if self.load_listing(Listing::Recommendations(user_id)).await == Some(0) {
            self.alert_error("No recommendations available");
        }
    }

    pub async fn load_all_books(&self) -> bool {
        self.load_listing(Listing::All).await.is_some()
    }

    pub async fn load_available_books(&self) -> bool {
        self.load_listing(Listing::Available).await.is_some()
    }

    /// Reloads the user list, alerting on failure
    pub async fn load_users(&self) -> bool {
        match self.fetch_users().await {
            Ok(_) => true,
            Err(err) => {
                self.alert_failure(&err, "Failed to load users");
                false
            }
        }
    }

    /// Recomputes the statistics, alerting on failure
    pub async fn load_stats(&self) -> bool {
        match self.fetch_stats().await {
            Ok(()) => true,
            Err(err) => {
                self.alert_failure(&err, "Failed to load statistics");
                false
            }
        }
    }

    /// Fetches the transaction history for display. Not kept in the view.
    pub async fn transactions(&self) -> Vec<Transaction> {
        match self.api.transactions().await {
            Ok(transactions) => transactions,
            Err(err) => {
                self.alert_failure(&err, "Failed to load transactions");
                Vec::new()
            }
        }
    }

    /// Borrows a book for the selected user, then refreshes the available list and
    /// the statistics
    pub async fn loan(&self, isbn: &str) -> bool {
        let Some(user_id) = self.require_user() else {
            return false;
        };

        info!("Borrowing {isbn} for user {user_id}");
        let result = self.api.loan(&user_id, isbn).await;
        self.finish_mutation(result, Mutation::Loan).await
    }

    /// Returns a book for the selected user, then refreshes the full list and the
    /// statistics
    pub async fn return_book(&self, isbn: &str) -> bool {
        let Some(user_id) = self.require_user() else {
            return false;
        };

        info!("Returning {isbn} for user {user_id}");
        let result = self.api.return_book(&user_id, isbn).await;
        self.finish_mutation(result, Mutation::Return).await
    }

    async fn finish_mutation(&self, result: Result<String>, mutation: Mutation) -> bool {
        match result {
            Ok(message) => {
                let message = or_default(message, mutation.confirmation());
                self.update(|view| view.alerts.success(message));
                self.after_mutation(mutation.effects()).await;
                true
            }
            Err(BookdeskError::Api(message)) => {
                self.alert_error(or_default(message, mutation.fallback()));
                false
            }
            Err(err) => {
                self.alert_failure(&err, mutation.fallback());
                false
            }
        }
    }

    /// Fetches a listing and alerts on failure. `Some(count)` when the result was
    /// applied, `None` on failure or when a newer result had already landed.
    async fn load_listing(&self, listing: Listing) -> Option<usize> {
        let fallback = match &listing {
            Listing::All => "Failed to load books",
            Listing::Available => "Failed to load available books",
            Listing::Search(_) => "Search failed",
            Listing::Recommendations(_) => "Failed to load recommendations",
        };

        match self.fetch_listing(listing).await {
            Ok(applied) => applied,
            Err(err) => {
                self.alert_failure(&err, fallback);
                None
            }
        }
    }

    async fn fetch_listing(&self, listing: Listing) -> Result<Option<usize>> {
        let epoch = self.update(|view| view.begin(Slot::Books));
        debug!("Fetching {listing:?}");

        let result = match &listing {
            Listing::All => self.api.all_books().await,
            Listing::Available => self.api.available_books().await,
            Listing::Search(term) => self.api.search_books(term).await,
            Listing::Recommendations(user) => self.api.recommendations(user).await,
        };

        match result {
            Ok(books) => {
                let count = books.len();
                let applied = self.update(|view| view.apply_books(epoch, listing, books));
                Ok(applied.then_some(count))
            }
            Err(err) => {
                self.update(|view| view.settle(Slot::Books, epoch));
                Err(err)
            }
        }
    }

    async fn fetch_users(&self) -> Result<usize> {
        let epoch = self.update(|view| view.begin(Slot::Users));
        let users = self.api.users().await?;
        let count = users.len();
        if self.update(|view| view.apply_users(epoch, users)) {
            info!("Loaded {count} users");
        }
        Ok(count)
    }

    /// Fan-out over books, users and transactions, fan-in into the counters
    async fn fetch_stats(&self) -> Result<()> {
        let epoch = self.update(|view| view.begin(Slot::Stats));
        let (books, users, transactions) = tokio::join!(
            self.api.all_books(),
            self.api.users(),
            self.api.transactions(),
        );

        let stats = Stats::from_listings(&books?, &users?, &transactions?);
        debug!("Computed statistics: {stats:?}");
        self.update(|view| view.apply_stats(epoch, stats));
        Ok(())
    }
}

fn or_default(message: String, default: &str) -> String {
    if message.trim().is_empty() {
        default.to_string()
    } else {
        message
    }
}

fn log_outcome(what: &str, result: Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            error!("Initial load of {what} failed: {err}");
            false
        }
    }
}
