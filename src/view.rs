//! View state shared between the orchestrator and the renderer
//!
//! Each slot (books, users, stats) is replaced wholesale by a successful fetch and
//! left alone by a failed one. Fetches take an [`Epoch`] when they start; a
//! response is only applied if nothing newer has landed in its slot yet, so a slow
//! search can no longer overwrite the results of a later one.

use crate::alerts::AlertBoard;
use crate::models::{Book, Stats, User};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

/// View state behind the lock every component shares
pub type SharedView = Arc<RwLock<ViewState>>;

/// Which request produced the book list on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    All,
    Available,
    Search(String),
    Recommendations(String),
}

impl Listing {
    #[must_use]
    pub fn heading(&self) -> String {
        match self {
            Listing::All => "All Books".to_string(),
            Listing::Available => "Available Books".to_string(),
            Listing::Search(term) => format!("Results for \"{term}\""),
            Listing::Recommendations(user) => format!("Recommendations for {user}"),
        }
    }
}

/// The last book list fetched successfully
#[derive(Debug, Clone, PartialEq)]
pub struct BookView {
    pub listing: Listing,
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Books,
    Users,
    Stats,
}

impl Slot {
    fn index(self) -> usize {
        match self {
            Slot::Books => 0,
            Slot::Users => 1,
            Slot::Stats => 2,
        }
    }
}

/// Sequence number of a fetch within its slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Epoch(u64);

#[derive(Debug, Default, Clone, Copy)]
struct SlotEpochs {
    issued: u64,
    applied: u64,
}

#[derive(Debug)]
pub struct ViewState {
    pub books: Option<BookView>,
    pub users: Vec<User>,
    pub stats: Option<Stats>,
    /// User acting on loans, returns and recommendations
    pub user_id: Option<String>,
    /// Current contents of the search field
    pub query: String,
    /// A book list fetch is in flight
    pub loading: bool,
    pub alerts: AlertBoard,
    epochs: [SlotEpochs; 3],
}

impl ViewState {
    #[must_use]
    pub fn new(alert_ttl: Duration) -> Self {
        Self {
            books: None,
            users: Vec::new(),
            stats: None,
            user_id: None,
            query: String::new(),
            loading: false,
            alerts: AlertBoard::new(alert_ttl),
            epochs: [SlotEpochs::default(); 3],
        }
    }

    #[must_use]
    pub fn shared(alert_ttl: Duration) -> SharedView {
        Arc::new(RwLock::new(Self::new(alert_ttl)))
    }

    /// Registers a new fetch into `slot`
    pub fn begin(&mut self, slot: Slot) -> Epoch {
        let epochs = &mut self.epochs[slot.index()];
        epochs.issued += 1;
        if slot == Slot::Books {
            self.loading = true;
        }
        Epoch(epochs.issued)
    }

    /// Marks a fetch as finished without a result
    pub fn settle(&mut self, slot: Slot, epoch: Epoch) {
        if slot == Slot::Books && epoch.0 == self.epochs[slot.index()].issued {
            self.loading = false;
        }
    }

    fn accept(&mut self, slot: Slot, epoch: Epoch) -> bool {
        self.settle(slot, epoch);
        let epochs = &mut self.epochs[slot.index()];
        if epoch.0 <= epochs.applied {
            tracing::debug!("Discarding stale {slot:?} response (epoch {})", epoch.0);
            return false;
        }
        epochs.applied = epoch.0;
        true
    }

    /// Replaces the book list. Returns false if a newer list was already applied.
    pub fn apply_books(&mut self, epoch: Epoch, listing: Listing, books: Vec<Book>) -> bool {
        if !self.accept(Slot::Books, epoch) {
            return false;
        }
        self.books = Some(BookView { listing, books });
        true
    }

    /// Replaces the user list. Returns false if a newer list was already applied.
    pub fn apply_users(&mut self, epoch: Epoch, users: Vec<User>) -> bool {
        if !self.accept(Slot::Users, epoch) {
            return false;
        }
        self.users = users;
        true
    }

    /// Replaces the statistics. Returns false if newer ones were already applied.
    pub fn apply_stats(&mut self, epoch: Epoch, stats: Stats) -> bool {
        if !self.accept(Slot::Stats, epoch) {
            return false;
        }
        self.stats = Some(stats);
        true
    }
}

/// Runs `f` with exclusive access to the view. A poisoned lock is recovered since
/// every update leaves the state consistent.
pub fn with_view<R>(view: &SharedView, f: impl FnOnce(&mut ViewState) -> R) -> R {
    let mut guard = view.write().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}
