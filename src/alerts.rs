use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub id: u64,
    pub kind: AlertKind,
    pub message: String,
    pub raised_at: Instant,
}

/// Notifications shown to the user, newest last.
///
/// Alerts leave the board when dismissed or once their time-to-live has passed.
/// Expiry is evaluated lazily against the Tokio clock, so nothing has to run in
/// the background to remove them.
#[derive(Debug)]
pub struct AlertBoard {
    ttl: Duration,
    next_id: u64,
    alerts: Vec<Alert>,
}

impl AlertBoard {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            next_id: 1,
            alerts: Vec::new(),
        }
    }

    /// Raises an alert and returns its id
    pub fn push(&mut self, kind: AlertKind, message: impl Into<String>) -> u64 {
        self.prune();
        let id = self.next_id;
        self.next_id += 1;
        self.alerts.push(Alert {
            id,
            kind,
            message: message.into(),
            raised_at: Instant::now(),
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(AlertKind::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(AlertKind::Error, message)
    }

    /// Removes an alert before it expires. Returns false if it was already gone.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|alert| alert.id != id);
        self.alerts.len() != before
    }

    /// Alerts that are still visible
    pub fn active(&self) -> impl Iterator<Item = &Alert> {
        let now = Instant::now();
        self.alerts
            .iter()
            .filter(move |alert| now.duration_since(alert.raised_at) < self.ttl)
    }

    /// Drops expired alerts from storage
    pub fn prune(&mut self) {
        let now = Instant::now();
        let ttl = self.ttl;
        self.alerts
            .retain(|alert| now.duration_since(alert.raised_at) < ttl);
    }
}
