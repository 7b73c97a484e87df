//! Transient notices that clear themselves after a fixed time.
//!
//! A notice is a message plus a deadline. Showing a new notice replaces the
//! old one together with its deadline, so an earlier notice can never clear a
//! later one. The owner ticks it from its event loop.

use std::time::{Duration, Instant};

/// Default lifetime of a notice.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
struct Pending {
    message: String,
    expires_at: Instant,
}

/// A self-expiring one-line notice.
#[derive(Debug, Clone)]
pub struct Notice {
    ttl: Duration,
    pending: Option<Pending>,
}

impl Notice {
    pub fn new(ttl: Duration) -> Self {
        Notice { ttl, pending: None }
    }

    /// Show `message` until `now + ttl`, replacing any current notice.
    pub fn show(&mut self, message: impl Into<String>, now: Instant) {
        self.pending = Some(Pending {
            message: message.into(),
            expires_at: now + self.ttl,
        });
    }

    /// The message, if it has not yet expired at `now`.
    pub fn current(&self, now: Instant) -> Option<&str> {
        self.pending
            .as_ref()
            .filter(|p| now < p.expires_at)
            .map(|p| p.message.as_str())
    }

    /// Drop the notice once expired. Returns true if it was dropped now.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &self.pending {
            Some(p) if now >= p.expires_at => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Dismiss immediately.
    pub fn clear(&mut self) {
        self.pending = None;
    }
}

impl Default for Notice {
    fn default() -> Self {
        Notice::new(NOTICE_TTL)
    }
}
