use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub level: Level,
    pub message: String,
    pub expires_at: Instant,
}

/// Transient toasts. Each one expires after a fixed delay or when closed.
#[derive(Debug)]
pub struct Notifications {
    ttl: Duration,
    next_id: u64,
    items: Vec<Notification>,
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            next_id: 1,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, level: Level, message: impl Into<String>, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Notification {
            id,
            level,
            message: message.into(),
            expires_at: now + self.ttl,
        });
        id
    }

    /// Close early. Closing something already gone is fine and returns false.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        before != self.items.len()
    }

    /// Drop everything whose delay has passed, returning what was removed
    pub fn expire(&mut self, now: Instant) -> Vec<Notification> {
        let (expired, alive): (Vec<_>, Vec<_>) =
            self.items.drain(..).partition(|n| n.expires_at <= now);
        self.items = alive;
        expired
    }

    pub fn active(&self) -> &[Notification] {
        &self.items
    }
}
