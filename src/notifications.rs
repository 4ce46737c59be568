// src/notifications.rs
use std::time::{Duration, Instant};

use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub expires_at: Instant,
}

/// Lista powiadomień, które same znikają po `ttl`.
#[derive(Debug)]
pub struct NotificationCenter {
    items: Vec<Notification>,
    ttl: Duration,
    next_id: u64,
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: Vec::new(),
            ttl,
            next_id: 1,
        }
    }

    pub fn push(&mut self, kind: NotificationKind, message: impl Into<String>, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let message = message.into();
        tracing::debug!("Powiadomienie #{} [{}]: {}", id, kind, message);
        self.items.push(Notification {
            id,
            kind,
            message,
            expires_at: now + self.ttl,
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(NotificationKind::Success, message, Instant::now())
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(NotificationKind::Error, message, Instant::now())
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Usuwa wygasłe powiadomienia, zwraca ile zniknęło.
    pub fn prune_expired(&mut self, now: Instant) -> usize {
        let before = self.items.len();
        self.items.retain(|n| n.expires_at > now);
        before - self.items.len()
    }

    pub fn active(&self) -> &[Notification] {
        &self.items
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_expire_after_ttl() {
        let start = Instant::now();
        let mut center = NotificationCenter::new(Duration::from_secs(4));
        center.push(NotificationKind::Success, "Saved", start);
        center.push(
            NotificationKind::Error,
            "Failed",
            start + Duration::from_secs(2),
        );

        assert_eq!(center.prune_expired(start + Duration::from_secs(3)), 0);
        assert_eq!(center.prune_expired(start + Duration::from_secs(4)), 1);
        assert_eq!(center.active().len(), 1);
        assert_eq!(center.active()[0].message, "Failed");
        assert_eq!(center.prune_expired(start + Duration::from_secs(6)), 1);
        assert!(center.active().is_empty());
    }

    #[test]
    fn dismiss_removes_only_given_id() {
        let now = Instant::now();
        let mut center = NotificationCenter::new(Duration::from_secs(4));
        let first = center.push(NotificationKind::Info, "one", now);
        let second = center.push(NotificationKind::Info, "two", now);
        assert_ne!(first, second);

        assert!(center.dismiss(first));
        assert!(!center.dismiss(first));
        assert_eq!(center.latest().unwrap().id, second);
        assert_eq!(NotificationKind::Error.to_string(), "error");
    }
}
