//! Toast notifications.
//!
//! A fire-and-forget channel for short user-facing messages. Toasts expire on
//! their own after `duration_ms`; a duration of zero keeps the toast until it
//! is dismissed.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime used when the caller does not pick one.
pub const DEFAULT_TOAST_DURATION_MS: u64 = 5000;

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

/// One notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ToastKind,
    pub message: String,
    /// Zero means the toast never expires on its own.
    pub duration_ms: u64,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    /// Build a toast stamped with the current time.
    #[must_use]
    pub fn new(kind: ToastKind, message: impl Into<String>, duration_ms: Option<u64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            duration_ms: duration_ms.unwrap_or(DEFAULT_TOAST_DURATION_MS),
            created_at: Utc::now(),
        }
    }

    /// When the toast disappears, or `None` for sticky toasts.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.duration_ms == 0 {
            return None;
        }
        let millis = i64::try_from(self.duration_ms).unwrap_or(i64::MAX);
        self.created_at.checked_add_signed(Duration::milliseconds(millis))
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|at| now >= at)
    }
}

/// Ordered queue of live toasts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
}

impl ToastQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a toast and return its id.
    pub fn notify(
        &mut self,
        kind: ToastKind,
        message: impl Into<String>,
        duration_ms: Option<u64>,
    ) -> Uuid {
        self.push(Toast::new(kind, message, duration_ms))
    }

    /// Queue an already-built toast.
    pub fn push(&mut self, toast: Toast) -> Uuid {
        let id = toast.id;
        self.toasts.push(toast);
        id
    }

    /// Remove a toast. Unknown ids are ignored. Returns whether one was removed.
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }

    /// Drop expired toasts and return the rest, oldest first.
    pub fn active(&mut self, now: DateTime<Utc>) -> &[Toast] {
        self.toasts.retain(|t| !t.is_expired(now));
        &self.toasts
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_duration() {
        let toast = Toast::new(ToastKind::Info, "hello", None);
        assert_eq!(toast.duration_ms, DEFAULT_TOAST_DURATION_MS);
    }

    #[test]
    fn test_expiry() {
        let mut queue = ToastQueue::new();
        queue.notify(ToastKind::Success, "Added Sunflower Buddy to cart!", Some(3000));
        let sticky = queue.notify(ToastKind::Error, "stays", Some(0));
        let start = Utc::now();

        assert_eq!(queue.active(start).len(), 2);

        let later = start + Duration::seconds(10);
        let remaining = queue.active(later);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining.first().map(|t| t.id), Some(sticky));
    }

    #[test]
    fn test_dismiss_and_clear() {
        let mut queue = ToastQueue::new();
        let id = queue.notify(ToastKind::Warning, "careful", None);
        queue.notify(ToastKind::Info, "fyi", None);

        assert!(queue.dismiss(id));
        assert!(!queue.dismiss(id));
        assert!(!queue.is_empty());

        queue.clear();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_wire_format() {
        let toast = Toast::new(ToastKind::Success, "ok", Some(3000));
        let value = serde_json::to_value(&toast).unwrap_or_default();
        assert_eq!(value["type"], "success");
        assert_eq!(value["durationMs"], 3000);
    }
}
