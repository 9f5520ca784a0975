//! Low-stock notification model and suppression decision
//!
//! Lifecycle per product: no notification -> pending -> accepted | rejected.
//! A resolved notification keeps suppressing new ones for a configurable
//! cool-down window.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Notification lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Pending => "pending",
            NotificationStatus::Accepted => "accepted",
            NotificationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(NotificationStatus::Pending),
            "accepted" => Some(NotificationStatus::Accepted),
            "rejected" => Some(NotificationStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, NotificationStatus::Pending)
    }
}

/// Low-stock notification addressed to a user, referencing the product's
/// supplier when one is linked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub provider_id: Option<Uuid>,
    pub status: NotificationStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

/// The most recent notification for a product, as seen by the evaluation
/// routine.
#[derive(Debug, Clone, Copy)]
pub struct ExistingNotification {
    pub status: NotificationStatus,
    pub responded_at: Option<DateTime<Utc>>,
}

/// Whether an existing notification suppresses creating a new one.
///
/// Pending always suppresses; a resolved notification suppresses until the
/// cool-down window has elapsed since its response.
pub fn suppresses(
    existing: &ExistingNotification,
    now: DateTime<Utc>,
    cooldown: Duration,
) -> bool {
    if existing.status.is_pending() {
        return true;
    }
    match existing.responded_at {
        Some(responded_at) => now - responded_at < cooldown,
        // Resolved without a timestamp should not happen; err on suppression.
        None => true,
    }
}

/// Idempotent evaluation: create a notification only when the quantity is at
/// or below the threshold and nothing suppresses it.
pub fn should_notify(
    quantity: i64,
    min_stock: i64,
    existing: Option<ExistingNotification>,
    now: DateTime<Utc>,
    cooldown: Duration,
) -> bool {
    if quantity > min_stock {
        return false;
    }
    match existing {
        Some(existing) => !suppresses(&existing, now, cooldown),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours(h: i64) -> Duration {
        Duration::hours(h)
    }

    #[test]
    fn pending_suppresses() {
        let now = Utc::now();
        let existing = ExistingNotification {
            status: NotificationStatus::Pending,
            responded_at: None,
        };
        assert!(!should_notify(3, 10, Some(existing), now, hours(24)));
    }

    #[test]
    fn recently_resolved_suppresses() {
        let now = Utc::now();
        let existing = ExistingNotification {
            status: NotificationStatus::Rejected,
            responded_at: Some(now - hours(2)),
        };
        assert!(!should_notify(3, 10, Some(existing), now, hours(24)));
    }

    #[test]
    fn resolution_outside_window_allows_new_notification() {
        let now = Utc::now();
        let existing = ExistingNotification {
            status: NotificationStatus::Accepted,
            responded_at: Some(now - hours(25)),
        };
        assert!(should_notify(3, 10, Some(existing), now, hours(24)));
    }

    #[test]
    fn above_threshold_never_notifies() {
        let now = Utc::now();
        assert!(!should_notify(23, 10, None, now, hours(24)));
    }
}
