//! Low-stock notification tests
//!
//! Tests for the suppression decision:
//! - At most one active notification per product
//! - Pending always suppresses; resolved suppresses within the cool-down
//! - Evaluation is idempotent while nothing changes

use chrono::{Duration, Utc};
use proptest::prelude::*;

use shared::models::notification::{
    should_notify, suppresses, ExistingNotification, NotificationStatus,
};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// First evaluation of a low product notifies
    #[test]
    fn test_first_low_evaluation_notifies() {
        assert!(should_notify(3, 10, None, Utc::now(), Duration::hours(24)));
    }

    /// Quantity exactly at the threshold counts as low
    #[test]
    fn test_at_threshold_is_low() {
        assert!(should_notify(10, 10, None, Utc::now(), Duration::hours(24)));
    }

    /// Above the threshold never notifies, whatever the history
    #[test]
    fn test_above_threshold_never_notifies() {
        let now = Utc::now();
        assert!(!should_notify(11, 10, None, now, Duration::hours(24)));

        let resolved_long_ago = ExistingNotification {
            status: NotificationStatus::Rejected,
            responded_at: Some(now - Duration::hours(100)),
        };
        assert!(!should_notify(
            11,
            10,
            Some(resolved_long_ago),
            now,
            Duration::hours(24)
        ));
    }

    /// A pending notification suppresses regardless of age
    #[test]
    fn test_pending_suppresses() {
        let now = Utc::now();
        let pending = ExistingNotification {
            status: NotificationStatus::Pending,
            responded_at: None,
        };
        assert!(suppresses(&pending, now, Duration::hours(24)));
        assert!(!should_notify(1, 10, Some(pending), now, Duration::hours(24)));
    }

    /// A resolution inside the cool-down window suppresses
    #[test]
    fn test_recent_resolution_suppresses() {
        let now = Utc::now();
        for status in [NotificationStatus::Accepted, NotificationStatus::Rejected] {
            let existing = ExistingNotification {
                status,
                responded_at: Some(now - Duration::hours(23)),
            };
            assert!(!should_notify(1, 10, Some(existing), now, Duration::hours(24)));
        }
    }

    /// A resolution outside the cool-down window allows a new notification
    #[test]
    fn test_expired_cooldown_allows_new() {
        let now = Utc::now();
        let existing = ExistingNotification {
            status: NotificationStatus::Accepted,
            responded_at: Some(now - Duration::hours(25)),
        };
        assert!(should_notify(1, 10, Some(existing), now, Duration::hours(24)));
    }

    /// A resolved notification without a response timestamp suppresses
    #[test]
    fn test_resolved_without_timestamp_suppresses() {
        let now = Utc::now();
        let existing = ExistingNotification {
            status: NotificationStatus::Accepted,
            responded_at: None,
        };
        assert!(suppresses(&existing, now, Duration::hours(24)));
    }

    /// The cool-down length is honored, not hard-coded
    #[test]
    fn test_configurable_cooldown() {
        let now = Utc::now();
        let existing = ExistingNotification {
            status: NotificationStatus::Rejected,
            responded_at: Some(now - Duration::hours(3)),
        };
        // Short cool-down already elapsed
        assert!(should_notify(1, 10, Some(existing), now, Duration::hours(2)));
        // Long cool-down still active
        assert!(!should_notify(1, 10, Some(existing), now, Duration::hours(48)));
    }

    /// Status strings round-trip
    #[test]
    fn test_status_round_trip() {
        for status in [
            NotificationStatus::Pending,
            NotificationStatus::Accepted,
            NotificationStatus::Rejected,
        ] {
            assert_eq!(NotificationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(NotificationStatus::parse("snoozed"), None);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn status_strategy() -> impl Strategy<Value = NotificationStatus> {
        prop_oneof![
            Just(NotificationStatus::Pending),
            Just(NotificationStatus::Accepted),
            Just(NotificationStatus::Rejected),
        ]
    }

    proptest! {
        /// Notification requires quantity <= threshold, always
        #[test]
        fn prop_only_low_stock_notifies(
            quantity in 0i64..1_000,
            min_stock in 0i64..1_000
        ) {
            let notified = should_notify(
                quantity,
                min_stock,
                None,
                Utc::now(),
                Duration::hours(24),
            );
            prop_assert_eq!(notified, quantity <= min_stock);
        }

        /// A pending notification suppresses for any cool-down length
        #[test]
        fn prop_pending_always_suppresses(cooldown_hours in 0i64..1_000) {
            let existing = ExistingNotification {
                status: NotificationStatus::Pending,
                responded_at: Some(Utc::now() - Duration::hours(500)),
            };
            prop_assert!(suppresses(
                &existing,
                Utc::now(),
                Duration::hours(cooldown_hours)
            ));
        }

        /// Resolved notifications suppress exactly within the window
        #[test]
        fn prop_cooldown_boundary(
            age_hours in 0i64..200,
            cooldown_hours in 1i64..200
        ) {
            let now = Utc::now();
            let existing = ExistingNotification {
                status: NotificationStatus::Accepted,
                responded_at: Some(now - Duration::hours(age_hours)),
            };
            let suppressed = suppresses(&existing, now, Duration::hours(cooldown_hours));
            prop_assert_eq!(suppressed, age_hours < cooldown_hours);
        }

        /// Evaluation is idempotent: while a pending notification exists
        /// and stock stays low, re-evaluating never asks for another one
        #[test]
        fn prop_reevaluation_idempotent(
            quantity in 0i64..100,
            min_stock in 0i64..100,
            repeats in 1usize..10
        ) {
            let now = Utc::now();
            let cooldown = Duration::hours(24);

            let first = should_notify(quantity, min_stock, None, now, cooldown);
            if first {
                // The created notification is pending from now on
                let pending = ExistingNotification {
                    status: NotificationStatus::Pending,
                    responded_at: None,
                };
                for _ in 0..repeats {
                    prop_assert!(!should_notify(
                        quantity,
                        min_stock,
                        Some(pending),
                        now,
                        cooldown
                    ));
                }
            }
        }

        /// Suppression never notifies for any existing-notification shape
        /// when stock is above threshold
        #[test]
        fn prop_above_threshold_dominates(
            status in status_strategy(),
            age_hours in 0i64..500,
            extra in 1i64..100,
            min_stock in 0i64..100
        ) {
            let now = Utc::now();
            let existing = ExistingNotification {
                status,
                responded_at: Some(now - Duration::hours(age_hours)),
            };
            prop_assert!(!should_notify(
                min_stock + extra,
                min_stock,
                Some(existing),
                now,
                Duration::hours(24)
            ));
        }
    }
}
