//! Stock ledger tests
//!
//! Tests for ledger arithmetic and the movement journal:
//! - Quantity never goes below zero
//! - Replaying the journal reproduces the ledger balance
//! - Clamped removal records exactly what was removed

use proptest::prelude::*;

use shared::models::stock::{
    apply_clamped_removal, apply_delta, replay_movements, MovementDirection, StockError,
};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Positive deltas always succeed
    #[test]
    fn test_inbound_delta_increments() {
        assert_eq!(apply_delta(0, 10), Ok(10));
        assert_eq!(apply_delta(7, 3), Ok(10));
    }

    /// Negative deltas succeed while stock covers them
    #[test]
    fn test_outbound_delta_decrements() {
        assert_eq!(apply_delta(10, -4), Ok(6));
    }

    /// Draining to exactly zero is allowed
    #[test]
    fn test_drain_to_zero_allowed() {
        assert_eq!(apply_delta(5, -5), Ok(0));
    }

    /// An underflowing delta reports what was requested and available
    #[test]
    fn test_underflow_rejected_with_amounts() {
        let err = apply_delta(4, -9).unwrap_err();
        assert_eq!(
            err,
            StockError::Insufficient {
                requested: 9,
                available: 4
            }
        );
    }

    /// Zero stock rejects any removal
    #[test]
    fn test_empty_stock_rejects_removal() {
        assert!(apply_delta(0, -1).is_err());
    }

    /// Clamped removal floors at zero and reports the removed amount
    #[test]
    fn test_clamped_removal() {
        // Removing more than on hand drains to zero
        assert_eq!(apply_clamped_removal(3, 10), (0, 3));
        // Removing less than on hand behaves like a plain decrement
        assert_eq!(apply_clamped_removal(10, 3), (7, 3));
        // Nothing on hand, nothing removed
        assert_eq!(apply_clamped_removal(0, 10), (0, 0));
    }

    /// Direction strings round-trip
    #[test]
    fn test_direction_round_trip() {
        for direction in [MovementDirection::In, MovementDirection::Out] {
            assert_eq!(MovementDirection::parse(direction.as_str()), Some(direction));
        }
        assert_eq!(MovementDirection::parse("sideways"), None);
    }

    /// Signed quantities carry the direction's sign
    #[test]
    fn test_signed_quantities() {
        assert_eq!(MovementDirection::In.signed(5), 5);
        assert_eq!(MovementDirection::Out.signed(5), -5);
    }

    /// Deleting a sale puts the sold quantity back, restoring the
    /// pre-sale balance
    #[test]
    fn test_sale_reversal_restores_balance() {
        let after_sale = apply_delta(5, -2).unwrap();
        assert_eq!(after_sale, 3);
        assert_eq!(apply_delta(after_sale, 2), Ok(5));
    }

    /// Replay over a known journal reproduces the balance
    #[test]
    fn test_replay_reproduces_balance() {
        let journal = [
            (MovementDirection::In, 50),
            (MovementDirection::Out, 20),
            (MovementDirection::In, 5),
            (MovementDirection::Out, 15),
        ];
        assert_eq!(replay_movements(0, journal), 20);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn quantity_strategy() -> impl Strategy<Value = i64> {
        1i64..10_000
    }

    fn direction_strategy() -> impl Strategy<Value = MovementDirection> {
        prop_oneof![Just(MovementDirection::In), Just(MovementDirection::Out)]
    }

    proptest! {
        /// A successful delta application never yields a negative quantity
        #[test]
        fn prop_quantity_never_negative(
            current in 0i64..10_000,
            delta in -10_000i64..10_000
        ) {
            if let Ok(next) = apply_delta(current, delta) {
                prop_assert!(next >= 0);
                prop_assert_eq!(next, current + delta);
            } else {
                // Rejected means the delta would have underflowed
                prop_assert!(current + delta < 0);
            }
        }

        /// The error carries exactly the requested and available amounts
        #[test]
        fn prop_insufficient_error_amounts(
            current in 0i64..100,
            extra in 1i64..100
        ) {
            let requested = current + extra;
            let err = apply_delta(current, -requested).unwrap_err();
            prop_assert_eq!(
                err,
                StockError::Insufficient { requested, available: current }
            );
        }

        /// Clamped removal removes min(current, quantity) and never
        /// leaves a negative balance
        #[test]
        fn prop_clamped_removal_consistent(
            current in 0i64..10_000,
            quantity in quantity_strategy()
        ) {
            let (next, removed) = apply_clamped_removal(current, quantity);
            prop_assert_eq!(removed, quantity.min(current));
            prop_assert_eq!(next, current - removed);
            prop_assert!(next >= 0);
        }

        /// Reversing a successful sale always restores the original
        /// balance exactly
        #[test]
        fn prop_sale_reversal_round_trip(
            initial in 0i64..10_000,
            sold in quantity_strategy()
        ) {
            if let Ok(after_sale) = apply_delta(initial, -sold) {
                prop_assert_eq!(apply_delta(after_sale, sold), Ok(initial));
            }
        }

        /// Replaying the journal equals the initial balance plus the
        /// signed sum of all movements
        #[test]
        fn prop_replay_is_signed_sum(
            initial in 0i64..10_000,
            movements in prop::collection::vec(
                (direction_strategy(), quantity_strategy()),
                0..20
            )
        ) {
            let replayed = replay_movements(initial, movements.iter().copied());
            let signed_sum: i64 = movements
                .iter()
                .map(|(direction, quantity)| direction.signed(*quantity))
                .sum();
            prop_assert_eq!(replayed, initial + signed_sum);
        }

        /// Applying guarded deltas and journaling each accepted one keeps
        /// ledger and journal in agreement
        #[test]
        fn prop_ledger_matches_journal(
            initial in 0i64..1_000,
            deltas in prop::collection::vec(-500i64..500, 0..20)
        ) {
            let mut balance = initial;
            let mut journal = Vec::new();

            for delta in deltas {
                if delta == 0 {
                    continue;
                }
                if let Ok(next) = apply_delta(balance, delta) {
                    let direction = if delta > 0 {
                        MovementDirection::In
                    } else {
                        MovementDirection::Out
                    };
                    journal.push((direction, delta.abs()));
                    balance = next;
                }
            }

            prop_assert_eq!(replay_movements(initial, journal), balance);
        }
    }
}
