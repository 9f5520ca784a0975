//! Stock ledger and movement journal models
//!
//! The ledger holds one quantity-on-hand per product; the journal is an
//! append-only log of signed changes. The two are written in the same
//! database transaction, so replaying the journal always reproduces the
//! ledger balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Current quantity-on-hand for a product (1:1 with the product)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRecord {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    pub updated_at: DateTime<Utc>,
}

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    In,
    Out,
}

impl MovementDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementDirection::In => "in",
            MovementDirection::Out => "out",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in" => Some(MovementDirection::In),
            "out" => Some(MovementDirection::Out),
            _ => None,
        }
    }

    /// Sign applied to the quantity when replaying the journal
    pub fn signed(&self, quantity: i64) -> i64 {
        match self {
            MovementDirection::In => quantity,
            MovementDirection::Out => -quantity,
        }
    }
}

/// One immutable journal entry. Never updated or deleted after creation;
/// reversal flows append compensating entries instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: Uuid,
    pub stock_record_id: Uuid,
    pub direction: MovementDirection,
    pub quantity: i64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Errors from guarded ledger arithmetic
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StockError {
    #[error("insufficient stock: requested {requested}, available {available}")]
    Insufficient { requested: i64, available: i64 },

    #[error("movement quantity must be positive")]
    NonPositiveQuantity,
}

/// Apply a signed delta to a quantity with a floor of zero.
///
/// A negative delta that would drive the quantity below zero fails; the
/// caller must abort the enclosing transaction on that error.
pub fn apply_delta(current: i64, delta: i64) -> Result<i64, StockError> {
    let next = current + delta;
    if next < 0 {
        return Err(StockError::Insufficient {
            requested: -delta,
            available: current,
        });
    }
    Ok(next)
}

/// Apply a negative delta clamped at zero, for purchase reversals.
///
/// Returns the new quantity and the amount actually removed, which is what
/// the compensating movement must record for the journal to stay consistent.
pub fn apply_clamped_removal(current: i64, quantity: i64) -> (i64, i64) {
    let removed = quantity.min(current);
    (current - removed, removed)
}

/// Replay a sequence of signed movements over an initial balance.
pub fn replay_movements<I>(initial: i64, movements: I) -> i64
where
    I: IntoIterator<Item = (MovementDirection, i64)>,
{
    movements
        .into_iter()
        .fold(initial, |balance, (direction, quantity)| {
            balance + direction.signed(quantity)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_delta_rejects_underflow() {
        let err = apply_delta(2, -3).unwrap_err();
        assert_eq!(
            err,
            StockError::Insufficient {
                requested: 3,
                available: 2
            }
        );
    }

    #[test]
    fn apply_delta_allows_exact_drain() {
        assert_eq!(apply_delta(3, -3), Ok(0));
    }

    #[test]
    fn clamped_removal_floors_at_zero() {
        assert_eq!(apply_clamped_removal(3, 20), (0, 3));
        assert_eq!(apply_clamped_removal(20, 3), (17, 3));
        assert_eq!(apply_clamped_removal(0, 5), (0, 0));
    }

    #[test]
    fn replay_matches_signed_sum() {
        let balance = replay_movements(
            10,
            [
                (MovementDirection::In, 5),
                (MovementDirection::Out, 3),
                (MovementDirection::In, 1),
            ],
        );
        assert_eq!(balance, 13);
    }
}
