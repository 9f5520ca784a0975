//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Date range for report queries, inclusive on both ends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}
