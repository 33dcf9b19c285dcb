//! Loyalty Domain Concerns

use thiserror::Error;

pub mod deals;
pub mod points;
pub mod points_config;
pub mod redemptions;
pub mod regions;
pub mod reports;
pub mod rewards;
pub mod support_tickets;
pub mod users;

pub(crate) mod rows;

/// Largest amount a `BIGINT` column can store.
pub const MAX_STORED_AMOUNT: u64 = i64::MAX.unsigned_abs();

/// Largest count an `INTEGER` column can store.
pub const MAX_STORED_COUNT: u32 = i32::MAX.unsigned_abs();

/// A stored or submitted value did not match any variant of a domain enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
