//! Points ledger.
//!
//! Every change to a user's balance is an append-only `points_history` row.
//! Balances are always derived by summing the ledger.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::PointsServiceError;
pub use service::*;
