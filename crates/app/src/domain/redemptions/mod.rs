//! Reward redemptions.
//!
//! A redemption debits the ledger when it is placed. Rejecting it later
//! writes a refund row and returns the reserved stock.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::RedemptionsServiceError;
pub use service::*;
