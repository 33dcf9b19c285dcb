//! Reports
//!
//! Read-only aggregates over the whole programme for super-admins.

pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::ReportsServiceError;
pub use service::*;
