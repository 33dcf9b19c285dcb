//! Partner rewards domain, persistence and notification modules.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod notifications;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
