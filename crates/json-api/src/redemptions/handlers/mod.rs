//! Redemption Handlers

pub(crate) mod admin_index;
pub(crate) mod index;
pub(crate) mod update;
