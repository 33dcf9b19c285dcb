//! Points Handlers

pub(crate) mod adjust;
pub(crate) mod balance;
pub(crate) mod history;
