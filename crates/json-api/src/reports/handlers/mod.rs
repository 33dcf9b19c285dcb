//! Report Handlers

pub(crate) mod summary;
