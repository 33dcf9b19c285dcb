//! User Handlers

pub(crate) mod approve;
pub(crate) mod index;
pub(crate) mod invite;
pub(crate) mod reject;
pub(crate) mod update;
