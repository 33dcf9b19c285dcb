//! Auth Handlers

pub(crate) mod invites;
pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod me;
pub(crate) mod password_reset;
pub(crate) mod register;
