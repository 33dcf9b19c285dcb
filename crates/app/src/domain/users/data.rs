//! User Data

use crate::{
    auth::PlainPassword,
    domain::{
        regions::Region,
        users::records::{ApprovalStatus, Role, UserRecord},
    },
};

/// Self-service sign-up data.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRegistration {
    pub email: String,
    pub username: String,
    pub password: PlainPassword,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub region: Option<Region>,
}

/// Fully provisioned, pre-approved account (administrative tooling).
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub email: String,
    pub username: String,
    pub password: PlainPassword,
    pub role: Role,
    pub region: Option<Region>,
}

/// Admin-provisioned account awaiting the invitee's registration.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvite {
    pub email: String,
    pub role: Role,
    pub region: Option<Region>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
}

/// Invitee's completion of an invited account.
#[derive(Debug, Clone, PartialEq)]
pub struct InviteCompletion {
    pub token: String,
    pub username: String,
    pub password: PlainPassword,
}

/// Super-admin changes to role or region.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserUpdate {
    pub role: Option<Role>,
    pub region: Option<Region>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UserFilter {
    pub approval: Option<ApprovalStatus>,
}

/// Result of issuing an invite. The raw token is only available here.
#[derive(Debug, Clone)]
pub struct IssuedInvite {
    pub user: UserRecord,
    pub token: String,
}
