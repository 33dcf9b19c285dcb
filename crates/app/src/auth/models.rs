//! Auth data models.

use jiff::Timestamp;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    auth::SessionTokenVersion,
    domain::{
        regions::Region,
        users::records::{Role, UserRecord, UserUuid},
    },
};

/// Identity attached to an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_uuid: UserUuid,
    pub role: Role,
    pub region: Option<Region>,
}

impl Principal {
    #[must_use]
    pub fn has_role(&self, minimum: Role) -> bool {
        self.role >= minimum
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::RegionalAdmin)
    }

    /// Whether this principal may act on a record belonging to `region`.
    ///
    /// Admins and super-admins act everywhere; regional admins only inside their
    /// own region and never on records without one.
    #[must_use]
    pub fn can_manage_region(&self, region: Option<&Region>) -> bool {
        match self.role {
            Role::User => false,
            Role::RegionalAdmin => match (&self.region, region) {
                (Some(own), Some(target)) => own == target,
                _ => false,
            },
            Role::Admin | Role::SuperAdmin => true,
        }
    }

    /// Region filter for admin listings: `None` lists everything, `Some` one region.
    ///
    /// Fails for non-admins and for regional admins without a region.
    pub fn admin_scope(&self) -> Result<Option<&Region>, NotPermitted> {
        match self.role {
            Role::User => Err(NotPermitted),
            Role::RegionalAdmin => self.region.as_ref().map(Some).ok_or(NotPermitted),
            Role::Admin | Role::SuperAdmin => Ok(None),
        }
    }

    /// Fail unless the principal holds at least `minimum`.
    pub fn require_role(&self, minimum: Role) -> Result<(), NotPermitted> {
        if self.has_role(minimum) {
            Ok(())
        } else {
            Err(NotPermitted)
        }
    }
}

/// The principal's role or region does not cover the requested action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("not permitted")]
pub struct NotPermitted;

impl From<&UserRecord> for Principal {
    fn from(user: &UserRecord) -> Self {
        Self {
            user_uuid: user.uuid,
            role: user.role,
            region: user.region.clone(),
        }
    }
}

/// Session data used during bearer authentication.
#[derive(Debug, Clone)]
pub(crate) struct ActiveSession {
    pub user_uuid: UserUuid,
    pub version: SessionTokenVersion,
    pub token_hash: String,
    pub role: Role,
    pub region: Option<Region>,
}

/// New session persistence payload.
#[derive(Debug, Clone)]
pub(crate) struct NewSession {
    pub uuid: Uuid,
    pub user_uuid: UserUuid,
    pub version: SessionTokenVersion,
    pub token_hash: String,
}

/// Session metadata persisted in storage.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub uuid: Uuid,
    pub user_uuid: UserUuid,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Login result with the one-time raw session token.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub session: SessionRecord,
    pub user: UserRecord,
}
