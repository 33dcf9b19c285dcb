//! User Records

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::Timestamp;

use crate::{
    domain::{UnknownVariant, regions::Region},
    uuids::TypedUuid,
};

/// User UUID
pub type UserUuid = TypedUuid<UserRecord>;

/// Account role, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    User,
    RegionalAdmin,
    Admin,
    SuperAdmin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::RegionalAdmin => "regional_admin",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }

    /// Regional admins only act on users, deals and configuration in their own region.
    #[must_use]
    pub const fn is_region_scoped(self) -> bool {
        matches!(self, Self::RegionalAdmin)
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "regional_admin" => Ok(Self::RegionalAdmin),
            "admin" => Ok(Self::Admin),
            "super_admin" => Ok(Self::SuperAdmin),
            _ => Err(UnknownVariant::new("role", value)),
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Where a user sits in the sign-up approval flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for ApprovalStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(UnknownVariant::new("approval status", value)),
        }
    }
}

/// User Record
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub uuid: UserUuid,
    pub email: String,
    pub username: Option<String>,
    pub role: Role,
    pub region: Option<Region>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub is_approved: bool,
    pub approved_by: Option<UserUuid>,
    pub approved_at: Option<Timestamp>,
    pub rejected_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserRecord {
    #[must_use]
    pub fn approval_status(&self) -> ApprovalStatus {
        if self.is_approved {
            ApprovalStatus::Approved
        } else if self.rejected_at.is_some() {
            ApprovalStatus::Rejected
        } else {
            ApprovalStatus::Pending
        }
    }

    /// Name used to greet the user in notifications.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            _ => self
                .username
                .clone()
                .unwrap_or_else(|| self.email.clone()),
        }
    }
}

/// Pending invite attached to a provisioned user row.
#[derive(Debug, Clone, PartialEq)]
pub struct InviteRecord {
    pub user_uuid: UserUuid,
    pub email: String,
    pub role: Role,
    pub region: Option<Region>,
    pub expires_at: Timestamp,
    pub used_at: Option<Timestamp>,
}

/// Stored login material for a user.
#[derive(Debug, Clone)]
pub(crate) struct UserCredentials {
    pub uuid: UserUuid,
    pub password_hash: Option<String>,
    pub is_approved: bool,
}

/// Reset token lookup result.
#[derive(Debug, Clone)]
pub(crate) struct PasswordResetRecord {
    pub user_uuid: UserUuid,
    pub expires_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_are_ordered_by_privilege() {
        assert!(Role::User < Role::RegionalAdmin);
        assert!(Role::RegionalAdmin < Role::Admin);
        assert!(Role::Admin < Role::SuperAdmin);
    }

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::User, Role::RegionalAdmin, Role::Admin, Role::SuperAdmin] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }

        assert!("root".parse::<Role>().is_err());
    }
}
