//! User request and response bodies.

use std::string::ToString;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use loyalty_app::domain::{regions::Region, users::records::UserRecord};

use crate::extensions::*;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserResponse {
    pub uuid: Uuid,
    pub email: String,
    pub username: Option<String>,

    /// `user`, `regional_admin`, `admin` or `super_admin`
    pub role: String,
    pub region: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,

    /// `pending`, `approved` or `rejected`
    pub approval_status: String,
    pub approved_at: Option<String>,
    pub created_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        UserResponse {
            uuid: user.uuid.into(),
            approval_status: user.approval_status().as_str().to_string(),
            email: user.email,
            username: user.username,
            role: user.role.as_str().to_string(),
            region: user.region.map(String::from),
            first_name: user.first_name,
            last_name: user.last_name,
            company: user.company,
            approved_at: user.approved_at.as_ref().map(ToString::to_string),
            created_at: user.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UsersResponse {
    pub users: Vec<UserResponse>,
}

/// Parse an optional region code from a request body.
pub(crate) fn parse_region(
    value: Option<&str>,
) -> Result<Option<Region>, salvo::prelude::StatusError> {
    value
        .filter(|value| !value.trim().is_empty())
        .map(Region::parse)
        .transpose()
        .or_400("invalid region")
}
