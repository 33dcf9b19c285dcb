//! Users Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::{
    regions::Region,
    rows::{try_get_enum, try_get_optional_timestamp, try_get_timestamp},
    users::records::{
        ApprovalStatus, InviteRecord, PasswordResetRecord, Role, UserCredentials, UserRecord,
        UserUuid,
    },
};

const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const CREATE_INVITED_USER_SQL: &str = include_str!("sql/create_invited_user.sql");
const GET_USER_SQL: &str = include_str!("sql/get_user.sql");
const GET_USER_FOR_UPDATE_SQL: &str = include_str!("sql/get_user_for_update.sql");
const FIND_USER_BY_EMAIL_SQL: &str = include_str!("sql/find_user_by_email.sql");
const FIND_CREDENTIALS_BY_EMAIL_SQL: &str = include_str!("sql/find_credentials_by_email.sql");
const LIST_USERS_SQL: &str = include_str!("sql/list_users.sql");
const FIND_INVITE_BY_TOKEN_HASH_SQL: &str = include_str!("sql/find_invite_by_token_hash.sql");
const COMPLETE_INVITE_SQL: &str = include_str!("sql/complete_invite.sql");
const APPROVE_USER_SQL: &str = include_str!("sql/approve_user.sql");
const REJECT_USER_SQL: &str = include_str!("sql/reject_user.sql");
const UPDATE_USER_SQL: &str = include_str!("sql/update_user.sql");
const UPDATE_REGION_SQL: &str = include_str!("sql/update_region.sql");
const SET_RESET_TOKEN_SQL: &str = include_str!("sql/set_reset_token.sql");
const FIND_RESET_BY_TOKEN_HASH_SQL: &str = include_str!("sql/find_reset_by_token_hash.sql");
const UPDATE_PASSWORD_SQL: &str = include_str!("sql/update_password.sql");
const REGION_HAS_POINTS_CONFIG_SQL: &str = include_str!("sql/region_has_points_config.sql");

/// Insert payload for a user that signs up (or is provisioned) with a password.
#[derive(Debug, Clone)]
pub(crate) struct NewUserRow {
    pub uuid: UserUuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub region: Option<Region>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub approved_by: Option<UserUuid>,
    pub is_approved: bool,
}

/// Insert payload for an invited user; the password arrives when the invite is accepted.
#[derive(Debug, Clone)]
pub(crate) struct NewInvitedUserRow {
    pub uuid: UserUuid,
    pub email: String,
    pub role: Role,
    pub region: Option<Region>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub invited_by: UserUuid,
    pub invite_token_hash: String,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgUsersRepository;

impl PgUsersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: NewUserRow,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(CREATE_USER_SQL)
            .bind(user.uuid)
            .bind(user.email)
            .bind(user.username)
            .bind(user.password_hash)
            .bind(user.role.as_str())
            .bind(user.region)
            .bind(user.first_name)
            .bind(user.last_name)
            .bind(user.company)
            .bind(user.is_approved)
            .bind(user.approved_by)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_invited_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: NewInvitedUserRow,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(CREATE_INVITED_USER_SQL)
            .bind(user.uuid)
            .bind(user.email)
            .bind(user.role.as_str())
            .bind(user.region)
            .bind(user.first_name)
            .bind(user.last_name)
            .bind(user.company)
            .bind(user.invited_by)
            .bind(user.invite_token_hash)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(GET_USER_SQL)
            .bind(user)
            .fetch_one(&mut **tx)
            .await
    }

    /// Load a user and lock the row until the transaction ends.
    pub(crate) async fn get_user_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(GET_USER_FOR_UPDATE_SQL)
            .bind(user)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_user_by_email(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        query_as::<Postgres, UserRecord>(FIND_USER_BY_EMAIL_SQL)
            .bind(email)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn find_credentials_by_email(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
    ) -> Result<Option<UserCredentials>, sqlx::Error> {
        query(FIND_CREDENTIALS_BY_EMAIL_SQL)
            .bind(email)
            .fetch_optional(&mut **tx)
            .await?
            .map(|row| {
                Ok(UserCredentials {
                    uuid: row.try_get("uuid")?,
                    password_hash: row.try_get("password_hash")?,
                    is_approved: row.try_get("is_approved")?,
                })
            })
            .transpose()
    }

    pub(crate) async fn list_users(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        region: Option<&Region>,
        approval: Option<ApprovalStatus>,
    ) -> Result<Vec<UserRecord>, sqlx::Error> {
        query_as::<Postgres, UserRecord>(LIST_USERS_SQL)
            .bind(region.map(Region::as_str))
            .bind(approval.map(ApprovalStatus::as_str))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn find_invite_by_token_hash(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        token_hash: &str,
    ) -> Result<Option<InviteRecord>, sqlx::Error> {
        query_as::<Postgres, InviteRecord>(FIND_INVITE_BY_TOKEN_HASH_SQL)
            .bind(token_hash)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn complete_invite(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        username: &str,
        password_hash: &str,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(COMPLETE_INVITE_SQL)
            .bind(user)
            .bind(username)
            .bind(password_hash)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn approve_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        approved_by: UserUuid,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(APPROVE_USER_SQL)
            .bind(user)
            .bind(approved_by)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn reject_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(REJECT_USER_SQL)
            .bind(user)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        role: Role,
        region: Option<&Region>,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(UPDATE_USER_SQL)
            .bind(user)
            .bind(role.as_str())
            .bind(region.map(Region::as_str))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_region(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        region: &Region,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(UPDATE_REGION_SQL)
            .bind(user)
            .bind(region.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_reset_token(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        token_hash: &str,
    ) -> Result<(), sqlx::Error> {
        query(SET_RESET_TOKEN_SQL)
            .bind(user)
            .bind(token_hash)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn find_reset_by_token_hash(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        token_hash: &str,
    ) -> Result<Option<PasswordResetRecord>, sqlx::Error> {
        query(FIND_RESET_BY_TOKEN_HASH_SQL)
            .bind(token_hash)
            .fetch_optional(&mut **tx)
            .await?
            .map(|row| {
                Ok(PasswordResetRecord {
                    user_uuid: row.try_get("user_uuid")?,
                    expires_at: try_get_timestamp(&row, "reset_expires_at")?,
                })
            })
            .transpose()
    }

    pub(crate) async fn update_password(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        password_hash: &str,
    ) -> Result<(), sqlx::Error> {
        query(UPDATE_PASSWORD_SQL)
            .bind(user)
            .bind(password_hash)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn region_has_points_config(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        region: &Region,
    ) -> Result<bool, sqlx::Error> {
        query_scalar(REGION_HAS_POINTS_CONFIG_SQL)
            .bind(region.as_str())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for UserRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            email: row.try_get("email")?,
            username: row.try_get("username")?,
            role: try_get_enum(row, "role")?,
            region: row.try_get("region")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            company: row.try_get("company")?,
            is_approved: row.try_get("is_approved")?,
            approved_by: row.try_get("approved_by")?,
            approved_at: try_get_optional_timestamp(row, "approved_at")?,
            rejected_at: try_get_optional_timestamp(row, "rejected_at")?,
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for InviteRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            user_uuid: row.try_get("user_uuid")?,
            email: row.try_get("email")?,
            role: try_get_enum(row, "role")?,
            region: row.try_get("region")?,
            expires_at: try_get_timestamp(row, "invite_expires_at")?,
            used_at: try_get_optional_timestamp(row, "invite_used_at")?,
        })
    }
}
