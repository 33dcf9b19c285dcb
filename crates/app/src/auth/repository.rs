//! Session repository.

use sqlx::{
    FromRow, PgPool, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar,
};
use uuid::Uuid;

use crate::{
    auth::{
        SessionTokenVersion,
        models::{ActiveSession, NewSession, SessionRecord},
    },
    domain::{
        rows::{try_get_enum, try_get_timestamp},
        users::records::UserUuid,
    },
};

const CREATE_SESSION_SQL: &str = include_str!("sql/create_session.sql");
const FIND_ACTIVE_SESSION_SQL: &str = include_str!("sql/find_active_session.sql");
const TOUCH_SESSION_SQL: &str = include_str!("sql/touch_session.sql");
const REVOKE_SESSION_SQL: &str = include_str!("sql/revoke_session.sql");
const REVOKE_USER_SESSIONS_SQL: &str = include_str!("sql/revoke_user_sessions.sql");

#[derive(Debug, Clone)]
pub(crate) struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn create_session(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session: NewSession,
    ) -> Result<SessionRecord, sqlx::Error> {
        query_as::<Postgres, SessionRecord>(CREATE_SESSION_SQL)
            .bind(session.uuid)
            .bind(session.user_uuid)
            .bind(session.version.as_i16())
            .bind(session.token_hash)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_active_session(
        &self,
        session_uuid: Uuid,
        version: SessionTokenVersion,
    ) -> Result<Option<ActiveSession>, sqlx::Error> {
        query_as::<Postgres, ActiveSession>(FIND_ACTIVE_SESSION_SQL)
            .bind(session_uuid)
            .bind(version.as_i16())
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn touch_session(&self, session_uuid: Uuid) -> Result<(), sqlx::Error> {
        query(TOUCH_SESSION_SQL)
            .bind(session_uuid)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Revoke one session. Returns `true` when it was still active.
    pub(crate) async fn revoke_session(&self, session_uuid: Uuid) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, Uuid>(REVOKE_SESSION_SQL)
            .bind(session_uuid)
            .fetch_optional(&self.pool)
            .await
            .map(|revoked| revoked.is_some())
    }

    pub(crate) async fn revoke_user_sessions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        query(REVOKE_USER_SESSIONS_SQL)
            .bind(user)
            .execute(&mut **tx)
            .await
            .map(|result| result.rows_affected())
    }
}

impl<'r> FromRow<'r, PgRow> for ActiveSession {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let version: i16 = row.try_get("version")?;

        Ok(Self {
            user_uuid: row.try_get("user_uuid")?,
            version: SessionTokenVersion::try_from(version).map_err(|e| {
                sqlx::Error::ColumnDecode {
                    index: "version".to_string(),
                    source: Box::new(e),
                }
            })?,
            token_hash: row.try_get("token_hash")?,
            role: try_get_enum(row, "role")?,
            region: row.try_get("region")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for SessionRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            user_uuid: row.try_get("user_uuid")?,
            created_at: try_get_timestamp(row, "created_at")?,
            expires_at: try_get_timestamp(row, "expires_at")?,
        })
    }
}
