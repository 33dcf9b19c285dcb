//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use subtle::ConstantTimeEq;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        AuthServiceError, IssuedSession, PlainPassword, Principal, SessionTokenVersion,
        format_session_token, generate_session_secret,
        models::NewSession,
        parse_session_token,
        password::verify_password,
        repository::PgAuthRepository,
        session_verifier,
    },
    database::Db,
    domain::users::repository::PgUsersRepository,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    repository: PgAuthRepository,
    users: PgUsersRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            repository: PgAuthRepository::new(db.pool().clone()),
            users: PgUsersRepository::new(),
            db,
        }
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    #[tracing::instrument(name = "auth.service.login", skip(self, password), err)]
    async fn login(
        &self,
        email: &str,
        password: &PlainPassword,
    ) -> Result<IssuedSession, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let credentials = self
            .users
            .find_credentials_by_email(&mut tx, email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        let Some(password_hash) = credentials.password_hash.as_deref() else {
            return Err(AuthServiceError::InvalidCredentials);
        };

        if !verify_password(password, password_hash)? {
            return Err(AuthServiceError::InvalidCredentials);
        }

        if !credentials.is_approved {
            return Err(AuthServiceError::NotApproved);
        }

        let session_uuid = Uuid::now_v7();
        let version = SessionTokenVersion::V1;
        let secret = generate_session_secret();
        let token = format_session_token(session_uuid, version, &secret);

        let session = self
            .repository
            .create_session(
                &mut tx,
                NewSession {
                    uuid: session_uuid,
                    user_uuid: credentials.uuid,
                    version,
                    token_hash: session_verifier(
                        &session_uuid,
                        version,
                        &credentials.uuid,
                        &secret,
                    ),
                },
            )
            .await?;

        let user = self.users.get_user(&mut tx, credentials.uuid).await?;

        tx.commit().await?;

        info!(user_uuid = %user.uuid, session_uuid = %session.uuid, "user logged in");

        Ok(IssuedSession {
            token,
            session,
            user,
        })
    }

    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError> {
        let parsed = parse_session_token(bearer_token).map_err(|_| AuthServiceError::NotFound)?;

        let session = self
            .repository
            .find_active_session(parsed.session_uuid, parsed.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if session.version != parsed.version {
            return Err(AuthServiceError::NotFound);
        }

        let expected = session_verifier(
            &parsed.session_uuid,
            parsed.version,
            &session.user_uuid,
            &parsed.secret,
        );

        if !constant_time_eq(expected.as_bytes(), session.token_hash.as_bytes()) {
            return Err(AuthServiceError::NotFound);
        }

        // Best-effort metadata update; auth success should not depend on this write.
        if let Err(error) = self.repository.touch_session(parsed.session_uuid).await {
            warn!(session_uuid = %parsed.session_uuid, %error, "failed to record session use");
        }

        Ok(Principal {
            user_uuid: session.user_uuid,
            role: session.role,
            region: session.region,
        })
    }

    #[tracing::instrument(name = "auth.service.logout", skip(self, bearer_token), err)]
    async fn logout(&self, bearer_token: &str) -> Result<(), AuthServiceError> {
        // Only the holder of the full token may revoke it.
        self.authenticate_bearer(bearer_token).await?;

        let parsed = parse_session_token(bearer_token)?;

        if !self.repository.revoke_session(parsed.session_uuid).await? {
            return Err(AuthServiceError::NotFound);
        }

        info!(session_uuid = %parsed.session_uuid, "session revoked");

        Ok(())
    }
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    left.ct_eq(right).into()
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify credentials and open a new session.
    async fn login(
        &self,
        email: &str,
        password: &PlainPassword,
    ) -> Result<IssuedSession, AuthServiceError>;

    /// Resolve a bearer token to the identity behind it.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError>;

    /// Revoke the session behind a bearer token.
    async fn logout(&self, bearer_token: &str) -> Result<(), AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::{
        domain::users::records::Role,
        test::TestContext,
    };

    #[test]
    fn constant_time_eq_compares_contents() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }

    #[tokio::test]
    async fn login_issues_a_token_that_authenticates() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx
            .create_user("partner@example.com", Role::User, Some("north"))
            .await?;

        let issued = ctx
            .auth
            .login("Partner@Example.com ", &PlainPassword::new(TestContext::PASSWORD))
            .await?;

        assert_eq!(issued.user.uuid, user.uuid);
        assert!(issued.token.starts_with("lr_v1_"));

        let principal = ctx.auth.authenticate_bearer(&issued.token).await?;

        assert_eq!(principal.user_uuid, user.uuid);
        assert_eq!(principal.role, Role::User);
        assert_eq!(principal.region.as_ref().map(|r| r.as_str()), Some("north"));

        Ok(())
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() -> TestResult {
        let ctx = TestContext::new().await;
        ctx.create_user("partner@example.com", Role::User, None)
            .await?;

        let result = ctx
            .auth
            .login("partner@example.com", &PlainPassword::new("not the password"))
            .await;

        assert!(matches!(result, Err(AuthServiceError::InvalidCredentials)));

        Ok(())
    }

    #[tokio::test]
    async fn login_rejects_unknown_email() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx
            .auth
            .login("nobody@example.com", &PlainPassword::new(TestContext::PASSWORD))
            .await;

        assert!(matches!(result, Err(AuthServiceError::InvalidCredentials)));

        Ok(())
    }

    #[tokio::test]
    async fn login_rejects_unapproved_users() -> TestResult {
        let ctx = TestContext::new().await;
        ctx.register("pending@example.com", "pending").await?;

        let result = ctx
            .auth
            .login("pending@example.com", &PlainPassword::new(TestContext::PASSWORD))
            .await;

        assert!(matches!(result, Err(AuthServiceError::NotApproved)));

        Ok(())
    }

    #[tokio::test]
    async fn tampered_tokens_do_not_authenticate() -> TestResult {
        let ctx = TestContext::new().await;
        ctx.create_user("partner@example.com", Role::User, None)
            .await?;

        let issued = ctx
            .auth
            .login("partner@example.com", &PlainPassword::new(TestContext::PASSWORD))
            .await?;

        let (id, _secret) = issued
            .token
            .split_once('.')
            .ok_or("token should contain a secret")?;
        let forged = format!("{id}.{}", "0".repeat(64));

        assert!(matches!(
            ctx.auth.authenticate_bearer(&forged).await,
            Err(AuthServiceError::NotFound)
        ));
        assert!(matches!(
            ctx.auth.authenticate_bearer("garbage").await,
            Err(AuthServiceError::NotFound)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn logout_revokes_the_session() -> TestResult {
        let ctx = TestContext::new().await;
        ctx.create_user("partner@example.com", Role::User, None)
            .await?;

        let issued = ctx
            .auth
            .login("partner@example.com", &PlainPassword::new(TestContext::PASSWORD))
            .await?;

        ctx.auth.logout(&issued.token).await?;

        assert!(matches!(
            ctx.auth.authenticate_bearer(&issued.token).await,
            Err(AuthServiceError::NotFound)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let token = format_session_token(
            Uuid::now_v7(),
            SessionTokenVersion::V1,
            &generate_session_secret(),
        );
        let ctx = TestContext::new().await;

        assert!(matches!(
            ctx.auth.authenticate_bearer(&token).await,
            Err(AuthServiceError::NotFound)
        ));
    }
}
