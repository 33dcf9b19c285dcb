//! Users service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    auth::{
        PgAuthRepository, PlainPassword, Principal, generate_opaque_token, hash_opaque_token,
        hash_password,
    },
    database::Db,
    domain::{
        regions::Region,
        users::{
            data::{
                InviteCompletion, IssuedInvite, NewAccount, NewInvite, NewRegistration,
                UserFilter, UserUpdate,
            },
            errors::UsersServiceError,
            records::{ApprovalStatus, InviteRecord, Role, UserRecord, UserUuid},
            repository::{NewInvitedUserRow, NewUserRow, PgUsersRepository},
        },
    },
    notifications::Notifier,
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
    sessions: PgAuthRepository,
    notifier: Notifier,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db, notifier: Notifier) -> Self {
        Self {
            repository: PgUsersRepository::new(),
            sessions: PgAuthRepository::new(db.pool().clone()),
            notifier,
            db,
        }
    }
}

fn normalise_email(email: &str) -> Result<String, UsersServiceError> {
    let email = email.trim().to_lowercase();

    if email.is_empty() {
        return Err(UsersServiceError::MissingRequiredData);
    }

    if !email.contains('@') {
        return Err(UsersServiceError::InvalidData);
    }

    Ok(email)
}

fn normalise_username(username: &str) -> Result<String, UsersServiceError> {
    let username = username.trim();

    if username.is_empty() {
        return Err(UsersServiceError::MissingRequiredData);
    }

    Ok(username.to_string())
}

fn validate_password(password: &PlainPassword) -> Result<(), UsersServiceError> {
    password
        .validate()
        .map_err(|_| UsersServiceError::WeakPassword)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// An invite can be redeemed once, before it expires.
pub(crate) fn check_invite(invite: &InviteRecord, now: Timestamp) -> Result<(), UsersServiceError> {
    if invite.used_at.is_some() {
        return Err(UsersServiceError::InviteUsed);
    }

    if invite.expires_at <= now {
        return Err(UsersServiceError::InviteExpired);
    }

    Ok(())
}

/// Work out the role and region an actor may hand out in an invite.
fn invite_target(
    actor: &Principal,
    role: Role,
    region: Option<Region>,
) -> Result<(Role, Option<Region>), UsersServiceError> {
    match actor.role {
        Role::User => Err(UsersServiceError::Forbidden),
        Role::RegionalAdmin => {
            let own = actor.region.clone().ok_or(UsersServiceError::Forbidden)?;

            if role != Role::User {
                return Err(UsersServiceError::Forbidden);
            }

            match region {
                Some(region) if region != own => Err(UsersServiceError::Forbidden),
                _ => Ok((role, Some(own))),
            }
        }
        Role::Admin if role >= Role::Admin => Err(UsersServiceError::Forbidden),
        Role::Admin | Role::SuperAdmin => {
            if role.is_region_scoped() && region.is_none() {
                return Err(UsersServiceError::MissingRequiredData);
            }

            Ok((role, region))
        }
    }
}

impl PgUsersService {
    async fn decide_approval(
        &self,
        actor: &Principal,
        user: UserUuid,
        approve: bool,
    ) -> Result<UserRecord, UsersServiceError> {
        actor.admin_scope()?;

        let mut tx = self.db.begin().await?;

        let existing = self.repository.get_user_for_update(&mut tx, user).await?;

        if !actor.can_manage_region(existing.region.as_ref()) {
            return Err(UsersServiceError::Forbidden);
        }

        if existing.approval_status() != ApprovalStatus::Pending {
            return Err(UsersServiceError::InvalidTransition);
        }

        let updated = if approve {
            self.repository
                .approve_user(&mut tx, user, actor.user_uuid)
                .await?
        } else {
            self.repository.reject_user(&mut tx, user).await?
        };

        tx.commit().await?;

        info!(
            user_uuid = %updated.uuid,
            actor = %actor.user_uuid,
            approved = approve,
            "user approval decided"
        );

        Ok(updated)
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    #[tracing::instrument(name = "users.service.register", skip(self, registration), err)]
    async fn register(&self, registration: NewRegistration) -> Result<UserRecord, UsersServiceError> {
        let email = normalise_email(&registration.email)?;
        let username = normalise_username(&registration.username)?;

        validate_password(&registration.password)?;

        let password_hash = hash_password(&registration.password)?;

        let mut tx = self.db.begin().await?;

        let user = self
            .repository
            .create_user(
                &mut tx,
                NewUserRow {
                    uuid: UserUuid::new(),
                    email,
                    username,
                    password_hash,
                    role: Role::User,
                    region: registration.region,
                    first_name: non_blank(registration.first_name),
                    last_name: non_blank(registration.last_name),
                    company: non_blank(registration.company),
                    approved_by: None,
                    is_approved: false,
                },
            )
            .await?;

        tx.commit().await?;

        info!(user_uuid = %user.uuid, "user registered");

        Ok(user)
    }

    #[tracing::instrument(name = "users.service.create_account", skip(self, account), fields(role = %account.role), err)]
    async fn create_account(&self, account: NewAccount) -> Result<UserRecord, UsersServiceError> {
        let email = normalise_email(&account.email)?;
        let username = normalise_username(&account.username)?;

        validate_password(&account.password)?;

        if account.role.is_region_scoped() && account.region.is_none() {
            return Err(UsersServiceError::MissingRequiredData);
        }

        let password_hash = hash_password(&account.password)?;

        let mut tx = self.db.begin().await?;

        let user = self
            .repository
            .create_user(
                &mut tx,
                NewUserRow {
                    uuid: UserUuid::new(),
                    email,
                    username,
                    password_hash,
                    role: account.role,
                    region: account.region,
                    first_name: None,
                    last_name: None,
                    company: None,
                    approved_by: None,
                    is_approved: true,
                },
            )
            .await?;

        tx.commit().await?;

        info!(user_uuid = %user.uuid, "account provisioned");

        Ok(user)
    }

    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let user = self.repository.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(user)
    }

    async fn list_users(
        &self,
        actor: &Principal,
        filter: UserFilter,
    ) -> Result<Vec<UserRecord>, UsersServiceError> {
        let region = actor.admin_scope()?;

        let mut tx = self.db.begin().await?;

        let users = self
            .repository
            .list_users(&mut tx, region, filter.approval)
            .await?;

        tx.commit().await?;

        Ok(users)
    }

    #[tracing::instrument(
        name = "users.service.invite_user",
        skip(self, actor, invite),
        fields(actor = %actor.user_uuid, role = %invite.role),
        err
    )]
    async fn invite_user(
        &self,
        actor: &Principal,
        invite: NewInvite,
    ) -> Result<IssuedInvite, UsersServiceError> {
        let (role, region) = invite_target(actor, invite.role, invite.region)?;
        let email = normalise_email(&invite.email)?;
        let token = generate_opaque_token();

        let mut tx = self.db.begin().await?;

        let user = self
            .repository
            .create_invited_user(
                &mut tx,
                NewInvitedUserRow {
                    uuid: UserUuid::new(),
                    email,
                    role,
                    region,
                    first_name: non_blank(invite.first_name),
                    last_name: non_blank(invite.last_name),
                    company: non_blank(invite.company),
                    invited_by: actor.user_uuid,
                    invite_token_hash: hash_opaque_token(&token),
                },
            )
            .await?;

        tx.commit().await?;

        info!(user_uuid = %user.uuid, "user invited");

        self.notifier.invite(&user, &token).await;

        Ok(IssuedInvite { user, token })
    }

    async fn verify_invite(&self, token: &str) -> Result<InviteRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let invite = self
            .repository
            .find_invite_by_token_hash(&mut tx, &hash_opaque_token(token))
            .await?
            .ok_or(UsersServiceError::NotFound)?;

        tx.commit().await?;

        check_invite(&invite, Timestamp::now())?;

        Ok(invite)
    }

    #[tracing::instrument(name = "users.service.register_with_token", skip(self, completion), err)]
    async fn register_with_token(
        &self,
        completion: InviteCompletion,
    ) -> Result<UserRecord, UsersServiceError> {
        let username = normalise_username(&completion.username)?;

        validate_password(&completion.password)?;

        let mut tx = self.db.begin().await?;

        let invite = self
            .repository
            .find_invite_by_token_hash(&mut tx, &hash_opaque_token(&completion.token))
            .await?
            .ok_or(UsersServiceError::NotFound)?;

        check_invite(&invite, Timestamp::now())?;

        let password_hash = hash_password(&completion.password)?;

        let user = self
            .repository
            .complete_invite(&mut tx, invite.user_uuid, &username, &password_hash)
            .await?;

        tx.commit().await?;

        info!(user_uuid = %user.uuid, "invite accepted");

        Ok(user)
    }

    #[tracing::instrument(name = "users.service.approve_user", skip(self, actor), fields(actor = %actor.user_uuid), err)]
    async fn approve_user(
        &self,
        actor: &Principal,
        user: UserUuid,
    ) -> Result<UserRecord, UsersServiceError> {
        let approved = self.decide_approval(actor, user, true).await?;

        self.notifier.account_approved(&approved).await;

        Ok(approved)
    }

    #[tracing::instrument(name = "users.service.reject_user", skip(self, actor), fields(actor = %actor.user_uuid), err)]
    async fn reject_user(
        &self,
        actor: &Principal,
        user: UserUuid,
    ) -> Result<UserRecord, UsersServiceError> {
        let rejected = self.decide_approval(actor, user, false).await?;

        self.notifier.account_rejected(&rejected).await;

        Ok(rejected)
    }

    #[tracing::instrument(name = "users.service.update_user", skip(self, actor, update), fields(actor = %actor.user_uuid), err)]
    async fn update_user(
        &self,
        actor: &Principal,
        user: UserUuid,
        update: UserUpdate,
    ) -> Result<UserRecord, UsersServiceError> {
        actor.require_role(Role::SuperAdmin)?;

        let mut tx = self.db.begin().await?;

        let existing = self.repository.get_user_for_update(&mut tx, user).await?;

        let role = update.role.unwrap_or(existing.role);
        let region = update.region.or(existing.region);

        if role.is_region_scoped() && region.is_none() {
            return Err(UsersServiceError::MissingRequiredData);
        }

        let updated = self
            .repository
            .update_user(&mut tx, user, role, region.as_ref())
            .await?;

        tx.commit().await?;

        info!(user_uuid = %updated.uuid, role = %updated.role, "user updated");

        Ok(updated)
    }

    #[tracing::instrument(name = "users.service.request_password_reset", skip_all)]
    async fn request_password_reset(&self, email: &str) -> Result<(), UsersServiceError> {
        let email = email.trim().to_lowercase();
        let mut tx = self.db.begin().await?;

        let Some(user) = self.repository.find_user_by_email(&mut tx, &email).await? else {
            info!("password reset requested for unknown email");

            return Ok(());
        };

        let token = generate_opaque_token();

        self.repository
            .set_reset_token(&mut tx, user.uuid, &hash_opaque_token(&token))
            .await?;

        tx.commit().await?;

        info!(user_uuid = %user.uuid, "password reset issued");

        self.notifier.password_reset(&user, &token).await;

        Ok(())
    }

    #[tracing::instrument(name = "users.service.reset_password", skip_all, err)]
    async fn reset_password(
        &self,
        token: &str,
        password: PlainPassword,
    ) -> Result<(), UsersServiceError> {
        validate_password(&password)?;

        let mut tx = self.db.begin().await?;

        let reset = self
            .repository
            .find_reset_by_token_hash(&mut tx, &hash_opaque_token(token))
            .await?
            .ok_or(UsersServiceError::InvalidResetToken)?;

        if reset.expires_at <= Timestamp::now() {
            return Err(UsersServiceError::InvalidResetToken);
        }

        let password_hash = hash_password(&password)?;

        self.repository
            .update_password(&mut tx, reset.user_uuid, &password_hash)
            .await?;

        let revoked = self
            .sessions
            .revoke_user_sessions(&mut tx, reset.user_uuid)
            .await?;

        tx.commit().await?;

        info!(user_uuid = %reset.user_uuid, revoked, "password reset");

        Ok(())
    }

    #[tracing::instrument(name = "users.service.assign_region", skip(self), err)]
    async fn assign_region(
        &self,
        email: &str,
        region: &Region,
    ) -> Result<UserRecord, UsersServiceError> {
        let email = normalise_email(email)?;

        let mut tx = self.db.begin().await?;

        if !self
            .repository
            .region_has_points_config(&mut tx, region)
            .await?
        {
            return Err(UsersServiceError::UnknownRegion);
        }

        let user = self
            .repository
            .find_user_by_email(&mut tx, &email)
            .await?
            .ok_or(UsersServiceError::NotFound)?;

        let updated = self
            .repository
            .update_region(&mut tx, user.uuid, region)
            .await?;

        tx.commit().await?;

        info!(user_uuid = %updated.uuid, %region, "region assigned");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Self-service sign-up. The account waits for admin approval.
    async fn register(&self, registration: NewRegistration) -> Result<UserRecord, UsersServiceError>;

    /// Create an approved account with a password, bypassing the invite flow.
    async fn create_account(&self, account: NewAccount) -> Result<UserRecord, UsersServiceError>;

    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError>;

    /// Admin listing, limited to the actor's region for regional admins.
    async fn list_users(
        &self,
        actor: &Principal,
        filter: UserFilter,
    ) -> Result<Vec<UserRecord>, UsersServiceError>;

    /// Provision an approved account and email a single-use registration link.
    async fn invite_user(
        &self,
        actor: &Principal,
        invite: NewInvite,
    ) -> Result<IssuedInvite, UsersServiceError>;

    async fn verify_invite(&self, token: &str) -> Result<InviteRecord, UsersServiceError>;

    /// Set username and password on an invited account.
    async fn register_with_token(
        &self,
        completion: InviteCompletion,
    ) -> Result<UserRecord, UsersServiceError>;

    async fn approve_user(
        &self,
        actor: &Principal,
        user: UserUuid,
    ) -> Result<UserRecord, UsersServiceError>;

    async fn reject_user(
        &self,
        actor: &Principal,
        user: UserUuid,
    ) -> Result<UserRecord, UsersServiceError>;

    /// Change role or region. Super-admins only.
    async fn update_user(
        &self,
        actor: &Principal,
        user: UserUuid,
        update: UserUpdate,
    ) -> Result<UserRecord, UsersServiceError>;

    /// Email a reset link if the address belongs to an account. Succeeds either way.
    async fn request_password_reset(&self, email: &str) -> Result<(), UsersServiceError>;

    /// Replace the password behind a reset token and end every session of that user.
    async fn reset_password(
        &self,
        token: &str,
        password: PlainPassword,
    ) -> Result<(), UsersServiceError>;

    /// Move a user into a region that has a points configuration.
    async fn assign_region(
        &self,
        email: &str,
        region: &Region,
    ) -> Result<UserRecord, UsersServiceError>;
}
