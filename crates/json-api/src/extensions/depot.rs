//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use loyalty_app::{auth::Principal, domain::users::records::Role};

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_principal(&mut self, principal: Principal);

    /// The authenticated caller, or 401 when the auth middleware did not run.
    fn principal_or_401(&self) -> Result<&Principal, StatusError>;

    /// The authenticated caller when they hold at least `minimum`, otherwise 403.
    fn principal_with_role(&self, minimum: Role) -> Result<&Principal, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_principal(&mut self, principal: Principal) {
        self.inject(principal);
    }

    fn principal_or_401(&self) -> Result<&Principal, StatusError> {
        self.obtain::<Principal>()
            .map_err(|_ignored| StatusError::unauthorized())
    }

    fn principal_with_role(&self, minimum: Role) -> Result<&Principal, StatusError> {
        let principal = self.principal_or_401()?;

        principal
            .require_role(minimum)
            .map_err(|_ignored| StatusError::forbidden().brief("Insufficient role"))?;

        Ok(principal)
    }
}
