//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};

use loyalty_app::{
    auth::{MockAuthService, Principal},
    context::AppContext,
    domain::{
        deals::MockDealsService,
        points::MockPointsService,
        points_config::MockPointsConfigService,
        redemptions::{
            MockRedemptionsService,
            records::{RedemptionRecord, RedemptionStatus, RedemptionUuid},
        },
        regions::{Region, RegionError},
        reports::MockReportsService,
        rewards::{
            MockRewardsService,
            records::{RewardRecord, RewardUuid},
        },
        support_tickets::MockSupportTicketsService,
        users::{
            MockUsersService,
            records::{Role, UserRecord, UserUuid},
        },
    },
};

use crate::state::State;

/// One mock per service. Mocks without expectations fail the test when called.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) auth: MockAuthService,
    pub(crate) users: MockUsersService,
    pub(crate) deals: MockDealsService,
    pub(crate) rewards: MockRewardsService,
    pub(crate) redemptions: MockRedemptionsService,
    pub(crate) points: MockPointsService,
    pub(crate) points_config: MockPointsConfigService,
    pub(crate) support_tickets: MockSupportTicketsService,
    pub(crate) reports: MockReportsService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            auth: Arc::new(self.auth),
            users: Arc::new(self.users),
            deals: Arc::new(self.deals),
            rewards: Arc::new(self.rewards),
            redemptions: Arc::new(self.redemptions),
            points: Arc::new(self.points),
            points_config: Arc::new(self.points_config),
            support_tickets: Arc::new(self.support_tickets),
            reports: Arc::new(self.reports),
        })
    }

    /// Serve `route` with these mocks, authenticated as `principal` when given.
    pub(crate) fn service(self, principal: Option<Principal>, route: Router) -> Service {
        let mut router = Router::new().hoop(inject(self.into_state()));

        if let Some(principal) = principal {
            router = router.hoop(inject(principal));
        }

        Service::new(router.push(route))
    }
}

pub(crate) fn north() -> Result<Region, RegionError> {
    Region::parse("north")
}

pub(crate) fn principal(role: Role) -> Result<Principal, RegionError> {
    Ok(Principal {
        user_uuid: UserUuid::new(),
        role,
        region: Some(north()?),
    })
}

pub(crate) fn make_user(uuid: UserUuid, role: Role) -> Result<UserRecord, RegionError> {
    Ok(UserRecord {
        uuid,
        email: "pat@example.com".to_string(),
        username: Some("pat".to_string()),
        role,
        region: Some(north()?),
        first_name: Some("Pat".to_string()),
        last_name: None,
        company: Some("Acme".to_string()),
        is_approved: true,
        approved_by: None,
        approved_at: Some(Timestamp::UNIX_EPOCH),
        rejected_at: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    })
}

pub(crate) fn make_reward(uuid: RewardUuid) -> RewardRecord {
    RewardRecord {
        uuid,
        name: "Headphones".to_string(),
        description: "Noise cancelling".to_string(),
        points_cost: 500,
        category: "electronics".to_string(),
        stock: Some(3),
        is_active: true,
        image_url: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_redemption(
    uuid: RedemptionUuid,
    user: UserUuid,
    reward: RewardUuid,
) -> RedemptionRecord {
    RedemptionRecord {
        uuid,
        user_uuid: user,
        reward_uuid: reward,
        points_spent: 500,
        status: RedemptionStatus::Pending,
        shipping_address: None,
        tracking_number: None,
        approved_by: None,
        approved_at: None,
        shipped_at: None,
        delivered_at: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
