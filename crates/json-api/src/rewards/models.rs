//! Reward request and response bodies.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use loyalty_app::domain::rewards::{
    data::{NewReward, RewardUpdate},
    records::RewardRecord,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RewardResponse {
    pub uuid: Uuid,
    pub name: String,
    pub description: String,
    pub points_cost: u64,
    pub category: String,

    /// Remaining units, `null` when unlimited
    pub stock: Option<u32>,
    pub is_active: bool,
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<RewardRecord> for RewardResponse {
    fn from(reward: RewardRecord) -> Self {
        RewardResponse {
            uuid: reward.uuid.into(),
            name: reward.name,
            description: reward.description,
            points_cost: reward.points_cost,
            category: reward.category,
            stock: reward.stock,
            is_active: reward.is_active,
            image_url: reward.image_url,
            created_at: reward.created_at.to_string(),
            updated_at: reward.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RewardsResponse {
    pub rewards: Vec<RewardResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateRewardRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub points_cost: u64,
    pub category: String,
    pub stock: Option<u32>,
    pub image_url: Option<String>,
}

impl From<CreateRewardRequest> for NewReward {
    fn from(request: CreateRewardRequest) -> Self {
        NewReward {
            name: request.name,
            description: request.description,
            points_cost: request.points_cost,
            category: request.category,
            stock: request.stock,
            image_url: request.image_url,
        }
    }
}

/// Fields to change. `null` clears `stock` (unlimited) or `image_url`.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateRewardRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub points_cost: Option<u64>,
    pub category: Option<String>,

    #[serde(default, deserialize_with = "crate::nullable::deserialize")]
    #[salvo(schema(value_type = Option<u32>))]
    pub stock: Option<Option<u32>>,
    pub is_active: Option<bool>,

    #[serde(default, deserialize_with = "crate::nullable::deserialize")]
    #[salvo(schema(value_type = Option<String>))]
    pub image_url: Option<Option<String>>,
}

impl From<UpdateRewardRequest> for RewardUpdate {
    fn from(request: UpdateRewardRequest) -> Self {
        RewardUpdate {
            name: request.name,
            description: request.description,
            points_cost: request.points_cost,
            category: request.category,
            stock: request.stock,
            is_active: request.is_active,
            image_url: request.image_url,
        }
    }
}
