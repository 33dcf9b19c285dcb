//! Reward Data

use crate::domain::{
    MAX_STORED_AMOUNT, MAX_STORED_COUNT,
    rewards::{errors::RewardsServiceError, records::RewardRecord},
};

/// New catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReward {
    pub name: String,
    pub description: String,
    pub points_cost: u64,
    pub category: String,
    pub stock: Option<u32>,
    pub image_url: Option<String>,
}

impl NewReward {
    /// Trim text fields, require a name and category, and keep amounts storable.
    pub(crate) fn normalised(self) -> Result<Self, RewardsServiceError> {
        let name = self.name.trim().to_string();
        let category = self.category.trim().to_string();

        if name.is_empty() || category.is_empty() {
            return Err(RewardsServiceError::MissingRequiredData);
        }

        if self.points_cost == 0
            || self.points_cost > MAX_STORED_AMOUNT
            || self.stock.is_some_and(|stock| stock > MAX_STORED_COUNT)
        {
            return Err(RewardsServiceError::InvalidData);
        }

        Ok(Self {
            name,
            category,
            description: self.description.trim().to_string(),
            image_url: self
                .image_url
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
            ..self
        })
    }
}

/// Partial reward update. `stock` and `image_url` use a nested option so they
/// can be cleared.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RewardUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub points_cost: Option<u64>,
    pub category: Option<String>,
    pub stock: Option<Option<u32>>,
    pub is_active: Option<bool>,
    pub image_url: Option<Option<String>>,
}

impl RewardUpdate {
    /// Apply the patch over `existing`, returning the full set of values to store.
    pub(crate) fn apply(
        self,
        existing: &RewardRecord,
    ) -> Result<(NewReward, bool), RewardsServiceError> {
        let values = NewReward {
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            description: self
                .description
                .unwrap_or_else(|| existing.description.clone()),
            points_cost: self.points_cost.unwrap_or(existing.points_cost),
            category: self.category.unwrap_or_else(|| existing.category.clone()),
            stock: self.stock.unwrap_or(existing.stock),
            image_url: self
                .image_url
                .unwrap_or_else(|| existing.image_url.clone()),
        }
        .normalised()?;

        Ok((values, self.is_active.unwrap_or(existing.is_active)))
    }
}
