//! Deal request and response bodies.

use std::string::ToString;

use jiff::civil::Date;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use loyalty_app::domain::deals::{
    data::{DealUpdate, NewDeal},
    records::{DealRecord, DealStatus, ProductType},
};

use crate::extensions::*;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DealResponse {
    pub uuid: Uuid,
    pub user_uuid: Uuid,

    /// `software`, `hardware` or `equipment`
    pub product_type: String,
    pub customer_name: String,

    /// Deal value in cents
    pub deal_value: u64,
    pub quantity: u32,
    pub close_date: String,

    /// `pending`, `approved` or `rejected`
    pub status: String,

    /// Zero until the deal is approved
    pub points_earned: u64,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<DealRecord> for DealResponse {
    fn from(deal: DealRecord) -> Self {
        DealResponse {
            uuid: deal.uuid.into(),
            user_uuid: deal.user_uuid.into(),
            product_type: deal.product_type.as_str().to_string(),
            customer_name: deal.customer_name,
            deal_value: deal.deal_value,
            quantity: deal.quantity,
            close_date: deal.close_date.to_string(),
            status: deal.status.as_str().to_string(),
            points_earned: deal.points_earned,
            approved_by: deal.approved_by.map(Into::into),
            approved_at: deal.approved_at.as_ref().map(ToString::to_string),
            rejection_reason: deal.rejection_reason,
            created_at: deal.created_at.to_string(),
            updated_at: deal.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DealsResponse {
    pub deals: Vec<DealResponse>,
}

/// New deal, or the fields to change on a pending one.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct DealRequest {
    pub product_type: Option<String>,
    pub customer_name: Option<String>,
    pub deal_value: Option<u64>,
    pub quantity: Option<u32>,

    /// `YYYY-MM-DD`
    pub close_date: Option<String>,
}

impl DealRequest {
    pub(crate) fn into_update(self) -> Result<DealUpdate, StatusError> {
        Ok(DealUpdate {
            product_type: self
                .product_type
                .as_deref()
                .map(str::parse::<ProductType>)
                .transpose()
                .or_400("invalid product type")?,
            close_date: self
                .close_date
                .as_deref()
                .map(str::parse::<Date>)
                .transpose()
                .or_400("invalid close date")?,
            customer_name: self.customer_name,
            deal_value: self.deal_value,
            quantity: self.quantity,
        })
    }

    pub(crate) fn into_new_deal(self) -> Result<NewDeal, StatusError> {
        let update = self.into_update()?;
        let missing = |field: &str| StatusError::bad_request().brief(format!("{field} is required"));

        Ok(NewDeal {
            product_type: update.product_type.ok_or_else(|| missing("product_type"))?,
            customer_name: update.customer_name.ok_or_else(|| missing("customer_name"))?,
            deal_value: update.deal_value.ok_or_else(|| missing("deal_value"))?,
            quantity: update.quantity.unwrap_or(1),
            close_date: update.close_date.ok_or_else(|| missing("close_date"))?,
        })
    }
}

pub(crate) fn parse_status(value: Option<String>) -> Result<Option<DealStatus>, StatusError> {
    value
        .as_deref()
        .map(str::parse::<DealStatus>)
        .transpose()
        .or_400("invalid status filter")
}
