//! Deal Data

use jiff::civil::Date;

use crate::domain::deals::records::{DealStatus, ProductType};

/// Deal submitted by a partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeal {
    pub product_type: ProductType,
    pub customer_name: String,
    pub deal_value: u64,
    pub quantity: u32,
    pub close_date: Date,
}

/// Owner edits to a pending deal. Absent fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DealUpdate {
    pub product_type: Option<ProductType>,
    pub customer_name: Option<String>,
    pub deal_value: Option<u64>,
    pub quantity: Option<u32>,
    pub close_date: Option<Date>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DealFilter {
    pub status: Option<DealStatus>,
}
