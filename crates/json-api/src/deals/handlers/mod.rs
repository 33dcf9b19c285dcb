//! Deal Handlers

pub(crate) mod admin_index;
pub(crate) mod approve;
pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod reject;
pub(crate) mod update;

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, civil::date};

    use loyalty_app::domain::{
        deals::records::{DealRecord, DealStatus, DealUuid, ProductType},
        users::records::UserUuid,
    };

    pub(super) fn make_deal(uuid: DealUuid, owner: UserUuid) -> DealRecord {
        DealRecord {
            uuid,
            user_uuid: owner,
            product_type: ProductType::Software,
            customer_name: "Acme".to_string(),
            deal_value: 500_000,
            quantity: 2,
            close_date: date(2026, 3, 31),
            status: DealStatus::Pending,
            points_earned: 0,
            approved_by: None,
            approved_at: None,
            rejection_reason: None,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }
}
