//! Donation database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Donation, DonationStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub donor_id: Uuid,
    pub foodbank_id: Uuid,
    pub recipient_id: Option<Uuid>,
    pub category: String,
    pub quantity: i32,
    pub status: String,
    pub assigned_request_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Donation {
    fn from(model: Model) -> Self {
        Donation {
            id: model.id,
            donor_id: model.donor_id,
            foodbank_id: model.foodbank_id,
            recipient_id: model.recipient_id,
            category: model.category,
            quantity: model.quantity,
            status: DonationStatus::from(model.status.as_str()),
            assigned_request_id: model.assigned_request_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        }
    }
}
