//! Foodbank request database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{DonationRequest, RequestStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub foodbank_id: Uuid,
    pub category: String,
    pub quantity: i32,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for DonationRequest {
    fn from(model: Model) -> Self {
        DonationRequest {
            id: model.id,
            foodbank_id: model.foodbank_id,
            category: model.category,
            quantity: model.quantity,
            status: RequestStatus::from(model.status.as_str()),
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        }
    }
}
