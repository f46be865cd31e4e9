//! Donation repository implementation with soft delete support.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::donation::{self, ActiveModel, Entity as DonationEntity};
use crate::domain::{Donation, DonationFilter, DonationStatus, NewDonation, UpdateDonation};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(feature = "test-utils")]
use mockall::automock;

/// Donation repository trait for dependency injection.
///
/// Query methods exclude soft-deleted records unless stated otherwise.
/// Status transitions happen through dedicated methods; there is no
/// generic status setter.
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait]
pub trait DonationRepository: Send + Sync {
    /// Find active donation by ID (excludes soft-deleted)
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Donation>>;

    /// Find donation by ID including soft-deleted (historical display)
    async fn find_by_id_with_deleted(&self, id: Uuid) -> AppResult<Option<Donation>>;

    /// Create a new donation; status derives from recipient presence
    async fn create(&self, new_donation: NewDonation) -> AppResult<Donation>;

    /// Update category/quantity of an active donation
    async fn update(&self, id: Uuid, fields: UpdateDonation) -> AppResult<Donation>;

    /// Link a recipient and move the donation to assigned
    async fn assign_recipient(&self, id: Uuid, recipient_id: Uuid) -> AppResult<Donation>;

    /// Move the donation to completed
    async fn complete(&self, id: Uuid) -> AppResult<Donation>;

    /// Soft delete donation by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// List active donations with filters and pagination
    async fn list(
        &self,
        filter: DonationFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<Donation>, u64)>;
}

/// Concrete implementation of DonationRepository with soft delete
pub struct DonationStore {
    db: DatabaseConnection,
}

impl DonationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_active(&self, id: Uuid) -> AppResult<donation::Model> {
        DonationEntity::find_by_id(id)
            .filter(donation::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}

#[async_trait]
impl DonationRepository for DonationStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Donation>> {
        let result = DonationEntity::find_by_id(id)
            .filter(donation::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Donation::from))
    }

    async fn find_by_id_with_deleted(&self, id: Uuid) -> AppResult<Option<Donation>> {
        let result = DonationEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Donation::from))
    }

    async fn create(&self, new_donation: NewDonation) -> AppResult<Donation> {
        let now = chrono::Utc::now();
        let status = DonationStatus::initial(new_donation.recipient_id);

        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            donor_id: Set(new_donation.donor_id),
            foodbank_id: Set(new_donation.foodbank_id),
            recipient_id: Set(new_donation.recipient_id),
            category: Set(new_donation.category),
            quantity: Set(new_donation.quantity),
            status: Set(status.to_string()),
            assigned_request_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Donation::from(model))
    }

    async fn update(&self, id: Uuid, fields: UpdateDonation) -> AppResult<Donation> {
        let model = self.find_active(id).await?;
        let mut active: ActiveModel = model.into();

        if let Some(category) = fields.category {
            active.category = Set(category);
        }
        if let Some(quantity) = fields.quantity {
            active.quantity = Set(quantity);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Donation::from(model))
    }

    async fn assign_recipient(&self, id: Uuid, recipient_id: Uuid) -> AppResult<Donation> {
        let model = self.find_active(id).await?;
        let mut active: ActiveModel = model.into();

        active.recipient_id = Set(Some(recipient_id));
        active.status = Set(DonationStatus::Assigned.to_string());
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Donation::from(model))
    }

    async fn complete(&self, id: Uuid) -> AppResult<Donation> {
        let model = self.find_active(id).await?;
        let mut active: ActiveModel = model.into();

        active.status = Set(DonationStatus::Completed.to_string());
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Donation::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let model = self.find_active(id).await?;
        let mut active: ActiveModel = model.into();

        let now = chrono::Utc::now();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);

        active.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn list(
        &self,
        filter: DonationFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<Donation>, u64)> {
        let mut query = DonationEntity::find()
            .filter(donation::Column::DeletedAt.is_null())
            .order_by_desc(donation::Column::CreatedAt);

        if let Some(category) = filter.category {
            query = query.filter(donation::Column::Category.eq(category));
        }
        if let Some(donor_id) = filter.donor_id {
            query = query.filter(donation::Column::DonorId.eq(donor_id));
        }
        if let Some(foodbank_id) = filter.foodbank_id {
            query = query.filter(donation::Column::FoodbankId.eq(foodbank_id));
        }
        if let Some(recipient_id) = filter.recipient_id {
            query = query.filter(donation::Column::RecipientId.eq(recipient_id));
        }

        let paginator = query.paginate(&self.db, page.limit());
        let total = paginator.num_items().await.map_err(AppError::from)?;
        let models = paginator
            .fetch_page(page.page_index())
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(Donation::from).collect(), total))
    }
}
