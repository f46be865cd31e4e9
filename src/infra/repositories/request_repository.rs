//! Foodbank request repository implementation with soft delete support.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::request::{self, ActiveModel, Entity as RequestEntity};
use crate::domain::{DonationRequest, NewRequest, RequestFilter, RequestStatus, UpdateRequest};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(feature = "test-utils")]
use mockall::automock;

/// Request repository trait for dependency injection.
///
/// Visibility scoping happens through the filter: callers that may only
/// see their own rows get `foodbank_id` forced by the service layer, so
/// the restriction is part of the query itself.
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// Find active request by ID (excludes soft-deleted)
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DonationRequest>>;

    /// Find request by ID including soft-deleted
    async fn find_by_id_with_deleted(&self, id: Uuid) -> AppResult<Option<DonationRequest>>;

    /// Create a new request with status open
    async fn create(&self, new_request: NewRequest) -> AppResult<DonationRequest>;

    /// Update category/quantity of an active request; status is untouched
    async fn update(&self, id: Uuid, fields: UpdateRequest) -> AppResult<DonationRequest>;

    /// Soft delete request by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// List active requests with filters and pagination
    async fn list(
        &self,
        filter: RequestFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<DonationRequest>, u64)>;
}

/// Concrete implementation of RequestRepository with soft delete
pub struct RequestStore {
    db: DatabaseConnection,
}

impl RequestStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_active(&self, id: Uuid) -> AppResult<request::Model> {
        RequestEntity::find_by_id(id)
            .filter(request::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}

#[async_trait]
impl RequestRepository for RequestStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DonationRequest>> {
        let result = RequestEntity::find_by_id(id)
            .filter(request::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(DonationRequest::from))
    }

    async fn find_by_id_with_deleted(&self, id: Uuid) -> AppResult<Option<DonationRequest>> {
        let result = RequestEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(DonationRequest::from))
    }

    async fn create(&self, new_request: NewRequest) -> AppResult<DonationRequest> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            foodbank_id: Set(new_request.foodbank_id),
            category: Set(new_request.category),
            quantity: Set(new_request.quantity),
            status: Set(RequestStatus::Open.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(DonationRequest::from(model))
    }

    async fn update(&self, id: Uuid, fields: UpdateRequest) -> AppResult<DonationRequest> {
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
        Ok(DonationRequest::from(model))
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
        filter: RequestFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<DonationRequest>, u64)> {
        let mut query = RequestEntity::find()
            .filter(request::Column::DeletedAt.is_null())
            .order_by_desc(request::Column::CreatedAt);

        if let Some(category) = filter.category {
            query = query.filter(request::Column::Category.contains(&category));
        }
        if let Some(quantity) = filter.quantity {
            query = query.filter(request::Column::Quantity.eq(quantity));
        }
        if let Some(foodbank_id) = filter.foodbank_id {
            query = query.filter(request::Column::FoodbankId.eq(foodbank_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(request::Column::Status.eq(status.as_str()));
        }

        let paginator = query.paginate(&self.db, page.limit());
        let total = paginator.num_items().await.map_err(AppError::from)?;
        let models = paginator
            .fetch_page(page.page_index())
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(DonationRequest::from).collect(), total))
    }
}
