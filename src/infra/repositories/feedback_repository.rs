//! Feedback repository implementation with soft delete support.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::feedback::{self, ActiveModel, Entity as FeedbackEntity};
use crate::domain::{Feedback, FeedbackFilter, NewFeedback, UpdateFeedback};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(feature = "test-utils")]
use mockall::automock;

/// Feedback repository trait for dependency injection.
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Find active feedback by ID (excludes soft-deleted)
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Feedback>>;

    /// Create a new feedback entry
    async fn create(&self, new_feedback: NewFeedback) -> AppResult<Feedback>;

    /// Update note/rating of an active feedback entry
    async fn update(&self, id: Uuid, fields: UpdateFeedback) -> AppResult<Feedback>;

    /// Soft delete feedback by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// List active feedback with filters and pagination
    async fn list(
        &self,
        filter: FeedbackFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<Feedback>, u64)>;
}

/// Concrete implementation of FeedbackRepository with soft delete
pub struct FeedbackStore {
    db: DatabaseConnection,
}

impl FeedbackStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_active(&self, id: Uuid) -> AppResult<feedback::Model> {
        FeedbackEntity::find_by_id(id)
            .filter(feedback::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}

#[async_trait]
impl FeedbackRepository for FeedbackStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Feedback>> {
        let result = FeedbackEntity::find_by_id(id)
            .filter(feedback::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Feedback::from))
    }

    async fn create(&self, new_feedback: NewFeedback) -> AppResult<Feedback> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            recipient_id: Set(new_feedback.recipient_id),
            foodbank_id: Set(new_feedback.foodbank_id),
            thank_you_note: Set(new_feedback.thank_you_note),
            rating: Set(new_feedback.rating),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Feedback::from(model))
    }

    async fn update(&self, id: Uuid, fields: UpdateFeedback) -> AppResult<Feedback> {
        let model = self.find_active(id).await?;
        let mut active: ActiveModel = model.into();

        if let Some(thank_you_note) = fields.thank_you_note {
            active.thank_you_note = Set(thank_you_note);
        }
        if let Some(rating) = fields.rating {
            active.rating = Set(rating);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Feedback::from(model))
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
        filter: FeedbackFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<Feedback>, u64)> {
        let mut query = FeedbackEntity::find()
            .filter(feedback::Column::DeletedAt.is_null())
            .order_by_desc(feedback::Column::CreatedAt);

        if let Some(recipient_id) = filter.recipient_id {
            query = query.filter(feedback::Column::RecipientId.eq(recipient_id));
        }
        if let Some(foodbank_id) = filter.foodbank_id {
            query = query.filter(feedback::Column::FoodbankId.eq(foodbank_id));
        }
        if let Some(rating) = filter.rating {
            query = query.filter(feedback::Column::Rating.eq(rating));
        }

        let paginator = query.paginate(&self.db, page.limit());
        let total = paginator.num_items().await.map_err(AppError::from)?;
        let models = paginator
            .fetch_page(page.page_index())
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(Feedback::from).collect(), total))
    }
}
