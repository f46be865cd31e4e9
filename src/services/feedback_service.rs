//! Feedback service.
//!
//! Recipients leave thank-you notes and ratings for foodbanks. The
//! recipient who wrote a feedback (or an admin) may edit or delete it.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[cfg(feature = "test-utils")]
use mockall::automock;

use crate::config::{MAX_RATING, MIN_RATING};
use crate::domain::policy::{self, Action};
use crate::domain::{Feedback, FeedbackFilter, NewFeedback, Principal, UpdateFeedback, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

/// Feedback service trait for dependency injection.
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait]
pub trait FeedbackService: Send + Sync {
    /// Create feedback from a recipient to a foodbank
    async fn create_feedback(
        &self,
        principal: Principal,
        new_feedback: NewFeedback,
    ) -> AppResult<Feedback>;

    /// Get a feedback entry
    async fn get_feedback(&self, id: Uuid) -> AppResult<Feedback>;

    /// List feedback with filters
    async fn list_feedbacks(
        &self,
        filter: FeedbackFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<Feedback>>;

    /// Partial update of note/rating by the author or an admin
    async fn update_feedback(
        &self,
        principal: Principal,
        id: Uuid,
        fields: UpdateFeedback,
    ) -> AppResult<Feedback>;

    /// Soft delete a feedback entry
    async fn delete_feedback(&self, principal: Principal, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of FeedbackService using Unit of Work.
pub struct FeedbackManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> FeedbackManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    fn validate_rating(rating: i32) -> AppResult<()> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(AppError::validation(format!(
                "rating must be between {MIN_RATING} and {MAX_RATING}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> FeedbackService for FeedbackManager<U> {
    async fn create_feedback(
        &self,
        principal: Principal,
        new_feedback: NewFeedback,
    ) -> AppResult<Feedback> {
        policy::authorize(
            &principal,
            Action::CreateFeedback,
            Some(new_feedback.recipient_id),
        )?;
        Self::validate_rating(new_feedback.rating)?;

        let foodbank = self
            .uow
            .users()
            .find_by_id(new_feedback.foodbank_id)
            .await?
            .ok_or_else(|| AppError::validation("foodbank_id does not reference an existing user"))?;
        if foodbank.role != UserRole::Foodbank {
            return Err(AppError::validation(
                "foodbank_id must reference a user with role foodbank",
            ));
        }

        let recipient = self
            .uow
            .users()
            .find_by_id(new_feedback.recipient_id)
            .await?
            .ok_or_else(|| AppError::validation("recipient_id does not reference an existing user"))?;
        if recipient.role != UserRole::Recipient {
            return Err(AppError::validation(
                "recipient_id must reference a user with role recipient",
            ));
        }

        let feedback = self.uow.feedbacks().create(new_feedback).await?;
        tracing::info!(feedback_id = %feedback.id, foodbank_id = %feedback.foodbank_id, "Feedback created");
        Ok(feedback)
    }

    async fn get_feedback(&self, id: Uuid) -> AppResult<Feedback> {
        self.uow
            .feedbacks()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn list_feedbacks(
        &self,
        filter: FeedbackFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<Feedback>> {
        let (data, total) = self.uow.feedbacks().list(filter, page.clone()).await?;
        Ok(Paginated::new(data, page.page, page.limit(), total))
    }

    async fn update_feedback(
        &self,
        principal: Principal,
        id: Uuid,
        fields: UpdateFeedback,
    ) -> AppResult<Feedback> {
        let feedback = self.get_feedback(id).await?;
        policy::authorize(&principal, Action::ManageFeedback, Some(feedback.recipient_id))?;

        if let Some(rating) = fields.rating {
            Self::validate_rating(rating)?;
        }

        self.uow.feedbacks().update(id, fields).await
    }

    async fn delete_feedback(&self, principal: Principal, id: Uuid) -> AppResult<()> {
        let feedback = self.get_feedback(id).await?;
        policy::authorize(&principal, Action::ManageFeedback, Some(feedback.recipient_id))?;

        self.uow.feedbacks().delete(id).await?;
        tracing::info!(feedback_id = %id, "Feedback soft-deleted");
        Ok(())
    }
}
