//! Foodbank request management.
//!
//! Requests are owned by foodbanks. Listing is scoped by the caller's
//! role inside the query itself rather than by filtering rows after the
//! fact: foodbanks see only their own requests, admins see everything,
//! and everyone else sees only open requests.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[cfg(feature = "test-utils")]
use mockall::automock;

use crate::domain::policy::{self, Action};
use crate::domain::{
    DonationRequest, NewRequest, Principal, RequestFilter, RequestStatus, UpdateRequest, UserRole,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

/// Request service trait for dependency injection.
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait]
pub trait RequestService: Send + Sync {
    /// Create an open request on behalf of a foodbank
    async fn create_request(
        &self,
        principal: Principal,
        new_request: NewRequest,
    ) -> AppResult<DonationRequest>;

    /// Get an active request
    async fn get_request(&self, id: Uuid) -> AppResult<DonationRequest>;

    /// List requests, scoped by the caller's role
    async fn list_requests(
        &self,
        principal: Principal,
        filter: RequestFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<DonationRequest>>;

    /// Partial update of category/quantity
    async fn update_request(
        &self,
        principal: Principal,
        id: Uuid,
        fields: UpdateRequest,
    ) -> AppResult<DonationRequest>;

    /// Soft delete the request
    async fn delete_request(&self, principal: Principal, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of RequestService using Unit of Work.
pub struct RequestManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> RequestManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> RequestService for RequestManager<U> {
    async fn create_request(
        &self,
        principal: Principal,
        new_request: NewRequest,
    ) -> AppResult<DonationRequest> {
        policy::authorize(&principal, Action::CreateRequest, Some(new_request.foodbank_id))?;

        if new_request.quantity < 1 {
            return Err(AppError::validation("quantity must be at least 1"));
        }

        let foodbank = self
            .uow
            .users()
            .find_by_id(new_request.foodbank_id)
            .await?
            .ok_or_else(|| AppError::validation("foodbank_id does not reference an existing user"))?;
        if foodbank.role != UserRole::Foodbank {
            return Err(AppError::validation(
                "foodbank_id must reference a user with role foodbank",
            ));
        }

        let request = self.uow.requests().create(new_request).await?;
        tracing::info!(request_id = %request.id, foodbank_id = %request.foodbank_id, "Request created");
        Ok(request)
    }

    async fn get_request(&self, id: Uuid) -> AppResult<DonationRequest> {
        self.uow
            .requests()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn list_requests(
        &self,
        principal: Principal,
        mut filter: RequestFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<DonationRequest>> {
        match principal.role {
            UserRole::Admin => {}
            UserRole::Foodbank => {
                // A foodbank always queries its own requests, whatever
                // foodbank_id the caller put in the filter
                filter.foodbank_id = Some(principal.id);
            }
            UserRole::Donor | UserRole::Recipient => {
                filter.status = Some(RequestStatus::Open);
            }
        }

        let (data, total) = self.uow.requests().list(filter, page.clone()).await?;
        Ok(Paginated::new(data, page.page, page.limit(), total))
    }

    async fn update_request(
        &self,
        principal: Principal,
        id: Uuid,
        fields: UpdateRequest,
    ) -> AppResult<DonationRequest> {
        let request = self.get_request(id).await?;
        policy::authorize(&principal, Action::UpdateRequest, Some(request.foodbank_id))?;

        if let Some(quantity) = fields.quantity {
            if quantity < 1 {
                return Err(AppError::validation("quantity must be at least 1"));
            }
        }

        self.uow.requests().update(id, fields).await
    }

    async fn delete_request(&self, principal: Principal, id: Uuid) -> AppResult<()> {
        let request = self.get_request(id).await?;
        policy::authorize(&principal, Action::DeleteRequest, Some(request.foodbank_id))?;

        self.uow.requests().delete(id).await?;
        tracing::info!(request_id = %id, "Request soft-deleted");
        Ok(())
    }
}
