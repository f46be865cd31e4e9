//! Donation lifecycle manager.
//!
//! Owns every status transition of a donation (pending -> assigned ->
//! completed) and the matching of donations against foodbank requests.
//! The caller's identity is always an explicit `Principal` parameter.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[cfg(feature = "test-utils")]
use mockall::automock;

use crate::domain::policy::{self, Action};
use crate::domain::{
    matching, Donation, DonationFilter, NewDonation, Principal, UpdateDonation, UserRole,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

/// Slim user projection embedded in donation detail responses.
///
/// Loaded including soft-deleted users so a completed donation keeps
/// showing the last known name of a since-removed party.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PartySummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub deleted: bool,
}

/// Donation together with its donor/foodbank/recipient parties
#[derive(Debug, Serialize, ToSchema)]
pub struct DonationDetail {
    #[serde(flatten)]
    pub donation: DonationView,
    pub donor: Option<PartySummary>,
    pub foodbank: Option<PartySummary>,
    pub recipient: Option<PartySummary>,
}

/// Serializable donation projection for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct DonationView {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub foodbank_id: Uuid,
    pub recipient_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub category: String,
    pub quantity: i32,
    pub status: crate::domain::DonationStatus,
    pub assigned_request_id: Option<Uuid>,
}

impl From<Donation> for DonationView {
    fn from(d: Donation) -> Self {
        Self {
            id: d.id,
            donor_id: d.donor_id,
            foodbank_id: d.foodbank_id,
            recipient_id: d.recipient_id,
            category: d.category,
            quantity: d.quantity,
            status: d.status,
            assigned_request_id: d.assigned_request_id,
        }
    }
}

/// Donation service trait for dependency injection.
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait]
pub trait DonationService: Send + Sync {
    /// Create a donation. Status derives from recipient presence:
    /// assigned when a recipient is given, pending otherwise.
    async fn create_donation(
        &self,
        principal: Principal,
        new_donation: NewDonation,
    ) -> AppResult<Donation>;

    /// Get an active donation
    async fn get_donation(&self, id: Uuid) -> AppResult<Donation>;

    /// Get a donation with its parties resolved, including soft-deleted
    /// users for historical display
    async fn get_donation_detail(&self, id: Uuid) -> AppResult<DonationDetail>;

    /// List active donations with filters
    async fn list_donations(
        &self,
        filter: DonationFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<Donation>>;

    /// Partial update of category/quantity
    async fn update_donation(
        &self,
        principal: Principal,
        id: Uuid,
        fields: UpdateDonation,
    ) -> AppResult<Donation>;

    /// Assign a recipient, moving the donation to assigned
    async fn assign_recipient(
        &self,
        principal: Principal,
        donation_id: Uuid,
        recipient_id: Uuid,
    ) -> AppResult<Donation>;

    /// Match the donation against an open request. Atomic: the request
    /// becomes fulfilled and the donation assigned, or neither changes.
    async fn assign_to_request(
        &self,
        principal: Principal,
        donation_id: Uuid,
        request_id: Uuid,
    ) -> AppResult<Donation>;

    /// Mark the donation completed. Rejects double completion.
    async fn complete_donation(&self, principal: Principal, donation_id: Uuid)
        -> AppResult<Donation>;

    /// Soft delete the donation
    async fn delete_donation(&self, principal: Principal, donation_id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of DonationService using Unit of Work.
pub struct DonationManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> DonationManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Resolve a user id that must carry a specific role.
    ///
    /// The role-scoped reference is a runtime invariant, not a storage
    /// constraint, so it is checked here on every create path.
    async fn expect_role(
        &self,
        id: Uuid,
        role: UserRole,
        field: &str,
    ) -> AppResult<crate::domain::User> {
        let user = self
            .uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::validation(format!("{field} does not reference an existing user")))?;

        if user.role != role {
            return Err(AppError::validation(format!(
                "{field} must reference a user with role {role}"
            )));
        }
        Ok(user)
    }

    async fn party_summary(&self, id: Uuid) -> AppResult<Option<PartySummary>> {
        // Includes soft-deleted users: history outlives accounts
        let user = self.uow.users().find_by_id_with_deleted(id).await?;
        Ok(user.map(|u| PartySummary {
            id: u.id,
            name: u.name,
            email: u.email,
            deleted: u.deleted_at.is_some(),
        }))
    }
}

#[async_trait]
impl<U: UnitOfWork> DonationService for DonationManager<U> {
    async fn create_donation(
        &self,
        principal: Principal,
        new_donation: NewDonation,
    ) -> AppResult<Donation> {
        policy::authorize(&principal, Action::CreateDonation, None)?;

        // Donors create donations as themselves; only admins may set
        // another user's donor_id
        if principal.role == UserRole::Donor && new_donation.donor_id != principal.id {
            return Err(AppError::Forbidden);
        }

        if new_donation.quantity < 1 {
            return Err(AppError::validation("quantity must be at least 1"));
        }

        self.expect_role(new_donation.donor_id, UserRole::Donor, "donor_id")
            .await?;
        self.expect_role(new_donation.foodbank_id, UserRole::Foodbank, "foodbank_id")
            .await?;
        if let Some(recipient_id) = new_donation.recipient_id {
            self.expect_role(recipient_id, UserRole::Recipient, "recipient_id")
                .await?;
        }

        let donation = self.uow.donations().create(new_donation).await?;
        tracing::info!(donation_id = %donation.id, status = %donation.status, "Donation created");
        Ok(donation)
    }

    async fn get_donation(&self, id: Uuid) -> AppResult<Donation> {
        self.uow
            .donations()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn get_donation_detail(&self, id: Uuid) -> AppResult<DonationDetail> {
        let donation = self.get_donation(id).await?;

        let donor = self.party_summary(donation.donor_id).await?;
        let foodbank = self.party_summary(donation.foodbank_id).await?;
        let recipient = match donation.recipient_id {
            Some(recipient_id) => self.party_summary(recipient_id).await?,
            None => None,
        };

        Ok(DonationDetail {
            donation: DonationView::from(donation),
            donor,
            foodbank,
            recipient,
        })
    }

    async fn list_donations(
        &self,
        filter: DonationFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<Donation>> {
        let (data, total) = self.uow.donations().list(filter, page.clone()).await?;
        Ok(Paginated::new(data, page.page, page.limit(), total))
    }

    async fn update_donation(
        &self,
        principal: Principal,
        id: Uuid,
        fields: UpdateDonation,
    ) -> AppResult<Donation> {
        let donation = self.get_donation(id).await?;
        policy::authorize(&principal, Action::UpdateDonation, Some(donation.donor_id))?;

        if let Some(quantity) = fields.quantity {
            if quantity < 1 {
                return Err(AppError::validation("quantity must be at least 1"));
            }
        }

        self.uow.donations().update(id, fields).await
    }

    async fn assign_recipient(
        &self,
        principal: Principal,
        donation_id: Uuid,
        recipient_id: Uuid,
    ) -> AppResult<Donation> {
        let donation = self.get_donation(donation_id).await?;
        policy::authorize(&principal, Action::AssignDonation, Some(donation.foodbank_id))?;
        donation.ensure_can_assign()?;

        // A missing or wrongly-roled recipient is a 404, matching the
        // external contract of the assign endpoint
        let recipient = self
            .uow
            .users()
            .find_by_id(recipient_id)
            .await?
            .ok_or(AppError::NotFound)?;
        if recipient.role != UserRole::Recipient {
            return Err(AppError::NotFound);
        }

        let donation = self
            .uow
            .donations()
            .assign_recipient(donation_id, recipient_id)
            .await?;
        tracing::info!(donation_id = %donation_id, recipient_id = %recipient_id, "Donation assigned to recipient");
        Ok(donation)
    }

    async fn assign_to_request(
        &self,
        principal: Principal,
        donation_id: Uuid,
        request_id: Uuid,
    ) -> AppResult<Donation> {
        let donation = self
            .uow
            .transaction_serializable(|ctx| {
                Box::pin(async move {
                    let donation = ctx
                        .donations()
                        .find_by_id(donation_id)
                        .await?
                        .ok_or(AppError::NotFound)?;
                    let request = ctx
                        .requests()
                        .find_by_id(request_id)
                        .await?
                        .ok_or(AppError::NotFound)?;

                    // Ownership belongs to the request's foodbank; checked
                    // before any row is touched
                    policy::authorize(&principal, Action::AssignDonation, Some(request.foodbank_id))?;

                    let (donation, request) = matching::apply_assignment(donation, request)?;

                    ctx.requests().store_assignment(&request).await?;
                    let donation = ctx.donations().store_assignment(&donation).await?;
                    Ok(donation)
                })
            })
            .await?;

        tracing::info!(
            donation_id = %donation_id,
            request_id = %request_id,
            "Donation matched to request"
        );
        Ok(donation)
    }

    async fn complete_donation(
        &self,
        principal: Principal,
        donation_id: Uuid,
    ) -> AppResult<Donation> {
        let donation = self.get_donation(donation_id).await?;
        policy::authorize(&principal, Action::CompleteDonation, Some(donation.foodbank_id))?;
        donation.ensure_can_complete()?;

        let donation = self.uow.donations().complete(donation_id).await?;
        tracing::info!(donation_id = %donation_id, "Donation marked as completed");
        Ok(donation)
    }

    async fn delete_donation(&self, principal: Principal, donation_id: Uuid) -> AppResult<()> {
        let donation = self.get_donation(donation_id).await?;
        policy::authorize(&principal, Action::DeleteDonation, Some(donation.donor_id))?;

        self.uow.donations().delete(donation_id).await?;
        tracing::info!(donation_id = %donation_id, "Donation soft-deleted");
        Ok(())
    }
}
