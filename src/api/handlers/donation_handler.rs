//! Donation lifecycle handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{DonationFilter, NewDonation, UpdateDonation, UserRole};
use crate::errors::{AppError, AppResult};
use crate::services::{DonationDetail, DonationView};
use crate::types::{PaginationParams, Paginated};

/// Donation creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDonationRequest {
    /// Donating user. Optional for donors (defaults to the caller),
    /// required when an admin creates on someone's behalf.
    pub donor_id: Option<Uuid>,
    /// Receiving foodbank
    pub foodbank_id: Uuid,
    /// Optional recipient; when present the donation starts out assigned
    pub recipient_id: Option<Uuid>,
    /// Donation category, e.g. food/clothing/money
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type is required"))]
    #[schema(example = "food")]
    pub category: String,
    /// Donated quantity
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    #[schema(example = 10, minimum = 1)]
    pub quantity: i32,
}

/// Donation update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDonationRequest {
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type must not be empty"))]
    pub category: Option<String>,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: Option<i32>,
}

/// Donation list query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct DonationListQuery {
    /// Filter by donation category
    #[serde(rename = "type")]
    pub category: Option<String>,
    pub donor_id: Option<Uuid>,
    pub foodbank_id: Option<Uuid>,
    pub recipient_id: Option<Uuid>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl DonationListQuery {
    fn pagination(&self) -> PaginationParams {
        let defaults = PaginationParams::default();
        PaginationParams {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// Create donation routes
pub fn donation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_donations).post(create_donation))
        .route(
            "/:id",
            get(get_donation).put(update_donation).delete(delete_donation),
        )
        .route("/:id/assign/:recipient_id", post(assign_recipient))
        .route("/:id/fulfill/:request_id", post(fulfill_request))
        .route("/:id/complete", post(complete_donation))
}

/// List donations
#[utoipa::path(
    get,
    path = "/donations",
    tag = "Donations",
    params(DonationListQuery),
    responses(
        (status = 200, description = "Paginated list of donations"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_donations(
    State(state): State<AppState>,
    Query(query): Query<DonationListQuery>,
) -> AppResult<Json<Paginated<DonationView>>> {
    let filter = DonationFilter {
        category: query.category.clone(),
        donor_id: query.donor_id,
        foodbank_id: query.foodbank_id,
        recipient_id: query.recipient_id,
    };

    let page = state
        .donation_service
        .list_donations(filter, query.pagination())
        .await?;

    Ok(Json(page.map(DonationView::from)))
}

/// Create a donation
#[utoipa::path(
    post,
    path = "/donations",
    tag = "Donations",
    request_body = CreateDonationRequest,
    responses(
        (status = 201, description = "Donation created", body = DonationView),
        (status = 403, description = "Caller may not create donations"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_donation(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateDonationRequest>,
) -> AppResult<(StatusCode, Json<DonationView>)> {
    let donor_id = match payload.donor_id {
        Some(id) => id,
        None if current_user.role == UserRole::Donor => current_user.id,
        None => return Err(AppError::validation("donor_id is required")),
    };

    let donation = state
        .donation_service
        .create_donation(
            current_user.principal(),
            NewDonation {
                donor_id,
                foodbank_id: payload.foodbank_id,
                recipient_id: payload.recipient_id,
                category: payload.category,
                quantity: payload.quantity,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(DonationView::from(donation))))
}

/// Get a donation with its parties resolved
#[utoipa::path(
    get,
    path = "/donations/{id}",
    tag = "Donations",
    params(("id" = Uuid, Path, description = "Donation ID")),
    responses(
        (status = 200, description = "Donation detail", body = DonationDetail),
        (status = 404, description = "Donation not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_donation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DonationDetail>> {
    let detail = state.donation_service.get_donation_detail(id).await?;
    Ok(Json(detail))
}

/// Update donation fields
#[utoipa::path(
    put,
    path = "/donations/{id}",
    tag = "Donations",
    params(("id" = Uuid, Path, description = "Donation ID")),
    request_body = UpdateDonationRequest,
    responses(
        (status = 200, description = "Donation updated", body = DonationView),
        (status = 403, description = "Caller does not own the donation"),
        (status = 404, description = "Donation not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_donation(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateDonationRequest>,
) -> AppResult<Json<DonationView>> {
    let donation = state
        .donation_service
        .update_donation(
            current_user.principal(),
            id,
            UpdateDonation {
                category: payload.category,
                quantity: payload.quantity,
            },
        )
        .await?;

    Ok(Json(DonationView::from(donation)))
}

/// Assign a recipient to a donation
#[utoipa::path(
    post,
    path = "/donations/{id}/assign/{recipient_id}",
    tag = "Donations",
    params(
        ("id" = Uuid, Path, description = "Donation ID"),
        ("recipient_id" = Uuid, Path, description = "Recipient user ID")
    ),
    responses(
        (status = 200, description = "Recipient assigned", body = DonationView),
        (status = 400, description = "Donation is already completed"),
        (status = 404, description = "Donation or recipient not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn assign_recipient(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path((id, recipient_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<DonationView>> {
    let donation = state
        .donation_service
        .assign_recipient(current_user.principal(), id, recipient_id)
        .await?;

    Ok(Json(DonationView::from(donation)))
}

/// Match a donation against an open request.
///
/// The donation becomes assigned and the request fulfilled in one
/// transaction, or neither changes.
#[utoipa::path(
    post,
    path = "/donations/{id}/fulfill/{request_id}",
    tag = "Donations",
    params(
        ("id" = Uuid, Path, description = "Donation ID"),
        ("request_id" = Uuid, Path, description = "Request ID")
    ),
    responses(
        (status = 200, description = "Donation matched to request", body = DonationView),
        (status = 400, description = "Request not open or donation completed"),
        (status = 404, description = "Donation or request not found"),
        (status = 422, description = "Type or quantity mismatch")
    ),
    security(("bearer_auth" = []))
)]
pub async fn fulfill_request(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path((id, request_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<DonationView>> {
    let donation = state
        .donation_service
        .assign_to_request(current_user.principal(), id, request_id)
        .await?;

    Ok(Json(DonationView::from(donation)))
}

/// Mark a donation as completed
#[utoipa::path(
    post,
    path = "/donations/{id}/complete",
    tag = "Donations",
    params(("id" = Uuid, Path, description = "Donation ID")),
    responses(
        (status = 200, description = "Donation completed", body = DonationView),
        (status = 400, description = "Donation is already completed"),
        (status = 404, description = "Donation not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn complete_donation(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DonationView>> {
    let donation = state
        .donation_service
        .complete_donation(current_user.principal(), id)
        .await?;

    Ok(Json(DonationView::from(donation)))
}

/// Soft delete a donation
#[utoipa::path(
    delete,
    path = "/donations/{id}",
    tag = "Donations",
    params(("id" = Uuid, Path, description = "Donation ID")),
    responses(
        (status = 204, description = "Donation deleted"),
        (status = 403, description = "Caller does not own the donation"),
        (status = 404, description = "Donation not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_donation(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .donation_service
        .delete_donation(current_user.principal(), id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
