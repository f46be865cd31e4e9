//! Foodbank request handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{DonationRequest, NewRequest, RequestFilter, RequestStatus, UpdateRequest, UserRole};
use crate::errors::{AppError, AppResult};
use crate::types::{Paginated, PaginationParams};

/// Request creation payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRequestBody {
    /// Owning foodbank. Optional for foodbanks (defaults to the caller),
    /// required when an admin creates on someone's behalf.
    pub foodbank_id: Option<Uuid>,
    /// Requested category, e.g. food/clothing/money
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type is required"))]
    #[schema(example = "food")]
    pub category: String,
    /// Requested quantity
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    #[schema(example = 10, minimum = 1)]
    pub quantity: i32,
}

/// Request update payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRequestBody {
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type must not be empty"))]
    pub category: Option<String>,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: Option<i32>,
}

/// Request list query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct RequestListQuery {
    /// Filter by requested category
    #[serde(rename = "type")]
    pub category: Option<String>,
    /// Filter by exact quantity
    pub quantity: Option<i32>,
    pub foodbank_id: Option<Uuid>,
    pub status: Option<RequestStatus>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl RequestListQuery {
    fn pagination(&self) -> PaginationParams {
        let defaults = PaginationParams::default();
        PaginationParams {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// Create request routes
pub fn request_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_requests).post(create_request))
        .route(
            "/:id",
            get(get_request).put(update_request).delete(delete_request),
        )
}

/// List requests, scoped by the caller's role
#[utoipa::path(
    get,
    path = "/requests",
    tag = "Requests",
    params(RequestListQuery),
    responses(
        (status = 200, description = "Paginated list of requests"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_requests(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<RequestListQuery>,
) -> AppResult<Json<Paginated<DonationRequest>>> {
    let filter = RequestFilter {
        category: query.category.clone(),
        quantity: query.quantity,
        foodbank_id: query.foodbank_id,
        status: query.status,
    };

    let page = state
        .request_service
        .list_requests(current_user.principal(), filter, query.pagination())
        .await?;

    Ok(Json(page))
}

/// Create an open request
#[utoipa::path(
    post,
    path = "/requests",
    tag = "Requests",
    request_body = CreateRequestBody,
    responses(
        (status = 201, description = "Request created"),
        (status = 403, description = "Caller may not create requests"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_request(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateRequestBody>,
) -> AppResult<(StatusCode, Json<DonationRequest>)> {
    let foodbank_id = match payload.foodbank_id {
        Some(id) => id,
        None if current_user.role == UserRole::Foodbank => current_user.id,
        None => return Err(AppError::validation("foodbank_id is required")),
    };

    let request = state
        .request_service
        .create_request(
            current_user.principal(),
            NewRequest {
                foodbank_id,
                category: payload.category,
                quantity: payload.quantity,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(request)))
}

/// Get a request
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "Requests",
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request detail"),
        (status = 404, description = "Request not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DonationRequest>> {
    let request = state.request_service.get_request(id).await?;
    Ok(Json(request))
}

/// Update request fields
#[utoipa::path(
    put,
    path = "/requests/{id}",
    tag = "Requests",
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = UpdateRequestBody,
    responses(
        (status = 200, description = "Request updated"),
        (status = 403, description = "Caller does not own the request"),
        (status = 404, description = "Request not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_request(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateRequestBody>,
) -> AppResult<Json<DonationRequest>> {
    let request = state
        .request_service
        .update_request(
            current_user.principal(),
            id,
            UpdateRequest {
                category: payload.category,
                quantity: payload.quantity,
            },
        )
        .await?;

    Ok(Json(request))
}

/// Soft delete a request
#[utoipa::path(
    delete,
    path = "/requests/{id}",
    tag = "Requests",
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 204, description = "Request deleted"),
        (status = 403, description = "Caller does not own the request"),
        (status = 404, description = "Request not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_request(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .request_service
        .delete_request(current_user.principal(), id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
