//! Feedback handlers.

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
use crate::domain::{Feedback, FeedbackFilter, NewFeedback, UpdateFeedback, UserRole};
use crate::errors::{AppError, AppResult};
use crate::types::{Paginated, PaginationParams};

/// Feedback creation payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFeedbackBody {
    /// Authoring recipient. Optional for recipients (defaults to the
    /// caller), required when an admin creates on someone's behalf.
    pub recipient_id: Option<Uuid>,
    /// Foodbank the feedback is about
    pub foodbank_id: Uuid,
    /// Thank-you note text
    #[validate(length(min = 1, max = 1000, message = "thank_you_note must be 1-1000 characters"))]
    pub thank_you_note: String,
    /// Rating on a 1-5 scale
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    #[schema(example = 5, minimum = 1, maximum = 5)]
    pub rating: i32,
}

/// Feedback update payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateFeedbackBody {
    #[validate(length(min = 1, max = 1000, message = "thank_you_note must be 1-1000 characters"))]
    pub thank_you_note: Option<String>,
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: Option<i32>,
}

/// Feedback list query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct FeedbackListQuery {
    pub recipient_id: Option<Uuid>,
    pub foodbank_id: Option<Uuid>,
    pub rating: Option<i32>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl FeedbackListQuery {
    fn pagination(&self) -> PaginationParams {
        let defaults = PaginationParams::default();
        PaginationParams {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// Create feedback routes
pub fn feedback_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_feedbacks).post(create_feedback))
        .route(
            "/:id",
            get(get_feedback).put(update_feedback).delete(delete_feedback),
        )
}

/// List feedback entries
#[utoipa::path(
    get,
    path = "/feedbacks",
    tag = "Feedback",
    params(FeedbackListQuery),
    responses(
        (status = 200, description = "Paginated list of feedback"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_feedbacks(
    State(state): State<AppState>,
    Query(query): Query<FeedbackListQuery>,
) -> AppResult<Json<Paginated<Feedback>>> {
    let filter = FeedbackFilter {
        recipient_id: query.recipient_id,
        foodbank_id: query.foodbank_id,
        rating: query.rating,
    };

    let page = state
        .feedback_service
        .list_feedbacks(filter, query.pagination())
        .await?;

    Ok(Json(page))
}

/// Create a feedback entry
#[utoipa::path(
    post,
    path = "/feedbacks",
    tag = "Feedback",
    request_body = CreateFeedbackBody,
    responses(
        (status = 201, description = "Feedback created"),
        (status = 403, description = "Caller may not create feedback"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_feedback(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateFeedbackBody>,
) -> AppResult<(StatusCode, Json<Feedback>)> {
    let recipient_id = match payload.recipient_id {
        Some(id) => id,
        None if current_user.role == UserRole::Recipient => current_user.id,
        None => return Err(AppError::validation("recipient_id is required")),
    };

    let feedback = state
        .feedback_service
        .create_feedback(
            current_user.principal(),
            NewFeedback {
                recipient_id,
                foodbank_id: payload.foodbank_id,
                thank_you_note: payload.thank_you_note,
                rating: payload.rating,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(feedback)))
}

/// Get a feedback entry
#[utoipa::path(
    get,
    path = "/feedbacks/{id}",
    tag = "Feedback",
    params(("id" = Uuid, Path, description = "Feedback ID")),
    responses(
        (status = 200, description = "Feedback detail"),
        (status = 404, description = "Feedback not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_feedback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Feedback>> {
    let feedback = state.feedback_service.get_feedback(id).await?;
    Ok(Json(feedback))
}

/// Update a feedback entry
#[utoipa::path(
    put,
    path = "/feedbacks/{id}",
    tag = "Feedback",
    params(("id" = Uuid, Path, description = "Feedback ID")),
    request_body = UpdateFeedbackBody,
    responses(
        (status = 200, description = "Feedback updated"),
        (status = 403, description = "Caller is not the author"),
        (status = 404, description = "Feedback not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_feedback(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateFeedbackBody>,
) -> AppResult<Json<Feedback>> {
    let feedback = state
        .feedback_service
        .update_feedback(
            current_user.principal(),
            id,
            UpdateFeedback {
                thank_you_note: payload.thank_you_note,
                rating: payload.rating,
            },
        )
        .await?;

    Ok(Json(feedback))
}

/// Soft delete a feedback entry
#[utoipa::path(
    delete,
    path = "/feedbacks/{id}",
    tag = "Feedback",
    params(("id" = Uuid, Path, description = "Feedback ID")),
    responses(
        (status = 204, description = "Feedback deleted"),
        (status = 403, description = "Caller is not the author"),
        (status = 404, description = "Feedback not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_feedback(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .feedback_service
        .delete_feedback(current_user.principal(), id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
