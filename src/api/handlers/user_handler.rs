//! User management handlers.

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
use crate::domain::{UpdateUser, UserResponse, UserRole};
use crate::errors::AppResult;
use crate::infra::UserFilter;
use crate::services::CreateUser;
use crate::types::{Paginated, PaginationParams};

/// User creation request (admin only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// User password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    /// User display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "John Doe")]
    pub name: String,
    /// Account role, fixed at creation
    pub role: UserRole,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub organization_name: Option<String>,
    pub recipient_type: Option<String>,
    pub donor_type: Option<String>,
    pub notes: Option<String>,
}

/// User profile update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub organization_name: Option<String>,
    pub recipient_type: Option<String>,
    pub donor_type: Option<String>,
    pub notes: Option<String>,
}

/// User list query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct UserListQuery {
    pub role: Option<UserRole>,
    /// Substring match on display name
    pub name: Option<String>,
    /// Exact match on email
    pub email: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl UserListQuery {
    fn pagination(&self) -> PaginationParams {
        let defaults = PaginationParams::default();
        PaginationParams {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/me", get(get_current_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/:id/restore", post(restore_user))
}

/// Get the authenticated user's own profile
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .user_service
        .get_user(current_user.principal(), current_user.id)
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// List users (admin only)
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    params(UserListQuery),
    responses(
        (status = 200, description = "Paginated list of users"),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    let filter = UserFilter {
        role: query.role,
        name: query.name.clone(),
        email: query.email.clone(),
    };

    let page = state
        .user_service
        .list_users(current_user.principal(), filter, query.pagination())
        .await?;

    Ok(Json(page.map(UserResponse::from)))
}

/// Create a user account (admin only)
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 409, description = "Email already in use"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .user_service
        .create_user(
            current_user.principal(),
            CreateUser {
                email: payload.email,
                password: payload.password,
                name: payload.name,
                role: payload.role,
                phone: payload.phone,
                address: payload.address,
                organization_name: payload.organization_name,
                recipient_type: payload.recipient_type,
                donor_type: payload.donor_type,
                notes: payload.notes,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Get a user by ID (self or admin)
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 403, description = "Caller may not read this user"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(current_user.principal(), id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Update a user's profile (self or admin)
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 403, description = "Caller may not update this user"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .user_service
        .update_user(
            current_user.principal(),
            id,
            UpdateUser {
                name: payload.name,
                phone: payload.phone,
                address: payload.address,
                organization_name: payload.organization_name,
                recipient_type: payload.recipient_type,
                donor_type: payload.donor_type,
                notes: payload.notes,
            },
        )
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// Soft delete a user account (admin only)
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .user_service
        .delete_user(current_user.principal(), id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Restore a soft-deleted user account (admin only)
#[utoipa::path(
    post,
    path = "/users/{id}/restore",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User restored", body = UserResponse),
        (status = 400, description = "User is not deleted"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn restore_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .user_service
        .restore_user(current_user.principal(), id)
        .await?;

    Ok(Json(UserResponse::from(user)))
}
