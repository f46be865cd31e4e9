//! API surface tests.
//!
//! Covers the error-to-status mapping, serialized wire formats and
//! request payload validation without a database connection.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::IntoResponse;
use jsonwebtoken::{encode, EncodingKey, Header};
use tower::ServiceExt;
use uuid::Uuid;
use validator::Validate;

use foodbridge::api::middleware::{Claims, TokenVerifier};
use foodbridge::api::{create_router, AppState};
use foodbridge::domain::matching;
use foodbridge::domain::{DonationStatus, RequestStatus, UserRole};
use foodbridge::errors::AppError;
use foodbridge::infra::Database;
use foodbridge::services::{
    MockDonationService, MockFeedbackService, MockRequestService, MockUserService,
};
use foodbridge::types::Paginated;

use common::{test_donation, test_request, test_user};

const TEST_SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";

fn state_with_donations(donations: MockDonationService) -> AppState {
    AppState::new(
        Arc::new(donations),
        Arc::new(MockRequestService::new()),
        Arc::new(MockFeedbackService::new()),
        Arc::new(MockUserService::new()),
        Arc::new(TokenVerifier::from_secret(TEST_SECRET)),
        Arc::new(Database::disconnected()),
    )
}

fn bearer_token(role: UserRole) -> String {
    let claims = Claims {
        sub: Uuid::new_v4(),
        email: "caller@example.com".to_string(),
        role: role.as_str().to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET),
    )
    .unwrap();
    format!("Bearer {}", token)
}

// =============================================================================
// Router Tests
// =============================================================================

#[tokio::test]
async fn root_endpoint_responds() {
    let app = create_router(state_with_donations(MockDonationService::new()));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn donations_require_a_bearer_token() {
    let app = create_router(state_with_donations(MockDonationService::new()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/donations")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let app = create_router(state_with_donations(MockDonationService::new()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/donations")
                .header(header::AUTHORIZATION, "Bearer not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn authenticated_caller_lists_donations() {
    let mut donations = MockDonationService::new();
    donations
        .expect_list_donations()
        .returning(|_, page| Ok(Paginated::new(vec![], page.page, page.limit(), 0)));

    let app = create_router(state_with_donations(donations));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/donations")
                .header(header::AUTHORIZATION, bearer_token(UserRole::Donor))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["meta"]["per_page"], 10);
}

#[tokio::test]
async fn missing_donation_maps_to_404() {
    let mut donations = MockDonationService::new();
    donations
        .expect_get_donation_detail()
        .returning(|_| Err(AppError::NotFound));

    let app = create_router(state_with_donations(donations));
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/donations/{}", Uuid::new_v4()))
                .header(header::AUTHORIZATION, bearer_token(UserRole::Admin))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_donation_payload_maps_to_422() {
    let app = create_router(state_with_donations(MockDonationService::new()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/donations")
                .header(header::AUTHORIZATION, bearer_token(UserRole::Donor))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "foodbank_id": Uuid::new_v4(),
                        "type": "food",
                        "quantity": 0
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// Error Mapping Tests
// =============================================================================

#[tokio::test]
async fn error_variants_map_to_expected_status_codes() {
    let cases = [
        (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
        (AppError::Forbidden, StatusCode::FORBIDDEN),
        (AppError::NotFound, StatusCode::NOT_FOUND),
        (AppError::conflict("Email address"), StatusCode::CONFLICT),
        (AppError::validation("bad input"), StatusCode::UNPROCESSABLE_ENTITY),
        (AppError::mismatch("type mismatch"), StatusCode::UNPROCESSABLE_ENTITY),
        (AppError::invalid_state("already completed"), StatusCode::BAD_REQUEST),
        (AppError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (error, expected) in cases {
        let response = error.into_response();
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
async fn error_body_carries_code_and_message() {
    let response = AppError::mismatch("Donation type does not match request").into_response();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["error"]["code"], "MATCH_MISMATCH");
    assert_eq!(body["error"]["message"], "Donation type does not match request");
}

#[tokio::test]
async fn internal_details_are_hidden_from_clients() {
    let response = AppError::internal("connection pool exhausted on host db-1").into_response();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    let message = body["error"]["message"].as_str().unwrap();
    assert!(!message.contains("db-1"));
}

// =============================================================================
// Wire Format Tests
// =============================================================================

#[tokio::test]
async fn donation_serializes_category_as_type() {
    let donation = test_donation(
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        DonationStatus::Pending,
    );
    let json = serde_json::to_value(&donation).unwrap();

    assert_eq!(json["type"], "food");
    assert!(json.get("category").is_none());
    assert_eq!(json["status"], "pending");
}

#[tokio::test]
async fn user_serialization_never_exposes_password_hash() {
    let user = test_user(Uuid::new_v4(), UserRole::Donor);
    let json = serde_json::to_value(&user).unwrap();

    assert!(json.get("password_hash").is_none());
    assert_eq!(json["role"], "donor");
}

#[tokio::test]
async fn request_status_uses_canonical_values() {
    assert_eq!(serde_json::to_value(RequestStatus::Open).unwrap(), "open");
    assert_eq!(serde_json::to_value(RequestStatus::Fulfilled).unwrap(), "fulfilled");
}

// =============================================================================
// Payload Validation Tests
// =============================================================================

#[tokio::test]
async fn donation_payload_rejects_zero_quantity() {
    use foodbridge::api::handlers::donation_handler::CreateDonationRequest;

    let payload: CreateDonationRequest = serde_json::from_value(serde_json::json!({
        "foodbank_id": Uuid::new_v4(),
        "type": "food",
        "quantity": 0
    }))
    .unwrap();

    assert!(payload.validate().is_err());
}

#[tokio::test]
async fn feedback_payload_rejects_rating_outside_scale() {
    use foodbridge::api::handlers::feedback_handler::CreateFeedbackBody;

    let payload: CreateFeedbackBody = serde_json::from_value(serde_json::json!({
        "foodbank_id": Uuid::new_v4(),
        "thank_you_note": "Thanks",
        "rating": 6
    }))
    .unwrap();

    assert!(payload.validate().is_err());
}

#[tokio::test]
async fn feedback_payload_rejects_oversized_note() {
    use foodbridge::api::handlers::feedback_handler::CreateFeedbackBody;

    let payload: CreateFeedbackBody = serde_json::from_value(serde_json::json!({
        "foodbank_id": Uuid::new_v4(),
        "thank_you_note": "x".repeat(1001),
        "rating": 5
    }))
    .unwrap();

    assert!(payload.validate().is_err());
}

#[tokio::test]
async fn user_payload_rejects_invalid_email() {
    use foodbridge::api::handlers::user_handler::CreateUserRequest;

    let payload: CreateUserRequest = serde_json::from_value(serde_json::json!({
        "email": "not-an-email",
        "password": "SecurePass123!",
        "name": "Test",
        "role": "donor"
    }))
    .unwrap();

    assert!(payload.validate().is_err());
}

// =============================================================================
// Matching Flow Tests
// =============================================================================

#[tokio::test]
async fn matched_pair_transitions_together() {
    let foodbank_id = Uuid::new_v4();
    let mut donation = test_donation(
        Uuid::new_v4(),
        Uuid::new_v4(),
        foodbank_id,
        DonationStatus::Pending,
    );
    donation.quantity = 15;
    let request = test_request(Uuid::new_v4(), foodbank_id, RequestStatus::Open);
    let request_id = request.id;

    let (donation, request) = matching::apply_assignment(donation, request).unwrap();

    assert_eq!(donation.status, DonationStatus::Assigned);
    assert_eq!(donation.assigned_request_id, Some(request_id));
    assert_eq!(request.status, RequestStatus::Fulfilled);
}

#[tokio::test]
async fn short_donation_leaves_both_untouched() {
    let foodbank_id = Uuid::new_v4();
    let mut donation = test_donation(
        Uuid::new_v4(),
        Uuid::new_v4(),
        foodbank_id,
        DonationStatus::Pending,
    );
    donation.quantity = 5;
    let request = test_request(Uuid::new_v4(), foodbank_id, RequestStatus::Open);

    let err = matching::apply_assignment(donation, request).unwrap_err();
    assert!(matches!(err, AppError::MatchMismatch(_)));
}
