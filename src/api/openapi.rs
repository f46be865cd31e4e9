//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{donation_handler, feedback_handler, request_handler, user_handler};
use crate::domain::{DonationStatus, RequestStatus, UserResponse, UserRole};
use crate::services::{DonationDetail, DonationView, PartySummary};

/// OpenAPI documentation for the Foodbridge API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Foodbridge API",
        version = "0.1.0",
        description = "Donation coordination between donors, foodbanks and recipients",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "API Support", email = "support@example.com")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server"),
        (url = "https://api.example.com", description = "Production server")
    ),
    paths(
        // Donation endpoints
        donation_handler::list_donations,
        donation_handler::create_donation,
        donation_handler::get_donation,
        donation_handler::update_donation,
        donation_handler::assign_recipient,
        donation_handler::fulfill_request,
        donation_handler::complete_donation,
        donation_handler::delete_donation,
        // Request endpoints
        request_handler::list_requests,
        request_handler::create_request,
        request_handler::get_request,
        request_handler::update_request,
        request_handler::delete_request,
        // Feedback endpoints
        feedback_handler::list_feedbacks,
        feedback_handler::create_feedback,
        feedback_handler::get_feedback,
        feedback_handler::update_feedback,
        feedback_handler::delete_feedback,
        // User endpoints
        user_handler::get_current_user,
        user_handler::list_users,
        user_handler::create_user,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::delete_user,
        user_handler::restore_user,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            DonationStatus,
            RequestStatus,
            DonationView,
            DonationDetail,
            PartySummary,
            // Donation handler types
            donation_handler::CreateDonationRequest,
            donation_handler::UpdateDonationRequest,
            // Request handler types
            request_handler::CreateRequestBody,
            request_handler::UpdateRequestBody,
            // Feedback handler types
            feedback_handler::CreateFeedbackBody,
            feedback_handler::UpdateFeedbackBody,
            // User handler types
            user_handler::CreateUserRequest,
            user_handler::UpdateUserRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Donations", description = "Donation lifecycle and matching"),
        (name = "Requests", description = "Foodbank request management"),
        (name = "Feedback", description = "Recipient feedback for foodbanks"),
        (name = "Users", description = "User management operations")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT issued by the identity provider"))
                        .build(),
                ),
            );
        }
    }
}
