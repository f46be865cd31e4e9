//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::api::middleware::TokenVerifier;
use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    DonationService, FeedbackService, RequestService, ServiceContainer, Services, UserService,
};

/// Application state containing all services (DI container).
///
/// Use `from_config()` for recommended initialization with full
/// ServiceContainer and UnitOfWork support.
#[derive(Clone)]
pub struct AppState {
    /// Donation lifecycle service
    pub donation_service: Arc<dyn DonationService>,
    /// Foodbank request service
    pub request_service: Arc<dyn RequestService>,
    /// Feedback service
    pub feedback_service: Arc<dyn FeedbackService>,
    /// User management service
    pub user_service: Arc<dyn UserService>,
    /// Bearer token verification for the auth middleware
    pub token_verifier: Arc<TokenVerifier>,
    /// Database connection
    pub database: Arc<Database>,
    /// Internal service container (optional, only with from_config)
    service_container: Option<Arc<Services>>,
}

impl AppState {
    /// Create application state from database connection and config.
    ///
    /// This is the recommended way to create AppState as it uses
    /// the ServiceContainer for centralized service management.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let container = Arc::new(Services::from_connection(database.get_connection()));

        Self {
            donation_service: container.donations(),
            request_service: container.requests(),
            feedback_service: container.feedbacks(),
            user_service: container.users(),
            token_verifier: Arc::new(TokenVerifier::new(config)),
            database,
            service_container: Some(container),
        }
    }

    /// Create new application state with manually injected services.
    ///
    /// Note: This method does not provide ServiceContainer access.
    /// Use `from_config()` for full functionality.
    pub fn new(
        donation_service: Arc<dyn DonationService>,
        request_service: Arc<dyn RequestService>,
        feedback_service: Arc<dyn FeedbackService>,
        user_service: Arc<dyn UserService>,
        token_verifier: Arc<TokenVerifier>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            donation_service,
            request_service,
            feedback_service,
            user_service,
            token_verifier,
            database,
            service_container: None,
        }
    }

    /// Get the service container for centralized service access.
    ///
    /// Returns `Some` only if created via `from_config()`.
    pub fn services(&self) -> Option<&Arc<Services>> {
        self.service_container.as_ref()
    }
}
