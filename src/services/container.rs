//! Service container - centralized service access.
//!
//! Wires the lifecycle services to a shared Unit of Work. Handlers only
//! see the service traits, never the concrete managers.

use std::sync::Arc;

use super::{DonationService, FeedbackService, RequestService, UserService};
use crate::infra::Persistence;

#[cfg(feature = "test-utils")]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(feature = "test-utils", automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get donation service
    fn donations(&self) -> Arc<dyn DonationService>;

    /// Get request service
    fn requests(&self) -> Arc<dyn RequestService>;

    /// Get feedback service
    fn feedbacks(&self) -> Arc<dyn FeedbackService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    donation_service: Arc<dyn DonationService>,
    request_service: Arc<dyn RequestService>,
    feedback_service: Arc<dyn FeedbackService>,
    user_service: Arc<dyn UserService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(
        donation_service: Arc<dyn DonationService>,
        request_service: Arc<dyn RequestService>,
        feedback_service: Arc<dyn FeedbackService>,
        user_service: Arc<dyn UserService>,
    ) -> Self {
        Self {
            donation_service,
            request_service,
            feedback_service,
            user_service,
        }
    }

    /// Create service container from a database connection
    pub fn from_connection(db: sea_orm::DatabaseConnection) -> Self {
        use super::{DonationManager, FeedbackManager, RequestManager, UserManager};

        let uow = Arc::new(Persistence::new(db));

        Self {
            donation_service: Arc::new(DonationManager::new(uow.clone())),
            request_service: Arc::new(RequestManager::new(uow.clone())),
            feedback_service: Arc::new(FeedbackManager::new(uow.clone())),
            user_service: Arc::new(UserManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn donations(&self) -> Arc<dyn DonationService> {
        self.donation_service.clone()
    }

    fn requests(&self) -> Arc<dyn RequestService> {
        self.request_service.clone()
    }

    fn feedbacks(&self) -> Arc<dyn FeedbackService> {
        self.feedback_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }
}
