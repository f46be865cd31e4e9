//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use Unit of Work pattern for centralized repository
//! access and transaction management.

pub mod container;
mod donation_service;
mod feedback_service;
mod request_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use donation_service::{
    DonationDetail, DonationManager, DonationService, DonationView, PartySummary,
};
pub use feedback_service::{FeedbackManager, FeedbackService};
pub use request_service::{RequestManager, RequestService};
pub use user_service::{CreateUser, UserManager, UserService};

#[cfg(feature = "test-utils")]
pub use container::MockServiceContainer;
#[cfg(feature = "test-utils")]
pub use donation_service::MockDonationService;
#[cfg(feature = "test-utils")]
pub use feedback_service::MockFeedbackService;
#[cfg(feature = "test-utils")]
pub use request_service::MockRequestService;
#[cfg(feature = "test-utils")]
pub use user_service::MockUserService;
