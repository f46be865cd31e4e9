//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod donation_repository;
pub(crate) mod entities;
mod feedback_repository;
mod request_repository;
mod user_repository;

pub use donation_repository::{DonationRepository, DonationStore};
pub use feedback_repository::{FeedbackRepository, FeedbackStore};
pub use request_repository::{RequestRepository, RequestStore};
pub use user_repository::{UserFilter, UserRepository, UserStore};

// Export mocks for tests
#[cfg(feature = "test-utils")]
pub use donation_repository::MockDonationRepository;
#[cfg(feature = "test-utils")]
pub use feedback_repository::MockFeedbackRepository;
#[cfg(feature = "test-utils")]
pub use request_repository::MockRequestRepository;
#[cfg(feature = "test-utils")]
pub use user_repository::MockUserRepository;
