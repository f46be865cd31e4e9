//! Domain layer - Core business entities and logic
//!
//! Contains the entities, status lifecycles, the matching rules and the
//! authorization policy, independent of infrastructure concerns.

pub mod donation;
pub mod feedback;
pub mod matching;
pub mod password;
pub mod policy;
pub mod request;
pub mod user;

pub use donation::{Donation, DonationFilter, DonationStatus, NewDonation, UpdateDonation};
pub use feedback::{Feedback, FeedbackFilter, NewFeedback, UpdateFeedback};
pub use password::Password;
pub use policy::Action;
pub use request::{DonationRequest, NewRequest, RequestFilter, RequestStatus, UpdateRequest};
pub use user::{NewUser, Principal, UpdateUser, User, UserResponse, UserRole};
