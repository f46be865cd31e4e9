//! HTTP request handlers.

pub mod donation_handler;
pub mod feedback_handler;
pub mod request_handler;
pub mod user_handler;

pub use donation_handler::donation_routes;
pub use feedback_handler::feedback_routes;
pub use request_handler::request_routes;
pub use user_handler::user_routes;
