//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod donation;
pub mod feedback;
pub mod request;
pub mod user;
