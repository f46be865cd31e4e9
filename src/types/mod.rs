//! Shared API types.

mod pagination;

pub use pagination::{Paginated, PaginationMeta, PaginationParams};
