//! Foodbank request domain entity and status lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{REQUEST_STATUS_FULFILLED, REQUEST_STATUS_OPEN};

/// Request status lifecycle: open -> fulfilled.
///
/// Fulfilled is reachable only through a successful donation assignment,
/// never by a direct update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Open,
    Fulfilled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Open => REQUEST_STATUS_OPEN,
            RequestStatus::Fulfilled => REQUEST_STATUS_FULFILLED,
        }
    }
}

impl From<&str> for RequestStatus {
    fn from(s: &str) -> Self {
        match s {
            REQUEST_STATUS_FULFILLED => RequestStatus::Fulfilled,
            _ => RequestStatus::Open,
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Foodbank request domain entity.
///
/// Named `DonationRequest` to avoid colliding with HTTP request types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationRequest {
    pub id: Uuid,
    pub foodbank_id: Uuid,
    #[serde(rename = "type")]
    pub category: String,
    pub quantity: i32,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl DonationRequest {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_open(&self) -> bool {
        self.status == RequestStatus::Open
    }
}

/// Fields for creating a new request (service layer input)
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub foodbank_id: Uuid,
    pub category: String,
    pub quantity: i32,
}

/// Partial update of request fields. Status is excluded by construction.
#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
    pub category: Option<String>,
    pub quantity: Option<i32>,
}

/// Query filter for request listings
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub category: Option<String>,
    pub quantity: Option<i32>,
    pub foodbank_id: Option<Uuid>,
    pub status: Option<RequestStatus>,
}
