//! Donation domain entity and status lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{
    DONATION_STATUS_ASSIGNED, DONATION_STATUS_COMPLETED, DONATION_STATUS_PENDING,
};
use crate::errors::{AppError, AppResult};

/// Donation status lifecycle: pending -> assigned -> completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    Pending,
    Assigned,
    Completed,
}

impl DonationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Pending => DONATION_STATUS_PENDING,
            DonationStatus::Assigned => DONATION_STATUS_ASSIGNED,
            DonationStatus::Completed => DONATION_STATUS_COMPLETED,
        }
    }

    /// Initial status for a newly created donation: a donation born with a
    /// recipient is already assigned, otherwise it waits as pending.
    pub fn initial(recipient_id: Option<Uuid>) -> Self {
        if recipient_id.is_some() {
            DonationStatus::Assigned
        } else {
            DonationStatus::Pending
        }
    }
}

impl From<&str> for DonationStatus {
    fn from(s: &str) -> Self {
        match s {
            DONATION_STATUS_ASSIGNED => DonationStatus::Assigned,
            DONATION_STATUS_COMPLETED => DonationStatus::Completed,
            _ => DonationStatus::Pending,
        }
    }
}

impl std::fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Donation domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donation {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub foodbank_id: Uuid,
    pub recipient_id: Option<Uuid>,
    /// Free-text category, e.g. food/clothing/money
    #[serde(rename = "type")]
    pub category: String,
    pub quantity: i32,
    pub status: DonationStatus,
    pub assigned_request_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Donation {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Guard for the completion transition. Completion is an explicit
    /// one-way door: re-completing an already-completed donation is an
    /// error, not a no-op.
    pub fn ensure_can_complete(&self) -> AppResult<()> {
        if self.status == DonationStatus::Completed {
            return Err(AppError::invalid_state("Donation is already completed"));
        }
        Ok(())
    }

    /// Guard for assignment transitions (recipient or request).
    pub fn ensure_can_assign(&self) -> AppResult<()> {
        if self.status == DonationStatus::Completed {
            return Err(AppError::invalid_state(
                "Completed donations cannot be assigned",
            ));
        }
        Ok(())
    }
}

/// Fields for creating a new donation (service layer input)
#[derive(Debug, Clone)]
pub struct NewDonation {
    pub donor_id: Uuid,
    pub foodbank_id: Uuid,
    pub recipient_id: Option<Uuid>,
    pub category: String,
    pub quantity: i32,
}

/// Partial update of donation fields. Status is never directly settable:
/// it changes only through lifecycle transitions.
#[derive(Debug, Clone, Default)]
pub struct UpdateDonation {
    pub category: Option<String>,
    pub quantity: Option<i32>,
}

/// Query filter for donation listings
#[derive(Debug, Clone, Default)]
pub struct DonationFilter {
    pub category: Option<String>,
    pub donor_id: Option<Uuid>,
    pub foodbank_id: Option<Uuid>,
    pub recipient_id: Option<Uuid>,
}
