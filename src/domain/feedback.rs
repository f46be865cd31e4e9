//! Feedback domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Feedback left by a recipient for a foodbank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub foodbank_id: Uuid,
    pub thank_you_note: String,
    /// Rating on a 1-5 scale
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Fields for creating feedback (service layer input)
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub recipient_id: Uuid,
    pub foodbank_id: Uuid,
    pub thank_you_note: String,
    pub rating: i32,
}

/// Partial update of feedback fields
#[derive(Debug, Clone, Default)]
pub struct UpdateFeedback {
    pub thank_you_note: Option<String>,
    pub rating: Option<i32>,
}

/// Query filter for feedback listings
#[derive(Debug, Clone, Default)]
pub struct FeedbackFilter {
    pub recipient_id: Option<Uuid>,
    pub foodbank_id: Option<Uuid>,
    pub rating: Option<i32>,
}
