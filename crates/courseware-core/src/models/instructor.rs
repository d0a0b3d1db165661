//! Requests from students to become instructors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Approved => "APPROVED",
            RequestStatus::Rejected => "REJECTED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructorRequest {
    pub id: Uuid,
    #[serde(default)]
    pub user: Option<Uuid>,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_name: String,
    pub status: RequestStatus,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub qualifications: String,
    #[serde(default)]
    pub teaching_interests: String,
    #[serde(default)]
    pub reviewed_by_email: Option<String>,
    #[serde(default)]
    pub review_notes: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewInstructorRequest {
    pub reason: String,
    pub qualifications: String,
    pub teaching_interests: String,
}
