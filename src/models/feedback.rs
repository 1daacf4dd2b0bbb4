use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "feedback_status")]
pub enum FeedbackStatus {
    Pending,
    Approved,
    Removed,
}

impl FeedbackStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackStatus::Pending => "Pending",
            FeedbackStatus::Approved => "Approved",
            FeedbackStatus::Removed => "Removed",
        }
    }
}

impl FromStr for FeedbackStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(FeedbackStatus::Pending),
            "Approved" => Ok(FeedbackStatus::Approved),
            "Removed" => Ok(FeedbackStatus::Removed),
            _ => Err("Invalid feedback status".to_string()),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(rename = "feedback_id")]
    pub id: Uuid,
    pub patient_id: Uuid,
    pub pharmacy_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub status: FeedbackStatus,
    pub created_at: DateTime<Utc>,
}

/// Feedback with the reviewer's name, and the pharmacy's name for the admin queue.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct FeedbackDetail {
    #[serde(rename = "feedback_id")]
    pub id: Uuid,
    pub patient_id: Uuid,
    pub pharmacy_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub status: FeedbackStatus,
    pub created_at: DateTime<Utc>,
    pub patient_name: String,
    pub pharmacy_name: String,
}
