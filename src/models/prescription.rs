use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "prescription_status")]
pub enum PrescriptionStatus {
    #[sqlx(rename = "pending")]
    #[serde(rename = "pending")]
    Pending,
    Fulfilled,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Prescription {
    #[serde(rename = "prescription_id")]
    pub id: Uuid,
    pub patient_email: String,
    pub doctor_id: Uuid,
    pub medicine_id: Uuid,
    pub dosage: Option<String>,
    pub instructions: Option<String>,
    pub status: PrescriptionStatus,
    pub issued_at: DateTime<Utc>,
}

/// Prescription joined with the names a slip or dashboard needs.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct PrescriptionDetail {
    #[serde(rename = "prescription_id")]
    pub id: Uuid,
    pub patient_email: String,
    pub dosage: Option<String>,
    pub instructions: Option<String>,
    pub status: PrescriptionStatus,
    pub issued_at: DateTime<Utc>,
    pub medicine_name: String,
    pub patient_name: Option<String>,
    pub doctor_name: Option<String>,
}
