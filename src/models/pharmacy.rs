use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AccountStatus;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Pharmacy {
    #[serde(rename = "pharmacy_id")]
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact_number: Option<String>,
    pub verified: bool,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

impl Pharmacy {
    /// Whether patients may see this pharmacy's stock.
    pub fn is_listed(&self) -> bool {
        self.verified && self.status == AccountStatus::Active
    }
}
