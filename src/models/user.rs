use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AccountStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role")]
pub enum Role {
    Patient,
    Doctor,
    Pharmacist,
    Receptionist,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Patient => "Patient",
            Role::Doctor => "Doctor",
            Role::Pharmacist => "Pharmacist",
            Role::Receptionist => "Receptionist",
            Role::Admin => "Admin",
        }
    }

    /// Doctors and pharmacists start unverified and wait for an admin.
    pub fn needs_verification(self) -> bool {
        matches!(self, Role::Doctor | Role::Pharmacist)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Patient" => Ok(Role::Patient),
            "Doctor" => Ok(Role::Doctor),
            "Pharmacist" => Ok(Role::Pharmacist),
            "Receptionist" => Ok(Role::Receptionist),
            "Admin" => Ok(Role::Admin),
            _ => Err("Invalid role selected".to_string()),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct User {
    #[serde(rename = "user_id")]
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub phone_number: Option<String>,
    pub verified: bool,
    pub status: AccountStatus,
    pub pharmacy_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Admin search row: a user plus a summary of the pharmacy they run, if any.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct UserWithPharmacy {
    #[serde(rename = "user_id")]
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub phone_number: Option<String>,
    pub verified: bool,
    pub status: AccountStatus,
    pub pharmacy_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub pharmacy_name: Option<String>,
    pub pharmacy_address: Option<String>,
    pub pharmacy_contact: Option<String>,
    pub pharmacy_verified: Option<bool>,
    pub pharmacy_status: Option<AccountStatus>,
    pub pharmacy_pharmacy_id: Option<Uuid>,
}
