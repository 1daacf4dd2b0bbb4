use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Medicine {
    #[serde(rename = "medicine_id")]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct MedicineName {
    #[serde(rename = "medicine_id")]
    pub id: Uuid,
    pub name: String,
}
