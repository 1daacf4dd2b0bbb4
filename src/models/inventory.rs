use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Quantity at which stock stops being reported as low.
pub const LOW_STOCK_THRESHOLD: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "stock_status")]
pub enum StockStatus {
    #[sqlx(rename = "In Stock")]
    #[serde(rename = "In Stock")]
    InStock,
    #[sqlx(rename = "Low Stock")]
    #[serde(rename = "Low Stock")]
    LowStock,
    #[sqlx(rename = "Out of Stock")]
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl StockStatus {
    pub fn from_quantity(quantity: i32) -> Self {
        if quantity <= 0 {
            StockStatus::OutOfStock
        } else if quantity < LOW_STOCK_THRESHOLD {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct InventoryEntry {
    #[serde(rename = "inventory_id")]
    pub id: Uuid,
    pub pharmacy_id: Uuid,
    pub medicine_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
    pub status: StockStatus,
    pub last_updated: DateTime<Utc>,
}

/// Patient-facing search hit.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct StockListing {
    pub medicine: String,
    pub pharmacy: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub pharmacy_id: Uuid,
    pub quantity: i32,
    pub status: StockStatus,
    pub price: Decimal,
}

/// A row of the pharmacist's own stock sheet.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct StockSheetRow {
    pub medicine: String,
    pub medicine_id: Uuid,
    pub quantity: i32,
    pub status: StockStatus,
    pub price: Decimal,
}
