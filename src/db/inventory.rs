use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{InventoryEntry, StockListing, StockSheetRow, StockStatus};

/// Insert or update the (pharmacy, medicine) row in one statement.
pub async fn upsert(
    pool: &PgPool,
    pharmacy_id: Uuid,
    medicine_id: Uuid,
    quantity: i32,
    price: Decimal,
    status: StockStatus,
) -> Result<InventoryEntry, sqlx::Error> {
    sqlx::query_as::<_, InventoryEntry>(
        "INSERT INTO inventory (id, pharmacy_id, medicine_id, quantity, price, status)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (pharmacy_id, medicine_id) DO UPDATE
         SET quantity = EXCLUDED.quantity,
             price = EXCLUDED.price,
             status = EXCLUDED.status,
             last_updated = now()
         RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(pharmacy_id)
    .bind(medicine_id)
    .bind(quantity)
    .bind(price)
    .bind(status)
    .fetch_one(pool)
    .await
}

/// Patient search: in-stock rows at verified, active pharmacies whose
/// medicine name contains `term` (case-insensitive).
pub async fn search(pool: &PgPool, term: &str) -> Result<Vec<StockListing>, sqlx::Error> {
    sqlx::query_as::<_, StockListing>(
        "SELECT m.name AS medicine, p.name AS pharmacy, p.address,
                p.latitude, p.longitude, p.id AS pharmacy_id,
                i.quantity, i.status, i.price
         FROM inventory i
         JOIN medicines m ON i.medicine_id = m.id
         JOIN pharmacies p ON i.pharmacy_id = p.id
         WHERE m.name ILIKE $1 ESCAPE '\\'
           AND i.status <> 'Out of Stock'
           AND p.verified = true
           AND p.status = 'active'
         ORDER BY m.name, p.name",
    )
    .bind(super::contains_pattern(term))
    .fetch_all(pool)
    .await
}

pub async fn list_for_pharmacy(
    pool: &PgPool,
    pharmacy_id: Uuid,
) -> Result<Vec<StockSheetRow>, sqlx::Error> {
    sqlx::query_as::<_, StockSheetRow>(
        "SELECT m.name AS medicine, m.id AS medicine_id, i.quantity, i.status, i.price
         FROM inventory i
         JOIN medicines m ON i.medicine_id = m.id
         WHERE i.pharmacy_id = $1
         ORDER BY m.name",
    )
    .bind(pharmacy_id)
    .fetch_all(pool)
    .await
}

pub async fn delete_for_pharmacy<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    pharmacy_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM inventory WHERE pharmacy_id = $1")
        .bind(pharmacy_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
