use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{AccountStatus, Pharmacy};

pub struct NewPharmacy<'a> {
    pub name: &'a str,
    pub address: &'a str,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact_number: Option<&'a str>,
}

/// New pharmacies start unverified and active.
pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    pharmacy: &NewPharmacy<'_>,
) -> Result<Pharmacy, sqlx::Error> {
    sqlx::query_as::<_, Pharmacy>(
        "INSERT INTO pharmacies (id, name, address, latitude, longitude, contact_number, verified, status)
         VALUES ($1, $2, $3, $4, $5, $6, false, 'active') RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(pharmacy.name)
    .bind(pharmacy.address)
    .bind(pharmacy.latitude)
    .bind(pharmacy.longitude)
    .bind(pharmacy.contact_number)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Pharmacy>, sqlx::Error> {
    sqlx::query_as::<_, Pharmacy>("SELECT * FROM pharmacies WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn lock_by_id<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<Pharmacy>, sqlx::Error> {
    sqlx::query_as::<_, Pharmacy>("SELECT * FROM pharmacies WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<Pharmacy>, sqlx::Error> {
    sqlx::query_as::<_, Pharmacy>("SELECT * FROM pharmacies ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn verify(pool: &PgPool, id: Uuid) -> Result<Option<Pharmacy>, sqlx::Error> {
    sqlx::query_as::<_, Pharmacy>(
        "UPDATE pharmacies SET verified = true WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn update_status<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    status: AccountStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE pharmacies SET status = $2 WHERE id = $1")
        .bind(id)
        .bind(status)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn delete<'e, E: sqlx::PgExecutor<'e>>(executor: E, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM pharmacies WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
