use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Medicine, MedicineName};

pub async fn create(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
    category: Option<&str>,
) -> Result<Medicine, sqlx::Error> {
    sqlx::query_as::<_, Medicine>(
        "INSERT INTO medicines (id, name, description, category)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(name)
    .bind(description)
    .bind(category)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Medicine>, sqlx::Error> {
    sqlx::query_as::<_, Medicine>("SELECT * FROM medicines WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Medicine>, sqlx::Error> {
    sqlx::query_as::<_, Medicine>("SELECT * FROM medicines WHERE LOWER(name) = LOWER($1)")
        .bind(name)
        .fetch_optional(pool)
        .await
}

pub async fn list_names(pool: &PgPool) -> Result<Vec<MedicineName>, sqlx::Error> {
    sqlx::query_as::<_, MedicineName>("SELECT id, name FROM medicines ORDER BY name")
        .fetch_all(pool)
        .await
}

/// Medicines stocked by at least one verified, active pharmacy.
pub async fn list_available(pool: &PgPool) -> Result<Vec<MedicineName>, sqlx::Error> {
    sqlx::query_as::<_, MedicineName>(
        "SELECT DISTINCT m.id, m.name
         FROM medicines m
         JOIN inventory i ON m.id = i.medicine_id
         JOIN pharmacies p ON i.pharmacy_id = p.id
         WHERE i.status <> 'Out of Stock'
           AND p.verified = true
           AND p.status = 'active'
         ORDER BY m.name",
    )
    .fetch_all(pool)
    .await
}
