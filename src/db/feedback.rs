use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Feedback, FeedbackDetail, FeedbackStatus};

/// New feedback always enters the moderation queue as `Pending`.
pub async fn create(
    pool: &PgPool,
    patient_id: Uuid,
    pharmacy_id: Uuid,
    rating: i32,
    comment: &str,
) -> Result<Feedback, sqlx::Error> {
    sqlx::query_as::<_, Feedback>(
        "INSERT INTO feedback (id, patient_id, pharmacy_id, rating, comment, status)
         VALUES ($1, $2, $3, $4, $5, 'Pending') RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(patient_id)
    .bind(pharmacy_id)
    .bind(rating)
    .bind(comment)
    .fetch_one(pool)
    .await
}

pub async fn list_by_status(
    pool: &PgPool,
    status: FeedbackStatus,
) -> Result<Vec<FeedbackDetail>, sqlx::Error> {
    sqlx::query_as::<_, FeedbackDetail>(
        "SELECT f.*, u.full_name AS patient_name, p.name AS pharmacy_name
         FROM feedback f
         JOIN users u ON f.patient_id = u.id
         JOIN pharmacies p ON f.pharmacy_id = p.id
         WHERE f.status = $1
         ORDER BY f.created_at",
    )
    .bind(status)
    .fetch_all(pool)
    .await
}

pub async fn list_approved_for_pharmacy(
    pool: &PgPool,
    pharmacy_id: Uuid,
) -> Result<Vec<FeedbackDetail>, sqlx::Error> {
    sqlx::query_as::<_, FeedbackDetail>(
        "SELECT f.*, u.full_name AS patient_name, p.name AS pharmacy_name
         FROM feedback f
         JOIN users u ON f.patient_id = u.id
         JOIN pharmacies p ON f.pharmacy_id = p.id
         WHERE f.pharmacy_id = $1 AND f.status = 'Approved'
         ORDER BY f.created_at DESC",
    )
    .bind(pharmacy_id)
    .fetch_all(pool)
    .await
}

/// (average rating rounded to one decimal, approved review count).
pub async fn approved_rating(
    pool: &PgPool,
    pharmacy_id: Uuid,
) -> Result<(Option<f64>, i64), sqlx::Error> {
    sqlx::query_as(
        "SELECT ROUND(AVG(rating)::numeric, 1)::float8, COUNT(*)
         FROM feedback
         WHERE pharmacy_id = $1 AND status = 'Approved'",
    )
    .bind(pharmacy_id)
    .fetch_one(pool)
    .await
}

pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: FeedbackStatus,
) -> Result<Option<Feedback>, sqlx::Error> {
    sqlx::query_as::<_, Feedback>("UPDATE feedback SET status = $2 WHERE id = $1 RETURNING *")
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await
}

pub async fn delete_by_patients<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    patient_ids: &[Uuid],
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM feedback WHERE patient_id = ANY($1)")
        .bind(patient_ids)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_for_pharmacy<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    pharmacy_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM feedback WHERE pharmacy_id = $1")
        .bind(pharmacy_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
