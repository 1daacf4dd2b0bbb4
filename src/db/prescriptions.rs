use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Prescription, PrescriptionDetail};

pub struct NewPrescription<'a> {
    pub doctor_id: Uuid,
    pub patient_email: &'a str,
    pub medicine_id: Uuid,
    pub dosage: Option<&'a str>,
    pub instructions: Option<&'a str>,
}

pub async fn create(
    pool: &PgPool,
    prescription: &NewPrescription<'_>,
) -> Result<Prescription, sqlx::Error> {
    sqlx::query_as::<_, Prescription>(
        "INSERT INTO prescriptions (id, doctor_id, patient_email, medicine_id, dosage, instructions)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(prescription.doctor_id)
    .bind(prescription.patient_email)
    .bind(prescription.medicine_id)
    .bind(prescription.dosage)
    .bind(prescription.instructions)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Prescription>, sqlx::Error> {
    sqlx::query_as::<_, Prescription>("SELECT * FROM prescriptions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Every prescription addressed to `email`, newest first.
pub async fn list_for_patient(
    pool: &PgPool,
    email: &str,
) -> Result<Vec<PrescriptionDetail>, sqlx::Error> {
    sqlx::query_as::<_, PrescriptionDetail>(
        "SELECT p.id, p.patient_email, p.dosage, p.instructions, p.status, p.issued_at,
                m.name AS medicine_name, pu.full_name AS patient_name, du.full_name AS doctor_name
         FROM prescriptions p
         JOIN medicines m ON p.medicine_id = m.id
         LEFT JOIN users pu ON LOWER(pu.email) = LOWER(p.patient_email) AND pu.role = 'Patient'
         LEFT JOIN users du ON p.doctor_id = du.id
         WHERE LOWER(p.patient_email) = LOWER($1)
         ORDER BY p.issued_at DESC",
    )
    .bind(email)
    .fetch_all(pool)
    .await
}

/// Unfulfilled prescriptions for `email`, newest first.
pub async fn list_open_for_patient(
    pool: &PgPool,
    email: &str,
) -> Result<Vec<PrescriptionDetail>, sqlx::Error> {
    sqlx::query_as::<_, PrescriptionDetail>(
        "SELECT p.id, p.patient_email, p.dosage, p.instructions, p.status, p.issued_at,
                m.name AS medicine_name, pu.full_name AS patient_name, du.full_name AS doctor_name
         FROM prescriptions p
         JOIN medicines m ON p.medicine_id = m.id
         LEFT JOIN users pu ON LOWER(pu.email) = LOWER(p.patient_email) AND pu.role = 'Patient'
         LEFT JOIN users du ON p.doctor_id = du.id
         WHERE LOWER(p.patient_email) = LOWER($1) AND p.status <> 'Fulfilled'
         ORDER BY p.issued_at DESC",
    )
    .bind(email)
    .fetch_all(pool)
    .await
}

/// Most recent unfulfilled prescriptions across all patients.
pub async fn list_recent_open(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<PrescriptionDetail>, sqlx::Error> {
    sqlx::query_as::<_, PrescriptionDetail>(
        "SELECT p.id, p.patient_email, p.dosage, p.instructions, p.status, p.issued_at,
                m.name AS medicine_name, pu.full_name AS patient_name, du.full_name AS doctor_name
         FROM prescriptions p
         JOIN medicines m ON p.medicine_id = m.id
         LEFT JOIN users pu ON LOWER(pu.email) = LOWER(p.patient_email) AND pu.role = 'Patient'
         LEFT JOIN users du ON p.doctor_id = du.id AND du.role = 'Doctor'
         WHERE p.status <> 'Fulfilled'
         ORDER BY p.issued_at DESC
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn mark_fulfilled(pool: &PgPool, id: Uuid) -> Result<Option<Prescription>, sqlx::Error> {
    sqlx::query_as::<_, Prescription>(
        "UPDATE prescriptions SET status = 'Fulfilled' WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM prescriptions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_by_doctors<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    doctor_ids: &[Uuid],
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM prescriptions WHERE doctor_id = ANY($1)")
        .bind(doctor_ids)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
