use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{AccountStatus, Role, User, UserWithPharmacy};

pub struct NewUser<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
    pub phone_number: Option<&'a str>,
    pub verified: bool,
}

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    user: &NewUser<'_>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (id, full_name, email, password_hash, role, phone_number, verified, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7, 'active') RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(user.full_name)
    .bind(user.email)
    .bind(user.password_hash)
    .bind(user.role)
    .bind(user.phone_number)
    .bind(user.verified)
    .fetch_one(executor)
    .await
}

pub async fn link_pharmacy<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    pharmacy_id: Uuid,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>("UPDATE users SET pharmacy_id = $2 WHERE id = $1 RETURNING *")
        .bind(id)
        .bind(pharmacy_id)
        .fetch_one(executor)
        .await
}

pub async fn find_by_email<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
        .bind(email)
        .fetch_optional(executor)
        .await
}

pub async fn find_patient_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE LOWER(email) = LOWER($1) AND role = 'Patient'",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_id<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn lock_by_id<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn count_by_role<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    role: Role,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = $1")
        .bind(role)
        .fetch_one(executor)
        .await?;
    Ok(row.0)
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

/// Case-insensitive substring match on name or email.
pub async fn search(pool: &PgPool, term: &str) -> Result<Vec<UserWithPharmacy>, sqlx::Error> {
    sqlx::query_as::<_, UserWithPharmacy>(
        "SELECT u.id, u.full_name, u.email, u.role, u.phone_number, u.verified, u.status,
                u.pharmacy_id, u.created_at,
                p.name AS pharmacy_name, p.address AS pharmacy_address,
                p.contact_number AS pharmacy_contact, p.verified AS pharmacy_verified,
                p.status AS pharmacy_status, p.id AS pharmacy_pharmacy_id
         FROM users u
         LEFT JOIN pharmacies p ON u.pharmacy_id = p.id
         WHERE u.full_name ILIKE $1 ESCAPE '\\' OR u.email ILIKE $1 ESCAPE '\\'
         ORDER BY u.created_at DESC",
    )
    .bind(super::contains_pattern(term))
    .fetch_all(pool)
    .await
}

pub async fn verify_doctor(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "UPDATE users SET verified = true WHERE id = $1 AND role = 'Doctor' RETURNING *",
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
    sqlx::query("UPDATE users SET status = $2 WHERE id = $1")
        .bind(id)
        .bind(status)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn update_status_many<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    ids: &[Uuid],
    status: AccountStatus,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET status = $2 WHERE id = ANY($1)")
        .bind(ids)
        .bind(status)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Pharmacist accounts linked to a pharmacy, locked for the rest of the transaction.
pub async fn lock_pharmacists_of<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    pharmacy_id: Uuid,
) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE pharmacy_id = $1 AND role = 'Pharmacist' FOR UPDATE",
    )
    .bind(pharmacy_id)
    .fetch_all(executor)
    .await
}

pub async fn detach_from_pharmacy<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    pharmacy_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET pharmacy_id = NULL WHERE pharmacy_id = $1")
        .bind(pharmacy_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn delete_many<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    ids: &[Uuid],
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ANY($1)")
        .bind(ids)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
