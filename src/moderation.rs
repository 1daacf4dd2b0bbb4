//! Admin-side mutations that touch more than one row: status changes with
//! pharmacist/pharmacy propagation, and cascading deletes.
//!
//! Each operation runs in a single transaction. Returning early with `?`
//! drops the transaction uncommitted, which rolls everything back.
//! Lock order is pharmacy first, then users, in every operation here.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::models::status::{pharmacist_follows_pharmacy, pharmacy_follows_pharmacist};
use crate::models::{AccountStatus, Role};

#[derive(Debug, Clone, Serialize)]
pub struct UserStatusChange {
    pub user_id: Uuid,
    pub previous: AccountStatus,
    pub status: AccountStatus,
    /// Pharmacy that followed the pharmacist, with its new status.
    pub pharmacy: Option<(Uuid, AccountStatus)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PharmacyStatusChange {
    pub pharmacy_id: Uuid,
    pub previous: AccountStatus,
    pub status: AccountStatus,
    /// Pharmacist accounts that followed the pharmacy, with their new status.
    pub pharmacists: Vec<(Uuid, AccountStatus)>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CascadeReport {
    pub users: u64,
    pub prescriptions: u64,
    pub feedback: u64,
    pub inventory: u64,
}

fn transition_error(e: crate::models::status::TransitionError) -> AppError {
    AppError::BadRequest(e.to_string())
}

pub async fn change_user_status(
    pool: &PgPool,
    user_id: Uuid,
    requested: AccountStatus,
) -> Result<UserStatusChange, AppError> {
    let mut tx = pool.begin().await?;

    let unlocked = db::users::find_by_id(&mut *tx, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let pharmacy = match (unlocked.role, unlocked.pharmacy_id) {
        (Role::Pharmacist, Some(pharmacy_id)) => {
            db::pharmacies::lock_by_id(&mut *tx, pharmacy_id).await?
        }
        _ => None,
    };

    let user = db::users::lock_by_id(&mut *tx, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let status = user.status.transition(requested).map_err(transition_error)?;
    db::users::update_status(&mut *tx, user.id, status).await?;

    let mut pharmacy_change = None;
    if let Some(pharmacy) = pharmacy {
        if let Some(next) = pharmacy_follows_pharmacist(status, pharmacy.status) {
            db::pharmacies::update_status(&mut *tx, pharmacy.id, next).await?;
            pharmacy_change = Some((pharmacy.id, next));
        }
    }

    tx.commit().await?;

    tracing::info!(
        user_id = %user.id,
        from = %user.status,
        to = %status,
        pharmacy = ?pharmacy_change,
        "user status changed"
    );

    Ok(UserStatusChange {
        user_id: user.id,
        previous: user.status,
        status,
        pharmacy: pharmacy_change,
    })
}

pub async fn change_pharmacy_status(
    pool: &PgPool,
    pharmacy_id: Uuid,
    requested: AccountStatus,
) -> Result<PharmacyStatusChange, AppError> {
    let mut tx = pool.begin().await?;

    let pharmacy = db::pharmacies::lock_by_id(&mut *tx, pharmacy_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Pharmacy not found".to_string()))?;

    let status = pharmacy.status.transition(requested).map_err(transition_error)?;
    db::pharmacies::update_status(&mut *tx, pharmacy.id, status).await?;

    let pharmacists = db::users::lock_pharmacists_of(&mut *tx, pharmacy.id).await?;
    let changed: Vec<(Uuid, AccountStatus)> = pharmacists
        .iter()
        .filter_map(|u| pharmacist_follows_pharmacy(status, u.status).map(|next| (u.id, next)))
        .collect();

    for target in [AccountStatus::Active, AccountStatus::Suspended, AccountStatus::Banned] {
        let ids: Vec<Uuid> = changed
            .iter()
            .filter(|(_, next)| *next == target)
            .map(|(id, _)| *id)
            .collect();
        if !ids.is_empty() {
            db::users::update_status_many(&mut *tx, &ids, target).await?;
        }
    }

    tx.commit().await?;

    tracing::info!(
        pharmacy_id = %pharmacy.id,
        from = %pharmacy.status,
        to = %status,
        pharmacists = changed.len(),
        "pharmacy status changed"
    );

    Ok(PharmacyStatusChange {
        pharmacy_id: pharmacy.id,
        previous: pharmacy.status,
        status,
        pharmacists: changed,
    })
}

/// Removes a user with the feedback they wrote and the prescriptions they issued.
pub async fn delete_user(pool: &PgPool, user_id: Uuid) -> Result<CascadeReport, AppError> {
    let mut tx = pool.begin().await?;

    let user = db::users::lock_by_id(&mut *tx, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    let ids = [user.id];

    let mut report = CascadeReport {
        feedback: db::feedback::delete_by_patients(&mut *tx, &ids).await?,
        prescriptions: db::prescriptions::delete_by_doctors(&mut *tx, &ids).await?,
        ..CascadeReport::default()
    };
    report.users = db::users::delete_many(&mut *tx, &ids).await?;

    tx.commit().await?;

    tracing::info!(user_id = %user.id, ?report, "user deleted");
    Ok(report)
}

/// Removes a pharmacy together with its pharmacist accounts (and everything
/// those accounts own), its inventory and its feedback.
pub async fn delete_pharmacy(pool: &PgPool, pharmacy_id: Uuid) -> Result<CascadeReport, AppError> {
    let mut tx = pool.begin().await?;

    let pharmacy = db::pharmacies::lock_by_id(&mut *tx, pharmacy_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Pharmacy not found".to_string()))?;

    let pharmacist_ids: Vec<Uuid> = db::users::lock_pharmacists_of(&mut *tx, pharmacy.id)
        .await?
        .into_iter()
        .map(|u| u.id)
        .collect();

    let mut report = CascadeReport::default();
    if !pharmacist_ids.is_empty() {
        report.prescriptions =
            db::prescriptions::delete_by_doctors(&mut *tx, &pharmacist_ids).await?;
        report.feedback = db::feedback::delete_by_patients(&mut *tx, &pharmacist_ids).await?;
        report.users = db::users::delete_many(&mut *tx, &pharmacist_ids).await?;
    }

    db::users::detach_from_pharmacy(&mut *tx, pharmacy.id).await?;
    report.inventory = db::inventory::delete_for_pharmacy(&mut *tx, pharmacy.id).await?;
    report.feedback += db::feedback::delete_for_pharmacy(&mut *tx, pharmacy.id).await?;
    db::pharmacies::delete(&mut *tx, pharmacy.id).await?;

    tx.commit().await?;

    tracing::info!(pharmacy_id = %pharmacy.id, ?report, "pharmacy deleted");
    Ok(report)
}
