use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::extractor::LegacyAuth;
use crate::auth::policy;
use crate::db;
use crate::error::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::audit;
use crate::models::{
    AccountStatus, AuditEvent, Feedback, FeedbackDetail, FeedbackStatus, Pharmacy, User,
    UserWithPharmacy,
};
use crate::moderation::{self, CascadeReport};
use crate::state::SharedState;

const AUDIT_PAGE: i64 = 100;

#[derive(Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

fn parse_status(raw: &str) -> Result<AccountStatus, AppError> {
    raw.trim().parse().map_err(AppError::BadRequest)
}

pub async fn list_pharmacies(
    LegacyAuth(auth): LegacyAuth,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Pharmacy>>, AppError> {
    policy::authorize(&state.pool, &auth, &policy::ADMIN).await?;
    let pharmacies = db::pharmacies::list(&state.pool).await?;
    Ok(Json(pharmacies))
}

pub async fn verify_pharmacy(
    LegacyAuth(auth): LegacyAuth,
    State(state): State<SharedState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    policy::authorize(&state.pool, &auth, &policy::ADMIN).await?;

    let pharmacy = db::pharmacies::verify(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Pharmacy not found".to_string()))?;

    tracing::info!(pharmacy_id = %id, admin_id = %auth.user_id, "pharmacy verified");
    audit::log_event(
        &state.pool,
        auth.user_id,
        "pharmacy.verified",
        "pharmacy",
        Some(id),
        None,
    )
    .await;

    Ok(Json(json!({
        "message": "Pharmacy verified successfully",
        "pharmacy": pharmacy,
    })))
}

pub async fn update_pharmacy_status(
    LegacyAuth(auth): LegacyAuth,
    State(state): State<SharedState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<StatusUpdate>,
) -> Result<Json<serde_json::Value>, AppError> {
    policy::authorize(&state.pool, &auth, &policy::ADMIN).await?;
    let requested = parse_status(&req.status)?;

    let change = moderation::change_pharmacy_status(&state.pool, id, requested).await?;

    audit::log_event(
        &state.pool,
        auth.user_id,
        "pharmacy.status_changed",
        "pharmacy",
        Some(id),
        Some(json!({
            "from": change.previous,
            "to": change.status,
            "pharmacists": change.pharmacists,
        })),
    )
    .await;

    Ok(Json(json!({
        "message": format!("Pharmacy {} successfully", change.status.outcome()),
        "pharmacy_id": change.pharmacy_id,
        "status": change.status,
        "pharmacists_updated": change.pharmacists.len(),
    })))
}

pub async fn delete_pharmacy(
    LegacyAuth(auth): LegacyAuth,
    State(state): State<SharedState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    policy::authorize(&state.pool, &auth, &policy::ADMIN).await?;

    let report: CascadeReport = moderation::delete_pharmacy(&state.pool, id).await?;

    audit::log_event(
        &state.pool,
        auth.user_id,
        "pharmacy.deleted",
        "pharmacy",
        Some(id),
        Some(json!(report)),
    )
    .await;

    Ok(Json(json!({
        "message": "Pharmacy and all related data deleted successfully",
        "deleted": report,
    })))
}

pub async fn list_users(
    LegacyAuth(auth): LegacyAuth,
    State(state): State<SharedState>,
) -> Result<Json<Vec<User>>, AppError> {
    policy::authorize(&state.pool, &auth, &policy::ADMIN).await?;
    let users = db::users::list_all(&state.pool).await?;
    Ok(Json(users))
}

pub async fn search_users(
    LegacyAuth(auth): LegacyAuth,
    State(state): State<SharedState>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> Result<Json<Vec<UserWithPharmacy>>, AppError> {
    policy::authorize(&state.pool, &auth, &policy::ADMIN).await?;

    let term = query
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::BadRequest("Search query is required".to_string()))?;

    let users = db::users::search(&state.pool, term).await?;
    Ok(Json(users))
}

pub async fn update_user_status(
    LegacyAuth(auth): LegacyAuth,
    State(state): State<SharedState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<StatusUpdate>,
) -> Result<Json<serde_json::Value>, AppError> {
    policy::authorize(&state.pool, &auth, &policy::ADMIN).await?;
    let requested = parse_status(&req.status)?;

    if id == auth.user_id {
        return Err(AppError::BadRequest(
            "You cannot change your own account status".to_string(),
        ));
    }

    let change = moderation::change_user_status(&state.pool, id, requested).await?;

    audit::log_event(
        &state.pool,
        auth.user_id,
        "user.status_changed",
        "user",
        Some(id),
        Some(json!({
            "from": change.previous,
            "to": change.status,
            "pharmacy": change.pharmacy,
        })),
    )
    .await;

    Ok(Json(json!({
        "message": format!("User {} successfully", change.status.outcome()),
        "user_id": change.user_id,
        "status": change.status,
        "pharmacy": change.pharmacy.map(|(pharmacy_id, status)| json!({
            "pharmacy_id": pharmacy_id,
            "status": status,
        })),
    })))
}

pub async fn delete_user(
    LegacyAuth(auth): LegacyAuth,
    State(state): State<SharedState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    policy::authorize(&state.pool, &auth, &policy::ADMIN).await?;

    if id == auth.user_id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }

    let report = moderation::delete_user(&state.pool, id).await?;

    audit::log_event(
        &state.pool,
        auth.user_id,
        "user.deleted",
        "user",
        Some(id),
        Some(json!(report)),
    )
    .await;

    Ok(Json(json!({
        "message": "User and all related data deleted successfully",
        "deleted": report,
    })))
}

pub async fn verify_doctor(
    LegacyAuth(auth): LegacyAuth,
    State(state): State<SharedState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    policy::authorize(&state.pool, &auth, &policy::ADMIN).await?;

    let doctor = db::users::verify_doctor(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))?;

    tracing::info!(doctor_id = %id, admin_id = %auth.user_id, "doctor verified");
    audit::log_event(&state.pool, auth.user_id, "doctor.verified", "user", Some(id), None).await;

    Ok(Json(json!({
        "message": "Doctor verified successfully",
        "doctor": doctor,
    })))
}

/// Moderation queue: feedback still waiting for a decision.
pub async fn pending_feedback(
    LegacyAuth(auth): LegacyAuth,
    State(state): State<SharedState>,
) -> Result<Json<Vec<FeedbackDetail>>, AppError> {
    policy::authorize(&state.pool, &auth, &policy::ADMIN).await?;
    let feedback = db::feedback::list_by_status(&state.pool, FeedbackStatus::Pending).await?;
    Ok(Json(feedback))
}

pub async fn moderate_feedback(
    LegacyAuth(auth): LegacyAuth,
    State(state): State<SharedState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<StatusUpdate>,
) -> Result<Json<Feedback>, AppError> {
    policy::authorize(&state.pool, &auth, &policy::ADMIN).await?;

    let status = match req.status.trim().parse::<FeedbackStatus>() {
        Ok(status @ (FeedbackStatus::Approved | FeedbackStatus::Removed)) => status,
        Ok(FeedbackStatus::Pending) | Err(_) => {
            return Err(AppError::BadRequest(
                "Invalid status. Must be 'Approved' or 'Removed'".to_string(),
            ));
        }
    };

    let feedback = db::feedback::update_status(&state.pool, id, status)
        .await?
        .ok_or_else(|| AppError::NotFound("Feedback not found".to_string()))?;

    tracing::info!(feedback_id = %id, status = status.as_str(), "feedback moderated");
    audit::log_event(
        &state.pool,
        auth.user_id,
        "feedback.moderated",
        "feedback",
        Some(id),
        Some(json!({ "status": status })),
    )
    .await;

    Ok(Json(feedback))
}

pub async fn audit_log(
    LegacyAuth(auth): LegacyAuth,
    State(state): State<SharedState>,
) -> Result<Json<Vec<AuditEvent>>, AppError> {
    policy::authorize(&state.pool, &auth, &policy::ADMIN).await?;
    let events = db::audit::list(&state.pool, AUDIT_PAGE).await?;
    Ok(Json(events))
}
