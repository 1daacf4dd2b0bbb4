use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extractor::LegacyAuth;
use crate::auth::policy;
use crate::db;
use crate::error::AppError;
use crate::extract::{AppJson, AppPath};
use crate::models::{Feedback, FeedbackDetail};
use crate::state::SharedState;
use crate::validation::{non_blank, parse_rating};

#[derive(Deserialize)]
pub struct SubmitFeedback {
    pub pharmacy_id: Option<Uuid>,
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
    pub feedback: Feedback,
}

const MISSING_FIELDS: &str = "Missing required fields: pharmacy_id, rating, comment";

pub async fn submit(
    LegacyAuth(auth): LegacyAuth,
    State(state): State<SharedState>,
    AppJson(req): AppJson<SubmitFeedback>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    policy::SUBMIT_FEEDBACK.check_role(auth.role)?;

    let (Some(pharmacy_id), Some(comment)) = (req.pharmacy_id, non_blank(req.comment.as_deref()))
    else {
        return Err(AppError::BadRequest(MISSING_FIELDS.to_string()));
    };
    let rating = parse_rating(req.rating)?;

    let patient = policy::authorize(&state.pool, &auth, &policy::SUBMIT_FEEDBACK).await?;

    db::pharmacies::find_by_id(&state.pool, pharmacy_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Pharmacy not found".to_string()))?;

    let feedback = db::feedback::create(&state.pool, patient.id, pharmacy_id, rating, comment).await?;

    tracing::info!(
        feedback_id = %feedback.id,
        patient_id = %patient.id,
        %pharmacy_id,
        rating,
        "feedback submitted"
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            message: "Feedback submitted and awaiting moderation",
            feedback,
        }),
    ))
}

/// Public list of approved reviews for a pharmacy.
pub async fn list_for_pharmacy(
    State(state): State<SharedState>,
    AppPath(pharmacy_id): AppPath<Uuid>,
) -> Result<Json<Vec<FeedbackDetail>>, AppError> {
    let feedback = db::feedback::list_approved_for_pharmacy(&state.pool, pharmacy_id).await?;
    Ok(Json(feedback))
}
