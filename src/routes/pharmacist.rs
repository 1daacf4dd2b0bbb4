use axum::extract::State;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::extractor::LegacyAuth;
use crate::auth::policy;
use crate::db;
use crate::error::AppError;
use crate::models::{AccountStatus, FeedbackDetail};
use crate::state::SharedState;

#[derive(Serialize)]
pub struct PharmacySummary {
    #[serde(rename = "pharmacy_id")]
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub verified: bool,
    pub status: AccountStatus,
    /// Visible in patient search.
    pub listed: bool,
}

#[derive(Serialize)]
pub struct FeedbackDashboard {
    pub pharmacy: PharmacySummary,
    pub average_rating: Option<f64>,
    pub review_count: i64,
    pub feedback: Vec<FeedbackDetail>,
}

pub async fn feedback(
    LegacyAuth(auth): LegacyAuth,
    State(state): State<SharedState>,
) -> Result<Json<FeedbackDashboard>, AppError> {
    let account = policy::authorize(&state.pool, &auth, &policy::PHARMACIST_DASHBOARD).await?;

    let not_found = || AppError::NotFound("No pharmacy linked to this account".to_string());
    let pharmacy_id = account.pharmacy_id.ok_or_else(not_found)?;
    let pharmacy = db::pharmacies::find_by_id(&state.pool, pharmacy_id)
        .await?
        .ok_or_else(not_found)?;

    let (average_rating, review_count) =
        db::feedback::approved_rating(&state.pool, pharmacy.id).await?;
    let feedback = db::feedback::list_approved_for_pharmacy(&state.pool, pharmacy.id).await?;

    Ok(Json(FeedbackDashboard {
        pharmacy: PharmacySummary {
            listed: pharmacy.is_listed(),
            id: pharmacy.id,
            name: pharmacy.name,
            address: pharmacy.address,
            verified: pharmacy.verified,
            status: pharmacy.status,
        },
        average_rating,
        review_count,
        feedback,
    }))
}
