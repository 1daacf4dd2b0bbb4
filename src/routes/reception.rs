use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::auth::extractor::LegacyAuth;
use crate::auth::policy;
use crate::db;
use crate::error::AppError;
use crate::extract::{AppPath, AppQuery};
use crate::models::PrescriptionDetail;
use crate::routes::prescriptions::{PatientPrescriptions, PatientSummary};
use crate::state::SharedState;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

#[derive(Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

fn page_size(requested: Option<i64>) -> i64 {
    requested.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Unfulfilled prescriptions across all patients, newest first.
pub async fn recent_prescriptions(
    LegacyAuth(auth): LegacyAuth,
    State(state): State<SharedState>,
    AppQuery(query): AppQuery<RecentQuery>,
) -> Result<Json<Vec<PrescriptionDetail>>, AppError> {
    policy::authorize(&state.pool, &auth, &policy::RECEPTION).await?;
    let prescriptions =
        db::prescriptions::list_recent_open(&state.pool, page_size(query.limit)).await?;
    Ok(Json(prescriptions))
}

pub async fn patient_records(
    LegacyAuth(auth): LegacyAuth,
    State(state): State<SharedState>,
    AppPath(email): AppPath<String>,
) -> Result<Json<PatientPrescriptions>, AppError> {
    policy::authorize(&state.pool, &auth, &policy::RECEPTION).await?;

    let patient = db::users::find_patient_by_email(&state.pool, email.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))?;
    let prescriptions =
        db::prescriptions::list_open_for_patient(&state.pool, &patient.email).await?;

    Ok(Json(PatientPrescriptions {
        patient: PatientSummary {
            id: patient.id,
            name: patient.full_name,
            email: patient.email,
            phone_number: patient.phone_number,
        },
        prescriptions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_caps() {
        assert_eq!(page_size(None), 50);
        assert_eq!(page_size(Some(10)), 10);
        assert_eq!(page_size(Some(10_000)), 500);
        assert_eq!(page_size(Some(0)), 1);
    }
}
