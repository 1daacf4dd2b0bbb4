use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::auth::policy;
use crate::db;
use crate::db::prescriptions::NewPrescription;
use crate::error::AppError;
use crate::extract::{AppJson, AppPath};
use crate::models::{Prescription, PrescriptionDetail, PrescriptionStatus};
use crate::state::SharedState;
use crate::validation::{is_valid_email, non_blank};

#[derive(Deserialize)]
pub struct IssuePrescription {
    pub patient_email: Option<String>,
    pub medicine_id: Option<Uuid>,
    pub dosage: Option<String>,
    pub instructions: Option<String>,
}

#[derive(Serialize)]
pub struct PatientSummary {
    #[serde(rename = "user_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
}

#[derive(Serialize)]
pub struct PatientPrescriptions {
    pub patient: PatientSummary,
    pub prescriptions: Vec<PrescriptionDetail>,
}

pub async fn issue(
    auth: AuthUser,
    State(state): State<SharedState>,
    AppJson(req): AppJson<IssuePrescription>,
) -> Result<(StatusCode, Json<Prescription>), AppError> {
    let doctor = policy::authorize(&state.pool, &auth, &policy::ISSUE_PRESCRIPTION).await?;

    let patient_email = non_blank(req.patient_email.as_deref())
        .ok_or_else(|| AppError::BadRequest("Patient email is required".to_string()))?
        .to_lowercase();
    if !is_valid_email(&patient_email) {
        return Err(AppError::BadRequest("Invalid patient email format".to_string()));
    }
    let medicine_id = req
        .medicine_id
        .ok_or_else(|| AppError::BadRequest("Medicine is required".to_string()))?;

    db::medicines::find_by_id(&state.pool, medicine_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Medicine not found".to_string()))?;

    let prescription = db::prescriptions::create(
        &state.pool,
        &NewPrescription {
            doctor_id: doctor.id,
            patient_email: &patient_email,
            medicine_id,
            dosage: non_blank(req.dosage.as_deref()),
            instructions: non_blank(req.instructions.as_deref()),
        },
    )
    .await?;

    tracing::info!(
        prescription_id = %prescription.id,
        doctor_id = %doctor.id,
        "prescription issued"
    );

    Ok((StatusCode::CREATED, Json(prescription)))
}

pub async fn my_prescriptions(
    auth: AuthUser,
    State(state): State<SharedState>,
    AppPath(email): AppPath<String>,
) -> Result<Json<Vec<PrescriptionDetail>>, AppError> {
    let patient = policy::authorize(&state.pool, &auth, &policy::OWN_PRESCRIPTIONS).await?;
    policy::OWN_PRESCRIPTIONS.evaluate(&patient, Some(&email))?;

    let prescriptions = db::prescriptions::list_for_patient(&state.pool, &email).await?;
    Ok(Json(prescriptions))
}

/// Pharmacist lookup at the counter.
pub async fn patient_lookup(
    auth: AuthUser,
    State(state): State<SharedState>,
    AppPath(email): AppPath<String>,
) -> Result<Json<PatientPrescriptions>, AppError> {
    policy::authorize(&state.pool, &auth, &policy::LOOKUP_PATIENT).await?;

    let patient = db::users::find_patient_by_email(&state.pool, email.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))?;
    let prescriptions = db::prescriptions::list_for_patient(&state.pool, &patient.email).await?;

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

pub async fn fulfill(
    auth: AuthUser,
    State(state): State<SharedState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Prescription>, AppError> {
    let account = policy::authorize(&state.pool, &auth, &policy::FULFILL_PRESCRIPTION).await?;

    let prescription = db::prescriptions::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Prescription not found".to_string()))?;
    policy::FULFILL_PRESCRIPTION.evaluate(&account, Some(&prescription.patient_email))?;

    if prescription.status == PrescriptionStatus::Fulfilled {
        return Err(AppError::BadRequest(
            "Prescription is already fulfilled".to_string(),
        ));
    }

    let fulfilled = db::prescriptions::mark_fulfilled(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Prescription not found".to_string()))?;

    tracing::info!(prescription_id = %id, by = %account.id, "prescription fulfilled");

    Ok(Json(fulfilled))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let account = policy::authorize(&state.pool, &auth, &policy::DELETE_PRESCRIPTION).await?;

    let prescription = db::prescriptions::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Prescription not found".to_string()))?;
    policy::DELETE_PRESCRIPTION.evaluate(&account, Some(&prescription.patient_email))?;

    if db::prescriptions::delete(&state.pool, id).await? == 0 {
        return Err(AppError::NotFound("Prescription not found".to_string()));
    }

    tracing::info!(prescription_id = %id, by = %account.id, "prescription deleted");

    Ok(Json(serde_json::json!({ "message": "Prescription deleted" })))
}
