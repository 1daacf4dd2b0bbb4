use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::auth::jwt::{encode_token, Claims};
use crate::auth::password;
use crate::config::AdminRegistration;
use crate::db;
use crate::db::pharmacies::NewPharmacy;
use crate::db::users::NewUser;
use crate::error::AppError;
use crate::extract::AppJson;
use crate::models::{AccountStatus, Role, User};
use crate::state::SharedState;
use crate::validation::{is_valid_email, non_blank, normalize_phone};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub pharmacy_details: Option<PharmacyDetails>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PharmacyDetails {
    pub pharmacy_name: Option<String>,
    pub pharmacy_address: Option<String>,
    pub contact_number: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub user: User,
    pub pharmacy_id: Option<Uuid>,
    pub message: String,
}

#[derive(Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub email: String,
    pub verified: bool,
    pub status: AccountStatus,
    pub pharmacy_id: Option<Uuid>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.full_name.clone(),
            role: user.role,
            email: user.email.clone(),
            verified: user.verified,
            status: user.status,
            pharmacy_id: user.pharmacy_id,
        }
    }
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

/// Registration input after validation, borrowed from the request.
struct Registration<'a> {
    full_name: &'a str,
    email: String,
    password: &'a str,
    role: Role,
    phone: Option<String>,
    pharmacy: Option<PharmacyInput<'a>>,
}

struct PharmacyInput<'a> {
    name: &'a str,
    address: &'a str,
    contact: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

fn validate_registration(req: &RegisterRequest) -> Result<Registration<'_>, AppError> {
    let bad = |msg: &str| AppError::BadRequest(msg.to_string());

    let full_name = non_blank(req.full_name.as_deref()).ok_or_else(|| bad("Full name is required"))?;
    if full_name.chars().count() < 2 {
        return Err(bad("Full name must be at least 2 characters"));
    }

    let email = non_blank(req.email.as_deref())
        .ok_or_else(|| bad("Email is required"))?
        .to_lowercase();
    if !is_valid_email(&email) {
        return Err(bad("Invalid email format"));
    }

    let password = req
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| bad("Password is required"))?;

    let role: Role = req.role.as_deref().unwrap_or_default().parse().map_err(AppError::BadRequest)?;

    let phone = match non_blank(req.phone.as_deref()) {
        Some(raw) => Some(normalize_phone(raw).ok_or_else(|| {
            bad("Invalid phone number format. Use Ethiopian format: +251XXXXXXXXX or 0XXXXXXXXX")
        })?),
        None => None,
    };

    let pharmacy = if role == Role::Pharmacist {
        let details = req
            .pharmacy_details
            .as_ref()
            .ok_or_else(|| bad("Pharmacy details are required for pharmacists"))?;
        let name = non_blank(details.pharmacy_name.as_deref())
            .ok_or_else(|| bad("Pharmacy name is required"))?;
        let address = non_blank(details.pharmacy_address.as_deref())
            .ok_or_else(|| bad("Pharmacy address is required"))?;
        let contact = match non_blank(details.contact_number.as_deref()) {
            Some(raw) => Some(
                normalize_phone(raw).ok_or_else(|| bad("Invalid pharmacy contact number format"))?,
            ),
            None => None,
        };
        Some(PharmacyInput {
            name,
            address,
            contact,
            latitude: details.latitude,
            longitude: details.longitude,
        })
    } else {
        None
    };

    Ok(Registration {
        full_name,
        email,
        password,
        role,
        phone,
        pharmacy,
    })
}

fn registration_message(role: Role) -> &'static str {
    match role {
        Role::Pharmacist => "Registration successful! Your pharmacy is pending admin verification.",
        Role::Doctor => {
            "Registration successful! Your account is pending admin verification before you can issue prescriptions."
        }
        Role::Patient | Role::Receptionist | Role::Admin => "Registration successful! Please login.",
    }
}

pub async fn register(
    State(state): State<SharedState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let reg = validate_registration(&req)?;

    let pw_hash = password::hash(reg.password).map_err(AppError::Internal)?;

    let mut tx = state.pool.begin().await?;

    if reg.role == Role::Admin && state.config.admin_registration == AdminRegistration::Bootstrap {
        // Serialises concurrent bootstrap attempts
        sqlx::query("SELECT pg_advisory_xact_lock(1)")
            .execute(&mut *tx)
            .await?;

        if db::users::count_by_role(&mut *tx, Role::Admin).await? > 0 {
            return Err(AppError::Forbidden(
                "Admin registration is closed. Ask an existing administrator.".to_string(),
            ));
        }
    }

    if db::users::find_by_email(&mut *tx, &reg.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let mut user = db::users::create(
        &mut *tx,
        &NewUser {
            full_name: reg.full_name,
            email: &reg.email,
            password_hash: &pw_hash,
            role: reg.role,
            phone_number: reg.phone.as_deref(),
            verified: !reg.role.needs_verification(),
        },
    )
    .await
    .map_err(AppError::conflict_on_unique("Email already registered"))?;

    let mut pharmacy_id = None;
    if let Some(input) = &reg.pharmacy {
        let new_pharmacy = NewPharmacy {
            name: input.name,
            address: input.address,
            latitude: input.latitude,
            longitude: input.longitude,
            contact_number: input.contact.as_deref(),
        };
        let pharmacy = db::pharmacies::create(&mut *tx, &new_pharmacy)
            .await
            .map_err(AppError::conflict_on_unique(
                "A pharmacy with this name already exists",
            ))?;
        user = db::users::link_pharmacy(&mut *tx, user.id, pharmacy.id).await?;
        pharmacy_id = Some(pharmacy.id);
    }

    tx.commit().await?;

    tracing::info!(user_id = %user.id, role = %user.role, ?pharmacy_id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: registration_message(user.role).to_string(),
            user,
            pharmacy_id,
        }),
    ))
}

pub async fn login(
    State(state): State<SharedState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = req.email.trim().to_lowercase();

    if let Err(retry_after) = state.login_limiter.check(&email) {
        let minutes = retry_after.as_secs().div_ceil(60).max(1);
        return Err(AppError::RateLimited(format!(
            "Too many login attempts. Try again in {minutes} minute(s)."
        )));
    }

    let user = db::users::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::BadRequest("User not found".to_string()))?;

    // Checked before the password so a ban holds regardless of credentials.
    if user.status == AccountStatus::Banned {
        return Err(AppError::Forbidden(
            "Your account has been banned. Please contact administrator.".to_string(),
        ));
    }

    let valid = password::verify(&req.password, &user.password_hash).map_err(AppError::Internal)?;
    if !valid {
        state.login_limiter.record_failure(&email);
        return Err(AppError::BadRequest("Invalid password".to_string()));
    }
    state.login_limiter.reset(&email);

    let claims = Claims::new(user.id, user.role, state.config.token_ttl_minutes);
    let token = encode_token(&claims, &state.config.jwt_secret).map_err(AppError::Internal)?;

    tracing::info!(user_id = %user.id, role = %user.role, "user logged in");

    Ok(Json(LoginResponse {
        token,
        user: UserSummary::from(&user),
    }))
}

pub async fn me(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<UserSummary>, AppError> {
    let user = db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(UserSummary::from(&user)))
}
