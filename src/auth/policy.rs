//! Per-endpoint access rules.
//!
//! A [`Policy`] combines the role allow-list with a status rule, an optional
//! verification requirement and an optional patient-ownership check. Banned
//! accounts are refused by every policy. The role
//! is checked against the token before touching the database; everything else
//! is evaluated against the account as currently stored, because an admin may
//! have suspended or banned it after the token was issued.

use sqlx::PgPool;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{AccountStatus, Role, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRule {
    NotBanned,
    ActiveOnly,
}

#[derive(Debug, Clone, Copy)]
pub struct Policy {
    roles: &'static [Role],
    role_denial: &'static str,
    status: StatusRule,
    suspended_denial: &'static str,
    verified_denial: Option<&'static str>,
    owner_denial: Option<&'static str>,
}

const BANNED: &str = "Your account is banned.";
const SUSPENDED: &str = "Your account is suspended.";
const INSUFFICIENT: &str = "Insufficient permissions";

impl Policy {
    const fn new(roles: &'static [Role], role_denial: &'static str) -> Self {
        Self {
            roles,
            role_denial,
            status: StatusRule::NotBanned,
            suspended_denial: SUSPENDED,
            verified_denial: None,
            owner_denial: None,
        }
    }

    const fn status(self, status: StatusRule, suspended_denial: &'static str) -> Self {
        Self {
            status,
            suspended_denial,
            ..self
        }
    }

    const fn verified(self, denial: &'static str) -> Self {
        Self {
            verified_denial: Some(denial),
            ..self
        }
    }

    /// Patients may only act on resources addressed to their own email.
    /// Other allowed roles are not restricted.
    const fn owned_by_patient(self, denial: &'static str) -> Self {
        Self {
            owner_denial: Some(denial),
            ..self
        }
    }

    pub fn check_role(&self, role: Role) -> Result<(), AppError> {
        if self.roles.contains(&role) {
            Ok(())
        } else {
            Err(AppError::Unauthorized(self.role_denial.to_string()))
        }
    }

    /// Full decision for `account`. `resource_owner` is the patient email of
    /// the targeted resource, when there is one.
    pub fn evaluate(&self, account: &User, resource_owner: Option<&str>) -> Result<(), AppError> {
        self.check_role(account.role)?;

        match (self.status, account.status) {
            (_, AccountStatus::Active) => {}
            (_, AccountStatus::Banned) => {
                return Err(AppError::Forbidden(BANNED.to_string()));
            }
            (StatusRule::ActiveOnly, AccountStatus::Suspended) => {
                return Err(AppError::Forbidden(self.suspended_denial.to_string()));
            }
            (StatusRule::NotBanned, AccountStatus::Suspended) => {}
        }

        if let Some(denial) = self.verified_denial {
            if !account.verified {
                return Err(AppError::Forbidden(denial.to_string()));
            }
        }

        if let (Some(denial), Some(owner), Role::Patient) =
            (self.owner_denial, resource_owner, account.role)
        {
            if account.email.to_lowercase() != owner.to_lowercase() {
                return Err(AppError::Forbidden(denial.to_string()));
            }
        }

        Ok(())
    }
}

pub const ADMIN: Policy = Policy::new(&[Role::Admin], INSUFFICIENT);

pub const RECEPTION: Policy = Policy::new(&[Role::Receptionist, Role::Admin], INSUFFICIENT);

pub const PHARMACIST_DASHBOARD: Policy = Policy::new(&[Role::Pharmacist], INSUFFICIENT);

pub const ADD_MEDICINE: Policy =
    Policy::new(&[Role::Pharmacist], "Only pharmacists can add new medicines");

pub const VIEW_INVENTORY: Policy =
    Policy::new(&[Role::Pharmacist], "Only pharmacists can access this");

pub const UPDATE_INVENTORY: Policy =
    Policy::new(&[Role::Pharmacist], "Only pharmacists can update inventory");

pub const ISSUE_PRESCRIPTION: Policy =
    Policy::new(&[Role::Doctor], "Only doctors can issue prescriptions")
        .status(
            StatusRule::ActiveOnly,
            "Your account is suspended. You can log in, but you cannot issue prescriptions.",
        )
        .verified(
            "Your account is pending verification. Please wait for admin approval before issuing prescriptions.",
        );

pub const LOOKUP_PATIENT: Policy = Policy::new(
    &[Role::Pharmacist],
    "Only pharmacists can access patient prescriptions",
);

pub const OWN_PRESCRIPTIONS: Policy =
    Policy::new(&[Role::Patient], "Only patients can view their prescriptions")
        .owned_by_patient("You can only view your own prescriptions");

pub const FULFILL_PRESCRIPTION: Policy = Policy::new(
    &[Role::Pharmacist, Role::Patient],
    "Only pharmacists and patients can fulfill prescriptions",
)
.owned_by_patient("You can only fulfill your own prescriptions");

pub const DELETE_PRESCRIPTION: Policy = Policy::new(
    &[Role::Pharmacist, Role::Patient],
    "Only pharmacists and patients can delete prescriptions",
)
.owned_by_patient("You can only delete your own prescriptions");

pub const SUBMIT_FEEDBACK: Policy = Policy::new(&[Role::Patient], "Only patients can submit feedback")
    .status(
        StatusRule::ActiveOnly,
        "Your account is suspended. You can log in, but you cannot submit reviews/ratings.",
    );

/// Role check against the token, then a fresh account lookup evaluated
/// without a resource owner. Returns the stored account.
pub async fn authorize(pool: &PgPool, auth: &AuthUser, policy: &Policy) -> Result<User, AppError> {
    policy.check_role(auth.role)?;

    let account = db::users::find_by_id(pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

    policy.evaluate(&account, None)?;
    Ok(account)
}
