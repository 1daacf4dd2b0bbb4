//! Account lifecycle shared by users and pharmacies, and the rule that keeps a
//! pharmacist's account in step with their pharmacy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Suspended,
    Banned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// Target is already in the requested state.
    Unchanged(AccountStatus),
    /// `banned -> suspended`; a ban is only lifted through reactivation.
    Downgrade,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionError::Unchanged(status) => write!(f, "Status is already '{status}'"),
            TransitionError::Downgrade => {
                write!(f, "A banned account must be reactivated before it can be suspended")
            }
        }
    }
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Suspended => "suspended",
            AccountStatus::Banned => "banned",
        }
    }

    /// Word used in admin confirmation messages ("User banned successfully.").
    pub fn outcome(self) -> &'static str {
        match self {
            AccountStatus::Active => "reactivated",
            AccountStatus::Suspended => "suspended",
            AccountStatus::Banned => "banned",
        }
    }

    /// Validates an admin-requested move from `self` to `next`.
    pub fn transition(self, next: AccountStatus) -> Result<AccountStatus, TransitionError> {
        use AccountStatus::*;
        match (self, next) {
            (Active, Suspended) | (Active, Banned) | (Suspended, Banned) => Ok(next),
            (Suspended, Active) | (Banned, Active) => Ok(next),
            (Banned, Suspended) => Err(TransitionError::Downgrade),
            (Active, Active) | (Suspended, Suspended) | (Banned, Banned) => {
                Err(TransitionError::Unchanged(next))
            }
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AccountStatus::Active),
            "suspended" => Ok(AccountStatus::Suspended),
            "banned" => Ok(AccountStatus::Banned),
            _ => Err(
                "Invalid status. Must be 'active', 'suspended', or 'banned'".to_string(),
            ),
        }
    }
}

/// Status a pharmacy should move to after its pharmacist's account became
/// `account`. `None` means the pharmacy is left as it is.
///
/// Banning the pharmacist only suspends the pharmacy, and a banned pharmacy is
/// never touched from this side.
pub fn pharmacy_follows_pharmacist(
    account: AccountStatus,
    pharmacy: AccountStatus,
) -> Option<AccountStatus> {
    use AccountStatus::*;
    match (account, pharmacy) {
        (Suspended | Banned, Active) => Some(Suspended),
        (Suspended | Banned, Suspended | Banned) => None,
        (Active, Suspended) => Some(Active),
        (Active, Active | Banned) => None,
    }
}

/// Status a linked pharmacist account should move to after its pharmacy
/// became `pharmacy`. `None` means the account is left as it is.
pub fn pharmacist_follows_pharmacy(
    pharmacy: AccountStatus,
    account: AccountStatus,
) -> Option<AccountStatus> {
    use AccountStatus::*;
    match (pharmacy, account) {
        (Suspended, Active) => Some(Suspended),
        (Suspended, Suspended | Banned) => None,
        (Banned, Active | Suspended) => Some(Banned),
        (Banned, Banned) => None,
        (Active, Suspended | Banned) => Some(Active),
        (Active, Active) => None,
    }
}
