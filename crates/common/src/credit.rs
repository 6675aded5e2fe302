//! Customer credit status.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Approval state assigned to a customer by the credit check.
///
/// State transitions:
/// ```text
/// Pending ──(credit check)──► Approved | Denied
///    ▲                             │
///    └──────(manual edit)──────────┘   any state to any state
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CreditStatus {
    /// Not yet checked.
    #[default]
    Pending,

    /// Credit approved.
    Approved,

    /// Credit denied.
    Denied,
}

impl CreditStatus {
    /// Returns the status name as stored and displayed.
    pub fn as_str(&self) -> &'static str {
        match self {
            CreditStatus::Pending => "Pending",
            CreditStatus::Approved => "Approved",
            CreditStatus::Denied => "Denied",
        }
    }
}

impl std::fmt::Display for CreditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown credit status name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown credit status '{0}'")]
pub struct UnknownCreditStatus(pub String);

impl FromStr for CreditStatus {
    type Err = UnknownCreditStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Pending" => Ok(CreditStatus::Pending),
            "Approved" => Ok(CreditStatus::Approved),
            "Denied" => Ok(CreditStatus::Denied),
            other => Err(UnknownCreditStatus(other.to_string())),
        }
    }
}
