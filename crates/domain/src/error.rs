//! Domain error types.

use store::StoreError;
use thiserror::Error;

/// Malformed or missing form input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was blank.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// A field that must hold a whole number did not.
    #[error("{field} must be a whole number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    /// A money field could not be read as a decimal amount.
    #[error("{field} must be a decimal amount, got '{value}'")]
    InvalidAmount { field: &'static str, value: String },

    /// A money field must be strictly positive.
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    /// A text field is longer than its column allows.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// A number or amount does not fit the range the store can hold.
    #[error("{field} '{value}' is out of range")]
    OutOfRange { field: &'static str, value: String },

    /// The credit status name is not one of Pending, Approved or Denied.
    #[error("unknown credit status '{0}'")]
    UnknownCreditStatus(String),
}

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The submitted input is malformed.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A uniqueness or reference rule of the store was violated.
    #[error("{message}")]
    ConstraintViolation { message: String },

    /// Every submitted line was blank or had a non-positive quantity.
    #[error("Sale has no valid items")]
    NoValidItems,

    /// An employee tried to delete their own record.
    #[error("You cannot delete your own employee record")]
    SelfDeletion,

    /// Unknown username or wrong password.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The password hasher failed.
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// Any other storage failure.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => DomainError::NotFound { entity, id },
            StoreError::UniqueViolation { .. }
            | StoreError::InvalidReference { .. }
            | StoreError::InUse { .. } => DomainError::ConstraintViolation {
                message: err.to_string(),
            },
            other => DomainError::Store(other),
        }
    }
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
