use thiserror::Error;

/// Errors that can occur when interacting with the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row with the given id exists.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A unique column already holds the submitted value.
    #[error("{field} already exists")]
    UniqueViolation { field: &'static str },

    /// A foreign key column points at a row that does not exist.
    #[error("{field} refers to a record that does not exist")]
    InvalidReference { field: &'static str },

    /// The row cannot be deleted because other rows reference it.
    #[error("{entity} is referenced by existing sales")]
    InUse { entity: &'static str },

    /// A sale failed validation before any row was written.
    #[error("Invalid sale: {0}")]
    InvalidSale(String),

    /// An amount computed by the store does not fit in the cents range.
    #[error("{what} exceeds the supported amount range")]
    AmountOutOfRange { what: &'static str },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
