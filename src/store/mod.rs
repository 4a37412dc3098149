//! Entity store: every write runs the entity's full validation before it reaches the
//! database, and database constraint violations come back as typed errors.

pub mod categories;
pub mod comments;
pub mod games;
pub mod users;

use sea_orm::{DbErr, SqlErr};

use crate::validation::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("validation failed: {0:?}")]
    Validation(ValidationErrors),
    /// Unique or foreign-key violation, or a delete refused because rows still refer to it.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Database(DbErr),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => Self::Conflict(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => Self::Conflict(msg),
            _ => Self::Database(err),
        }
    }
}

impl From<ValidationErrors> for StoreError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl StoreError {
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}
