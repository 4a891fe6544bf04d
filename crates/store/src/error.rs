use std::fmt;

use coursedb_api_types::ErrorResponse;
use coursedb_core::domain::DomainError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("validation failed: {0}")]
    Validation(DomainError),

    #[error("integrity violation: {0}")]
    Integrity(String),

    #[error("database error: {0}")]
    Database(DbErr),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Integrity,
    Internal,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Validation => "validation_error",
            Self::Integrity => "integrity_error",
            Self::Internal => "internal_error",
        }
    }
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn missing_parent(entity: &'static str, id: impl fmt::Display) -> Self {
        Self::Integrity(format!("referenced {entity} {id} does not exist"))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Integrity(_) => ErrorKind::Integrity,
            Self::Database(_) | Self::Other(_) => ErrorKind::Internal,
        }
    }

    /// Response body for the presentation layer. Internal failures do not
    /// leak database details.
    pub fn to_error_response(&self) -> ErrorResponse {
        let kind = self.kind();
        let message = match kind {
            ErrorKind::Internal => "internal storage error".to_string(),
            _ => self.to_string(),
        };

        ErrorResponse {
            code: kind.code().to_string(),
            message,
        }
    }
}

impl From<DomainError> for StoreError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::QuestionNotFound(id) => Self::not_found("question", id),
            other => Self::Validation(other),
        }
    }
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                Self::Integrity(format!("unique constraint violated: {detail}"))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                Self::Integrity(format!("foreign key constraint violated: {detail}"))
            }
            _ => Self::Database(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
