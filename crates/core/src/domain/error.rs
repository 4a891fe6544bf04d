use thiserror::Error;

use super::QuestionId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("{field} is {len} characters long, at most {max} allowed")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
    #[error("invalid grade point: {0}. grade point must be in [0, 32767]")]
    InvalidGradePoint(i32),
    #[error("invalid rating: {0}. rating must be a finite number")]
    InvalidRating(String),
    #[error("invalid social link '{0}': expected an absolute http(s) url")]
    InvalidSocialLink(String),
    #[error("{field} must not be negative, got {value}")]
    NegativeCount { field: &'static str, value: i32 },
    #[error("question {0} not found")]
    QuestionNotFound(QuestionId),
}
