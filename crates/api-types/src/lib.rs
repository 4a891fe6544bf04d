//! Shapes handed to the presentation layer that renders courses and errors.

use serde::{Deserialize, Serialize};

/// A course as rendered for one viewer.
///
/// `is_enrolled` is computed per request from the viewer's enrollments and is
/// never stored with the course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub description: String,
    /// ISO-8601 calendar date, absent while the course is unpublished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
    pub instructor_ids: Vec<String>,
    pub total_enrollment: i32,
    pub is_enrolled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}
