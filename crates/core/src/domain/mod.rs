mod enrollment_mode;
mod error;
mod fields;
mod grade_point;
mod ids;
mod occupation;
mod rating;
mod scoring;

pub use enrollment_mode::EnrollmentMode;
pub use error::DomainError;
pub use fields::{
    CourseDescription, CourseName, EmailAddress, ImageRef, LessonTitle, SocialLink, Username,
    non_negative,
};
pub use grade_point::GradePoint;
pub use ids::{
    ChoiceId, CourseId, EnrollmentId, InstructorId, LearnerId, LessonId, QuestionId,
    SubmissionId, UserId,
};
pub use occupation::Occupation;
pub use rating::Rating;
pub use scoring::{QuestionCatalog, QuestionTally, compute_submission_score, stored_total_score};
