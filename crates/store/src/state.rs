//! Repositories bundled over one connection pool.

use std::sync::Arc;

use coursedb_core::domain::{QuestionId, compute_submission_score};
use sea_orm::DatabaseConnection;
use tracing::debug;

use crate::error::Result;
use crate::repository::{
    ChoiceRepository, CourseRepository, EnrollmentRepository, InstructorRepository,
    LearnerRepository, LessonRepository, QuestionRepository, SeaOrmChoiceRepository,
    SeaOrmCourseRepository, SeaOrmEnrollmentRepository, SeaOrmInstructorRepository,
    SeaOrmLearnerRepository, SeaOrmLessonRepository, SeaOrmQuestionRepository,
    SeaOrmSubmissionRepository, SeaOrmUserRepository, SubmissionRepository, UserRepository,
};

/// Entry point handed to the service layer.
#[derive(Clone)]
pub struct CourseStore {
    pub users: Arc<dyn UserRepository>,
    pub instructors: Arc<dyn InstructorRepository>,
    pub learners: Arc<dyn LearnerRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub lessons: Arc<dyn LessonRepository>,
    pub enrollments: Arc<dyn EnrollmentRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub choices: Arc<dyn ChoiceRepository>,
    pub submissions: Arc<dyn SubmissionRepository>,
}

impl CourseStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(SeaOrmUserRepository::new(db.clone())),
            instructors: Arc::new(SeaOrmInstructorRepository::new(db.clone())),
            learners: Arc::new(SeaOrmLearnerRepository::new(db.clone())),
            courses: Arc::new(SeaOrmCourseRepository::new(db.clone())),
            lessons: Arc::new(SeaOrmLessonRepository::new(db.clone())),
            enrollments: Arc::new(SeaOrmEnrollmentRepository::new(db.clone())),
            questions: Arc::new(SeaOrmQuestionRepository::new(db.clone())),
            choices: Arc::new(SeaOrmChoiceRepository::new(db.clone())),
            submissions: Arc::new(SeaOrmSubmissionRepository::new(db)),
        }
    }

    /// Total score over `question_ids`; fails with `NotFound` on the first
    /// unknown question without touching stored state.
    pub async fn compute_submission_score(&self, question_ids: &[QuestionId]) -> Result<f64> {
        let total_score = compute_submission_score(self.questions.as_ref(), question_ids).await?;
        debug!(questions = question_ids.len(), total_score, "submission score computed");
        Ok(total_score)
    }
}
