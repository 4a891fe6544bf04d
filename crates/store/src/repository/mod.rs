mod choice_repository;
mod course_repository;
mod enrollment_repository;
mod instructor_repository;
mod learner_repository;
mod lesson_repository;
mod question_repository;
mod submission_repository;
mod user_repository;

pub use choice_repository::{
    ChoiceFilter, ChoiceRecord, ChoiceRepository, NewChoice, SeaOrmChoiceRepository, UpdateChoice,
};
pub use course_repository::{
    CourseFilter, CourseRecord, CourseRepository, NewCourse, SeaOrmCourseRepository, UpdateCourse,
};
pub use enrollment_repository::{
    EnrollmentFilter, EnrollmentRecord, EnrollmentRepository, NewEnrollment,
    SeaOrmEnrollmentRepository, UpdateEnrollment,
};
pub use instructor_repository::{
    InstructorFilter, InstructorRecord, InstructorRepository, NewInstructor,
    SeaOrmInstructorRepository, UpdateInstructor,
};
pub use learner_repository::{
    LearnerFilter, LearnerRecord, LearnerRepository, NewLearner, SeaOrmLearnerRepository,
    UpdateLearner,
};
pub use lesson_repository::{
    LessonFilter, LessonRecord, LessonRepository, NewLesson, SeaOrmLessonRepository, UpdateLesson,
};
pub use question_repository::{
    NewQuestion, QuestionFilter, QuestionRecord, QuestionRepository, SeaOrmQuestionRepository,
    UpdateQuestion,
};
pub use submission_repository::{
    NewSubmission, SeaOrmSubmissionRepository, SubmissionFilter, SubmissionRecord,
    SubmissionRepository, SubmissionSummary,
};
pub use user_repository::{NewUser, SeaOrmUserRepository, UpdateUser, UserFilter, UserRecord, UserRepository};

use std::fmt::Display;
use std::str::FromStr;

use anyhow::anyhow;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

use crate::entity::course;

fn parse_id<T>(column: &str, raw: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    T::from_str(raw).map_err(|e| anyhow!("invalid {column} '{raw}' from database: {e}"))
}

fn now() -> sea_orm::prelude::DateTime {
    chrono::Utc::now().naive_utc()
}

fn today() -> sea_orm::prelude::Date {
    chrono::Utc::now().date_naive()
}

/// Moves `course.total_enrollment` by one. Decrements never go below zero.
async fn adjust_total_enrollment<C>(conn: &C, course_id: &str, increment: bool) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let column = course::Column::TotalEnrollment;
    let mut update = course::Entity::update_many().filter(course::Column::Id.eq(course_id));

    update = if increment {
        update.col_expr(column, Expr::col(column).add(1))
    } else {
        update
            .col_expr(column, Expr::col(column).sub(1))
            .filter(column.gt(0))
    };

    update.exec(conn).await?;
    Ok(())
}
