use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(string_len(User::Id, 36).primary_key())
                    .col(string_len(User::Username, 50).unique_key())
                    .col(string_len(User::Email, 255).unique_key())
                    .col(timestamp(User::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(User::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Instructor::Table)
                    .if_not_exists()
                    .col(string_len(Instructor::Id, 36).primary_key())
                    .col(string_len(Instructor::UserId, 36).unique_key())
                    .col(boolean(Instructor::IsFullTime).default(true))
                    .col(
                        integer(Instructor::TotalLearners)
                            .default(0)
                            .check(Expr::col(Instructor::TotalLearners).gte(0)),
                    )
                    .col(timestamp(Instructor::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Instructor::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-instructor-user_id")
                            .from(Instructor::Table, Instructor::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Learner::Table)
                    .if_not_exists()
                    .col(string_len(Learner::Id, 36).primary_key())
                    .col(string_len(Learner::UserId, 36).unique_key())
                    // Occupation enum is represented in app code.
                    // 0=student, 1=developer, 2=data_scientist, 3=dba
                    .col(
                        small_integer(Learner::Occupation)
                            .default(0)
                            .check(Expr::col(Learner::Occupation).gte(0))
                            .check(Expr::col(Learner::Occupation).lte(3)),
                    )
                    .col(string_len(Learner::SocialLink, 200))
                    .col(timestamp(Learner::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Learner::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-learner-user_id")
                            .from(Learner::Table, Learner::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Course::Table)
                    .if_not_exists()
                    .col(string_len(Course::Id, 36).primary_key())
                    .col(string_len(Course::Name, 30).default("online course"))
                    .col(string_len(Course::Image, 100))
                    .col(string_len(Course::Description, 1000))
                    .col(date_null(Course::PublishDate))
                    .col(
                        integer(Course::TotalEnrollment)
                            .default(0)
                            .check(Expr::col(Course::TotalEnrollment).gte(0)),
                    )
                    .col(timestamp(Course::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Course::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CourseInstructor::Table)
                    .if_not_exists()
                    .col(string_len(CourseInstructor::CourseId, 36))
                    .col(string_len(CourseInstructor::InstructorId, 36))
                    .primary_key(
                        Index::create()
                            .name("pk-course_instructor")
                            .col(CourseInstructor::CourseId)
                            .col(CourseInstructor::InstructorId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-course_instructor-course_id")
                            .from(CourseInstructor::Table, CourseInstructor::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-course_instructor-instructor_id")
                            .from(CourseInstructor::Table, CourseInstructor::InstructorId)
                            .to(Instructor::Table, Instructor::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Lesson::Table)
                    .if_not_exists()
                    .col(string_len(Lesson::Id, 36).primary_key())
                    .col(string_len(Lesson::CourseId, 36))
                    .col(string_len(Lesson::Title, 200).default("title"))
                    .col(integer(Lesson::Order).default(0))
                    .col(text(Lesson::Content))
                    .col(timestamp(Lesson::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Lesson::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lesson-course_id")
                            .from(Lesson::Table, Lesson::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Enrollment::Table)
                    .if_not_exists()
                    .col(string_len(Enrollment::Id, 36).primary_key())
                    .col(string_len(Enrollment::UserId, 36))
                    .col(string_len(Enrollment::CourseId, 36))
                    .col(date(Enrollment::DateEnrolled))
                    // EnrollmentMode enum is represented in app code.
                    // 0=audit, 1=honor, 2=beta
                    .col(
                        small_integer(Enrollment::Mode)
                            .default(0)
                            .check(Expr::col(Enrollment::Mode).gte(0))
                            .check(Expr::col(Enrollment::Mode).lte(2)),
                    )
                    .col(double(Enrollment::Rating).default(5.0))
                    .col(timestamp(Enrollment::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Enrollment::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollment-user_id")
                            .from(Enrollment::Table, Enrollment::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollment-course_id")
                            .from(Enrollment::Table, Enrollment::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Question::Table)
                    .if_not_exists()
                    .col(string_len(Question::Id, 36).primary_key())
                    .col(string_len(Question::CourseId, 36))
                    .col(text(Question::Text))
                    .col(
                        small_integer(Question::GradePoint)
                            .check(Expr::col(Question::GradePoint).gte(0)),
                    )
                    .col(timestamp(Question::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Question::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-question-course_id")
                            .from(Question::Table, Question::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Choice::Table)
                    .if_not_exists()
                    .col(string_len(Choice::Id, 36).primary_key())
                    .col(string_len(Choice::QuestionId, 36))
                    .col(text(Choice::Text))
                    .col(boolean(Choice::IsCorrect).default(false))
                    .col(timestamp(Choice::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Choice::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-choice-question_id")
                            .from(Choice::Table, Choice::QuestionId)
                            .to(Question::Table, Question::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Submission::Table)
                    .if_not_exists()
                    .col(string_len(Submission::Id, 36).primary_key())
                    .col(string_len(Submission::EnrollmentId, 36))
                    .col(integer(Submission::TotalScore).default(0))
                    .col(integer(Submission::TotalCorrect).default(0))
                    .col(integer(Submission::TotalIncorrect).default(0))
                    .col(integer(Submission::TotalAttempted).default(0))
                    .col(integer(Submission::TotalNotAttempted).default(0))
                    .col(integer(Submission::PercentageCorrect).default(0))
                    .col(integer(Submission::CorrectChoices).default(1))
                    // NULL until the submission has been scored.
                    .col(timestamp_null(Submission::ScoredAt))
                    .col(timestamp(Submission::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Submission::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-submission-enrollment_id")
                            .from(Submission::Table, Submission::EnrollmentId)
                            .to(Enrollment::Table, Enrollment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SubmissionChoice::Table)
                    .if_not_exists()
                    .col(string_len(SubmissionChoice::SubmissionId, 36))
                    .col(string_len(SubmissionChoice::ChoiceId, 36))
                    .primary_key(
                        Index::create()
                            .name("pk-submission_choice")
                            .col(SubmissionChoice::SubmissionId)
                            .col(SubmissionChoice::ChoiceId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-submission_choice-submission_id")
                            .from(SubmissionChoice::Table, SubmissionChoice::SubmissionId)
                            .to(Submission::Table, Submission::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-submission_choice-choice_id")
                            .from(SubmissionChoice::Table, SubmissionChoice::ChoiceId)
                            .to(Choice::Table, Choice::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrollment_user_id_course_id")
                    .table(Enrollment::Table)
                    .col(Enrollment::UserId)
                    .col(Enrollment::CourseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrollment_course_id")
                    .table(Enrollment::Table)
                    .col(Enrollment::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_lesson_course_id_order")
                    .table(Lesson::Table)
                    .col(Lesson::CourseId)
                    .col(Lesson::Order)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_question_course_id")
                    .table(Question::Table)
                    .col(Question::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_choice_question_id")
                    .table(Choice::Table)
                    .col(Choice::QuestionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submission_enrollment_id")
                    .table(Submission::Table)
                    .col(Submission::EnrollmentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SubmissionChoice::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Submission::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Choice::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Question::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Enrollment::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Lesson::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CourseInstructor::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Course::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Learner::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Instructor::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    Username,
    Email,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Instructor {
    Table,
    Id,
    UserId,
    IsFullTime,
    TotalLearners,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Learner {
    Table,
    Id,
    UserId,
    Occupation,
    SocialLink,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Course {
    Table,
    Id,
    Name,
    Image,
    Description,
    PublishDate,
    TotalEnrollment,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CourseInstructor {
    Table,
    CourseId,
    InstructorId,
}

#[derive(DeriveIden)]
enum Lesson {
    Table,
    Id,
    CourseId,
    Title,
    Order,
    Content,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Enrollment {
    Table,
    Id,
    UserId,
    CourseId,
    DateEnrolled,
    Mode,
    Rating,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Question {
    Table,
    Id,
    CourseId,
    Text,
    GradePoint,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Choice {
    Table,
    Id,
    QuestionId,
    Text,
    IsCorrect,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Submission {
    Table,
    Id,
    EnrollmentId,
    TotalScore,
    TotalCorrect,
    TotalIncorrect,
    TotalAttempted,
    TotalNotAttempted,
    PercentageCorrect,
    CorrectChoices,
    ScoredAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SubmissionChoice {
    Table,
    SubmissionId,
    ChoiceId,
}
