pub mod choice;
pub mod course;
pub mod course_instructor;
pub mod enrollment;
pub mod instructor;
pub mod learner;
pub mod lesson;
pub mod question;
pub mod submission;
pub mod submission_choice;
pub mod user;
