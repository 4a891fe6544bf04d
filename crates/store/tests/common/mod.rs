#![allow(dead_code)]

use coursedb_core::domain::{CourseId, QuestionId, UserId};
use coursedb_store::repository::{NewChoice, NewCourse, NewQuestion, NewUser};
use coursedb_store::{CourseStore, StoreConfig, db};
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

pub struct TestStore {
    // Keeps the database file alive for the duration of the test.
    _temp_dir: TempDir,
    pub db: DatabaseConnection,
    pub store: CourseStore,
}

impl TestStore {
    pub async fn new() -> Self {
        let temp_dir = TempDir::with_prefix("coursedb-test").expect("temp dir should be created");
        let path = temp_dir.path().join("course.sqlite");
        let url = format!("sqlite://{}?mode=rwc", path.display());

        let mut config = StoreConfig::new(url);
        config.max_connections = 4;
        let db = db::init_pool_and_migrate(&config)
            .await
            .expect("test database should migrate");

        Self {
            _temp_dir: temp_dir,
            store: CourseStore::new(db.clone()),
            db,
        }
    }

    pub async fn user(&self, username: &str) -> UserId {
        self.store
            .users
            .create(NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
            })
            .await
            .expect("user should be created")
            .id
    }

    pub async fn course(&self, name: &str) -> CourseId {
        self.store
            .courses
            .create(NewCourse {
                name: Some(name.to_string()),
                image: "course_images/cover.png".to_string(),
                description: format!("{name} from first principles"),
                ..NewCourse::default()
            })
            .await
            .expect("course should be created")
            .id
    }

    /// Creates a question whose choices carry the given correctness flags.
    pub async fn question(&self, course_id: CourseId, grade_point: i32, choices: &[bool]) -> QuestionId {
        let question = self
            .store
            .questions
            .create(NewQuestion {
                course_id,
                text: format!("worth {grade_point} points"),
                grade_point,
            })
            .await
            .expect("question should be created");

        for (index, &is_correct) in choices.iter().enumerate() {
            self.store
                .choices
                .create(NewChoice {
                    question_id: question.id,
                    text: format!("option {index}"),
                    is_correct,
                })
                .await
                .expect("choice should be created");
        }

        question.id
    }
}
