use async_trait::async_trait;
use coursedb_core::domain::{CourseId, LessonId, LessonTitle};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};

use super::{now, parse_id};
use crate::entity::{course, lesson};
use crate::error::{Result, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonRecord {
    pub id: LessonId,
    pub course_id: CourseId,
    pub title: String,
    pub order: i32,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct NewLesson {
    pub course_id: CourseId,
    /// Falls back to "title".
    pub title: Option<String>,
    pub order: i32,
    pub content: String,
}

/// The owning course is fixed at creation.
#[derive(Debug, Clone, Default)]
pub struct UpdateLesson {
    pub title: Option<String>,
    pub order: Option<i32>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LessonFilter {
    pub course_id: Option<CourseId>,
}

#[async_trait]
pub trait LessonRepository: Send + Sync {
    async fn create(&self, new_lesson: NewLesson) -> Result<LessonRecord>;
    async fn find_by_id(&self, lesson_id: LessonId) -> Result<Option<LessonRecord>>;
    /// Lessons in display sequence: ascending `order`, then title.
    async fn list(&self, filter: LessonFilter) -> Result<Vec<LessonRecord>>;
    async fn update(&self, lesson_id: LessonId, update: UpdateLesson) -> Result<LessonRecord>;
    async fn delete(&self, lesson_id: LessonId) -> Result<()>;
}

#[derive(Clone)]
pub struct SeaOrmLessonRepository {
    db: DatabaseConnection,
}

impl SeaOrmLessonRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: lesson::Model) -> anyhow::Result<LessonRecord> {
        Ok(LessonRecord {
            id: parse_id("lesson.id", &model.id)?,
            course_id: parse_id("lesson.course_id", &model.course_id)?,
            title: model.title,
            order: model.order,
            content: model.content,
        })
    }
}

#[async_trait]
impl LessonRepository for SeaOrmLessonRepository {
    async fn create(&self, new_lesson: NewLesson) -> Result<LessonRecord> {
        let title = match new_lesson.title {
            Some(title) => LessonTitle::new(title)?,
            None => LessonTitle::default(),
        };
        let course_id = new_lesson.course_id.to_string();
        let txn = self.db.begin().await?;

        if course::Entity::find_by_id(course_id.as_str())
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(StoreError::missing_parent("course", &course_id));
        }

        let id = LessonId::new();
        let active_model = lesson::ActiveModel {
            id: Set(id.to_string()),
            course_id: Set(course_id),
            title: Set(title.into_inner()),
            order: Set(new_lesson.order),
            content: Set(new_lesson.content),
            ..Default::default()
        };

        let model = active_model.insert(&txn).await?;
        txn.commit().await?;

        Ok(Self::map_model(model)?)
    }

    async fn find_by_id(&self, lesson_id: LessonId) -> Result<Option<LessonRecord>> {
        let model = lesson::Entity::find_by_id(lesson_id.to_string())
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn list(&self, filter: LessonFilter) -> Result<Vec<LessonRecord>> {
        let mut query = lesson::Entity::find()
            .order_by_asc(lesson::Column::Order)
            .order_by_asc(lesson::Column::Title)
            .order_by_asc(lesson::Column::Id);

        if let Some(course_id) = filter.course_id {
            query = query.filter(lesson::Column::CourseId.eq(course_id.to_string()));
        }

        let models = query.all(&self.db).await?;
        Ok(models
            .into_iter()
            .map(Self::map_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn update(&self, lesson_id: LessonId, update: UpdateLesson) -> Result<LessonRecord> {
        let Some(model) = lesson::Entity::find_by_id(lesson_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Err(StoreError::not_found("lesson", lesson_id));
        };

        let mut active_model: lesson::ActiveModel = model.into();
        if let Some(title) = update.title {
            active_model.title = Set(LessonTitle::new(title)?.into_inner());
        }
        if let Some(order) = update.order {
            active_model.order = Set(order);
        }
        if let Some(content) = update.content {
            active_model.content = Set(content);
        }
        active_model.updated_at = Set(now());

        let updated = active_model.update(&self.db).await?;
        Ok(Self::map_model(updated)?)
    }

    async fn delete(&self, lesson_id: LessonId) -> Result<()> {
        let result = lesson::Entity::delete_by_id(lesson_id.to_string())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::not_found("lesson", lesson_id));
        }

        Ok(())
    }
}
