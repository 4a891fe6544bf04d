use anyhow::anyhow;
use async_trait::async_trait;
use coursedb_core::domain::{CourseId, GradePoint, QuestionCatalog, QuestionId, QuestionTally};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};

use super::{now, parse_id};
use crate::entity::{choice, course, question};
use crate::error::{Result, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub course_id: CourseId,
    pub text: String,
    pub grade_point: GradePoint,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub course_id: CourseId,
    pub text: String,
    pub grade_point: i32,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateQuestion {
    pub text: Option<String>,
    pub grade_point: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    pub course_id: Option<CourseId>,
}

/// Questions double as the catalog the scoring function reads from.
#[async_trait]
pub trait QuestionRepository: QuestionCatalog<Error = StoreError> {
    async fn create(&self, new_question: NewQuestion) -> Result<QuestionRecord>;
    async fn find_by_id(&self, question_id: QuestionId) -> Result<Option<QuestionRecord>>;
    async fn list(&self, filter: QuestionFilter) -> Result<Vec<QuestionRecord>>;
    async fn update(
        &self,
        question_id: QuestionId,
        update: UpdateQuestion,
    ) -> Result<QuestionRecord>;
    /// Deletes the question and its choices.
    async fn delete(&self, question_id: QuestionId) -> Result<()>;
}

#[derive(Clone)]
pub struct SeaOrmQuestionRepository {
    db: DatabaseConnection,
}

impl SeaOrmQuestionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_grade_point(value: i16) -> anyhow::Result<GradePoint> {
        GradePoint::new(i32::from(value))
            .map_err(|e| anyhow!("invalid question.grade_point from database: {e}"))
    }

    fn map_model(model: question::Model) -> anyhow::Result<QuestionRecord> {
        Ok(QuestionRecord {
            id: parse_id("question.id", &model.id)?,
            course_id: parse_id("question.course_id", &model.course_id)?,
            text: model.text,
            grade_point: Self::map_grade_point(model.grade_point)?,
        })
    }
}

#[async_trait]
impl QuestionCatalog for SeaOrmQuestionRepository {
    type Error = StoreError;

    async fn tally(&self, question_id: QuestionId) -> Result<Option<QuestionTally>> {
        let Some(model) = question::Entity::find_by_id(question_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let grade_point = Self::map_grade_point(model.grade_point)?;
        let choices = choice::Entity::find()
            .filter(choice::Column::QuestionId.eq(model.id))
            .all(&self.db)
            .await?;

        Ok(Some(QuestionTally::from_choices(
            grade_point,
            choices.iter().map(|choice| choice.is_correct),
        )))
    }
}

#[async_trait]
impl QuestionRepository for SeaOrmQuestionRepository {
    async fn create(&self, new_question: NewQuestion) -> Result<QuestionRecord> {
        let grade_point = GradePoint::new(new_question.grade_point)?;
        let course_id = new_question.course_id.to_string();
        let txn = self.db.begin().await?;

        if course::Entity::find_by_id(course_id.as_str())
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(StoreError::missing_parent("course", &course_id));
        }

        let id = QuestionId::new();
        let active_model = question::ActiveModel {
            id: Set(id.to_string()),
            course_id: Set(course_id),
            text: Set(new_question.text),
            grade_point: Set(i16::from(grade_point)),
            ..Default::default()
        };

        let model = active_model.insert(&txn).await?;
        txn.commit().await?;

        Ok(Self::map_model(model)?)
    }

    async fn find_by_id(&self, question_id: QuestionId) -> Result<Option<QuestionRecord>> {
        let model = question::Entity::find_by_id(question_id.to_string())
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn list(&self, filter: QuestionFilter) -> Result<Vec<QuestionRecord>> {
        let mut query = question::Entity::find()
            .order_by_asc(question::Column::CreatedAt)
            .order_by_asc(question::Column::Id);

        if let Some(course_id) = filter.course_id {
            query = query.filter(question::Column::CourseId.eq(course_id.to_string()));
        }

        let models = query.all(&self.db).await?;
        Ok(models
            .into_iter()
            .map(Self::map_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn update(
        &self,
        question_id: QuestionId,
        update: UpdateQuestion,
    ) -> Result<QuestionRecord> {
        let Some(model) = question::Entity::find_by_id(question_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Err(StoreError::not_found("question", question_id));
        };

        let mut active_model: question::ActiveModel = model.into();
        if let Some(text) = update.text {
            active_model.text = Set(text);
        }
        if let Some(grade_point) = update.grade_point {
            active_model.grade_point = Set(i16::from(GradePoint::new(grade_point)?));
        }
        active_model.updated_at = Set(now());

        let updated = active_model.update(&self.db).await?;
        Ok(Self::map_model(updated)?)
    }

    async fn delete(&self, question_id: QuestionId) -> Result<()> {
        let result = question::Entity::delete_by_id(question_id.to_string())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::not_found("question", question_id));
        }

        Ok(())
    }
}
