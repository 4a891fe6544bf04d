use async_trait::async_trait;
use coursedb_core::domain::{ChoiceId, QuestionId};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};

use super::{now, parse_id};
use crate::entity::{choice, question};
use crate::error::{Result, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceRecord {
    pub id: ChoiceId,
    pub question_id: QuestionId,
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone)]
pub struct NewChoice {
    pub question_id: QuestionId,
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateChoice {
    pub text: Option<String>,
    pub is_correct: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ChoiceFilter {
    pub question_id: Option<QuestionId>,
    pub is_correct: Option<bool>,
}

#[async_trait]
pub trait ChoiceRepository: Send + Sync {
    async fn create(&self, new_choice: NewChoice) -> Result<ChoiceRecord>;
    async fn find_by_id(&self, choice_id: ChoiceId) -> Result<Option<ChoiceRecord>>;
    async fn list(&self, filter: ChoiceFilter) -> Result<Vec<ChoiceRecord>>;
    async fn update(&self, choice_id: ChoiceId, update: UpdateChoice) -> Result<ChoiceRecord>;
    async fn delete(&self, choice_id: ChoiceId) -> Result<()>;
}

#[derive(Clone)]
pub struct SeaOrmChoiceRepository {
    db: DatabaseConnection,
}

impl SeaOrmChoiceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: choice::Model) -> anyhow::Result<ChoiceRecord> {
        Ok(ChoiceRecord {
            id: parse_id("choice.id", &model.id)?,
            question_id: parse_id("choice.question_id", &model.question_id)?,
            text: model.text,
            is_correct: model.is_correct,
        })
    }
}

#[async_trait]
impl ChoiceRepository for SeaOrmChoiceRepository {
    async fn create(&self, new_choice: NewChoice) -> Result<ChoiceRecord> {
        let question_id = new_choice.question_id.to_string();
        let txn = self.db.begin().await?;

        if question::Entity::find_by_id(question_id.as_str())
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(StoreError::missing_parent("question", &question_id));
        }

        let id = ChoiceId::new();
        let active_model = choice::ActiveModel {
            id: Set(id.to_string()),
            question_id: Set(question_id),
            text: Set(new_choice.text),
            is_correct: Set(new_choice.is_correct),
            ..Default::default()
        };

        let model = active_model.insert(&txn).await?;
        txn.commit().await?;

        Ok(Self::map_model(model)?)
    }

    async fn find_by_id(&self, choice_id: ChoiceId) -> Result<Option<ChoiceRecord>> {
        let model = choice::Entity::find_by_id(choice_id.to_string())
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn list(&self, filter: ChoiceFilter) -> Result<Vec<ChoiceRecord>> {
        let mut query = choice::Entity::find()
            .order_by_asc(choice::Column::CreatedAt)
            .order_by_asc(choice::Column::Id);

        if let Some(question_id) = filter.question_id {
            query = query.filter(choice::Column::QuestionId.eq(question_id.to_string()));
        }
        if let Some(is_correct) = filter.is_correct {
            query = query.filter(choice::Column::IsCorrect.eq(is_correct));
        }

        let models = query.all(&self.db).await?;
        Ok(models
            .into_iter()
            .map(Self::map_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn update(&self, choice_id: ChoiceId, update: UpdateChoice) -> Result<ChoiceRecord> {
        let Some(model) = choice::Entity::find_by_id(choice_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Err(StoreError::not_found("choice", choice_id));
        };

        let mut active_model: choice::ActiveModel = model.into();
        if let Some(text) = update.text {
            active_model.text = Set(text);
        }
        if let Some(is_correct) = update.is_correct {
            active_model.is_correct = Set(is_correct);
        }
        active_model.updated_at = Set(now());

        let updated = active_model.update(&self.db).await?;
        Ok(Self::map_model(updated)?)
    }

    async fn delete(&self, choice_id: ChoiceId) -> Result<()> {
        let result = choice::Entity::delete_by_id(choice_id.to_string())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::not_found("choice", choice_id));
        }

        Ok(())
    }
}
