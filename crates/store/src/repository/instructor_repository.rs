use async_trait::async_trait;
use coursedb_core::domain::{InstructorId, UserId, non_negative};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::info;

use super::{now, parse_id};
use crate::entity::{instructor, user};
use crate::error::{Result, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructorRecord {
    pub id: InstructorId,
    pub user_id: UserId,
    pub is_full_time: bool,
    pub total_learners: i32,
}

#[derive(Debug, Clone)]
pub struct NewInstructor {
    pub user_id: UserId,
    pub is_full_time: bool,
    pub total_learners: i32,
}

impl NewInstructor {
    pub fn full_time(user_id: UserId) -> Self {
        Self {
            user_id,
            is_full_time: true,
            total_learners: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateInstructor {
    pub is_full_time: Option<bool>,
    /// Denormalised; the caller keeps it in step with the learners taught.
    pub total_learners: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct InstructorFilter {
    pub is_full_time: Option<bool>,
}

#[async_trait]
pub trait InstructorRepository: Send + Sync {
    async fn create(&self, new_instructor: NewInstructor) -> Result<InstructorRecord>;
    async fn find_by_id(&self, instructor_id: InstructorId) -> Result<Option<InstructorRecord>>;
    async fn find_by_user_id(&self, user_id: UserId) -> Result<Option<InstructorRecord>>;
    async fn list(&self, filter: InstructorFilter) -> Result<Vec<InstructorRecord>>;
    async fn update(
        &self,
        instructor_id: InstructorId,
        update: UpdateInstructor,
    ) -> Result<InstructorRecord>;
    async fn delete(&self, instructor_id: InstructorId) -> Result<()>;
}

#[derive(Clone)]
pub struct SeaOrmInstructorRepository {
    db: DatabaseConnection,
}

impl SeaOrmInstructorRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn map_model(model: instructor::Model) -> anyhow::Result<InstructorRecord> {
        Ok(InstructorRecord {
            id: parse_id("instructor.id", &model.id)?,
            user_id: parse_id("instructor.user_id", &model.user_id)?,
            is_full_time: model.is_full_time,
            total_learners: model.total_learners,
        })
    }
}

#[async_trait]
impl InstructorRepository for SeaOrmInstructorRepository {
    async fn create(&self, new_instructor: NewInstructor) -> Result<InstructorRecord> {
        let total_learners = non_negative("total_learners", new_instructor.total_learners)?;
        let user_id = new_instructor.user_id.to_string();
        let txn = self.db.begin().await?;

        if user::Entity::find_by_id(user_id.as_str())
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(StoreError::missing_parent("user", &user_id));
        }

        let existing = instructor::Entity::find()
            .filter(instructor::Column::UserId.eq(user_id.as_str()))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(StoreError::Integrity(format!(
                "user {user_id} already has an instructor profile"
            )));
        }

        let id = InstructorId::new();
        let active_model = instructor::ActiveModel {
            id: Set(id.to_string()),
            user_id: Set(user_id),
            is_full_time: Set(new_instructor.is_full_time),
            total_learners: Set(total_learners),
            ..Default::default()
        };

        let model = active_model.insert(&txn).await?;
        txn.commit().await?;

        Ok(Self::map_model(model)?)
    }

    async fn find_by_id(&self, instructor_id: InstructorId) -> Result<Option<InstructorRecord>> {
        let model = instructor::Entity::find_by_id(instructor_id.to_string())
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Option<InstructorRecord>> {
        let model = instructor::Entity::find()
            .filter(instructor::Column::UserId.eq(user_id.to_string()))
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn list(&self, filter: InstructorFilter) -> Result<Vec<InstructorRecord>> {
        let mut query = instructor::Entity::find()
            .order_by_asc(instructor::Column::CreatedAt)
            .order_by_asc(instructor::Column::Id);

        if let Some(is_full_time) = filter.is_full_time {
            query = query.filter(instructor::Column::IsFullTime.eq(is_full_time));
        }

        let models = query.all(&self.db).await?;
        Ok(models
            .into_iter()
            .map(Self::map_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn update(
        &self,
        instructor_id: InstructorId,
        update: UpdateInstructor,
    ) -> Result<InstructorRecord> {
        let Some(model) = instructor::Entity::find_by_id(instructor_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Err(StoreError::not_found("instructor", instructor_id));
        };

        let mut active_model: instructor::ActiveModel = model.into();
        if let Some(is_full_time) = update.is_full_time {
            active_model.is_full_time = Set(is_full_time);
        }
        if let Some(total_learners) = update.total_learners {
            active_model.total_learners = Set(non_negative("total_learners", total_learners)?);
        }
        active_model.updated_at = Set(now());

        let updated = active_model.update(&self.db).await?;
        Ok(Self::map_model(updated)?)
    }

    async fn delete(&self, instructor_id: InstructorId) -> Result<()> {
        let result = instructor::Entity::delete_by_id(instructor_id.to_string())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::not_found("instructor", instructor_id));
        }

        info!(%instructor_id, "instructor deleted");
        Ok(())
    }
}
