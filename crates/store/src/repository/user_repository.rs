use async_trait::async_trait;
use coursedb_core::domain::{EmailAddress, UserId, Username};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::info;

use super::{adjust_total_enrollment, now, parse_id};
use crate::entity::{enrollment, user};
use crate::error::{Result, StoreError};

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub username: Option<String>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, new_user: NewUser) -> Result<UserRecord>;
    async fn find_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>>;
    async fn list(&self, filter: UserFilter) -> Result<Vec<UserRecord>>;
    async fn update(&self, user_id: UserId, update: UpdateUser) -> Result<UserRecord>;
    /// Deletes the user together with its instructor and learner profiles and
    /// enrollments, keeping the enrolled courses' counters in step.
    async fn delete(&self, user_id: UserId) -> Result<()>;
}

#[derive(Clone)]
pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: user::Model) -> anyhow::Result<UserRecord> {
        Ok(UserRecord {
            id: parse_id("user.id", &model.id)?,
            username: model.username,
            email: model.email,
        })
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<UserRecord> {
        let id = UserId::new();

        let active_model = user::ActiveModel {
            id: Set(id.to_string()),
            username: Set(Username::new(new_user.username)?.into_inner()),
            email: Set(EmailAddress::new(new_user.email)?.into_inner()),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Self::map_model(model)?)
    }

    async fn find_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>> {
        let model = user::Entity::find_by_id(user_id.to_string())
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn list(&self, filter: UserFilter) -> Result<Vec<UserRecord>> {
        let mut query = user::Entity::find().order_by_asc(user::Column::Username);

        if let Some(username) = filter.username {
            query = query.filter(user::Column::Username.eq(username));
        }

        let models = query.all(&self.db).await?;
        Ok(models
            .into_iter()
            .map(Self::map_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn update(&self, user_id: UserId, update: UpdateUser) -> Result<UserRecord> {
        let Some(model) = user::Entity::find_by_id(user_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Err(StoreError::not_found("user", user_id));
        };

        let mut active_model: user::ActiveModel = model.into();
        if let Some(username) = update.username {
            active_model.username = Set(Username::new(username)?.into_inner());
        }
        if let Some(email) = update.email {
            active_model.email = Set(EmailAddress::new(email)?.into_inner());
        }
        active_model.updated_at = Set(now());

        let updated = active_model.update(&self.db).await?;
        Ok(Self::map_model(updated)?)
    }

    async fn delete(&self, user_id: UserId) -> Result<()> {
        let txn = self.db.begin().await?;

        let Some(model) = user::Entity::find_by_id(user_id.to_string())
            .one(&txn)
            .await?
        else {
            return Err(StoreError::not_found("user", user_id));
        };

        let enrollments = enrollment::Entity::find()
            .filter(enrollment::Column::UserId.eq(model.id.as_str()))
            .all(&txn)
            .await?;
        for enrollment in &enrollments {
            adjust_total_enrollment(&txn, &enrollment.course_id, false).await?;
        }

        user::Entity::delete_by_id(model.id).exec(&txn).await?;
        txn.commit().await?;

        info!(
            %user_id,
            enrollments = enrollments.len(),
            "user deleted with dependent profiles and enrollments"
        );
        Ok(())
    }
}
