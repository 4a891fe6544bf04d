use anyhow::anyhow;
use async_trait::async_trait;
use coursedb_core::domain::{LearnerId, Occupation, SocialLink, UserId};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};

use super::{now, parse_id};
use crate::entity::{learner, user};
use crate::error::{Result, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnerRecord {
    pub id: LearnerId,
    pub user_id: UserId,
    pub occupation: Occupation,
    pub social_link: String,
}

#[derive(Debug, Clone)]
pub struct NewLearner {
    pub user_id: UserId,
    pub occupation: Occupation,
    pub social_link: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateLearner {
    pub occupation: Option<Occupation>,
    pub social_link: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LearnerFilter {
    pub occupation: Option<Occupation>,
}

#[async_trait]
pub trait LearnerRepository: Send + Sync {
    async fn create(&self, new_learner: NewLearner) -> Result<LearnerRecord>;
    async fn find_by_id(&self, learner_id: LearnerId) -> Result<Option<LearnerRecord>>;
    async fn find_by_user_id(&self, user_id: UserId) -> Result<Option<LearnerRecord>>;
    async fn list(&self, filter: LearnerFilter) -> Result<Vec<LearnerRecord>>;
    async fn update(&self, learner_id: LearnerId, update: UpdateLearner) -> Result<LearnerRecord>;
    async fn delete(&self, learner_id: LearnerId) -> Result<()>;
}

#[derive(Clone)]
pub struct SeaOrmLearnerRepository {
    db: DatabaseConnection,
}

impl SeaOrmLearnerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_occupation(code: i16) -> anyhow::Result<Occupation> {
        match code {
            0 => Ok(Occupation::Student),
            1 => Ok(Occupation::Developer),
            2 => Ok(Occupation::DataScientist),
            3 => Ok(Occupation::DatabaseAdmin),
            _ => Err(anyhow!("invalid learner.occupation code from database: {code}")),
        }
    }

    fn map_occupation_code(occupation: Occupation) -> i16 {
        match occupation {
            Occupation::Student => 0,
            Occupation::Developer => 1,
            Occupation::DataScientist => 2,
            Occupation::DatabaseAdmin => 3,
        }
    }

    fn map_model(model: learner::Model) -> anyhow::Result<LearnerRecord> {
        Ok(LearnerRecord {
            id: parse_id("learner.id", &model.id)?,
            user_id: parse_id("learner.user_id", &model.user_id)?,
            occupation: Self::map_occupation(model.occupation)?,
            social_link: model.social_link,
        })
    }
}

#[async_trait]
impl LearnerRepository for SeaOrmLearnerRepository {
    async fn create(&self, new_learner: NewLearner) -> Result<LearnerRecord> {
        let social_link = SocialLink::new(new_learner.social_link)?;
        let user_id = new_learner.user_id.to_string();
        let txn = self.db.begin().await?;

        if user::Entity::find_by_id(user_id.as_str())
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(StoreError::missing_parent("user", &user_id));
        }

        let existing = learner::Entity::find()
            .filter(learner::Column::UserId.eq(user_id.as_str()))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(StoreError::Integrity(format!(
                "user {user_id} already has a learner profile"
            )));
        }

        let id = LearnerId::new();
        let active_model = learner::ActiveModel {
            id: Set(id.to_string()),
            user_id: Set(user_id),
            occupation: Set(Self::map_occupation_code(new_learner.occupation)),
            social_link: Set(social_link.into_inner()),
            ..Default::default()
        };

        let model = active_model.insert(&txn).await?;
        txn.commit().await?;

        Ok(Self::map_model(model)?)
    }

    async fn find_by_id(&self, learner_id: LearnerId) -> Result<Option<LearnerRecord>> {
        let model = learner::Entity::find_by_id(learner_id.to_string())
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Option<LearnerRecord>> {
        let model = learner::Entity::find()
            .filter(learner::Column::UserId.eq(user_id.to_string()))
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn list(&self, filter: LearnerFilter) -> Result<Vec<LearnerRecord>> {
        let mut query = learner::Entity::find()
            .order_by_asc(learner::Column::CreatedAt)
            .order_by_asc(learner::Column::Id);

        if let Some(occupation) = filter.occupation {
            query = query
                .filter(learner::Column::Occupation.eq(Self::map_occupation_code(occupation)));
        }

        let models = query.all(&self.db).await?;
        Ok(models
            .into_iter()
            .map(Self::map_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn update(&self, learner_id: LearnerId, update: UpdateLearner) -> Result<LearnerRecord> {
        let Some(model) = learner::Entity::find_by_id(learner_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Err(StoreError::not_found("learner", learner_id));
        };

        let mut active_model: learner::ActiveModel = model.into();
        if let Some(occupation) = update.occupation {
            active_model.occupation = Set(Self::map_occupation_code(occupation));
        }
        if let Some(social_link) = update.social_link {
            active_model.social_link = Set(SocialLink::new(social_link)?.into_inner());
        }
        active_model.updated_at = Set(now());

        let updated = active_model.update(&self.db).await?;
        Ok(Self::map_model(updated)?)
    }

    async fn delete(&self, learner_id: LearnerId) -> Result<()> {
        let result = learner::Entity::delete_by_id(learner_id.to_string())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::not_found("learner", learner_id));
        }

        Ok(())
    }
}
