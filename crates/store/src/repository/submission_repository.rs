use async_trait::async_trait;
use chrono::NaiveDateTime;
use coursedb_core::domain::{
    ChoiceId, EnrollmentId, SubmissionId, non_negative, stored_total_score,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{info, warn};

use super::{now, parse_id};
use crate::entity::{choice, enrollment, submission, submission_choice};
use crate::error::{Result, StoreError};

/// Result columns written when a submission is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionSummary {
    pub total_score: i32,
    pub total_correct: i32,
    pub total_incorrect: i32,
    pub total_attempted: i32,
    pub total_not_attempted: i32,
    pub percentage_correct: i32,
    pub correct_choices: i32,
}

impl Default for SubmissionSummary {
    fn default() -> Self {
        Self {
            total_score: 0,
            total_correct: 0,
            total_incorrect: 0,
            total_attempted: 0,
            total_not_attempted: 0,
            percentage_correct: 0,
            correct_choices: 1,
        }
    }
}

impl SubmissionSummary {
    /// Stores a computed score, rounded to the integer column.
    pub fn with_score(mut self, score: f64) -> Self {
        self.total_score = stored_total_score(score);
        self
    }

    fn validate(self) -> Result<Self> {
        non_negative("total_score", self.total_score)?;
        non_negative("total_correct", self.total_correct)?;
        non_negative("total_incorrect", self.total_incorrect)?;
        non_negative("total_attempted", self.total_attempted)?;
        non_negative("total_not_attempted", self.total_not_attempted)?;
        non_negative("percentage_correct", self.percentage_correct)?;
        non_negative("correct_choices", self.correct_choices)?;
        Ok(self)
    }

    fn apply(self, active_model: &mut submission::ActiveModel) {
        active_model.total_score = Set(self.total_score);
        active_model.total_correct = Set(self.total_correct);
        active_model.total_incorrect = Set(self.total_incorrect);
        active_model.total_attempted = Set(self.total_attempted);
        active_model.total_not_attempted = Set(self.total_not_attempted);
        active_model.percentage_correct = Set(self.percentage_correct);
        active_model.correct_choices = Set(self.correct_choices);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub enrollment_id: EnrollmentId,
    pub selected_choice_ids: Vec<ChoiceId>,
    pub summary: SubmissionSummary,
    /// `None` until the submission has been scored.
    pub scored_at: Option<NaiveDateTime>,
}

impl SubmissionRecord {
    pub fn is_scored(&self) -> bool {
        self.scored_at.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub enrollment_id: EnrollmentId,
    pub selected_choice_ids: Vec<ChoiceId>,
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionFilter {
    pub enrollment_id: Option<EnrollmentId>,
    pub scored: Option<bool>,
}

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn create(&self, new_submission: NewSubmission) -> Result<SubmissionRecord>;
    async fn find_by_id(&self, submission_id: SubmissionId) -> Result<Option<SubmissionRecord>>;
    async fn list(&self, filter: SubmissionFilter) -> Result<Vec<SubmissionRecord>>;
    /// Replaces the selected choices of an unscored submission.
    async fn update(
        &self,
        submission_id: SubmissionId,
        selected_choice_ids: Vec<ChoiceId>,
    ) -> Result<SubmissionRecord>;
    /// Moves the submission from unscored to scored. Fails if it was already
    /// scored.
    async fn record_score(
        &self,
        submission_id: SubmissionId,
        summary: SubmissionSummary,
    ) -> Result<SubmissionRecord>;
    /// Administrative overwrite of an already scored submission.
    async fn correct_score(
        &self,
        submission_id: SubmissionId,
        summary: SubmissionSummary,
    ) -> Result<SubmissionRecord>;
    async fn delete(&self, submission_id: SubmissionId) -> Result<()>;
}

#[derive(Clone)]
pub struct SeaOrmSubmissionRepository {
    db: DatabaseConnection,
}

impl SeaOrmSubmissionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(
        model: submission::Model,
        links: Vec<submission_choice::Model>,
    ) -> anyhow::Result<SubmissionRecord> {
        let mut choice_ids: Vec<&str> = links.iter().map(|link| link.choice_id.as_str()).collect();
        choice_ids.sort_unstable();
        let selected_choice_ids = choice_ids
            .into_iter()
            .map(|choice_id| parse_id("submission_choice.choice_id", choice_id))
            .collect::<anyhow::Result<_>>()?;

        Ok(SubmissionRecord {
            id: parse_id("submission.id", &model.id)?,
            enrollment_id: parse_id("submission.enrollment_id", &model.enrollment_id)?,
            selected_choice_ids,
            summary: SubmissionSummary {
                total_score: model.total_score,
                total_correct: model.total_correct,
                total_incorrect: model.total_incorrect,
                total_attempted: model.total_attempted,
                total_not_attempted: model.total_not_attempted,
                percentage_correct: model.percentage_correct,
                correct_choices: model.correct_choices,
            },
            scored_at: model.scored_at,
        })
    }

    async fn load_links<C>(
        conn: &C,
        submission_id: &str,
    ) -> std::result::Result<Vec<submission_choice::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        submission_choice::Entity::find()
            .filter(submission_choice::Column::SubmissionId.eq(submission_id))
            .order_by_asc(submission_choice::Column::ChoiceId)
            .all(conn)
            .await
    }

    /// Inserts one link per distinct choice, rejecting choices that do not exist.
    async fn link_choices<C>(
        conn: &C,
        submission_id: &str,
        choice_ids: &[ChoiceId],
    ) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let mut choice_ids = choice_ids.to_vec();
        choice_ids.sort_by_key(|id| id.into_inner());
        choice_ids.dedup();

        for choice_id in choice_ids {
            if choice::Entity::find_by_id(choice_id.to_string())
                .one(conn)
                .await?
                .is_none()
            {
                return Err(StoreError::missing_parent("choice", choice_id));
            }

            submission_choice::ActiveModel {
                submission_id: Set(submission_id.to_string()),
                choice_id: Set(choice_id.to_string()),
            }
            .insert(conn)
            .await?;
        }

        Ok(())
    }

    async fn write_summary(
        &self,
        submission_id: SubmissionId,
        summary: SubmissionSummary,
        correction: bool,
    ) -> Result<SubmissionRecord> {
        let summary = summary.validate()?;
        let txn = self.db.begin().await?;

        let Some(model) = submission::Entity::find_by_id(submission_id.to_string())
            .one(&txn)
            .await?
        else {
            return Err(StoreError::not_found("submission", submission_id));
        };

        match (correction, model.scored_at.is_some()) {
            (false, true) => {
                return Err(StoreError::Integrity(format!(
                    "submission {submission_id} has already been scored"
                )));
            }
            (true, false) => {
                return Err(StoreError::Integrity(format!(
                    "submission {submission_id} has not been scored yet"
                )));
            }
            _ => {}
        }

        let previous_score = model.total_score;
        let mut active_model: submission::ActiveModel = model.into();
        summary.apply(&mut active_model);
        let timestamp = now();
        active_model.scored_at = Set(Some(timestamp));
        active_model.updated_at = Set(timestamp);

        let updated = active_model.update(&txn).await?;
        let links = Self::load_links(&txn, &updated.id).await?;
        txn.commit().await?;

        if correction {
            warn!(
                %submission_id,
                previous_score,
                total_score = summary.total_score,
                "submission score corrected"
            );
        } else {
            info!(%submission_id, total_score = summary.total_score, "submission scored");
        }

        Ok(Self::map_model(updated, links)?)
    }
}

#[async_trait]
impl SubmissionRepository for SeaOrmSubmissionRepository {
    async fn create(&self, new_submission: NewSubmission) -> Result<SubmissionRecord> {
        let enrollment_id = new_submission.enrollment_id.to_string();
        let txn = self.db.begin().await?;

        if enrollment::Entity::find_by_id(enrollment_id.as_str())
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(StoreError::missing_parent("enrollment", &enrollment_id));
        }

        let id = SubmissionId::new();
        let default_summary = SubmissionSummary::default();
        let mut active_model = submission::ActiveModel {
            id: Set(id.to_string()),
            enrollment_id: Set(enrollment_id),
            scored_at: Set(None),
            ..Default::default()
        };
        default_summary.apply(&mut active_model);

        let model = active_model.insert(&txn).await?;
        Self::link_choices(&txn, &model.id, &new_submission.selected_choice_ids).await?;
        let links = Self::load_links(&txn, &model.id).await?;
        txn.commit().await?;

        Ok(Self::map_model(model, links)?)
    }

    async fn find_by_id(&self, submission_id: SubmissionId) -> Result<Option<SubmissionRecord>> {
        let Some(model) = submission::Entity::find_by_id(submission_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let links = Self::load_links(&self.db, &model.id).await?;
        Ok(Some(Self::map_model(model, links)?))
    }

    async fn list(&self, filter: SubmissionFilter) -> Result<Vec<SubmissionRecord>> {
        let mut query = submission::Entity::find()
            .order_by_asc(submission::Column::CreatedAt)
            .order_by_asc(submission::Column::Id);

        if let Some(enrollment_id) = filter.enrollment_id {
            query = query.filter(submission::Column::EnrollmentId.eq(enrollment_id.to_string()));
        }
        match filter.scored {
            Some(true) => query = query.filter(submission::Column::ScoredAt.is_not_null()),
            Some(false) => query = query.filter(submission::Column::ScoredAt.is_null()),
            None => {}
        }

        let rows = query
            .find_with_related(submission_choice::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(model, links)| Self::map_model(model, links))
            .collect::<anyhow::Result<_>>()?)
    }

    async fn update(
        &self,
        submission_id: SubmissionId,
        selected_choice_ids: Vec<ChoiceId>,
    ) -> Result<SubmissionRecord> {
        let txn = self.db.begin().await?;

        let Some(model) = submission::Entity::find_by_id(submission_id.to_string())
            .one(&txn)
            .await?
        else {
            return Err(StoreError::not_found("submission", submission_id));
        };
        if model.scored_at.is_some() {
            return Err(StoreError::Integrity(format!(
                "submission {submission_id} has been scored and can no longer change"
            )));
        }

        submission_choice::Entity::delete_many()
            .filter(submission_choice::Column::SubmissionId.eq(model.id.as_str()))
            .exec(&txn)
            .await?;
        Self::link_choices(&txn, &model.id, &selected_choice_ids).await?;

        let mut active_model: submission::ActiveModel = model.into();
        active_model.updated_at = Set(now());
        let updated = active_model.update(&txn).await?;
        let links = Self::load_links(&txn, &updated.id).await?;
        txn.commit().await?;

        Ok(Self::map_model(updated, links)?)
    }

    async fn record_score(
        &self,
        submission_id: SubmissionId,
        summary: SubmissionSummary,
    ) -> Result<SubmissionRecord> {
        self.write_summary(submission_id, summary, false).await
    }

    async fn correct_score(
        &self,
        submission_id: SubmissionId,
        summary: SubmissionSummary,
    ) -> Result<SubmissionRecord> {
        self.write_summary(submission_id, summary, true).await
    }

    async fn delete(&self, submission_id: SubmissionId) -> Result<()> {
        let result = submission::Entity::delete_by_id(submission_id.to_string())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::not_found("submission", submission_id));
        }

        Ok(())
    }
}
