use anyhow::anyhow;
use async_trait::async_trait;
use chrono::NaiveDate;
use coursedb_core::domain::{CourseId, EnrollmentId, EnrollmentMode, Rating, UserId};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::debug;

use super::{adjust_total_enrollment, now, parse_id, today};
use crate::entity::{course, enrollment, user};
use crate::error::{Result, StoreError};

#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentRecord {
    pub id: EnrollmentId,
    pub user_id: UserId,
    pub course_id: CourseId,
    pub date_enrolled: NaiveDate,
    pub mode: EnrollmentMode,
    pub rating: f64,
}

#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub mode: EnrollmentMode,
    /// Falls back to 5.0.
    pub rating: Option<f64>,
    /// Falls back to today's date.
    pub date_enrolled: Option<NaiveDate>,
}

impl NewEnrollment {
    pub fn audit(user_id: UserId, course_id: CourseId) -> Self {
        Self {
            user_id,
            course_id,
            mode: EnrollmentMode::Audit,
            rating: None,
            date_enrolled: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEnrollment {
    pub mode: Option<EnrollmentMode>,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct EnrollmentFilter {
    pub user_id: Option<UserId>,
    pub course_id: Option<CourseId>,
    pub mode: Option<EnrollmentMode>,
}

#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Enrolls the user and bumps the course's `total_enrollment`. A user can
    /// hold only one enrollment per course.
    async fn create(&self, new_enrollment: NewEnrollment) -> Result<EnrollmentRecord>;
    async fn find_by_id(&self, enrollment_id: EnrollmentId) -> Result<Option<EnrollmentRecord>>;
    async fn find_by_user_and_course(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<EnrollmentRecord>>;
    async fn list(&self, filter: EnrollmentFilter) -> Result<Vec<EnrollmentRecord>>;
    async fn update(
        &self,
        enrollment_id: EnrollmentId,
        update: UpdateEnrollment,
    ) -> Result<EnrollmentRecord>;
    /// Unenrolls, dropping the enrollment's submissions and decrementing the
    /// course's `total_enrollment`.
    async fn delete(&self, enrollment_id: EnrollmentId) -> Result<()>;
}

#[derive(Clone)]
pub struct SeaOrmEnrollmentRepository {
    db: DatabaseConnection,
}

impl SeaOrmEnrollmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_mode(code: i16) -> anyhow::Result<EnrollmentMode> {
        match code {
            0 => Ok(EnrollmentMode::Audit),
            1 => Ok(EnrollmentMode::Honor),
            2 => Ok(EnrollmentMode::Beta),
            _ => Err(anyhow!("invalid enrollment.mode code from database: {code}")),
        }
    }

    fn map_mode_code(mode: EnrollmentMode) -> i16 {
        match mode {
            EnrollmentMode::Audit => 0,
            EnrollmentMode::Honor => 1,
            EnrollmentMode::Beta => 2,
        }
    }

    fn map_model(model: enrollment::Model) -> anyhow::Result<EnrollmentRecord> {
        Ok(EnrollmentRecord {
            id: parse_id("enrollment.id", &model.id)?,
            user_id: parse_id("enrollment.user_id", &model.user_id)?,
            course_id: parse_id("enrollment.course_id", &model.course_id)?,
            date_enrolled: model.date_enrolled,
            mode: Self::map_mode(model.mode)?,
            rating: model.rating,
        })
    }
}

#[async_trait]
impl EnrollmentRepository for SeaOrmEnrollmentRepository {
    async fn create(&self, new_enrollment: NewEnrollment) -> Result<EnrollmentRecord> {
        let rating = match new_enrollment.rating {
            Some(rating) => Rating::new(rating)?,
            None => Rating::default(),
        };
        let user_id = new_enrollment.user_id.to_string();
        let course_id = new_enrollment.course_id.to_string();
        let txn = self.db.begin().await?;

        if user::Entity::find_by_id(user_id.as_str())
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(StoreError::missing_parent("user", &user_id));
        }
        if course::Entity::find_by_id(course_id.as_str())
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(StoreError::missing_parent("course", &course_id));
        }

        let existing = enrollment::Entity::find()
            .filter(enrollment::Column::UserId.eq(user_id.as_str()))
            .filter(enrollment::Column::CourseId.eq(course_id.as_str()))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(StoreError::Integrity(format!(
                "user {user_id} is already enrolled in course {course_id}"
            )));
        }

        let id = EnrollmentId::new();
        let active_model = enrollment::ActiveModel {
            id: Set(id.to_string()),
            user_id: Set(user_id),
            course_id: Set(course_id.clone()),
            date_enrolled: Set(new_enrollment.date_enrolled.unwrap_or_else(today)),
            mode: Set(Self::map_mode_code(new_enrollment.mode)),
            rating: Set(rating.value()),
            ..Default::default()
        };

        let model = active_model.insert(&txn).await?;
        adjust_total_enrollment(&txn, &course_id, true).await?;
        txn.commit().await?;

        debug!(enrollment_id = %id, %course_id, "enrollment created");
        Ok(Self::map_model(model)?)
    }

    async fn find_by_id(&self, enrollment_id: EnrollmentId) -> Result<Option<EnrollmentRecord>> {
        let model = enrollment::Entity::find_by_id(enrollment_id.to_string())
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn find_by_user_and_course(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<EnrollmentRecord>> {
        let model = enrollment::Entity::find()
            .filter(enrollment::Column::UserId.eq(user_id.to_string()))
            .filter(enrollment::Column::CourseId.eq(course_id.to_string()))
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn list(&self, filter: EnrollmentFilter) -> Result<Vec<EnrollmentRecord>> {
        let mut query = enrollment::Entity::find()
            .order_by_asc(enrollment::Column::DateEnrolled)
            .order_by_asc(enrollment::Column::Id);

        if let Some(user_id) = filter.user_id {
            query = query.filter(enrollment::Column::UserId.eq(user_id.to_string()));
        }
        if let Some(course_id) = filter.course_id {
            query = query.filter(enrollment::Column::CourseId.eq(course_id.to_string()));
        }
        if let Some(mode) = filter.mode {
            query = query.filter(enrollment::Column::Mode.eq(Self::map_mode_code(mode)));
        }

        let models = query.all(&self.db).await?;
        Ok(models
            .into_iter()
            .map(Self::map_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn update(
        &self,
        enrollment_id: EnrollmentId,
        update: UpdateEnrollment,
    ) -> Result<EnrollmentRecord> {
        let Some(model) = enrollment::Entity::find_by_id(enrollment_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Err(StoreError::not_found("enrollment", enrollment_id));
        };

        let mut active_model: enrollment::ActiveModel = model.into();
        if let Some(mode) = update.mode {
            active_model.mode = Set(Self::map_mode_code(mode));
        }
        if let Some(rating) = update.rating {
            active_model.rating = Set(Rating::new(rating)?.value());
        }
        active_model.updated_at = Set(now());

        let updated = active_model.update(&self.db).await?;
        Ok(Self::map_model(updated)?)
    }

    async fn delete(&self, enrollment_id: EnrollmentId) -> Result<()> {
        let txn = self.db.begin().await?;

        let Some(model) = enrollment::Entity::find_by_id(enrollment_id.to_string())
            .one(&txn)
            .await?
        else {
            return Err(StoreError::not_found("enrollment", enrollment_id));
        };

        enrollment::Entity::delete_by_id(model.id).exec(&txn).await?;
        adjust_total_enrollment(&txn, &model.course_id, false).await?;
        txn.commit().await?;

        debug!(%enrollment_id, course_id = %model.course_id, "enrollment deleted");
        Ok(())
    }
}
