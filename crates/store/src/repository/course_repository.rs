use async_trait::async_trait;
use chrono::NaiveDate;
use coursedb_api_types::CourseView;
use coursedb_core::domain::{
    CourseDescription, CourseId, CourseName, ImageRef, InstructorId, UserId,
};
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{debug, info};

use super::{InstructorRecord, SeaOrmInstructorRepository, now, parse_id, today};
use crate::entity::{course, course_instructor, enrollment, instructor, lesson, question};
use crate::error::{Result, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRecord {
    pub id: CourseId,
    pub name: String,
    pub image: String,
    pub description: String,
    pub publish_date: Option<NaiveDate>,
    pub total_enrollment: i32,
}

#[derive(Debug, Clone, Default)]
pub struct NewCourse {
    /// Falls back to "online course".
    pub name: Option<String>,
    pub image: String,
    pub description: String,
    pub publish_date: Option<NaiveDate>,
    pub instructor_ids: Vec<InstructorId>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCourse {
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    /// `Some(None)` unpublishes the course.
    pub publish_date: Option<Option<NaiveDate>>,
}

#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    pub instructor_id: Option<InstructorId>,
    /// Only courses with a publish date on or before today.
    pub published_only: bool,
    pub name_contains: Option<String>,
}

#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn create(&self, new_course: NewCourse) -> Result<CourseRecord>;
    async fn find_by_id(&self, course_id: CourseId) -> Result<Option<CourseRecord>>;
    async fn list(&self, filter: CourseFilter) -> Result<Vec<CourseRecord>>;
    async fn update(&self, course_id: CourseId, update: UpdateCourse) -> Result<CourseRecord>;
    /// Deletes the course with its lessons, questions, choices, enrollments
    /// and their submissions.
    async fn delete(&self, course_id: CourseId) -> Result<()>;

    /// Returns `false` when the instructor already teaches the course.
    async fn add_instructor(
        &self,
        course_id: CourseId,
        instructor_id: InstructorId,
    ) -> Result<bool>;
    /// Returns `false` when the instructor did not teach the course.
    async fn remove_instructor(
        &self,
        course_id: CourseId,
        instructor_id: InstructorId,
    ) -> Result<bool>;
    async fn list_instructors(&self, course_id: CourseId) -> Result<Vec<InstructorRecord>>;

    /// Renders the course for `viewer`, filling in whether they are enrolled.
    async fn view_for(
        &self,
        course_id: CourseId,
        viewer: Option<UserId>,
    ) -> Result<Option<CourseView>>;
}

#[derive(Clone)]
pub struct SeaOrmCourseRepository {
    db: DatabaseConnection,
}

impl SeaOrmCourseRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: course::Model) -> anyhow::Result<CourseRecord> {
        Ok(CourseRecord {
            id: parse_id("course.id", &model.id)?,
            name: model.name,
            image: model.image,
            description: model.description,
            publish_date: model.publish_date,
            total_enrollment: model.total_enrollment,
        })
    }
}

/// `LIKE` pattern matching `fragment` literally anywhere in the column.
fn substring_pattern(fragment: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');

    LikeExpr::new(pattern).escape('\\')
}

#[async_trait]
impl CourseRepository for SeaOrmCourseRepository {
    async fn create(&self, new_course: NewCourse) -> Result<CourseRecord> {
        let name = match new_course.name {
            Some(name) => CourseName::new(name)?,
            None => CourseName::default(),
        };
        let image = ImageRef::new(new_course.image)?;
        let description = CourseDescription::new(new_course.description)?;

        let txn = self.db.begin().await?;

        for instructor_id in &new_course.instructor_ids {
            if instructor::Entity::find_by_id(instructor_id.to_string())
                .one(&txn)
                .await?
                .is_none()
            {
                return Err(StoreError::missing_parent("instructor", instructor_id));
            }
        }

        let id = CourseId::new();
        let active_model = course::ActiveModel {
            id: Set(id.to_string()),
            name: Set(name.into_inner()),
            image: Set(image.into_inner()),
            description: Set(description.into_inner()),
            publish_date: Set(new_course.publish_date),
            total_enrollment: Set(0),
            ..Default::default()
        };
        let model = active_model.insert(&txn).await?;

        let mut instructor_ids = new_course.instructor_ids;
        instructor_ids.sort_by_key(|id| id.into_inner());
        instructor_ids.dedup();
        for instructor_id in &instructor_ids {
            course_instructor::ActiveModel {
                course_id: Set(model.id.clone()),
                instructor_id: Set(instructor_id.to_string()),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        debug!(course_id = %id, instructors = instructor_ids.len(), "course created");

        Ok(Self::map_model(model)?)
    }

    async fn find_by_id(&self, course_id: CourseId) -> Result<Option<CourseRecord>> {
        let model = course::Entity::find_by_id(course_id.to_string())
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn list(&self, filter: CourseFilter) -> Result<Vec<CourseRecord>> {
        let mut query = course::Entity::find()
            .order_by_asc(course::Column::Name)
            .order_by_asc(course::Column::Id);

        if let Some(instructor_id) = filter.instructor_id {
            query = query
                .inner_join(course_instructor::Entity)
                .filter(course_instructor::Column::InstructorId.eq(instructor_id.to_string()));
        }
        if filter.published_only {
            query = query.filter(course::Column::PublishDate.lte(today()));
        }
        if let Some(fragment) = filter.name_contains {
            query = query.filter(course::Column::Name.like(substring_pattern(&fragment)));
        }

        let models = query.all(&self.db).await?;
        Ok(models
            .into_iter()
            .map(Self::map_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn update(&self, course_id: CourseId, update: UpdateCourse) -> Result<CourseRecord> {
        let Some(model) = course::Entity::find_by_id(course_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Err(StoreError::not_found("course", course_id));
        };

        let mut active_model: course::ActiveModel = model.into();
        if let Some(name) = update.name {
            active_model.name = Set(CourseName::new(name)?.into_inner());
        }
        if let Some(image) = update.image {
            active_model.image = Set(ImageRef::new(image)?.into_inner());
        }
        if let Some(description) = update.description {
            active_model.description = Set(CourseDescription::new(description)?.into_inner());
        }
        if let Some(publish_date) = update.publish_date {
            active_model.publish_date = Set(publish_date);
        }
        active_model.updated_at = Set(now());

        let updated = active_model.update(&self.db).await?;
        Ok(Self::map_model(updated)?)
    }

    async fn delete(&self, course_id: CourseId) -> Result<()> {
        let id = course_id.to_string();
        let txn = self.db.begin().await?;

        if course::Entity::find_by_id(id.as_str())
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(StoreError::not_found("course", course_id));
        }

        let lessons = lesson::Entity::find()
            .filter(lesson::Column::CourseId.eq(id.as_str()))
            .count(&txn)
            .await?;
        let questions = question::Entity::find()
            .filter(question::Column::CourseId.eq(id.as_str()))
            .count(&txn)
            .await?;
        let enrollments = enrollment::Entity::find()
            .filter(enrollment::Column::CourseId.eq(id.as_str()))
            .count(&txn)
            .await?;

        course::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(
            %course_id,
            lessons,
            questions,
            enrollments,
            "course deleted with dependents"
        );
        Ok(())
    }

    async fn add_instructor(
        &self,
        course_id: CourseId,
        instructor_id: InstructorId,
    ) -> Result<bool> {
        let key = (course_id.to_string(), instructor_id.to_string());
        let txn = self.db.begin().await?;

        if course::Entity::find_by_id(key.0.as_str())
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(StoreError::not_found("course", course_id));
        }
        if instructor::Entity::find_by_id(key.1.as_str())
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(StoreError::missing_parent("instructor", instructor_id));
        }
        if course_instructor::Entity::find_by_id(key.clone())
            .one(&txn)
            .await?
            .is_some()
        {
            return Ok(false);
        }

        course_instructor::ActiveModel {
            course_id: Set(key.0),
            instructor_id: Set(key.1),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        Ok(true)
    }

    async fn remove_instructor(
        &self,
        course_id: CourseId,
        instructor_id: InstructorId,
    ) -> Result<bool> {
        let key = (course_id.to_string(), instructor_id.to_string());
        let result = course_instructor::Entity::delete_by_id(key)
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn list_instructors(&self, course_id: CourseId) -> Result<Vec<InstructorRecord>> {
        let models = instructor::Entity::find()
            .inner_join(course_instructor::Entity)
            .filter(course_instructor::Column::CourseId.eq(course_id.to_string()))
            .order_by_asc(instructor::Column::CreatedAt)
            .order_by_asc(instructor::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(SeaOrmInstructorRepository::map_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn view_for(
        &self,
        course_id: CourseId,
        viewer: Option<UserId>,
    ) -> Result<Option<CourseView>> {
        let Some(model) = course::Entity::find_by_id(course_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let instructor_ids = course_instructor::Entity::find()
            .filter(course_instructor::Column::CourseId.eq(model.id.as_str()))
            .order_by_asc(course_instructor::Column::InstructorId)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|link| link.instructor_id)
            .collect();

        let is_enrolled = match viewer {
            Some(user_id) => {
                enrollment::Entity::find()
                    .filter(enrollment::Column::CourseId.eq(model.id.as_str()))
                    .filter(enrollment::Column::UserId.eq(user_id.to_string()))
                    .count(&self.db)
                    .await?
                    > 0
            }
            None => false,
        };

        Ok(Some(CourseView {
            id: model.id,
            name: model.name,
            image: model.image,
            description: model.description,
            publish_date: model.publish_date.map(|date| date.to_string()),
            instructor_ids,
            total_enrollment: model.total_enrollment,
            is_enrolled,
        }))
    }
}
