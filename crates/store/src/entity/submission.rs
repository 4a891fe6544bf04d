use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "submission")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub enrollment_id: String,
    pub total_score: i32,
    pub total_correct: i32,
    pub total_incorrect: i32,
    pub total_attempted: i32,
    pub total_not_attempted: i32,
    pub percentage_correct: i32,
    pub correct_choices: i32,
    pub scored_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::enrollment::Entity",
        from = "Column::EnrollmentId",
        to = "super::enrollment::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Enrollment,
    #[sea_orm(has_many = "super::submission_choice::Entity")]
    SubmissionChoice,
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl Related<super::submission_choice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubmissionChoice.def()
    }
}

impl Related<super::choice::Entity> for Entity {
    fn to() -> RelationDef {
        super::submission_choice::Relation::Choice.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::submission_choice::Relation::Submission.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
