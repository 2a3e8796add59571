use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One lesson-occurrence observation for a teacher.
///
/// Rows are immutable once recorded: there is no update path anywhere in the
/// service layer, only inserts and reads.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub attendance_id: i32,
    pub teacher_id: i32,
    pub timetable_entry_id: Option<i32>,
    pub attendance_date: NaiveDate,
    pub status: String,
    pub notes: Option<String>,
    pub week_number: i32,
    pub academic_year: i32,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::TeacherId",
        to = "super::teacher::Column::TeacherId"
    )]
    Teacher,
    #[sea_orm(
        belongs_to = "super::timetable_entry::Entity",
        from = "Column::TimetableEntryId",
        to = "super::timetable_entry::Column::EntryId"
    )]
    TimetableEntry,
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::timetable_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimetableEntry.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {}
