use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Weekly payroll entry for one teacher.
///
/// At most one row exists per (teacher_id, week_number, academic_year); the
/// unique index in the schema is what makes the reconciler's upsert safe
/// under concurrent processing. `total_amount` is always
/// teaching + transport + bonus - deduction.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll_weekly")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub payroll_id: i32,
    pub teacher_id: i32,
    pub week_number: i32,
    pub academic_year: i32,
    pub teaching_allowance: i32,
    pub transport_allowance: i32,
    pub bonus: i32,
    pub deduction: i32,
    pub total_amount: i32,
    pub payment_status: String,
    pub payment_date: Option<NaiveDate>,
    pub processed_date: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::TeacherId",
        to = "super::teacher::Column::TeacherId"
    )]
    Teacher,
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {}
