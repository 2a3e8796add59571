use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub teacher_id: i32,

    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 20, message = "Phone must be between 1 and 20 characters"))]
    pub phone: String,

    pub email: Option<String>,

    /// Weekly teaching stipend; NULL falls back to the payment-schedule default.
    pub teaching_allowance: Option<i32>,

    /// Weekly transport stipend; NULL falls back to the payment-schedule default.
    pub transport_allowance: Option<i32>,

    pub status: String,
    pub date_joined: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    AttendanceRecords,
    #[sea_orm(has_many = "super::payroll_record::Entity")]
    PayrollRecords,
    #[sea_orm(has_many = "super::payment_transaction::Entity")]
    PaymentTransactions,
    #[sea_orm(has_many = "super::teacher_subject::Entity")]
    TeacherSubjects,
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceRecords.def()
    }
}

impl Related<super::payroll_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollRecords.def()
    }
}

impl Related<super::payment_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentTransactions.def()
    }
}

impl Related<super::teacher_subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeacherSubjects.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {}
