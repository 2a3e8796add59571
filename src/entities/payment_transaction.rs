use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only audit record of a single disbursement.
///
/// This table is the system of record for "a payment of X happened"; rows are
/// never updated or deleted, and every payroll run appends fresh rows even
/// when the payroll ledger itself is unchanged.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub transaction_id: i32,
    pub teacher_id: i32,
    pub amount: i32,
    pub payment_type: String,
    pub payment_date: NaiveDate,
    pub scheduled_day: i16,
    #[sea_orm(unique)]
    pub reference_number: String,
    pub created_at: DateTime<Utc>,
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
