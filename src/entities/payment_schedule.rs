use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-kind payment defaults: the weekday a kind may be processed on and the
/// fallback amount used when a teacher has no per-teacher override.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_schedules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub schedule_id: i32,
    #[sea_orm(unique)]
    pub payment_type: String,
    pub scheduled_day: i16,
    pub default_amount: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {}
