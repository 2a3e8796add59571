use crate::{
    db::DbPool,
    entities::attendance_record::{self, Entity as AttendanceEntity},
    entities::payroll_record::{self, Entity as PayrollEntity},
    entities::teacher::{self, Entity as TeacherEntity},
    entities::timetable_entry::{self, Entity as TimetableEntity},
    errors::ServiceError,
    services::teachers::TeacherStatus,
    services::validate_week_year,
};
use chrono::{Datelike, NaiveDate};
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QuerySelect,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// Derives the stored week number for a date: ceil(day_of_year / 7) against a
/// fixed Jan-1 epoch. Every caller must use this exact formula for parity
/// with the week numbers stamped onto attendance and payroll rows.
pub fn week_of(date: NaiveDate) -> i32 {
    ((date.ordinal() as i32 - 1) / 7) + 1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub active_teachers: u64,
    pub weekly_payroll: i64,
    /// Percentage 0-100: present / (present + absent), 0 when no rows.
    pub attendance_rate: i32,
    pub weekly_lessons: u64,
    pub current_week: i32,
    pub current_year: i32,
}

#[derive(FromQueryResult)]
struct SumResult {
    total: Option<i64>,
}

/// Read-only rollups over teachers, payroll, attendance and the timetable.
#[derive(Clone)]
pub struct DashboardService {
    db_pool: Arc<DbPool>,
}

impl DashboardService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Aggregates the dashboard counters for one week.
    #[instrument(skip(self))]
    pub async fn stats(
        &self,
        week_number: i32,
        academic_year: i32,
    ) -> Result<DashboardStats, ServiceError> {
        validate_week_year(week_number, academic_year)?;
        let db = &*self.db_pool;

        let active_teachers = TeacherEntity::find()
            .filter(teacher::Column::Status.eq(TeacherStatus::Active.to_string()))
            .count(db)
            .await?;

        let weekly_payroll = PayrollEntity::find()
            .select_only()
            .column_as(payroll_record::Column::TotalAmount.sum(), "total")
            .filter(payroll_record::Column::WeekNumber.eq(week_number))
            .filter(payroll_record::Column::AcademicYear.eq(academic_year))
            .into_model::<SumResult>()
            .one(db)
            .await?
            .and_then(|r| r.total)
            .unwrap_or(0);

        let present = AttendanceEntity::find()
            .filter(attendance_record::Column::WeekNumber.eq(week_number))
            .filter(attendance_record::Column::AcademicYear.eq(academic_year))
            .filter(attendance_record::Column::Status.eq("present"))
            .count(db)
            .await?;
        let absent = AttendanceEntity::find()
            .filter(attendance_record::Column::WeekNumber.eq(week_number))
            .filter(attendance_record::Column::AcademicYear.eq(academic_year))
            .filter(attendance_record::Column::Status.eq("absent"))
            .count(db)
            .await?;
        let attendance_rate = attendance_rate(present, absent);

        let weekly_lessons = TimetableEntity::find()
            .filter(timetable_entry::Column::WeekNumber.eq(week_number))
            .filter(timetable_entry::Column::AcademicYear.eq(academic_year))
            .filter(timetable_entry::Column::IsBreak.eq(false))
            .count(db)
            .await?;

        Ok(DashboardStats {
            active_teachers,
            weekly_payroll,
            attendance_rate,
            weekly_lessons,
            current_week: week_number,
            current_year: academic_year,
        })
    }
}

fn attendance_rate(present: u64, absent: u64) -> i32 {
    let denominator = present + absent;
    if denominator == 0 {
        0
    } else {
        ((present * 100) / denominator) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_of_uses_fixed_jan1_epoch() {
        let jan1 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let jan7 = NaiveDate::from_ymd_opt(2025, 1, 7).unwrap();
        let jan8 = NaiveDate::from_ymd_opt(2025, 1, 8).unwrap();
        let dec31 = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();

        assert_eq!(week_of(jan1), 1);
        assert_eq!(week_of(jan7), 1);
        assert_eq!(week_of(jan8), 2);
        assert_eq!(week_of(dec31), 53);
    }

    #[test]
    fn rate_is_present_over_present_plus_absent() {
        assert_eq!(attendance_rate(3, 1), 75);
        assert_eq!(attendance_rate(0, 0), 0);
        assert_eq!(attendance_rate(5, 0), 100);
        assert_eq!(attendance_rate(0, 4), 0);
        // late/partial rows never reach this function
        assert_eq!(attendance_rate(1, 2), 33);
    }
}
