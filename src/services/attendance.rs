use crate::{
    db::DbPool,
    entities::attendance_record::{self, Entity as AttendanceEntity, Model as AttendanceModel},
    entities::teacher::{self, Entity as TeacherEntity},
    entities::timetable_entry::Entity as TimetableEntity,
    errors::ServiceError,
    events::{Event, EventSender},
    services::teachers::TeacherStatus,
    services::validate_week_year,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use strum::{Display, EnumString};
use tracing::{info, instrument, warn};

/// Observed attendance status for one lesson occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Partial,
}

impl AttendanceStatus {
    /// Statuses that qualify a teacher for payroll in that week.
    pub fn qualifies_for_payroll(self) -> bool {
        matches!(self, Self::Present | Self::Late | Self::Partial)
    }
}

/// Statuses counted as qualifying attendance by the eligibility query.
const QUALIFYING_STATUSES: [&str; 3] = ["present", "late", "partial"];

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordAttendanceRequest {
    pub teacher_id: i32,
    pub timetable_entry_id: Option<i32>,
    pub attendance_date: NaiveDate,
    pub status: String,
    pub notes: Option<String>,
    pub week_number: i32,
    pub academic_year: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AttendanceResponse {
    pub attendance_id: i32,
    pub teacher_id: i32,
    pub teacher_name: Option<String>,
    pub timetable_entry_id: Option<i32>,
    pub attendance_date: NaiveDate,
    pub status: String,
    pub notes: Option<String>,
    pub week_number: i32,
    pub academic_year: i32,
}

/// Service for attendance observations and payroll eligibility.
///
/// Attendance rows are immutable: this service exposes no update or delete
/// path, only recording and reads.
#[derive(Clone)]
pub struct AttendanceService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl AttendanceService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Records one lesson-occurrence observation.
    #[instrument(skip(self, request), fields(teacher_id = request.teacher_id, week = request.week_number))]
    pub async fn record_attendance(
        &self,
        request: RecordAttendanceRequest,
    ) -> Result<AttendanceResponse, ServiceError> {
        validate_week_year(request.week_number, request.academic_year)?;
        let status = AttendanceStatus::from_str(request.status.trim()).map_err(|_| {
            ServiceError::InvalidInput(format!(
                "Unknown attendance status: {} (expected present, absent, late or partial)",
                request.status
            ))
        })?;

        let db = &*self.db_pool;

        let teacher = TeacherEntity::find_by_id(request.teacher_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Teacher with ID {} not found",
                    request.teacher_id
                ))
            })?;

        if let Some(entry_id) = request.timetable_entry_id {
            TimetableEntity::find_by_id(entry_id)
                .one(db)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!(
                        "Timetable entry with ID {} not found",
                        entry_id
                    ))
                })?;
        }

        let model = attendance_record::ActiveModel {
            teacher_id: Set(request.teacher_id),
            timetable_entry_id: Set(request.timetable_entry_id),
            attendance_date: Set(request.attendance_date),
            status: Set(status.to_string()),
            notes: Set(request.notes),
            week_number: Set(request.week_number),
            academic_year: Set(request.academic_year),
            recorded_at: Set(Utc::now()),
            ..Default::default()
        };

        let created = model.insert(db).await?;
        info!(
            attendance_id = created.attendance_id,
            status = %status,
            "Attendance recorded"
        );

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::AttendanceRecorded {
                    teacher_id: created.teacher_id,
                    week_number: created.week_number,
                    academic_year: created.academic_year,
                    status: created.status.clone(),
                })
                .await
            {
                warn!(error = %e, "Failed to send attendance recorded event");
            }
        }

        Ok(AttendanceResponse {
            attendance_id: created.attendance_id,
            teacher_id: created.teacher_id,
            teacher_name: Some(teacher.name),
            timetable_entry_id: created.timetable_entry_id,
            attendance_date: created.attendance_date,
            status: created.status,
            notes: created.notes,
            week_number: created.week_number,
            academic_year: created.academic_year,
        })
    }

    /// Lists one week's attendance rows with teacher names.
    #[instrument(skip(self))]
    pub async fn list_week(
        &self,
        week_number: i32,
        academic_year: i32,
    ) -> Result<Vec<AttendanceResponse>, ServiceError> {
        validate_week_year(week_number, academic_year)?;
        let rows: Vec<(AttendanceModel, Option<teacher::Model>)> = AttendanceEntity::find()
            .find_also_related(TeacherEntity)
            .filter(attendance_record::Column::WeekNumber.eq(week_number))
            .filter(attendance_record::Column::AcademicYear.eq(academic_year))
            .order_by_asc(attendance_record::Column::AttendanceDate)
            .all(&*self.db_pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(record, teacher)| AttendanceResponse {
                attendance_id: record.attendance_id,
                teacher_id: record.teacher_id,
                teacher_name: teacher.map(|t| t.name),
                timetable_entry_id: record.timetable_entry_id,
                attendance_date: record.attendance_date,
                status: record.status,
                notes: record.notes,
                week_number: record.week_number,
                academic_year: record.academic_year,
            })
            .collect())
    }

    /// Returns the distinct set of active teachers with at least one
    /// qualifying attendance record in the given week. No side effects.
    #[instrument(skip(self))]
    pub async fn eligible_teachers(
        &self,
        week_number: i32,
        academic_year: i32,
    ) -> Result<Vec<i32>, ServiceError> {
        validate_week_year(week_number, academic_year)?;

        let teacher_ids: Vec<i32> = AttendanceEntity::find()
            .select_only()
            .column(attendance_record::Column::TeacherId)
            .distinct()
            .join(JoinType::InnerJoin, attendance_record::Relation::Teacher.def())
            .filter(attendance_record::Column::WeekNumber.eq(week_number))
            .filter(attendance_record::Column::AcademicYear.eq(academic_year))
            .filter(attendance_record::Column::Status.is_in(QUALIFYING_STATUSES))
            .filter(teacher::Column::Status.eq(TeacherStatus::Active.to_string()))
            .into_tuple()
            .all(&*self.db_pool)
            .await?;

        Ok(teacher_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualifying_statuses_match_enum() {
        for raw in QUALIFYING_STATUSES {
            let status = AttendanceStatus::from_str(raw).unwrap();
            assert!(status.qualifies_for_payroll());
        }
        assert!(!AttendanceStatus::Absent.qualifies_for_payroll());
    }

    #[test]
    fn status_parsing_is_strict() {
        assert_eq!(
            AttendanceStatus::from_str("present").unwrap(),
            AttendanceStatus::Present
        );
        assert!(AttendanceStatus::from_str("Present ").is_err());
        assert!(AttendanceStatus::from_str("sick").is_err());
    }
}
