use crate::{
    db::DbPool,
    entities::subject::Entity as SubjectEntity,
    entities::teacher::Entity as TeacherEntity,
    entities::timetable_entry::{self, Entity as TimetableEntity, Model as TimetableModel},
    errors::ServiceError,
    events::{Event, EventSender},
    services::validate_week_year,
};
use chrono::NaiveTime;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTimetableEntryRequest {
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub subject_id: Option<i32>,
    pub teacher_id: Option<i32>,
    #[serde(default)]
    pub is_break: bool,
    pub week_number: i32,
    pub academic_year: i32,
}

/// Service for the weekly timetable.
#[derive(Clone)]
pub struct TimetableService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl TimetableService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates one scheduled slot. A duplicate (day, start, week, year) slot
    /// surfaces as a conflict via the unique slot index.
    #[instrument(skip(self, request), fields(day = request.day_of_week, week = request.week_number))]
    pub async fn create_entry(
        &self,
        request: CreateTimetableEntryRequest,
    ) -> Result<TimetableModel, ServiceError> {
        validate_week_year(request.week_number, request.academic_year)?;
        if !(0..=6).contains(&request.day_of_week) {
            return Err(ServiceError::ValidationError(format!(
                "day_of_week must be between 0 (Sunday) and 6, got {}",
                request.day_of_week
            )));
        }
        if request.start_time >= request.end_time {
            return Err(ServiceError::ValidationError(
                "start_time must be before end_time".to_string(),
            ));
        }

        let db = &*self.db_pool;

        if let Some(teacher_id) = request.teacher_id {
            TeacherEntity::find_by_id(teacher_id)
                .one(db)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Teacher with ID {} not found", teacher_id))
                })?;
        }
        if let Some(subject_id) = request.subject_id {
            SubjectEntity::find_by_id(subject_id)
                .one(db)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Subject with ID {} not found", subject_id))
                })?;
        }

        let model = timetable_entry::ActiveModel {
            day_of_week: Set(request.day_of_week),
            start_time: Set(request.start_time),
            end_time: Set(request.end_time),
            subject_id: Set(request.subject_id),
            teacher_id: Set(request.teacher_id),
            is_break: Set(request.is_break),
            week_number: Set(request.week_number),
            academic_year: Set(request.academic_year),
            ..Default::default()
        };

        let created = match model.insert(db).await {
            Ok(created) => created,
            Err(err) => {
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    return Err(ServiceError::Conflict(format!(
                        "A timetable slot already exists for day {} at {} in week {}/{}",
                        request.day_of_week,
                        request.start_time,
                        request.week_number,
                        request.academic_year
                    )));
                }
                return Err(ServiceError::DatabaseError(err));
            }
        };

        info!(entry_id = created.entry_id, "Timetable entry created");
        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::TimetableEntryCreated(created.entry_id))
                .await
            {
                warn!(error = %e, "Failed to send timetable entry created event");
            }
        }

        Ok(created)
    }

    /// Lists the timetable for one week, ordered by day then start time.
    #[instrument(skip(self))]
    pub async fn list_week(
        &self,
        week_number: i32,
        academic_year: i32,
    ) -> Result<Vec<TimetableModel>, ServiceError> {
        validate_week_year(week_number, academic_year)?;
        let entries = TimetableEntity::find()
            .filter(timetable_entry::Column::WeekNumber.eq(week_number))
            .filter(timetable_entry::Column::AcademicYear.eq(academic_year))
            .order_by_asc(timetable_entry::Column::DayOfWeek)
            .order_by_asc(timetable_entry::Column::StartTime)
            .all(&*self.db_pool)
            .await?;
        Ok(entries)
    }
}
