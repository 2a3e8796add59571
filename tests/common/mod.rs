#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use lesson_manager_api::db::{self, DbPool};
use lesson_manager_api::entities::{attendance_record, teacher, timetable_entry};
use sea_orm::{ActiveModelTrait, Set};

/// Opens a named in-memory SQLite database (shared-cache so every pooled
/// connection sees the same data) and applies all migrations.
pub async fn setup_db(name: &str) -> DbPool {
    let url = format!("sqlite:file:{}?mode=memory&cache=shared", name);
    let pool = db::establish_connection(&url)
        .await
        .expect("Failed to connect to test database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

pub async fn create_teacher(
    db: &DbPool,
    name: &str,
    teaching_allowance: Option<i32>,
    transport_allowance: Option<i32>,
    status: &str,
) -> teacher::Model {
    let model = teacher::ActiveModel {
        name: Set(name.to_string()),
        phone: Set("0999000111".to_string()),
        email: Set(None),
        teaching_allowance: Set(teaching_allowance),
        transport_allowance: Set(transport_allowance),
        status: Set(status.to_string()),
        date_joined: Set(NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()),
        notes: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    model.insert(db).await.expect("Failed to create teacher")
}

pub async fn record_attendance(
    db: &DbPool,
    teacher_id: i32,
    status: &str,
    week_number: i32,
    academic_year: i32,
    attendance_date: NaiveDate,
) -> attendance_record::Model {
    let model = attendance_record::ActiveModel {
        teacher_id: Set(teacher_id),
        timetable_entry_id: Set(None),
        attendance_date: Set(attendance_date),
        status: Set(status.to_string()),
        notes: Set(None),
        week_number: Set(week_number),
        academic_year: Set(academic_year),
        recorded_at: Set(Utc::now()),
        ..Default::default()
    };
    model
        .insert(db)
        .await
        .expect("Failed to record attendance")
}

pub async fn create_timetable_entry(
    db: &DbPool,
    day_of_week: i16,
    start: (u32, u32),
    end: (u32, u32),
    is_break: bool,
    week_number: i32,
    academic_year: i32,
) -> timetable_entry::Model {
    let model = timetable_entry::ActiveModel {
        day_of_week: Set(day_of_week),
        start_time: Set(chrono::NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap()),
        end_time: Set(chrono::NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap()),
        subject_id: Set(None),
        teacher_id: Set(None),
        is_break: Set(is_break),
        week_number: Set(week_number),
        academic_year: Set(academic_year),
        ..Default::default()
    };
    model
        .insert(db)
        .await
        .expect("Failed to create timetable entry")
}

/// 2025-03-09 is a Sunday; transport payments are allowed.
pub fn a_sunday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
}

/// 2025-03-14 is a Friday; teaching payments are allowed.
pub fn a_friday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

/// 2025-03-10 is a Monday; no payment kind is allowed.
pub fn a_monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

/// A lesson date inside week 10 of 2025 per the fixed Jan-1 week formula.
pub fn a_lesson_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()
}
