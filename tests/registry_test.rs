mod common;

use assert_matches::assert_matches;
use chrono::NaiveTime;
use lesson_manager_api::errors::ServiceError;
use lesson_manager_api::services::subjects::SubjectService;
use lesson_manager_api::services::teachers::{CreateTeacherRequest, TeacherService};
use lesson_manager_api::services::timetable::{CreateTimetableEntryRequest, TimetableService};
use std::sync::Arc;

const WEEK: i32 = 10;
const YEAR: i32 = 2025;

#[tokio::test]
async fn subject_find_or_create_is_idempotent() {
    let db = Arc::new(common::setup_db("registry_subjects").await);
    let service = SubjectService::new(db.clone());

    // Seeded by migration
    let seeded = service.find_or_create("Mathematics").await.unwrap();
    let again = service.find_or_create("Mathematics").await.unwrap();
    assert_eq!(seeded.subject_id, again.subject_id);

    // New subject created on first reference
    let first = service.find_or_create("Computer Studies").await.unwrap();
    let second = service.find_or_create("Computer Studies").await.unwrap();
    assert_eq!(first.subject_id, second.subject_id);

    let err = service.find_or_create("   ").await.unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}

#[tokio::test]
async fn subject_assignment_is_idempotent_and_checks_teacher() {
    let db = Arc::new(common::setup_db("registry_links").await);
    let subjects = SubjectService::new(db.clone());
    let teacher = common::create_teacher(&db, "Mr. Juma", None, None, "active").await;

    let a = subjects
        .assign_to_teacher(teacher.teacher_id, "Physics")
        .await
        .unwrap();
    let b = subjects
        .assign_to_teacher(teacher.teacher_id, "Physics")
        .await
        .unwrap();
    assert_eq!(a.subject_id, b.subject_id);

    let err = subjects.assign_to_teacher(9999, "Physics").await.unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn duplicate_timetable_slot_is_a_conflict() {
    let db = Arc::new(common::setup_db("registry_timetable").await);
    let service = TimetableService::new(db.clone(), None);

    let request = || CreateTimetableEntryRequest {
        day_of_week: 1,
        start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        subject_id: None,
        teacher_id: None,
        is_break: false,
        week_number: WEEK,
        academic_year: YEAR,
    };

    service.create_entry(request()).await.unwrap();
    let err = service.create_entry(request()).await.unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));

    // Same start in a different week is a different slot
    let mut other_week = request();
    other_week.week_number = WEEK + 1;
    service.create_entry(other_week).await.unwrap();
}

#[tokio::test]
async fn timetable_rejects_malformed_slots() {
    let db = Arc::new(common::setup_db("registry_timetable_validation").await);
    let service = TimetableService::new(db.clone(), None);

    let err = service
        .create_entry(CreateTimetableEntryRequest {
            day_of_week: 7,
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            subject_id: None,
            teacher_id: None,
            is_break: false,
            week_number: WEEK,
            academic_year: YEAR,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));

    let err = service
        .create_entry(CreateTimetableEntryRequest {
            day_of_week: 1,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            subject_id: None,
            teacher_id: None,
            is_break: false,
            week_number: WEEK,
            academic_year: YEAR,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}

#[tokio::test]
async fn teacher_removal_is_a_status_flip() {
    let db = Arc::new(common::setup_db("registry_teachers").await);
    let service = TeacherService::new(db.clone(), None);

    let created = service
        .create_teacher(CreateTeacherRequest {
            name: "Mrs. Banda".to_string(),
            phone: "0888000222".to_string(),
            email: Some("banda@example.com".to_string()),
            teaching_allowance: Some(22000),
            transport_allowance: None,
            status: None,
            date_joined: None,
            notes: None,
        })
        .await
        .unwrap();
    assert_eq!(created.status, "active");

    let deactivated = service.deactivate_teacher(created.teacher_id).await.unwrap();
    assert_eq!(deactivated.status, "inactive");

    // The record survives as history
    let fetched = service.get_teacher(created.teacher_id).await.unwrap();
    assert_eq!(fetched.unwrap().name, "Mrs. Banda");

    let err = service
        .create_teacher(CreateTeacherRequest {
            name: "Ghost".to_string(),
            phone: "0888000333".to_string(),
            email: Some("not-an-email".to_string()),
            teaching_allowance: None,
            transport_allowance: None,
            status: None,
            date_joined: None,
            notes: None,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}
