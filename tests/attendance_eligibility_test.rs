mod common;

use assert_matches::assert_matches;
use lesson_manager_api::errors::ServiceError;
use lesson_manager_api::services::attendance::{AttendanceService, RecordAttendanceRequest};
use std::sync::Arc;

const WEEK: i32 = 10;
const YEAR: i32 = 2025;

#[tokio::test]
async fn eligibility_is_distinct_per_teacher() {
    let db = Arc::new(common::setup_db("eligibility_distinct").await);
    let teacher = common::create_teacher(&db, "Teacher A", Some(20000), Some(12000), "active").await;
    // Two qualifying observations in the same week still count once
    common::record_attendance(
        &db,
        teacher.teacher_id,
        "present",
        WEEK,
        YEAR,
        common::a_lesson_date(),
    )
    .await;
    common::record_attendance(
        &db,
        teacher.teacher_id,
        "late",
        WEEK,
        YEAR,
        common::a_lesson_date().succ_opt().unwrap(),
    )
    .await;

    let service = AttendanceService::new(db, None);
    let eligible = service.eligible_teachers(WEEK, YEAR).await.unwrap();
    assert_eq!(eligible, vec![teacher.teacher_id]);
}

#[tokio::test]
async fn only_qualifying_statuses_count() {
    let db = Arc::new(common::setup_db("eligibility_statuses").await);
    let present = common::create_teacher(&db, "Present", None, None, "active").await;
    let late = common::create_teacher(&db, "Late", None, None, "active").await;
    let partial = common::create_teacher(&db, "Partial", None, None, "active").await;
    let absent = common::create_teacher(&db, "Absent", None, None, "active").await;

    for (teacher, status) in [
        (&present, "present"),
        (&late, "late"),
        (&partial, "partial"),
        (&absent, "absent"),
    ] {
        common::record_attendance(
            &db,
            teacher.teacher_id,
            status,
            WEEK,
            YEAR,
            common::a_lesson_date(),
        )
        .await;
    }

    let service = AttendanceService::new(db, None);
    let mut eligible = service.eligible_teachers(WEEK, YEAR).await.unwrap();
    eligible.sort();

    let mut expected = vec![present.teacher_id, late.teacher_id, partial.teacher_id];
    expected.sort();
    assert_eq!(eligible, expected);
}

#[tokio::test]
async fn inactive_and_on_leave_teachers_are_excluded() {
    let db = Arc::new(common::setup_db("eligibility_inactive").await);
    let inactive = common::create_teacher(&db, "Inactive", None, None, "inactive").await;
    let on_leave = common::create_teacher(&db, "OnLeave", None, None, "on-leave").await;
    for teacher in [&inactive, &on_leave] {
        common::record_attendance(
            &db,
            teacher.teacher_id,
            "present",
            WEEK,
            YEAR,
            common::a_lesson_date(),
        )
        .await;
    }

    let service = AttendanceService::new(db, None);
    let eligible = service.eligible_teachers(WEEK, YEAR).await.unwrap();
    assert!(eligible.is_empty());
}

#[tokio::test]
async fn other_weeks_do_not_leak_into_eligibility() {
    let db = Arc::new(common::setup_db("eligibility_weeks").await);
    let teacher = common::create_teacher(&db, "Teacher A", None, None, "active").await;
    common::record_attendance(
        &db,
        teacher.teacher_id,
        "present",
        WEEK + 1,
        YEAR,
        common::a_lesson_date(),
    )
    .await;

    let service = AttendanceService::new(db, None);
    assert!(service.eligible_teachers(WEEK, YEAR).await.unwrap().is_empty());
    assert_eq!(
        service.eligible_teachers(WEEK + 1, YEAR).await.unwrap(),
        vec![teacher.teacher_id]
    );
}

#[tokio::test]
async fn invalid_inputs_are_validation_errors() {
    let db = Arc::new(common::setup_db("eligibility_validation").await);
    let service = AttendanceService::new(db, None);

    assert_matches!(
        service.eligible_teachers(0, YEAR).await.unwrap_err(),
        ServiceError::ValidationError(_)
    );
    assert_matches!(
        service.eligible_teachers(WEEK, 123).await.unwrap_err(),
        ServiceError::ValidationError(_)
    );
}

#[tokio::test]
async fn recording_validates_status_and_teacher() {
    let db = Arc::new(common::setup_db("record_validation").await);
    let teacher = common::create_teacher(&db, "Teacher A", None, None, "active").await;
    let service = AttendanceService::new(db, None);

    let err = service
        .record_attendance(RecordAttendanceRequest {
            teacher_id: teacher.teacher_id,
            timetable_entry_id: None,
            attendance_date: common::a_lesson_date(),
            status: "sick".to_string(),
            notes: None,
            week_number: WEEK,
            academic_year: YEAR,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidInput(_));

    let err = service
        .record_attendance(RecordAttendanceRequest {
            teacher_id: 9999,
            timetable_entry_id: None,
            attendance_date: common::a_lesson_date(),
            status: "present".to_string(),
            notes: None,
            week_number: WEEK,
            academic_year: YEAR,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));

    let recorded = service
        .record_attendance(RecordAttendanceRequest {
            teacher_id: teacher.teacher_id,
            timetable_entry_id: None,
            attendance_date: common::a_lesson_date(),
            status: "present".to_string(),
            notes: Some("arrived early".to_string()),
            week_number: WEEK,
            academic_year: YEAR,
        })
        .await
        .unwrap();
    assert_eq!(recorded.status, "present");
    assert_eq!(recorded.teacher_name.as_deref(), Some("Teacher A"));
}
