mod common;

use assert_matches::assert_matches;
use lesson_manager_api::entities::{
    payment_transaction::{self, Entity as PaymentTransaction},
    payroll_record::{self, Entity as PayrollRecord},
};
use lesson_manager_api::errors::ServiceError;
use lesson_manager_api::services::attendance::AttendanceService;
use lesson_manager_api::services::payroll::{PaymentKind, PayrollService};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use std::sync::Arc;

const WEEK: i32 = 10;
const YEAR: i32 = 2025;

fn services(db: Arc<lesson_manager_api::db::DbPool>) -> PayrollService {
    let attendance = Arc::new(AttendanceService::new(db.clone(), None));
    PayrollService::new(db, attendance, None, true)
}

#[tokio::test]
async fn wrong_weekday_is_rejected_and_writes_nothing() {
    let db = Arc::new(common::setup_db("payroll_wrong_day").await);
    let teacher = common::create_teacher(&db, "Mr. Juma", Some(20000), Some(12000), "active").await;
    common::record_attendance(
        &db,
        teacher.teacher_id,
        "present",
        WEEK,
        YEAR,
        common::a_lesson_date(),
    )
    .await;

    let payroll = services(db.clone());
    let err = payroll
        .process(PaymentKind::Transport, WEEK, YEAR, common::a_monday())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::SchedulingViolation(_));

    // Hard gate: no payroll or transaction rows may exist
    assert_eq!(PayrollRecord::find().count(db.as_ref()).await.unwrap(), 0);
    assert_eq!(
        PaymentTransaction::find().count(db.as_ref()).await.unwrap(),
        0
    );

    // Teaching on a Sunday is just as much of a violation
    let err = payroll
        .process(PaymentKind::Teaching, WEEK, YEAR, common::a_sunday())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::SchedulingViolation(_));
}

#[tokio::test]
async fn transport_run_pays_eligible_teacher() {
    let db = Arc::new(common::setup_db("payroll_transport_run").await);
    let teacher = common::create_teacher(&db, "Teacher A", Some(20000), Some(12000), "active").await;
    common::record_attendance(
        &db,
        teacher.teacher_id,
        "present",
        WEEK,
        YEAR,
        common::a_lesson_date(),
    )
    .await;

    let payroll = services(db.clone());
    let summary = payroll
        .process(PaymentKind::Transport, WEEK, YEAR, common::a_sunday())
        .await
        .unwrap();

    assert_eq!(summary.total_amount, 12000);
    assert_eq!(summary.teacher_count, 1);
    assert_eq!(summary.payment_date, common::a_sunday());

    let rows = PayrollRecord::find().all(db.as_ref()).await.unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.teacher_id, teacher.teacher_id);
    assert_eq!(row.week_number, WEEK);
    assert_eq!(row.academic_year, YEAR);
    assert_eq!(row.transport_allowance, 12000);
    assert_eq!(row.teaching_allowance, 0);
    assert_eq!(row.total_amount, 12000);
    assert_eq!(row.payment_status, "processed");
    assert!(row.processed_date.is_some());
    assert_eq!(row.payment_date, Some(common::a_sunday()));

    let transactions = PaymentTransaction::find().all(db.as_ref()).await.unwrap();
    assert_eq!(transactions.len(), 1);
    let txn = &transactions[0];
    assert_eq!(txn.teacher_id, teacher.teacher_id);
    assert_eq!(txn.amount, 12000);
    assert_eq!(txn.payment_type, "transport_allowance");
    assert_eq!(txn.scheduled_day, 0);
    assert_eq!(txn.payment_date, common::a_sunday());
}

#[tokio::test]
async fn reprocessing_overwrites_payroll_but_appends_transactions() {
    let db = Arc::new(common::setup_db("payroll_idempotency").await);
    for name in ["Teacher A", "Teacher B"] {
        let teacher = common::create_teacher(&db, name, Some(20000), Some(12000), "active").await;
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

    let payroll = services(db.clone());
    let first = payroll
        .process(PaymentKind::Transport, WEEK, YEAR, common::a_sunday())
        .await
        .unwrap();
    let second = payroll
        .process(PaymentKind::Transport, WEEK, YEAR, common::a_sunday())
        .await
        .unwrap();

    // Ledger state is idempotent: same rows, same total
    assert_eq!(first.total_amount, 24000);
    assert_eq!(second.total_amount, 24000);
    assert_eq!(first.teacher_count, 2);
    assert_eq!(second.teacher_count, 2);
    assert_eq!(PayrollRecord::find().count(db.as_ref()).await.unwrap(), 2);

    // The audit log is not: every run appends one transaction per teacher
    assert_eq!(
        PaymentTransaction::find().count(db.as_ref()).await.unwrap(),
        4
    );

    // Reference numbers stay unique across runs
    let refs: Vec<String> = PaymentTransaction::find()
        .all(db.as_ref())
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.reference_number)
        .collect();
    let mut deduped = refs.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), refs.len());
}

#[tokio::test]
async fn teaching_upsert_preserves_existing_transport_amount() {
    let db = Arc::new(common::setup_db("payroll_cross_kind").await);
    let teacher = common::create_teacher(&db, "Teacher A", Some(25000), Some(12000), "active").await;
    common::record_attendance(
        &db,
        teacher.teacher_id,
        "present",
        WEEK,
        YEAR,
        common::a_lesson_date(),
    )
    .await;

    let payroll = services(db.clone());
    payroll
        .process(PaymentKind::Transport, WEEK, YEAR, common::a_sunday())
        .await
        .unwrap();
    let summary = payroll
        .process(PaymentKind::Teaching, WEEK, YEAR, common::a_friday())
        .await
        .unwrap();

    assert_eq!(summary.total_amount, 25000);

    let rows = PayrollRecord::find()
        .filter(payroll_record::Column::TeacherId.eq(teacher.teacher_id))
        .all(db.as_ref())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1, "upsert must never duplicate the week row");
    let row = &rows[0];
    assert_eq!(row.transport_allowance, 12000);
    assert_eq!(row.teaching_allowance, 25000);
    assert_eq!(row.total_amount, 37000);

    let teaching_txns = PaymentTransaction::find()
        .filter(payment_transaction::Column::PaymentType.eq("teaching_allowance"))
        .count(db.as_ref())
        .await
        .unwrap();
    assert_eq!(teaching_txns, 1);
}

#[tokio::test]
async fn returned_total_covers_all_rows_for_the_week() {
    let db = Arc::new(common::setup_db("payroll_aggregate").await);
    let a = common::create_teacher(&db, "Teacher A", Some(20000), Some(12000), "active").await;
    let b = common::create_teacher(&db, "Teacher B", Some(20000), Some(9000), "active").await;
    for teacher_id in [a.teacher_id, b.teacher_id] {
        common::record_attendance(
            &db,
            teacher_id,
            "late",
            WEEK,
            YEAR,
            common::a_lesson_date(),
        )
        .await;
    }

    let payroll = services(db.clone());
    let summary = payroll
        .process(PaymentKind::Transport, WEEK, YEAR, common::a_sunday())
        .await
        .unwrap();

    let rows = PayrollRecord::find().all(db.as_ref()).await.unwrap();
    let expected: i64 = rows.iter().map(|r| r.transport_allowance as i64).sum();
    assert_eq!(summary.total_amount, expected);
    assert_eq!(summary.total_amount, 21000);
}

#[tokio::test]
async fn inactive_teacher_is_not_paid_despite_attendance() {
    let db = Arc::new(common::setup_db("payroll_inactive").await);
    let inactive =
        common::create_teacher(&db, "Teacher B", Some(20000), Some(12000), "inactive").await;
    common::record_attendance(
        &db,
        inactive.teacher_id,
        "present",
        WEEK,
        YEAR,
        common::a_lesson_date(),
    )
    .await;

    let payroll = services(db.clone());
    let summary = payroll
        .process(PaymentKind::Transport, WEEK, YEAR, common::a_sunday())
        .await
        .unwrap();

    assert_eq!(summary.teacher_count, 0);
    assert_eq!(summary.total_amount, 0);
    assert_eq!(PayrollRecord::find().count(db.as_ref()).await.unwrap(), 0);
    assert_eq!(
        PaymentTransaction::find().count(db.as_ref()).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn missing_teacher_override_falls_back_to_schedule_default() {
    let db = Arc::new(common::setup_db("payroll_schedule_default").await);
    // No transport override: the seeded payment_schedules row supplies 12000
    let teacher = common::create_teacher(&db, "Teacher C", Some(20000), None, "active").await;
    common::record_attendance(
        &db,
        teacher.teacher_id,
        "partial",
        WEEK,
        YEAR,
        common::a_lesson_date(),
    )
    .await;

    let payroll = services(db.clone());
    let summary = payroll
        .process(PaymentKind::Transport, WEEK, YEAR, common::a_sunday())
        .await
        .unwrap();

    assert_eq!(summary.total_amount, 12000);
    let row = PayrollRecord::find()
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.transport_allowance, 12000);
}

#[tokio::test]
async fn disabled_gate_allows_processing_on_any_day() {
    let db = Arc::new(common::setup_db("payroll_gate_toggle").await);
    let teacher = common::create_teacher(&db, "Teacher D", Some(20000), Some(12000), "active").await;
    common::record_attendance(
        &db,
        teacher.teacher_id,
        "present",
        WEEK,
        YEAR,
        common::a_lesson_date(),
    )
    .await;

    let attendance = Arc::new(AttendanceService::new(db.clone(), None));
    let payroll = PayrollService::new(db.clone(), attendance, None, false);

    let summary = payroll
        .process(PaymentKind::Transport, WEEK, YEAR, common::a_monday())
        .await
        .unwrap();
    assert_eq!(summary.teacher_count, 1);
    assert_eq!(summary.total_amount, 12000);
}

#[tokio::test]
async fn invalid_week_is_rejected_before_any_store_access() {
    let db = Arc::new(common::setup_db("payroll_validation").await);
    let payroll = services(db.clone());

    let err = payroll
        .process(PaymentKind::Transport, 54, YEAR, common::a_sunday())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));

    let err = payroll
        .process(PaymentKind::Teaching, WEEK, 99, common::a_friday())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}

#[tokio::test]
async fn empty_eligible_set_succeeds_trivially() {
    let db = Arc::new(common::setup_db("payroll_empty_week").await);
    common::create_teacher(&db, "Teacher E", Some(20000), Some(12000), "active").await;

    let payroll = services(db.clone());
    let summary = payroll
        .process(PaymentKind::Transport, WEEK, YEAR, common::a_sunday())
        .await
        .unwrap();

    assert_eq!(summary.teacher_count, 0);
    assert_eq!(summary.total_amount, 0);
    assert_eq!(
        PaymentTransaction::find().count(db.as_ref()).await.unwrap(),
        0
    );
}
