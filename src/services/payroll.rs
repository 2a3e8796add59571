use crate::{
    db::DbPool,
    entities::payment_schedule::{self, Entity as PaymentScheduleEntity},
    entities::payment_transaction,
    entities::payroll_record::{self, Entity as PayrollEntity, Model as PayrollModel},
    entities::teacher::{self, Entity as TeacherEntity, Model as TeacherModel},
    errors::ServiceError,
    events::{Event, EventSender},
    services::attendance::AttendanceService,
    services::validate_week_year,
};
use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use strum::{Display, EnumString};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// The two weekly allowance kinds, each bound to one processing weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Transport,
    Teaching,
}

impl PaymentKind {
    /// Fallback processing day (0 = Sunday .. 6 = Saturday) when no
    /// payment-schedule row exists: transport on Sundays, teaching on Fridays.
    pub fn default_scheduled_day(self) -> i16 {
        match self {
            Self::Transport => 0,
            Self::Teaching => 5,
        }
    }

    /// The payment_type recorded on audit transactions for this kind.
    pub fn transaction_payment_type(self) -> &'static str {
        match self {
            Self::Transport => "transport_allowance",
            Self::Teaching => "teaching_allowance",
        }
    }

    fn reference_code(self) -> &'static str {
        match self {
            Self::Transport => "TPT",
            Self::Teaching => "TCH",
        }
    }

    fn allowance_of(self, teacher: &TeacherModel) -> Option<i32> {
        match self {
            Self::Transport => teacher.transport_allowance,
            Self::Teaching => teacher.teaching_allowance,
        }
    }

    fn payroll_column(self) -> payroll_record::Column {
        match self {
            Self::Transport => payroll_record::Column::TransportAllowance,
            Self::Teaching => payroll_record::Column::TeachingAllowance,
        }
    }
}

/// Parse a payment kind from route or payload input.
pub fn parse_payment_kind(raw: &str) -> Result<PaymentKind, ServiceError> {
    PaymentKind::from_str(raw.trim()).map_err(|_| {
        ServiceError::InvalidInput(format!(
            "Unknown payment kind: {} (expected transport or teaching)",
            raw
        ))
    })
}

pub(crate) fn weekday_name(day: i16) -> &'static str {
    match day {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        _ => "unknown day",
    }
}

/// Aggregate result of one payroll run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRunSummary {
    /// Sum of the processed kind's allowance across all payroll rows for the
    /// week, read back after commit.
    pub total_amount: i64,
    /// Teachers touched by this invocation.
    pub teacher_count: u64,
    pub payment_date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PayrollResponse {
    pub payroll_id: i32,
    pub teacher_id: i32,
    pub teacher_name: Option<String>,
    pub week_number: i32,
    pub academic_year: i32,
    pub teaching_allowance: i32,
    pub transport_allowance: i32,
    pub bonus: i32,
    pub deduction: i32,
    pub total_amount: i32,
    pub payment_status: String,
    pub payment_date: Option<NaiveDate>,
}

#[derive(FromQueryResult)]
struct SumResult {
    total: Option<i64>,
}

const STATUS_PROCESSED: &str = "processed";

/// The payroll reconciler: turns weekly attendance eligibility into
/// idempotent payroll rows and append-only payment transactions.
///
/// All writes of one `process` call happen inside a single transaction; the
/// unique (teacher, week, year) index on payroll_weekly is what serializes
/// concurrent runs for the same key.
#[derive(Clone)]
pub struct PayrollService {
    db_pool: Arc<DbPool>,
    attendance: Arc<AttendanceService>,
    event_sender: Option<Arc<EventSender>>,
    enforce_payment_day: bool,
}

impl PayrollService {
    pub fn new(
        db_pool: Arc<DbPool>,
        attendance: Arc<AttendanceService>,
        event_sender: Option<Arc<EventSender>>,
        enforce_payment_day: bool,
    ) -> Self {
        Self {
            db_pool,
            attendance,
            event_sender,
            enforce_payment_day,
        }
    }

    /// Runs weekly payroll processing for one kind.
    ///
    /// `today` is the caller's wall-clock date and drives the weekday gate,
    /// even when backfilling a past week; that is the organization's
    /// payroll-cutoff policy. Re-running for the same (kind, week, year)
    /// overwrites payroll rows in place but appends fresh audit transactions.
    #[instrument(skip(self), fields(kind = %kind, week = week_number, year = academic_year))]
    pub async fn process(
        &self,
        kind: PaymentKind,
        week_number: i32,
        academic_year: i32,
        today: NaiveDate,
    ) -> Result<PayrollRunSummary, ServiceError> {
        validate_week_year(week_number, academic_year)?;

        let db = &*self.db_pool;

        let schedule = PaymentScheduleEntity::find()
            .filter(payment_schedule::Column::PaymentType.eq(kind.to_string()))
            .one(db)
            .await?;
        let scheduled_day = schedule
            .as_ref()
            .map(|s| s.scheduled_day)
            .unwrap_or_else(|| kind.default_scheduled_day());

        if self.enforce_payment_day {
            let today_day = today.weekday().num_days_from_sunday() as i16;
            if today_day != scheduled_day {
                return Err(ServiceError::SchedulingViolation(format!(
                    "{} payments can only be processed on {}",
                    kind,
                    weekday_name(scheduled_day)
                )));
            }
        }

        let eligible = self
            .attendance
            .eligible_teachers(week_number, academic_year)
            .await?;
        if eligible.is_empty() {
            info!("No eligible teachers; nothing to process");
            return Ok(PayrollRunSummary {
                total_amount: 0,
                teacher_count: 0,
                payment_date: today,
            });
        }

        let default_amount = schedule.as_ref().map(|s| s.default_amount);

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start payroll transaction");
            ServiceError::DatabaseError(e)
        })?;

        let teachers = TeacherEntity::find()
            .filter(teacher::Column::TeacherId.is_in(eligible.clone()))
            .all(&txn)
            .await?;

        let mut payments: Vec<(i32, i32, String)> = Vec::with_capacity(teachers.len());
        for t in &teachers {
            let amount = kind
                .allowance_of(t)
                .or(default_amount)
                .unwrap_or_default();
            self.upsert_payroll_row(&txn, kind, t.teacher_id, week_number, academic_year, amount, today)
                .await?;
            let reference = self
                .append_transaction(
                    &txn,
                    kind,
                    t.teacher_id,
                    week_number,
                    academic_year,
                    amount,
                    scheduled_day,
                    today,
                )
                .await?;
            payments.push((t.teacher_id, amount, reference));
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit payroll transaction");
            ServiceError::DatabaseError(e)
        })?;

        let total_amount = self
            .sum_kind_for_week(kind, week_number, academic_year)
            .await?;
        let teacher_count = teachers.len() as u64;

        info!(
            teacher_count,
            total_amount,
            payment_date = %today,
            "Payroll run committed"
        );

        if let Some(event_sender) = &self.event_sender {
            for (teacher_id, amount, reference_number) in &payments {
                if let Err(e) = event_sender
                    .send(Event::PaymentRecorded {
                        teacher_id: *teacher_id,
                        amount: *amount,
                        reference_number: reference_number.clone(),
                    })
                    .await
                {
                    warn!(error = %e, "Failed to send payment recorded event");
                }
            }
            if let Err(e) = event_sender
                .send(Event::PayrollProcessed {
                    kind: kind.to_string(),
                    week_number,
                    academic_year,
                    teacher_count,
                    total_amount,
                    payment_date: today,
                })
                .await
            {
                warn!(error = %e, "Failed to send payroll processed event");
            }
        }

        Ok(PayrollRunSummary {
            total_amount,
            teacher_count,
            payment_date: today,
        })
    }

    /// Insert-or-update of the unique (teacher, week, year) payroll row.
    ///
    /// Only the processed kind's field is overwritten; the other kind and any
    /// bonus/deduction survive, and the stored total is recomputed from the
    /// post-write fields.
    async fn upsert_payroll_row(
        &self,
        txn: &DatabaseTransaction,
        kind: PaymentKind,
        teacher_id: i32,
        week_number: i32,
        academic_year: i32,
        amount: i32,
        today: NaiveDate,
    ) -> Result<(), ServiceError> {
        let now = Utc::now();
        let existing = PayrollEntity::find()
            .filter(payroll_record::Column::TeacherId.eq(teacher_id))
            .filter(payroll_record::Column::WeekNumber.eq(week_number))
            .filter(payroll_record::Column::AcademicYear.eq(academic_year))
            .one(txn)
            .await?;

        match existing {
            Some(row) => {
                let (teaching, transport) = match kind {
                    PaymentKind::Teaching => (amount, row.transport_allowance),
                    PaymentKind::Transport => (row.teaching_allowance, amount),
                };
                let total = teaching + transport + row.bonus - row.deduction;

                let mut active: payroll_record::ActiveModel = row.into();
                match kind {
                    PaymentKind::Teaching => active.teaching_allowance = Set(amount),
                    PaymentKind::Transport => active.transport_allowance = Set(amount),
                }
                active.total_amount = Set(total);
                active.payment_status = Set(STATUS_PROCESSED.to_string());
                active.payment_date = Set(Some(today));
                active.processed_date = Set(Some(now));
                active.update(txn).await?;
            }
            None => {
                let (teaching, transport) = match kind {
                    PaymentKind::Teaching => (amount, 0),
                    PaymentKind::Transport => (0, amount),
                };
                let model = payroll_record::ActiveModel {
                    teacher_id: Set(teacher_id),
                    week_number: Set(week_number),
                    academic_year: Set(academic_year),
                    teaching_allowance: Set(teaching),
                    transport_allowance: Set(transport),
                    bonus: Set(0),
                    deduction: Set(0),
                    total_amount: Set(teaching + transport),
                    payment_status: Set(STATUS_PROCESSED.to_string()),
                    payment_date: Set(Some(today)),
                    processed_date: Set(Some(now)),
                    ..Default::default()
                };
                model.insert(txn).await?;
            }
        }

        Ok(())
    }

    /// Appends one audit transaction row. The reference number carries kind,
    /// teacher, week and timestamp plus a nonce, unique by construction and
    /// backed by the unique column index.
    #[allow(clippy::too_many_arguments)]
    async fn append_transaction(
        &self,
        txn: &DatabaseTransaction,
        kind: PaymentKind,
        teacher_id: i32,
        week_number: i32,
        academic_year: i32,
        amount: i32,
        scheduled_day: i16,
        today: NaiveDate,
    ) -> Result<String, ServiceError> {
        let now = Utc::now();
        let nonce = Uuid::new_v4().simple().to_string();
        let reference_number = format!(
            "PAY-{}-T{}-W{:02}{}-{}-{}",
            kind.reference_code(),
            teacher_id,
            week_number,
            academic_year,
            now.timestamp_millis(),
            &nonce[..8]
        );

        let model = payment_transaction::ActiveModel {
            teacher_id: Set(teacher_id),
            amount: Set(amount),
            payment_type: Set(kind.transaction_payment_type().to_string()),
            payment_date: Set(today),
            scheduled_day: Set(scheduled_day),
            reference_number: Set(reference_number.clone()),
            created_at: Set(now),
            ..Default::default()
        };
        model.insert(txn).await?;

        Ok(reference_number)
    }

    /// SUM of the processed kind's allowance across all payroll rows for the
    /// week, after commit.
    async fn sum_kind_for_week(
        &self,
        kind: PaymentKind,
        week_number: i32,
        academic_year: i32,
    ) -> Result<i64, ServiceError> {
        let result = PayrollEntity::find()
            .select_only()
            .column_as(kind.payroll_column().sum(), "total")
            .filter(payroll_record::Column::WeekNumber.eq(week_number))
            .filter(payroll_record::Column::AcademicYear.eq(academic_year))
            .into_model::<SumResult>()
            .one(&*self.db_pool)
            .await?;

        Ok(result.and_then(|r| r.total).unwrap_or(0))
    }

    /// Lists one week's payroll rows with teacher names.
    #[instrument(skip(self))]
    pub async fn list_week(
        &self,
        week_number: i32,
        academic_year: i32,
    ) -> Result<Vec<PayrollResponse>, ServiceError> {
        validate_week_year(week_number, academic_year)?;
        let rows: Vec<(PayrollModel, Option<TeacherModel>)> = PayrollEntity::find()
            .find_also_related(TeacherEntity)
            .filter(payroll_record::Column::WeekNumber.eq(week_number))
            .filter(payroll_record::Column::AcademicYear.eq(academic_year))
            .order_by_asc(payroll_record::Column::TeacherId)
            .all(&*self.db_pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(record, teacher)| PayrollResponse {
                payroll_id: record.payroll_id,
                teacher_id: record.teacher_id,
                teacher_name: teacher.map(|t| t.name),
                week_number: record.week_number,
                academic_year: record.academic_year,
                teaching_allowance: record.teaching_allowance,
                transport_allowance: record.transport_allowance,
                bonus: record.bonus,
                deduction: record.deduction,
                total_amount: record.total_amount,
                payment_status: record.payment_status,
                payment_date: record.payment_date,
            })
            .collect())
    }
}
