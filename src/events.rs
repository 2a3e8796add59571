use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Events emitted by the service layer after successful commits.
///
/// Delivery is best-effort: a send failure is logged by the caller and never
/// fails the originating request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    TeacherRegistered(i32),
    TeacherUpdated(i32),
    TeacherDeactivated(i32),
    AttendanceRecorded {
        teacher_id: i32,
        week_number: i32,
        academic_year: i32,
        status: String,
    },
    TimetableEntryCreated(i32),
    PayrollProcessed {
        kind: String,
        week_number: i32,
        academic_year: i32,
        teacher_count: u64,
        total_amount: i64,
        payment_date: NaiveDate,
    },
    PaymentRecorded {
        teacher_id: i32,
        amount: i32,
        reference_number: String,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel, logging each event. Runs until every sender is
/// dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    info!("Event processor started");
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::PayrollProcessed {
                kind,
                week_number,
                academic_year,
                teacher_count,
                total_amount,
                payment_date,
            } => {
                info!(
                    kind = %kind,
                    week_number,
                    academic_year,
                    teacher_count,
                    total_amount,
                    payment_date = %payment_date,
                    "Payroll run committed"
                );
            }
            other => debug!(event = ?other, "Event processed"),
        }
    }
    info!("Event processor stopped; channel closed");
}
