pub mod attendance;
pub mod dashboard;
pub mod payroll;
pub mod subjects;
pub mod teachers;
pub mod timetable;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub teachers: Arc<crate::services::teachers::TeacherService>,
    pub subjects: Arc<crate::services::subjects::SubjectService>,
    pub timetable: Arc<crate::services::timetable::TimetableService>,
    pub attendance: Arc<crate::services::attendance::AttendanceService>,
    pub payroll: Arc<crate::services::payroll::PayrollService>,
    pub dashboard: Arc<crate::services::dashboard::DashboardService>,
}

impl AppServices {
    /// Build the service container shared by all handlers.
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        enforce_payment_day: bool,
    ) -> Self {
        let teachers = Arc::new(crate::services::teachers::TeacherService::new(
            db_pool.clone(),
            Some(event_sender.clone()),
        ));
        let subjects = Arc::new(crate::services::subjects::SubjectService::new(
            db_pool.clone(),
        ));
        let timetable = Arc::new(crate::services::timetable::TimetableService::new(
            db_pool.clone(),
            Some(event_sender.clone()),
        ));
        let attendance = Arc::new(crate::services::attendance::AttendanceService::new(
            db_pool.clone(),
            Some(event_sender.clone()),
        ));
        let payroll = Arc::new(crate::services::payroll::PayrollService::new(
            db_pool.clone(),
            attendance.clone(),
            Some(event_sender),
            enforce_payment_day,
        ));
        let dashboard = Arc::new(crate::services::dashboard::DashboardService::new(db_pool));

        Self {
            teachers,
            subjects,
            timetable,
            attendance,
            payroll,
            dashboard,
        }
    }
}
