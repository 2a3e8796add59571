pub mod attendance_record;
pub mod payment_schedule;
pub mod payment_transaction;
pub mod payroll_record;
pub mod subject;
pub mod teacher;
pub mod teacher_subject;
pub mod timetable_entry;
