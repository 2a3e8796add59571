// Core services
pub mod attendance;
pub mod payroll;

// Registry and scheduling
pub mod subjects;
pub mod teachers;
pub mod timetable;

// Read-only rollups
pub mod dashboard;

use crate::errors::ServiceError;

/// Shared week/year validation: rejected before any store access.
pub(crate) fn validate_week_year(week_number: i32, academic_year: i32) -> Result<(), ServiceError> {
    if !(1..=53).contains(&week_number) {
        return Err(ServiceError::ValidationError(format!(
            "week_number must be between 1 and 53, got {}",
            week_number
        )));
    }
    if !(1000..=9999).contains(&academic_year) {
        return Err(ServiceError::ValidationError(format!(
            "academic_year must be a 4-digit year, got {}",
            academic_year
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_year_bounds() {
        assert!(validate_week_year(1, 2025).is_ok());
        assert!(validate_week_year(53, 2025).is_ok());
        assert!(validate_week_year(0, 2025).is_err());
        assert!(validate_week_year(54, 2025).is_err());
        assert!(validate_week_year(10, 999).is_err());
        assert!(validate_week_year(10, 10000).is_err());
    }
}
