use crate::handlers::AppState;
use crate::services::attendance::{AttendanceResponse, RecordAttendanceRequest};
use crate::{ApiResponse, ApiResult};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    pub year: Option<i32>,
}

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(record_attendance))
        .route("/week/:week", get(list_week))
}

async fn record_attendance(
    State(state): State<AppState>,
    Json(request): Json<RecordAttendanceRequest>,
) -> ApiResult<AttendanceResponse> {
    let record = state.services.attendance.record_attendance(request).await?;
    Ok(Json(ApiResponse::success(record)))
}

async fn list_week(
    State(state): State<AppState>,
    Path(week): Path<i32>,
    Query(query): Query<WeekQuery>,
) -> ApiResult<Vec<AttendanceResponse>> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let records = state.services.attendance.list_week(week, year).await?;
    Ok(Json(ApiResponse::success(records)))
}
