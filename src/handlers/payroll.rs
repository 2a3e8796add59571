use crate::handlers::AppState;
use crate::services::payroll::{PaymentKind, PayrollResponse, PayrollRunSummary};
use crate::{ApiResponse, ApiResult};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    pub year: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessPayrollRequest {
    pub week_number: i32,
    pub academic_year: Option<i32>,
}

pub fn payroll_routes() -> Router<AppState> {
    Router::new()
        .route("/week/:week", get(list_week))
        .route("/process/transport", post(process_transport))
        .route("/process/weekly", post(process_teaching))
}

async fn list_week(
    State(state): State<AppState>,
    Path(week): Path<i32>,
    Query(query): Query<WeekQuery>,
) -> ApiResult<Vec<PayrollResponse>> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let rows = state.services.payroll.list_week(week, year).await?;
    Ok(Json(ApiResponse::success(rows)))
}

/// Sunday transport payments.
async fn process_transport(
    State(state): State<AppState>,
    Json(request): Json<ProcessPayrollRequest>,
) -> ApiResult<PayrollRunSummary> {
    process(state, PaymentKind::Transport, request).await
}

/// Friday weekly (teaching) payments.
async fn process_teaching(
    State(state): State<AppState>,
    Json(request): Json<ProcessPayrollRequest>,
) -> ApiResult<PayrollRunSummary> {
    process(state, PaymentKind::Teaching, request).await
}

async fn process(
    state: AppState,
    kind: PaymentKind,
    request: ProcessPayrollRequest,
) -> ApiResult<PayrollRunSummary> {
    // The weekday gate keys off the caller's wall-clock date
    let today = Utc::now().date_naive();
    let year = request.academic_year.unwrap_or_else(|| today.year());
    let summary = state
        .services
        .payroll
        .process(kind, request.week_number, year, today)
        .await?;
    Ok(Json(ApiResponse::success(summary)))
}
