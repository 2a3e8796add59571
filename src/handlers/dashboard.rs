use crate::handlers::AppState;
use crate::services::dashboard::{week_of, DashboardStats};
use crate::{ApiResponse, ApiResult};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub week: Option<i32>,
    pub year: Option<i32>,
}

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/stats", get(stats))
}

async fn stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> ApiResult<DashboardStats> {
    let today = Utc::now().date_naive();
    let week = query.week.unwrap_or_else(|| week_of(today));
    let year = query.year.unwrap_or_else(|| today.year());
    let stats = state.services.dashboard.stats(week, year).await?;
    Ok(Json(ApiResponse::success(stats)))
}
