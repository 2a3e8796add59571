use crate::entities::timetable_entry::Model as TimetableModel;
use crate::handlers::AppState;
use crate::services::timetable::CreateTimetableEntryRequest;
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

pub fn timetable_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_entry))
        .route("/week/:week", get(list_week))
}

async fn create_entry(
    State(state): State<AppState>,
    Json(request): Json<CreateTimetableEntryRequest>,
) -> ApiResult<TimetableModel> {
    let entry = state.services.timetable.create_entry(request).await?;
    Ok(Json(ApiResponse::success(entry)))
}

async fn list_week(
    State(state): State<AppState>,
    Path(week): Path<i32>,
    Query(query): Query<WeekQuery>,
) -> ApiResult<Vec<TimetableModel>> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let entries = state.services.timetable.list_week(week, year).await?;
    Ok(Json(ApiResponse::success(entries)))
}
