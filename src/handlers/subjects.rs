use crate::handlers::AppState;
use crate::{ApiResponse, ApiResult};
use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSubjectRequest {
    pub subject_name: String,
}

pub fn subject_routes() -> Router<AppState> {
    Router::new().route("/", get(list_subjects).post(create_subject))
}

async fn list_subjects(
    State(state): State<AppState>,
) -> ApiResult<Vec<crate::entities::subject::Model>> {
    let subjects = state.services.subjects.list_subjects().await?;
    Ok(Json(ApiResponse::success(subjects)))
}

async fn create_subject(
    State(state): State<AppState>,
    Json(request): Json<CreateSubjectRequest>,
) -> ApiResult<crate::entities::subject::Model> {
    let subject = state
        .services
        .subjects
        .find_or_create(&request.subject_name)
        .await?;
    Ok(Json(ApiResponse::success(subject)))
}
