use crate::handlers::AppState;
use crate::services::teachers::{CreateTeacherRequest, TeacherResponse, UpdateTeacherRequest};
use crate::{ApiResponse, ApiResult};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

#[derive(Debug, Serialize, Deserialize)]
pub struct AssignSubjectRequest {
    pub subject_name: String,
}

pub fn teacher_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_teachers).post(create_teacher))
        .route("/:id", get(get_teacher).put(update_teacher))
        .route("/:id/deactivate", post(deactivate_teacher))
        .route("/:id/subjects", post(assign_subject))
}

async fn list_teachers(State(state): State<AppState>) -> ApiResult<Vec<TeacherResponse>> {
    let teachers = state.services.teachers.list_teachers().await?;
    Ok(Json(ApiResponse::success(teachers)))
}

async fn create_teacher(
    State(state): State<AppState>,
    Json(request): Json<CreateTeacherRequest>,
) -> ApiResult<TeacherResponse> {
    let teacher = state.services.teachers.create_teacher(request).await?;
    Ok(Json(ApiResponse::success(teacher)))
}

async fn get_teacher(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<TeacherResponse> {
    let teacher = state
        .services
        .teachers
        .get_teacher(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Teacher with ID {} not found", id)))?;
    Ok(Json(ApiResponse::success(teacher)))
}

async fn update_teacher(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateTeacherRequest>,
) -> ApiResult<TeacherResponse> {
    let teacher = state.services.teachers.update_teacher(id, request).await?;
    Ok(Json(ApiResponse::success(teacher)))
}

async fn deactivate_teacher(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<TeacherResponse> {
    let teacher = state.services.teachers.deactivate_teacher(id).await?;
    Ok(Json(ApiResponse::success(teacher)))
}

async fn assign_subject(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<AssignSubjectRequest>,
) -> ApiResult<crate::entities::subject::Model> {
    let subject = state
        .services
        .subjects
        .assign_to_teacher(id, &request.subject_name)
        .await?;
    Ok(Json(ApiResponse::success(subject)))
}
