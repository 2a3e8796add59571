use crate::{
    db::DbPool,
    entities::teacher::{self, Entity as TeacherEntity, Model as TeacherModel},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use strum::{Display, EnumString};
use tracing::{info, instrument, warn};
use validator::Validate;

/// Lifecycle status of a teacher. Teachers are never hard-deleted; removal
/// flips the status to `inactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum TeacherStatus {
    Active,
    Inactive,
    OnLeave,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTeacherRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 20, message = "Phone must be between 1 and 20 characters"))]
    pub phone: String,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: Option<String>,
    pub teaching_allowance: Option<i32>,
    pub transport_allowance: Option<i32>,
    pub status: Option<String>,
    pub date_joined: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateTeacherRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20, message = "Phone must be between 1 and 20 characters"))]
    pub phone: Option<String>,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: Option<String>,
    pub teaching_allowance: Option<i32>,
    pub transport_allowance: Option<i32>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TeacherResponse {
    pub teacher_id: i32,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub teaching_allowance: Option<i32>,
    pub transport_allowance: Option<i32>,
    pub status: String,
    pub date_joined: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn parse_status(raw: &str) -> Result<TeacherStatus, ServiceError> {
    TeacherStatus::from_str(raw).map_err(|_| {
        ServiceError::InvalidInput(format!(
            "Unknown teacher status: {} (expected active, inactive or on-leave)",
            raw
        ))
    })
}

/// Service for managing the teacher registry
#[derive(Clone)]
pub struct TeacherService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl TeacherService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Registers a new teacher.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_teacher(
        &self,
        request: CreateTeacherRequest,
    ) -> Result<TeacherResponse, ServiceError> {
        request.validate()?;
        let status = match request.status.as_deref() {
            Some(raw) => parse_status(raw)?,
            None => TeacherStatus::Active,
        };

        let db = &*self.db_pool;
        let now = Utc::now();

        let model = teacher::ActiveModel {
            name: Set(request.name),
            phone: Set(request.phone),
            email: Set(request.email),
            teaching_allowance: Set(request.teaching_allowance),
            transport_allowance: Set(request.transport_allowance),
            status: Set(status.to_string()),
            date_joined: Set(request.date_joined.unwrap_or_else(|| now.date_naive())),
            notes: Set(request.notes),
            created_at: Set(now),
            ..Default::default()
        };

        let created = model.insert(db).await?;
        info!(teacher_id = created.teacher_id, "Teacher registered");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::TeacherRegistered(created.teacher_id))
                .await
            {
                warn!(error = %e, "Failed to send teacher registered event");
            }
        }

        Ok(model_to_response(created))
    }

    /// Retrieves a teacher by ID.
    #[instrument(skip(self))]
    pub async fn get_teacher(&self, teacher_id: i32) -> Result<Option<TeacherResponse>, ServiceError> {
        let teacher = TeacherEntity::find_by_id(teacher_id)
            .one(&*self.db_pool)
            .await?;
        Ok(teacher.map(model_to_response))
    }

    /// Lists all teachers ordered by ID.
    #[instrument(skip(self))]
    pub async fn list_teachers(&self) -> Result<Vec<TeacherResponse>, ServiceError> {
        let teachers = TeacherEntity::find()
            .order_by_asc(teacher::Column::TeacherId)
            .all(&*self.db_pool)
            .await?;
        Ok(teachers.into_iter().map(model_to_response).collect())
    }

    /// Applies admin edits to a teacher record.
    #[instrument(skip(self, request))]
    pub async fn update_teacher(
        &self,
        teacher_id: i32,
        request: UpdateTeacherRequest,
    ) -> Result<TeacherResponse, ServiceError> {
        request.validate()?;
        let status = request.status.as_deref().map(parse_status).transpose()?;

        let db = &*self.db_pool;
        let teacher = TeacherEntity::find_by_id(teacher_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Teacher with ID {} not found", teacher_id))
            })?;

        let mut active: teacher::ActiveModel = teacher.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(phone) = request.phone {
            active.phone = Set(phone);
        }
        if let Some(email) = request.email {
            active.email = Set(Some(email));
        }
        if let Some(amount) = request.teaching_allowance {
            active.teaching_allowance = Set(Some(amount));
        }
        if let Some(amount) = request.transport_allowance {
            active.transport_allowance = Set(Some(amount));
        }
        if let Some(status) = status {
            active.status = Set(status.to_string());
        }
        if let Some(notes) = request.notes {
            active.notes = Set(Some(notes));
        }

        let updated = active.update(db).await?;
        info!(teacher_id, "Teacher updated");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::TeacherUpdated(teacher_id)).await {
                warn!(error = %e, "Failed to send teacher updated event");
            }
        }

        Ok(model_to_response(updated))
    }

    /// Deactivates a teacher. This is the only removal path: records are
    /// never hard-deleted because payroll and attendance history reference
    /// them.
    #[instrument(skip(self))]
    pub async fn deactivate_teacher(&self, teacher_id: i32) -> Result<TeacherResponse, ServiceError> {
        let db = &*self.db_pool;
        let teacher = TeacherEntity::find_by_id(teacher_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Teacher with ID {} not found", teacher_id))
            })?;

        let mut active: teacher::ActiveModel = teacher.into();
        active.status = Set(TeacherStatus::Inactive.to_string());
        let updated = active.update(db).await?;
        info!(teacher_id, "Teacher deactivated");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::TeacherDeactivated(teacher_id))
                .await
            {
                warn!(error = %e, "Failed to send teacher deactivated event");
            }
        }

        Ok(model_to_response(updated))
    }

    /// Lists active teachers only.
    pub async fn list_active(&self) -> Result<Vec<TeacherResponse>, ServiceError> {
        let teachers = TeacherEntity::find()
            .filter(teacher::Column::Status.eq(TeacherStatus::Active.to_string()))
            .order_by_asc(teacher::Column::TeacherId)
            .all(&*self.db_pool)
            .await?;
        Ok(teachers.into_iter().map(model_to_response).collect())
    }
}

fn model_to_response(model: TeacherModel) -> TeacherResponse {
    TeacherResponse {
        teacher_id: model.teacher_id,
        name: model.name,
        phone: model.phone,
        email: model.email,
        teaching_allowance: model.teaching_allowance,
        transport_allowance: model.transport_allowance,
        status: model.status,
        date_joined: model.date_joined,
        notes: model.notes,
        created_at: model.created_at,
    }
}
