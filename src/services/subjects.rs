use crate::{
    db::DbPool,
    entities::subject::{self, Entity as SubjectEntity, Model as SubjectModel},
    entities::teacher::Entity as TeacherEntity,
    entities::teacher_subject::{self, Entity as TeacherSubjectEntity},
    errors::ServiceError,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Service for the subject catalogue and teacher-subject links.
///
/// Subjects have upsert-by-name semantics (created on first reference) and
/// are never deleted.
#[derive(Clone)]
pub struct SubjectService {
    db_pool: Arc<DbPool>,
}

impl SubjectService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists all subjects ordered by name.
    pub async fn list_subjects(&self) -> Result<Vec<SubjectModel>, ServiceError> {
        let subjects = SubjectEntity::find()
            .order_by_asc(subject::Column::SubjectName)
            .all(&*self.db_pool)
            .await?;
        Ok(subjects)
    }

    /// Returns the subject with the given name, creating it when absent.
    #[instrument(skip(self))]
    pub async fn find_or_create(&self, name: &str) -> Result<SubjectModel, ServiceError> {
        find_or_create_on(&*self.db_pool, name).await
    }

    /// Links a teacher to a subject (created on first reference). Linking an
    /// already-linked pair is a no-op, not an error.
    #[instrument(skip(self))]
    pub async fn assign_to_teacher(
        &self,
        teacher_id: i32,
        subject_name: &str,
    ) -> Result<SubjectModel, ServiceError> {
        let db = &*self.db_pool;

        TeacherEntity::find_by_id(teacher_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Teacher with ID {} not found", teacher_id))
            })?;

        let subject = find_or_create_on(db, subject_name).await?;

        let existing = TeacherSubjectEntity::find()
            .filter(teacher_subject::Column::TeacherId.eq(teacher_id))
            .filter(teacher_subject::Column::SubjectId.eq(subject.subject_id))
            .one(db)
            .await?;
        if existing.is_none() {
            let link = teacher_subject::ActiveModel {
                teacher_id: Set(teacher_id),
                subject_id: Set(subject.subject_id),
                ..Default::default()
            };
            link.insert(db).await?;
            info!(
                teacher_id,
                subject_id = subject.subject_id,
                "Subject assigned to teacher"
            );
        }

        Ok(subject)
    }
}

/// Upsert-by-name against any connection (pool or open transaction). A lost
/// insert race falls back to the row the winner created.
pub(crate) async fn find_or_create_on<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<SubjectModel, ServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::ValidationError(
            "subject name must not be empty".to_string(),
        ));
    }

    if let Some(existing) = SubjectEntity::find()
        .filter(subject::Column::SubjectName.eq(name))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    let model = subject::ActiveModel {
        subject_name: Set(name.to_string()),
        ..Default::default()
    };
    match model.insert(db).await {
        Ok(created) => Ok(created),
        Err(err) => {
            // Unique-name race: another writer inserted first
            if let Some(existing) = SubjectEntity::find()
                .filter(subject::Column::SubjectName.eq(name))
                .one(db)
                .await?
            {
                Ok(existing)
            } else {
                Err(ServiceError::DatabaseError(err))
            }
        }
    }
}
