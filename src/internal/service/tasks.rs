//! CRUD service for the `tasks` entity.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::Deserialize;

use super::error::{ServiceError, ServiceResult};
use crate::internal::model::{
    task::{self, TaskStatus},
    user,
};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    /// Defaults to `todo` when omitted.
    pub status: Option<String>,
    pub assignee_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub assignee_id: Option<i64>,
}

pub struct TaskService {
    db: DatabaseConnection,
}

impl TaskService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: CreateTask) -> ServiceResult<task::Model> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(ServiceError::Validation("task title must not be empty".into()));
        }
        let status = match input.status.as_deref() {
            Some(raw) => parse_status(raw)?,
            None => TaskStatus::Todo,
        };
        if let Some(assignee) = input.assignee_id {
            self.ensure_user_exists(assignee).await?;
        }

        let now = chrono::Utc::now();
        let model = task::ActiveModel {
            title: Set(title.to_string()),
            description: Set(input.description),
            status: Set(status.as_str().to_string()),
            assignee_id: Set(input.assignee_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<task::Model> {
        task::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("task", id))
    }

    /// List tasks, optionally filtered by status, ordered by id.
    pub async fn list(
        &self,
        status: Option<&str>,
        limit: Option<u64>,
    ) -> ServiceResult<Vec<task::Model>> {
        let mut query = task::Entity::find().order_by_asc(task::Column::Id);
        if let Some(raw) = status {
            let status = parse_status(raw)?;
            query = query.filter(task::Column::Status.eq(status.as_str()));
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        Ok(query.all(&self.db).await?)
    }

    pub async fn update(&self, id: i64, input: UpdateTask) -> ServiceResult<task::Model> {
        let current = self.get(id).await?;
        let mut active: task::ActiveModel = current.into();

        if let Some(title) = input.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(ServiceError::Validation("task title must not be empty".into()));
            }
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(raw) = input.status {
            let status = parse_status(&raw)?;
            active.status = Set(status.as_str().to_string());
        }
        if let Some(assignee) = input.assignee_id {
            self.ensure_user_exists(assignee).await?;
            active.assignee_id = Set(Some(assignee));
        }
        active.updated_at = Set(chrono::Utc::now());
        Ok(active.update(&self.db).await?)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let result = task::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("task", id));
        }
        Ok(())
    }

    async fn ensure_user_exists(&self, id: i64) -> ServiceResult<()> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or_else(|| ServiceError::not_found("user", id))
    }
}

fn parse_status(raw: &str) -> ServiceResult<TaskStatus> {
    raw.parse()
        .map_err(|_| ServiceError::InvalidStatus(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::{db, service::users::{CreateUser, UserService}};

    async fn services() -> (TaskService, UserService) {
        let db = db::connect_in_memory().await.unwrap();
        (TaskService::new(db.clone()), UserService::new(db))
    }

    fn fix_bug() -> CreateTask {
        CreateTask {
            title: "Fix the login bug".into(),
            description: Some("Session cookie expires too early".into()),
            status: None,
            assignee_id: None,
        }
    }

    #[tokio::test]
    async fn create_defaults_to_todo() {
        let (tasks, _) = services().await;
        let created = tasks.create(fix_bug()).await.unwrap();
        assert_eq!(created.status, "todo");
        assert_eq!(created.created_at, created.updated_at);
    }

    #[tokio::test]
    async fn create_rejects_unknown_status() {
        let (tasks, _) = services().await;
        let err = tasks
            .create(CreateTask {
                status: Some("blocked".into()),
                ..fix_bug()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidStatus(_)));
    }

    #[tokio::test]
    async fn create_rejects_missing_assignee() {
        let (tasks, _) = services().await;
        let err = tasks
            .create(CreateTask {
                assignee_id: Some(77),
                ..fix_bug()
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "user 77 not found");
    }

    #[tokio::test]
    async fn create_accepts_existing_assignee() {
        let (tasks, users) = services().await;
        let ada = users
            .create(CreateUser {
                name: "Ada".into(),
                email: "ada@example.com".into(),
            })
            .await
            .unwrap();
        let created = tasks
            .create(CreateTask {
                assignee_id: Some(ada.id),
                ..fix_bug()
            })
            .await
            .unwrap();
        assert_eq!(created.assignee_id, Some(ada.id));
    }

    #[tokio::test]
    async fn list_filters_by_status() {
        let (tasks, _) = services().await;
        tasks.create(fix_bug()).await.unwrap();
        let second = tasks
            .create(CreateTask {
                title: "Write docs".into(),
                description: None,
                status: None,
                assignee_id: None,
            })
            .await
            .unwrap();
        tasks
            .update(
                second.id,
                UpdateTask {
                    status: Some("done".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let done = tasks.list(Some("done"), None).await.unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, second.id);

        let err = tasks.list(Some("bogus"), None).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidStatus(_)));
    }

    #[tokio::test]
    async fn update_advances_status_and_touches_updated_at() {
        let (tasks, _) = services().await;
        let created = tasks.create(fix_bug()).await.unwrap();
        let updated = tasks
            .update(
                created.id,
                UpdateTask {
                    status: Some("in_progress".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, "in_progress");
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn delete_missing_task_is_not_found() {
        let (tasks, _) = services().await;
        assert!(matches!(
            tasks.delete(5).await.unwrap_err(),
            ServiceError::NotFound { .. }
        ));
    }
}
