//! Task CRUD exposed as callable tools, mirroring the user toolset.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::internal::agent::tools::{
    envelope::ToolResponse,
    error::ToolResult,
    handlers::{parse_arguments, to_json_text},
    registry::ToolHandler,
    spec::{ToolParameters, ToolSpec},
};
use crate::internal::service::{CreateTask, TaskService, UpdateTask};

#[derive(Copy, Clone, Debug)]
enum TaskOp {
    Create,
    Get,
    List,
    Update,
    Delete,
}

pub struct TaskTool {
    op: TaskOp,
    service: Arc<TaskService>,
}

impl TaskTool {
    /// All task tools, in the order they are advertised.
    pub fn all(service: Arc<TaskService>) -> Vec<Arc<dyn ToolHandler>> {
        [
            TaskOp::Create,
            TaskOp::Get,
            TaskOp::List,
            TaskOp::Update,
            TaskOp::Delete,
        ]
        .into_iter()
        .map(|op| {
            Arc::new(TaskTool {
                op,
                service: service.clone(),
            }) as Arc<dyn ToolHandler>
        })
        .collect()
    }
}

#[derive(Deserialize)]
struct IdParams {
    id: i64,
}

#[derive(Deserialize)]
struct ListParams {
    status: Option<String>,
    limit: Option<u64>,
}

#[derive(Deserialize)]
struct UpdateParams {
    id: i64,
    title: Option<String>,
    description: Option<String>,
    status: Option<String>,
    assignee_id: Option<i64>,
}

#[async_trait]
impl ToolHandler for TaskTool {
    fn spec(&self) -> ToolSpec {
        match self.op {
            TaskOp::Create => ToolSpec::new(
                "create_task",
                "Create a task; status defaults to 'todo' when omitted",
            )
            .with_parameters(ToolParameters::object(
                [
                    ("title", "string", "Task title, must not be empty"),
                    ("description", "string", "Free-form description"),
                    ("status", "string", "One of todo, in_progress, done"),
                    ("assignee_id", "integer", "Id of an existing user"),
                ],
                [
                    ("title", true),
                    ("description", false),
                    ("status", false),
                    ("assignee_id", false),
                ],
            )),
            TaskOp::Get => ToolSpec::new("get_task", "Fetch a single task by id").with_parameters(
                ToolParameters::object([("id", "integer", "Task id")], [("id", true)]),
            ),
            TaskOp::List => ToolSpec::new(
                "list_tasks",
                "List tasks ordered by id, optionally filtered by status",
            )
            .with_parameters(ToolParameters::object(
                [
                    ("status", "string", "Filter: todo, in_progress or done"),
                    ("limit", "integer", "Maximum number of tasks to return"),
                ],
                [("status", false), ("limit", false)],
            )),
            TaskOp::Update => ToolSpec::new("update_task", "Update any subset of a task's fields")
                .with_parameters(ToolParameters::object(
                    [
                        ("id", "integer", "Task id"),
                        ("title", "string", "New title"),
                        ("description", "string", "New description"),
                        ("status", "string", "One of todo, in_progress, done"),
                        ("assignee_id", "integer", "Id of an existing user"),
                    ],
                    [
                        ("id", true),
                        ("title", false),
                        ("description", false),
                        ("status", false),
                        ("assignee_id", false),
                    ],
                )),
            TaskOp::Delete => ToolSpec::new("delete_task", "Delete a task by id").with_parameters(
                ToolParameters::object([("id", "integer", "Task id")], [("id", true)]),
            ),
        }
    }

    async fn call(&self, arguments: Value) -> ToolResult<ToolResponse> {
        match self.op {
            TaskOp::Create => {
                let input: CreateTask = parse_arguments(&arguments)?;
                let task = self.service.create(input).await?;
                Ok(ToolResponse::text(to_json_text(&task)?))
            }
            TaskOp::Get => {
                let params: IdParams = parse_arguments(&arguments)?;
                let task = self.service.get(params.id).await?;
                Ok(ToolResponse::text(to_json_text(&task)?))
            }
            TaskOp::List => {
                let params: ListParams = parse_arguments(&arguments)?;
                let tasks = self
                    .service
                    .list(params.status.as_deref(), params.limit)
                    .await?;
                Ok(ToolResponse::text(to_json_text(&tasks)?))
            }
            TaskOp::Update => {
                let params: UpdateParams = parse_arguments(&arguments)?;
                let input = UpdateTask {
                    title: params.title,
                    description: params.description,
                    status: params.status,
                    assignee_id: params.assignee_id,
                };
                let task = self.service.update(params.id, input).await?;
                Ok(ToolResponse::text(to_json_text(&task)?))
            }
            TaskOp::Delete => {
                let params: IdParams = parse_arguments(&arguments)?;
                self.service.delete(params.id).await?;
                Ok(ToolResponse::text(format!("deleted task {}", params.id)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::db;
    use serde_json::json;

    async fn tools() -> Vec<Arc<dyn ToolHandler>> {
        let db = db::connect_in_memory().await.unwrap();
        TaskTool::all(Arc::new(TaskService::new(db)))
    }

    fn find<'a>(tools: &'a [Arc<dyn ToolHandler>], name: &str) -> &'a Arc<dyn ToolHandler> {
        tools.iter().find(|t| t.spec().name == name).unwrap()
    }

    #[tokio::test]
    async fn advertises_all_five_operations() {
        let tools = tools().await;
        let names: Vec<String> = tools.iter().map(|t| t.spec().name).collect();
        assert_eq!(
            names,
            vec!["create_task", "get_task", "list_tasks", "update_task", "delete_task"]
        );
    }

    #[tokio::test]
    async fn create_defaults_status_to_todo() {
        let tools = tools().await;
        let resp = find(&tools, "create_task")
            .call(json!({"title": "Write docs"}))
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_str(resp.first_text().unwrap()).unwrap();
        assert_eq!(body["status"], "todo");
    }

    #[tokio::test]
    async fn invalid_status_propagates_service_error() {
        let tools = tools().await;
        let err = find(&tools, "create_task")
            .call(json!({"title": "Bad", "status": "blocked"}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("blocked"));
    }

    #[tokio::test]
    async fn list_filters_by_status() {
        let tools = tools().await;
        find(&tools, "create_task")
            .call(json!({"title": "One"}))
            .await
            .unwrap();
        find(&tools, "create_task")
            .call(json!({"title": "Two"}))
            .await
            .unwrap();
        find(&tools, "update_task")
            .call(json!({"id": 2, "status": "done"}))
            .await
            .unwrap();

        let resp = find(&tools, "list_tasks")
            .call(json!({"status": "done"}))
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_str(resp.first_text().unwrap()).unwrap();
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["title"], "Two");
    }

    #[tokio::test]
    async fn delete_then_get_reports_not_found() {
        let tools = tools().await;
        find(&tools, "create_task")
            .call(json!({"title": "Ephemeral"}))
            .await
            .unwrap();
        find(&tools, "delete_task").call(json!({"id": 1})).await.unwrap();
        let err = find(&tools, "get_task").call(json!({"id": 1})).await.unwrap_err();
        assert_eq!(err.to_string(), "task 1 not found");
    }
}
