//! User CRUD exposed as callable tools.
//!
//! One handler struct parameterized by operation, so every user tool shares
//! the same service handle and serialization conventions.

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
use crate::internal::service::{CreateUser, UpdateUser, UserService};

#[derive(Copy, Clone, Debug)]
enum UserOp {
    Create,
    Get,
    List,
    Update,
    Delete,
}

pub struct UserTool {
    op: UserOp,
    service: Arc<UserService>,
}

impl UserTool {
    /// All user tools, in the order they are advertised.
    pub fn all(service: Arc<UserService>) -> Vec<Arc<dyn ToolHandler>> {
        [
            UserOp::Create,
            UserOp::Get,
            UserOp::List,
            UserOp::Update,
            UserOp::Delete,
        ]
        .into_iter()
        .map(|op| {
            Arc::new(UserTool {
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
    limit: Option<u64>,
}

#[derive(Deserialize)]
struct UpdateParams {
    id: i64,
    name: Option<String>,
    email: Option<String>,
}

#[async_trait]
impl ToolHandler for UserTool {
    fn spec(&self) -> ToolSpec {
        match self.op {
            UserOp::Create => ToolSpec::new("create_user", "Create a user with a name and a unique email")
                .with_parameters(ToolParameters::object(
                    [
                        ("name", "string", "Display name, must not be empty"),
                        ("email", "string", "Email address, unique across users"),
                    ],
                    [("name", true), ("email", true)],
                )),
            UserOp::Get => ToolSpec::new("get_user", "Fetch a single user by id").with_parameters(
                ToolParameters::object([("id", "integer", "User id")], [("id", true)]),
            ),
            UserOp::List => ToolSpec::new("list_users", "List users ordered by id").with_parameters(
                ToolParameters::object(
                    [("limit", "integer", "Maximum number of users to return")],
                    [("limit", false)],
                ),
            ),
            UserOp::Update => ToolSpec::new("update_user", "Update a user's name and/or email")
                .with_parameters(ToolParameters::object(
                    [
                        ("id", "integer", "User id"),
                        ("name", "string", "New display name"),
                        ("email", "string", "New email address"),
                    ],
                    [("id", true), ("name", false), ("email", false)],
                )),
            UserOp::Delete => ToolSpec::new("delete_user", "Delete a user by id").with_parameters(
                ToolParameters::object([("id", "integer", "User id")], [("id", true)]),
            ),
        }
    }

    async fn call(&self, arguments: Value) -> ToolResult<ToolResponse> {
        match self.op {
            UserOp::Create => {
                let input: CreateUser = parse_arguments(&arguments)?;
                let user = self.service.create(input).await?;
                Ok(ToolResponse::text(to_json_text(&user)?))
            }
            UserOp::Get => {
                let params: IdParams = parse_arguments(&arguments)?;
                let user = self.service.get(params.id).await?;
                Ok(ToolResponse::text(to_json_text(&user)?))
            }
            UserOp::List => {
                let params: ListParams = parse_arguments(&arguments)?;
                let users = self.service.list(params.limit).await?;
                Ok(ToolResponse::text(to_json_text(&users)?))
            }
            UserOp::Update => {
                let params: UpdateParams = parse_arguments(&arguments)?;
                let input = UpdateUser {
                    name: params.name,
                    email: params.email,
                };
                let user = self.service.update(params.id, input).await?;
                Ok(ToolResponse::text(to_json_text(&user)?))
            }
            UserOp::Delete => {
                let params: IdParams = parse_arguments(&arguments)?;
                self.service.delete(params.id).await?;
                Ok(ToolResponse::text(format!("deleted user {}", params.id)))
            }
        }
    }
}
