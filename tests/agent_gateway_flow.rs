//! End-to-end flow through the agent surface: registry construction, tool
//! advertisement, and dispatch of CRUD calls against a real (in-memory)
//! database, all through the JSON-RPC frame handler.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};

use taskdeck::internal::{
    agent::{
        AgentServer,
        tools::{
            DispatchGateway, ToolRegistryBuilder,
            handlers::{tasks::TaskTool, users::UserTool},
        },
    },
    db,
    service::{TaskService, UserService},
};

async fn server() -> AgentServer {
    let db = db::connect_in_memory().await.unwrap();
    let users = Arc::new(UserService::new(db.clone()));
    let tasks = Arc::new(TaskService::new(db));
    let registry = ToolRegistryBuilder::new()
        .register_all(UserTool::all(users))
        .unwrap()
        .register_all(TaskTool::all(tasks))
        .unwrap()
        .build();
    AgentServer::new(DispatchGateway::new(
        Arc::new(registry),
        Duration::from_secs(5),
    ))
}

async fn call(server: &AgentServer, id: u64, method: &str, params: Value) -> Value {
    let frame = json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    });
    let raw = server.handle_line(&frame.to_string()).await.unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn envelope_json(response: &Value) -> Value {
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}

#[tokio::test]
async fn initialize_then_list_then_crud_round_trip() {
    let server = server().await;

    let init = call(&server, 1, "initialize", json!({})).await;
    assert_eq!(init["result"]["capabilities"]["tools"], json!({}));

    let list = call(&server, 2, "tools/list", json!({})).await;
    let tools = list["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 10);
    // Registration order is stable: user tools first, then task tools.
    assert_eq!(tools[0]["name"], "create_user");
    assert_eq!(tools[5]["name"], "create_task");
    assert_eq!(tools[0]["inputSchema"]["required"], json!(["name", "email"]));

    let created = call(
        &server,
        3,
        "tools/call",
        json!({"name": "create_user", "arguments": {"name": "Ada", "email": "ada@example.com"}}),
    )
    .await;
    assert_eq!(created["result"]["isError"], false);
    let user = envelope_json(&created);
    assert_eq!(user["name"], "Ada");
    let user_id = user["id"].as_i64().unwrap();

    let task = call(
        &server,
        4,
        "tools/call",
        json!({"name": "create_task", "arguments": {
            "title": "Ship the release",
            "assignee_id": user_id,
        }}),
    )
    .await;
    let task = envelope_json(&task);
    assert_eq!(task["status"], "todo");
    assert_eq!(task["assignee_id"], user_id);

    let done = call(
        &server,
        5,
        "tools/call",
        json!({"name": "update_task", "arguments": {"id": task["id"], "status": "done"}}),
    )
    .await;
    assert_eq!(envelope_json(&done)["status"], "done");

    let listed = call(
        &server,
        6,
        "tools/call",
        json!({"name": "list_tasks", "arguments": {"status": "done"}}),
    )
    .await;
    let listed = envelope_json(&listed);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn handler_failures_come_back_as_envelopes_not_rpc_errors() {
    let server = server().await;

    // Domain failure: the call itself succeeds at the protocol level.
    let missing = call(
        &server,
        1,
        "tools/call",
        json!({"name": "get_user", "arguments": {"id": 404}}),
    )
    .await;
    assert!(missing.get("error").is_none());
    assert_eq!(missing["result"]["isError"], true);
    let text = missing["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("user 404 not found"));

    // Routing failure: structured error, no envelope at all.
    let unknown = call(
        &server,
        2,
        "tools/call",
        json!({"name": "frobnicate", "arguments": {}}),
    )
    .await;
    assert_eq!(unknown["error"]["code"], -32601);
    assert!(unknown.get("result").is_none());
}

#[tokio::test]
async fn omitted_arguments_default_to_an_empty_object() {
    let server = server().await;
    let listed = call(&server, 1, "tools/call", json!({"name": "list_users"})).await;
    assert_eq!(listed["result"]["isError"], false);
    assert_eq!(envelope_json(&listed), json!([]));
}

#[tokio::test]
async fn both_surfaces_share_the_same_rules() {
    // The duplicate-email rule enforced over HTTP also binds tool calls.
    let server = server().await;
    for id in 1..=2 {
        let resp = call(
            &server,
            id,
            "tools/call",
            json!({"name": "create_user", "arguments": {"name": "Ada", "email": "ada@example.com"}}),
        )
        .await;
        if id == 1 {
            assert_eq!(resp["result"]["isError"], false);
        } else {
            assert_eq!(resp["result"]["isError"], true);
            let text = resp["result"]["content"][0]["text"].as_str().unwrap();
            assert!(text.contains("ada@example.com"));
        }
    }
}
