//! Stdio JSON-RPC server loop.
//!
//! Reads one request per stdin line, writes one response per stdout line.
//! Stdout carries nothing but protocol frames; all diagnostics go through
//! `tracing`, which the binary routes to stderr.

use anyhow::Result;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::protocol::{
    AgentRequest, AgentResponse, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION,
    METHOD_NOT_FOUND, PARSE_ERROR, RpcError,
};
use super::tools::{DispatchGateway, ToolCallRequest};

pub struct AgentServer {
    gateway: DispatchGateway,
}

impl AgentServer {
    pub fn new(gateway: DispatchGateway) -> Self {
        Self { gateway }
    }

    /// Serve until stdin reaches EOF.
    pub async fn run(&self) -> Result<()> {
        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let mut lines = BufReader::new(stdin).lines();

        tracing::info!(tools = self.gateway.registry().len(), "agent serving on stdio");
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(&line).await {
                stdout.write_all(response.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
        }
        tracing::info!("stdin closed, agent shutting down");
        Ok(())
    }

    /// Process one frame. `None` means no response is owed (notification).
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let request: AgentRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!(error = %err, "unparseable frame");
                let resp = AgentResponse::failure(
                    Value::Null,
                    RpcError::new(PARSE_ERROR, format!("parse error: {err}")),
                );
                return serde_json::to_string(&resp).ok();
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            let id = request.id.clone().unwrap_or(Value::Null);
            let resp = AgentResponse::failure(
                id,
                RpcError::new(INVALID_REQUEST, "jsonrpc must be \"2.0\""),
            );
            return serde_json::to_string(&resp).ok();
        }

        if request.is_notification() {
            tracing::debug!(method = %request.method, "notification, no response");
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        let response = self.handle_request(request).await;
        let response = match response {
            Ok(result) => AgentResponse::success(id, result),
            Err(error) => AgentResponse::failure(id, error),
        };
        serde_json::to_string(&response).ok()
    }

    async fn handle_request(&self, request: AgentRequest) -> Result<Value, RpcError> {
        match request.method.as_str() {
            "initialize" => Ok(json!({
                "protocolVersion": "2025-03-26",
                "serverInfo": {
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION"),
                },
                "capabilities": { "tools": {} },
            })),
            "ping" => Ok(json!({})),
            "tools/list" => {
                let tools = self.gateway.registry().specs();
                Ok(json!({ "tools": tools }))
            }
            "tools/call" => {
                let call: ToolCallRequest = serde_json::from_value(request.params)
                    .map_err(|e| RpcError::new(INVALID_PARAMS, e.to_string()))?;
                match self.gateway.dispatch(call).await {
                    // A response that fails to serialize is our fault, not
                    // the caller's.
                    Ok(response) => serde_json::to_value(&response)
                        .map_err(|e| RpcError::new(INTERNAL_ERROR, e.to_string())),
                    // Routing failure: no envelope, a structured error instead.
                    Err(err) => Err(RpcError::new(err.code(), err.to_string())),
                }
            }
            other => Err(RpcError::new(
                METHOD_NOT_FOUND,
                format!("unknown method: {other}"),
            )),
        }
    }
}
