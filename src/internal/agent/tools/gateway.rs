//! Dispatch gateway: the single entry point turning a raw invocation
//! request into a normalized [`ToolResponse`], with bounded latency.
//!
//! Per call: registry lookup, then the handler raced against one
//! configurable timeout. Every handler failure and every timeout becomes a
//! failure envelope carrying message text only; the sole outcome that is
//! not an envelope is the routing error for an unregistered name, which is
//! surfaced structurally as [`DispatchError`] before the race starts.
//!
//! The gateway is stateless between calls; distinct dispatches are
//! independent and unordered.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::{
    envelope::ToolResponse,
    error::DispatchError,
    registry::ToolRegistry,
};

/// One invocation request: a tool name plus an optional arguments object.
/// Omitted arguments are treated as `{}`, not as a malformed request.
#[derive(Clone, Debug, Deserialize)]
pub struct ToolCallRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

impl ToolCallRequest {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments: Some(arguments),
        }
    }
}

pub struct DispatchGateway {
    registry: Arc<ToolRegistry>,
    /// Single time budget applied to every handler invocation.
    timeout: Duration,
}

impl DispatchGateway {
    pub fn new(registry: Arc<ToolRegistry>, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Dispatch one invocation.
    ///
    /// Returns `Err` only for the routing error (unknown name). Handler
    /// failures and timeouts always come back as `Ok` failure envelopes,
    /// so callers never see a handler's raised error directly.
    pub async fn dispatch(&self, request: ToolCallRequest) -> Result<ToolResponse, DispatchError> {
        let started = Instant::now();
        let call_id = Uuid::new_v4();

        let Some(handler) = self.registry.handler(&request.name) else {
            tracing::warn!(tool = %request.name, %call_id, "dispatch to unknown tool");
            return Err(DispatchError::UnknownTool(request.name));
        };

        let arguments = request
            .arguments
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));

        // Race the handler against the timer. When the timer wins, the
        // handler future is dropped, cancelling it at its next await point.
        let response = match tokio::time::timeout(self.timeout, handler.call(arguments)).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                // Message text only; internal error types stop here.
                tracing::warn!(tool = %request.name, %call_id, error = %err, "tool failed");
                ToolResponse::error(err.to_string())
            }
            Err(_elapsed) => {
                tracing::warn!(
                    tool = %request.name,
                    %call_id,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "tool timed out"
                );
                ToolResponse::error(format!(
                    "tool call timed out after {:.1}s",
                    self.timeout.as_secs_f64()
                ))
            }
        };

        tracing::debug!(
            tool = %request.name,
            %call_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            is_error = response.is_error,
            "tool dispatch finished"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::agent::tools::{
        error::{ToolError, ToolResult},
        registry::{ToolHandler, ToolRegistryBuilder},
        spec::ToolSpec,
    };
    use async_trait::async_trait;
    use serde_json::json;

    /// Returns its arguments serialized as compact JSON.
    struct EchoTool;

    #[async_trait]
    impl ToolHandler for EchoTool {
        fn spec(&self) -> ToolSpec {
            ToolSpec::new("echo", "Echo the arguments back as JSON")
        }

        async fn call(&self, arguments: Value) -> ToolResult<ToolResponse> {
            let text = serde_json::to_string(&arguments)
                .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
            Ok(ToolResponse::text(text))
        }
    }

    /// Always raises.
    struct BoomTool;

    #[async_trait]
    impl ToolHandler for BoomTool {
        fn spec(&self) -> ToolSpec {
            ToolSpec::new("boom", "Always fails")
        }

        async fn call(&self, _arguments: Value) -> ToolResult<ToolResponse> {
            Err(ToolError::ExecutionFailed("nope".to_string()))
        }
    }

    /// Sleeps far past any test timeout before answering.
    struct SlowTool;

    #[async_trait]
    impl ToolHandler for SlowTool {
        fn spec(&self) -> ToolSpec {
            ToolSpec::new("slow", "Sleeps before answering")
        }

        async fn call(&self, _arguments: Value) -> ToolResult<ToolResponse> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(ToolResponse::text("done"))
        }
    }

    fn gateway(timeout: Duration) -> DispatchGateway {
        let registry = ToolRegistryBuilder::new()
            .register(Arc::new(EchoTool))
            .unwrap()
            .register(Arc::new(BoomTool))
            .unwrap()
            .register(Arc::new(SlowTool))
            .unwrap()
            .build();
        DispatchGateway::new(Arc::new(registry), timeout)
    }

    #[tokio::test]
    async fn echo_passes_handler_envelope_through() {
        let gw = gateway(Duration::from_secs(1));
        let resp = gw
            .dispatch(ToolCallRequest::new("echo", json!({"a": 1})))
            .await
            .unwrap();
        assert!(!resp.is_error);
        assert_eq!(resp.first_text(), Some(r#"{"a":1}"#));
    }

    #[tokio::test]
    async fn unknown_tool_is_a_routing_error_not_an_envelope() {
        let gw = gateway(Duration::from_secs(1));
        let err = gw
            .dispatch(ToolCallRequest::new("nonexistent", json!({})))
            .await
            .unwrap_err();
        assert_eq!(err, DispatchError::UnknownTool("nonexistent".into()));
    }

    #[tokio::test]
    async fn handler_error_becomes_failure_envelope_with_message_text() {
        let gw = gateway(Duration::from_secs(1));
        let resp = gw
            .dispatch(ToolCallRequest::new("boom", json!({})))
            .await
            .unwrap();
        assert!(resp.is_error);
        assert!(resp.first_text().unwrap().contains("nope"));
    }

    #[tokio::test]
    async fn handler_error_and_routing_error_are_distinguishable() {
        let gw = gateway(Duration::from_secs(1));
        let boom = gw.dispatch(ToolCallRequest::new("boom", json!({}))).await;
        let missing = gw
            .dispatch(ToolCallRequest::new("nonexistent", json!({})))
            .await;
        assert!(boom.is_ok());
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn slow_handler_times_out_near_the_budget() {
        let timeout = Duration::from_millis(100);
        let gw = gateway(timeout);
        let started = Instant::now();
        let resp = gw
            .dispatch(ToolCallRequest::new("slow", json!({})))
            .await
            .unwrap();
        let elapsed = started.elapsed();

        assert!(resp.is_error);
        assert!(resp.first_text().unwrap().contains("timed out"));
        assert!(elapsed >= timeout);
        // Well before the handler's 5 s sleep; generous margin for CI.
        assert!(elapsed < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn fast_failure_does_not_wait_for_the_timeout() {
        let gw = gateway(Duration::from_secs(30));
        let started = Instant::now();
        let resp = gw
            .dispatch(ToolCallRequest::new("boom", json!({})))
            .await
            .unwrap();
        assert!(resp.is_error);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn omitted_arguments_equal_empty_object() {
        let gw = gateway(Duration::from_secs(1));
        let omitted = gw
            .dispatch(ToolCallRequest {
                name: "echo".into(),
                arguments: None,
            })
            .await
            .unwrap();
        let explicit = gw
            .dispatch(ToolCallRequest::new("echo", json!({})))
            .await
            .unwrap();
        assert_eq!(omitted, explicit);
        assert_eq!(omitted.first_text(), Some("{}"));
    }

    #[tokio::test]
    async fn dispatch_is_idempotent_for_pure_handlers() {
        let gw = gateway(Duration::from_secs(1));
        let first = gw
            .dispatch(ToolCallRequest::new("echo", json!({"k": "v"})))
            .await
            .unwrap();
        let second = gw
            .dispatch(ToolCallRequest::new("echo", json!({"k": "v"})))
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn request_deserializes_without_arguments_field() {
        let req: ToolCallRequest = serde_json::from_str(r#"{"name":"echo"}"#).unwrap();
        assert_eq!(req.name, "echo");
        assert!(req.arguments.is_none());
    }
}
