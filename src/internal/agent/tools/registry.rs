//! Tool registry: the authoritative name → handler mapping.
//!
//! Built once at startup through [`ToolRegistryBuilder`], then shared
//! read-only behind an `Arc` for the life of the process. Because
//! registration strictly precedes the first dispatch, no locking is needed.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{
    envelope::ToolResponse,
    error::{RegistryError, ToolResult},
    spec::ToolSpec,
};

/// Handler trait all tools implement.
///
/// Handlers are stateless with respect to the gateway; any state they need
/// (a service handle, a sandbox root) is a collaborator they hold their own
/// reference to. Handlers decode their own arguments, build their own
/// success envelopes, and let errors propagate — the gateway catches and
/// formats them.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// The descriptor advertised for this tool.
    fn spec(&self) -> ToolSpec;

    /// Execute with the given arguments object.
    async fn call(&self, arguments: Value) -> ToolResult<ToolResponse>;
}

/// Name → handler mapping with enumeration in registration order.
pub struct ToolRegistry {
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
    /// Registration order, for stable descriptor advertisement.
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a handler under the name its spec declares.
    ///
    /// Duplicate and empty names are rejected: the registry is immutable
    /// after startup, so a collision is always a wiring mistake.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) -> Result<(), RegistryError> {
        let name = handler.spec().name;
        if name.is_empty() {
            return Err(RegistryError::EmptyToolName);
        }
        if self.handlers.contains_key(&name) {
            return Err(RegistryError::DuplicateTool(name));
        }
        self.order.push(name.clone());
        self.handlers.insert(name, handler);
        Ok(())
    }

    /// Pure lookup, no side effects.
    pub fn handler(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.handlers.get(name).cloned()
    }

    /// All descriptors, in registration order.
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.order
            .iter()
            .filter_map(|name| self.handlers.get(name))
            .map(|handler| handler.spec())
            .collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder producing the registry value handed to the gateway.
pub struct ToolRegistryBuilder {
    registry: ToolRegistry,
}

impl ToolRegistryBuilder {
    pub fn new() -> Self {
        Self {
            registry: ToolRegistry::new(),
        }
    }

    pub fn register(mut self, handler: Arc<dyn ToolHandler>) -> Result<Self, RegistryError> {
        self.registry.register(handler)?;
        Ok(self)
    }

    /// Register a batch of handlers, preserving their order.
    pub fn register_all(
        mut self,
        handlers: impl IntoIterator<Item = Arc<dyn ToolHandler>>,
    ) -> Result<Self, RegistryError> {
        for handler in handlers {
            self.registry.register(handler)?;
        }
        Ok(self)
    }

    pub fn build(self) -> ToolRegistry {
        self.registry
    }
}

impl Default for ToolRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct NamedTool(&'static str);

    #[async_trait]
    impl ToolHandler for NamedTool {
        fn spec(&self) -> ToolSpec {
            ToolSpec::new(self.0, "test tool")
        }

        async fn call(&self, _arguments: Value) -> ToolResult<ToolResponse> {
            Ok(ToolResponse::text(self.0))
        }
    }

    #[test]
    fn registration_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NamedTool("echo"))).unwrap();

        assert!(registry.contains("echo"));
        assert!(!registry.contains("missing"));
        assert!(registry.handler("echo").is_some());
        assert!(registry.handler("missing").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NamedTool("echo"))).unwrap();
        let err = registry.register(Arc::new(NamedTool("echo"))).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateTool("echo".into()));
        // The original entry survives.
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut registry = ToolRegistry::new();
        let err = registry.register(Arc::new(NamedTool(""))).unwrap_err();
        assert_eq!(err, RegistryError::EmptyToolName);
        assert!(registry.is_empty());
    }

    #[test]
    fn specs_follow_registration_order() {
        let registry = ToolRegistryBuilder::new()
            .register(Arc::new(NamedTool("charlie")))
            .unwrap()
            .register(Arc::new(NamedTool("alpha")))
            .unwrap()
            .register(Arc::new(NamedTool("bravo")))
            .unwrap()
            .build();

        let names: Vec<String> = registry.specs().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["charlie", "alpha", "bravo"]);
        assert_eq!(registry.names(), names);
    }

    #[tokio::test]
    async fn registered_handler_is_callable() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NamedTool("echo"))).unwrap();
        let handler = registry.handler("echo").unwrap();
        let resp = handler.call(json!({})).await.unwrap();
        assert_eq!(resp.first_text(), Some("echo"));
    }
}
