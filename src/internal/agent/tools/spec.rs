//! Tool descriptors: the introspectable contract advertised to callers
//! before they ever invoke a tool.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Static metadata for one tool: a unique name, a human-readable
/// description, and a JSON-Schema-like shape for its arguments.
///
/// The schema is advertisement only; the gateway never enforces it.
/// Handlers decode and validate their own arguments.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: ToolParameters,
}

impl ToolSpec {
    /// Create a spec that accepts no arguments.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: ToolParameters::empty(),
        }
    }

    pub fn with_parameters(mut self, parameters: ToolParameters) -> Self {
        self.input_schema = parameters;
        self
    }

    pub fn to_json(&self) -> Value {
        json!(self)
    }
}

/// Argument schema in JSON Schema object form.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolParameters {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: Map<String, Value>,
    pub required: Vec<String>,
}

impl ToolParameters {
    pub fn empty() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: Map::new(),
            required: Vec::new(),
        }
    }

    /// Build an object schema from property definitions.
    ///
    /// # Arguments
    /// * `properties` - array of (name, type, description) tuples
    /// * `required` - array of (name, is_required) tuples
    pub fn object<const N: usize, const M: usize>(
        properties: [(&str, &str, &str); N],
        required: [(&str, bool); M],
    ) -> Self {
        let mut props = Map::new();
        let mut req = Vec::new();

        for (name, param_type, description) in properties {
            props.insert(
                name.to_string(),
                json!({
                    "type": param_type,
                    "description": description
                }),
            );
        }
        for (name, is_required) in required {
            if is_required {
                req.push(name.to_string());
            }
        }

        Self {
            schema_type: "object".to_string(),
            properties: props,
            required: req,
        }
    }
}
