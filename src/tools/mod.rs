//! Tools the agent may call while reasoning.
//!
//! Each tool declares its schema up front through a [`ToolDescriptor`]: the
//! name the model calls it by, a natural-language description, and a typed
//! parameter list. Nothing is inferred from the implementing function.
//!
//! Tools are pure functions of their arguments. Failures a model can
//! recover from are returned as text, not raised, so the framework can relay
//! them conversationally.

pub mod calculator;
pub mod clock;
pub mod registry;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub use calculator::{calculate, CalculatorTool};
pub use clock::{current_time, Clock, CurrentTimeTool, FixedClock, SystemClock};
pub use registry::ToolRegistry;

/// JSON-schema type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Integer,
    Boolean,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Integer => "integer",
            ParamType::Boolean => "boolean",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub kind: ParamType,
    pub description: String,
    pub required: bool,
}

/// Declarative description of a tool, handed to the agent framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
    /// What the tool returns, in prose
    pub returns: String,
}

impl ToolDescriptor {
    /// Render as a function declaration (`name`, `description`, and a JSON
    /// Schema object for `parameters`).
    pub fn function_declaration(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for param in &self.parameters {
            properties.insert(
                param.name.clone(),
                json!({
                    "type": param.kind.as_str(),
                    "description": param.description,
                }),
            );
            if param.required {
                required.push(Value::String(param.name.clone()));
            }
        }

        json!({
            "name": self.name,
            "description": self.description,
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": required,
            },
        })
    }
}

/// A callable exposed to the agent.
pub trait Tool: Send + Sync {
    fn descriptor(&self) -> ToolDescriptor;

    /// Invoke with already-validated arguments. The returned text is what
    /// the model sees, including any error message.
    fn invoke(&self, args: &Map<String, Value>) -> String;
}
