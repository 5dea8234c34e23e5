//! Tool registry for looking up and invoking tools by name.

use super::{CalculatorTool, CurrentTimeTool, ParamType, Tool, ToolDescriptor};
use crate::error::{PlaytimeError, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of available tools, in registration order
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in tools: clock read and calculator
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CurrentTimeTool::default()));
        registry.register(Arc::new(CalculatorTool));
        registry
    }

    /// Add a tool; a tool with the same name is replaced in place
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.descriptor().name;
        match self.index.get(&name) {
            Some(&slot) => self.tools[slot] = tool,
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&slot| self.tools[slot].clone())
    }

    /// Registered tool names, in registration order
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.descriptor().name).collect()
    }

    /// Descriptors of every registered tool, in registration order
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor()).collect()
    }

    /// Invoke a tool after checking `args` against its declared parameters
    pub fn invoke(&self, name: &str, args: &Value) -> Result<String> {
        let tool = self.get(name).ok_or_else(|| {
            PlaytimeError::InvalidToolCall(format!(
                "Unknown tool '{}'. Available: {}",
                name,
                self.names().join(", ")
            ))
        })?;

        let empty = Map::new();
        let args = match args {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                return Err(PlaytimeError::InvalidToolCall(format!(
                    "Arguments for '{}' must be an object, got {}",
                    name, other
                )))
            }
        };

        validate_args(&tool.descriptor(), args)?;
        tracing::debug!(tool = name, "invoking tool");
        Ok(tool.invoke(args))
    }
}

fn validate_args(descriptor: &ToolDescriptor, args: &Map<String, Value>) -> Result<()> {
    for param in &descriptor.parameters {
        match args.get(&param.name) {
            None if param.required => {
                return Err(PlaytimeError::InvalidToolCall(format!(
                    "Tool '{}' requires argument '{}'",
                    descriptor.name, param.name
                )))
            }
            None => {}
            Some(value) => {
                let matches = match param.kind {
                    ParamType::String => value.is_string(),
                    ParamType::Number => value.is_number(),
                    ParamType::Integer => value.is_i64() || value.is_u64(),
                    ParamType::Boolean => value.is_boolean(),
                };
                if !matches {
                    return Err(PlaytimeError::InvalidToolCall(format!(
                        "Argument '{}' of '{}' must be a {}",
                        param.name,
                        descriptor.name,
                        param.kind.as_str()
                    )));
                }
            }
        }
    }

    if let Some(unknown) = args
        .keys()
        .find(|key| !descriptor.parameters.iter().any(|p| &p.name == *key))
    {
        return Err(PlaytimeError::InvalidToolCall(format!(
            "Tool '{}' has no parameter '{}'",
            descriptor.name, unknown
        )));
    }

    Ok(())
}
