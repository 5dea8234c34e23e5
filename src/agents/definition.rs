//! Data structures for agent TOML files and the assembled descriptor.

use crate::tools::ToolDescriptor;
use serde::{Deserialize, Serialize};

/// An agent definition loaded from a TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentDefinition {
    /// Agent metadata (id, name, description, instruction)
    pub agent: AgentMeta,

    /// Tools the agent may call
    #[serde(default)]
    pub tools: AgentTools,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentMeta {
    pub id: String,
    pub name: String,
    pub description: String,
    pub instruction: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AgentTools {
    /// Tool names, in the order they are offered to the model
    #[serde(default)]
    pub enabled: Vec<String>,
}

/// Declarative agent description consumed by the agent framework.
///
/// Built once and handed over; the platform owns everything after that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    pub name: String,
    pub model: String,
    pub description: String,
    pub instruction: String,
    pub tools: Vec<ToolDescriptor>,
}

impl AgentDescriptor {
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }
}
