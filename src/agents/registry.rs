//! Agent registry for loading and assembling the embedded agent definitions.

use super::assembler::assemble;
use super::definition::{AgentDefinition, AgentDescriptor};
use crate::error::{PlaytimeError, Result};
use crate::tools::ToolRegistry;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of available agent definitions
pub struct AgentRegistry {
    agents: HashMap<String, Arc<AgentDefinition>>,
}

impl AgentRegistry {
    /// Load all embedded agent definitions
    pub fn load() -> Result<Self> {
        let mut agents = HashMap::new();

        let assistant = parse_definition(include_str!("../../agents/assistant/agent.toml"))?;
        agents.insert(assistant.agent.id.clone(), Arc::new(assistant));

        Ok(Self { agents })
    }

    /// Get an agent definition by ID
    pub fn get(&self, id: &str) -> Option<Arc<AgentDefinition>> {
        self.agents.get(id).cloned()
    }

    /// List all available agent IDs
    pub fn list_available(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.agents.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Assemble the descriptor for agent `id`, resolving its tools in `tools`
    pub fn build(&self, id: &str, model_name: &str, tools: &ToolRegistry) -> Result<AgentDescriptor> {
        let definition = self.get(id).ok_or_else(|| {
            PlaytimeError::InvalidAgent(format!(
                "Unknown agent '{}'. Available: {}",
                id,
                self.list_available().join(", ")
            ))
        })?;

        let mut descriptors = Vec::with_capacity(definition.tools.enabled.len());
        for name in &definition.tools.enabled {
            let tool = tools.get(name).ok_or_else(|| {
                PlaytimeError::InvalidAgent(format!(
                    "Agent '{}' requires tool '{}' which is not registered",
                    id, name
                ))
            })?;
            descriptors.push(tool.descriptor());
        }

        assemble(
            model_name,
            descriptors,
            &definition.agent.instruction,
            &definition.agent.name,
            &definition.agent.description,
        )
    }
}

/// Parse an agent definition from TOML
pub fn parse_definition(toml_content: &str) -> Result<AgentDefinition> {
    let definition: AgentDefinition = toml::from_str(toml_content)?;
    validate_definition(&definition)?;
    Ok(definition)
}

/// Validate that an agent definition is complete and usable
fn validate_definition(definition: &AgentDefinition) -> Result<()> {
    if definition.agent.id.is_empty() {
        return Err(PlaytimeError::InvalidAgent(
            "Agent id cannot be empty".to_string(),
        ));
    }
    if definition.agent.instruction.trim().is_empty() {
        return Err(PlaytimeError::InvalidAgent(format!(
            "Agent '{}' instruction cannot be empty",
            definition.agent.id
        )));
    }
    Ok(())
}
