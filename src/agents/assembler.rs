use super::definition::AgentDescriptor;
use crate::error::{PlaytimeError, Result};
use crate::tools::ToolDescriptor;
use std::collections::HashSet;

/// Build an agent descriptor from its declarative pieces.
///
/// Pure: no I/O. The name must be an identifier (`[A-Za-z_][A-Za-z0-9_]*`),
/// the model must be set and tool names must be unique. Tool order is kept.
pub fn assemble(
    model_name: &str,
    tools: Vec<ToolDescriptor>,
    instruction: &str,
    name: &str,
    description: &str,
) -> Result<AgentDescriptor> {
    validate_name(name)?;

    if model_name.trim().is_empty() {
        return Err(PlaytimeError::InvalidAgent(format!(
            "Agent '{}' has no model",
            name
        )));
    }

    let mut seen = HashSet::new();
    for tool in &tools {
        if !seen.insert(tool.name.as_str()) {
            return Err(PlaytimeError::InvalidAgent(format!(
                "Agent '{}' lists tool '{}' more than once",
                name, tool.name
            )));
        }
    }

    Ok(AgentDescriptor {
        name: name.to_string(),
        model: model_name.to_string(),
        description: description.to_string(),
        instruction: instruction.to_string(),
        tools,
    })
}

fn validate_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(PlaytimeError::InvalidAgent(
            "Agent name cannot be empty".to_string(),
        ));
    };

    let valid = (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(PlaytimeError::InvalidAgent(format!(
            "Agent name '{}' must start with a letter or underscore and contain only letters, digits and underscores",
            name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolRegistry;

    #[test]
    fn test_assemble_keeps_tool_order() {
        let tools = ToolRegistry::builtin().descriptors();
        let agent = assemble("gemini-2.0-flash", tools, "Be helpful.", "assistant", "desc").unwrap();

        assert_eq!(agent.name, "assistant");
        assert_eq!(agent.model, "gemini-2.0-flash");
        assert_eq!(agent.instruction, "Be helpful.");
        assert_eq!(agent.tool_names(), vec!["get_current_time", "calculate"]);
    }

    #[test]
    fn test_assemble_without_tools() {
        let agent = assemble("m", vec![], "", "bare", "").unwrap();
        assert!(agent.tools.is_empty());
    }

    #[test]
    fn test_rejects_empty_name() {
        let err = assemble("m", vec![], "i", "", "d").unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_rejects_non_identifier_names() {
        for name in ["1agent", "my agent", "my-agent", "agent!"] {
            assert!(assemble("m", vec![], "i", name, "d").is_err(), "name: {}", name);
        }
        for name in ["_private", "gcs_assistant", "A1"] {
            assert!(assemble("m", vec![], "i", name, "d").is_ok(), "name: {}", name);
        }
    }

    #[test]
    fn test_rejects_blank_model() {
        assert!(assemble("  ", vec![], "i", "assistant", "d").is_err());
    }

    #[test]
    fn test_rejects_duplicate_tools() {
        let mut tools = ToolRegistry::builtin().descriptors();
        tools.push(tools[0].clone());
        let err = assemble("m", tools, "i", "assistant", "d").unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }
}
