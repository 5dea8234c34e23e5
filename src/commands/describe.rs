use crate::agents::AgentRegistry;
use crate::console::Printer;
use crate::error::Result;
use crate::tools::ToolRegistry;
use serde_json::{json, Value};
use std::io::Write;

/// Print the assembled agent as JSON, with tool schemas rendered as
/// function declarations
pub fn execute<W: Write>(agent_id: &str, model_name: &str, printer: &mut Printer<W>) -> Result<()> {
    let descriptor = AgentRegistry::load()?.build(agent_id, model_name, &ToolRegistry::builtin())?;

    let document = json!({
        "name": descriptor.name,
        "model": descriptor.model,
        "description": descriptor.description,
        "instruction": descriptor.instruction,
        "tools": descriptor
            .tools
            .iter()
            .map(|tool| tool.function_declaration())
            .collect::<Vec<Value>>(),
    });

    printer.line(&serde_json::to_string_pretty(&document)?)?;
    Ok(())
}
