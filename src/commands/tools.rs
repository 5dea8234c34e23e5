use crate::cli::ToolsCommands;
use crate::console::Printer;
use crate::error::Result;
use crate::tools::ToolRegistry;
use crate::utils::env::parse_key_values;
use serde_json::{Map, Value};
use std::io::Write;

pub fn execute<W: Write>(
    command: &ToolsCommands,
    registry: &ToolRegistry,
    printer: &mut Printer<W>,
) -> Result<()> {
    match command {
        ToolsCommands::List => list(registry, printer),
        ToolsCommands::Call { name, args } => {
            let output = call(registry, name, args)?;
            printer.line(&output)?;
            Ok(())
        }
    }
}

fn list<W: Write>(registry: &ToolRegistry, printer: &mut Printer<W>) -> Result<()> {
    printer.header("Available Tools")?;
    for tool in registry.descriptors() {
        printer.line(&format!("  • {}", tool.name))?;
        printer.line(&format!("    {}", tool.description))?;
        for param in &tool.parameters {
            let required = if param.required { "required" } else { "optional" };
            printer.line(&format!(
                "    - {} ({}, {}): {}",
                param.name,
                param.kind.as_str(),
                required,
                param.description
            ))?;
        }
        printer.line(&format!("    Returns: {}", tool.returns))?;
        printer.blank()?;
    }
    Ok(())
}

/// Invoke `name` with `KEY=VALUE` arguments; values are passed as strings
pub fn call(registry: &ToolRegistry, name: &str, args: &[String]) -> Result<String> {
    let pairs = parse_key_values(args)?;
    let args: Map<String, Value> = pairs
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();
    registry.invoke(name, &Value::Object(args))
}
