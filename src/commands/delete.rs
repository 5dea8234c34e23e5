use crate::console::Printer;
use crate::error::Result;
use crate::platform::AgentEngine;
use std::io::Write;

pub async fn execute<E, W>(engine: &E, resource_name: &str, printer: &mut Printer<W>) -> Result<()>
where
    E: AgentEngine + ?Sized,
    W: Write,
{
    printer.header("Deleting Agent")?;

    match engine.delete(resource_name).await {
        Ok(()) => {
            printer.success(&format!("Agent '{}' deleted successfully!", resource_name))?;
            Ok(())
        }
        Err(e) => {
            printer.error(&format!("Failed to delete agent: {}", e))?;
            Err(e)
        }
    }
}

/// Resource name to delete; a blank `--name` counts as missing
pub fn requested_name(name: Option<&str>) -> Option<&str> {
    name.map(str::trim).filter(|name| !name.is_empty())
}

/// `delete` without `--name` is reported, not treated as a failure
pub fn report_missing_name<W: Write>(printer: &mut Printer<W>) -> Result<()> {
    printer.error("--name (resource name) is required for deletion")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_is_missing() {
        assert_eq!(requested_name(None), None);
        assert_eq!(requested_name(Some("")), None);
        assert_eq!(requested_name(Some("   ")), None);
        assert_eq!(
            requested_name(Some(" projects/p/locations/l/reasoningEngines/1 ")),
            Some("projects/p/locations/l/reasoningEngines/1")
        );
    }
}
