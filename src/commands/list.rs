use crate::console::Printer;
use crate::error::Result;
use crate::platform::{AgentEngine, DeployedAgent};
use std::io::Write;

pub async fn execute<E, W>(engine: &E, printer: &mut Printer<W>) -> Result<Vec<DeployedAgent>>
where
    E: AgentEngine + ?Sized,
    W: Write,
{
    printer.header("Deployed Agents")?;

    let agents = engine.list().await?;
    if agents.is_empty() {
        printer.info("No agents deployed yet.")?;
        return Ok(agents);
    }

    for agent in &agents {
        printer.agent_entry(&agent.display_name, &agent.resource_name)?;
    }
    tracing::debug!(count = agents.len(), "listed deployed agents");

    Ok(agents)
}
