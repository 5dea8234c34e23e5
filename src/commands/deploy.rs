use crate::agents::{AgentRegistry, DEFAULT_AGENT};
use crate::config::Config;
use crate::console::Printer;
use crate::error::Result;
use crate::platform::{AgentEngine, DeployRequest, DeployedAgent, DEFAULT_REQUIREMENTS};
use crate::tools::ToolRegistry;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;

/// Check the staging bucket and assemble the agent; no platform access
pub fn prepare<W: Write>(
    config: &Config,
    display_name: &str,
    description: &str,
    printer: &mut Printer<W>,
) -> Result<DeployRequest> {
    printer.header("Deploying ADK Agent to Agent Engine")?;
    printer.success(&format!(
        "Using project '{}' in '{}'",
        config.project_id, config.location
    ))?;

    let staging_bucket = match config.require_staging_bucket() {
        Ok(bucket) => bucket.to_string(),
        Err(e) => {
            printer.error(&e.to_string())?;
            return Err(e);
        }
    };

    printer.info("Creating ADK agent...")?;
    let agent = AgentRegistry::load()?.build(
        DEFAULT_AGENT,
        &config.model_name,
        &ToolRegistry::builtin(),
    )?;

    Ok(DeployRequest {
        display_name: display_name.to_string(),
        description: description.to_string(),
        agent,
        requirements: DEFAULT_REQUIREMENTS.iter().map(|r| r.to_string()).collect(),
        staging_bucket,
    })
}

pub async fn execute<E, W>(
    engine: &E,
    request: &DeployRequest,
    printer: &mut Printer<W>,
) -> Result<DeployedAgent>
where
    E: AgentEngine + ?Sized,
    W: Write,
{
    printer.info("Deploying to Agent Engine (this may take a few minutes)...")?;
    let spinner = spinner(&format!("Creating '{}'", request.display_name));
    let result = engine.create(request).await;
    spinner.finish_and_clear();

    match result {
        Ok(deployed) => {
            printer.success("Agent deployed successfully!")?;
            printer.info(&format!("Resource name: {}", deployed.resource_name))?;
            Ok(deployed)
        }
        Err(e) => {
            printer.error(&format!("Deployment failed: {}", e))?;
            Err(e)
        }
    }
}

/// Spinner on stderr; hidden automatically when stderr is not a terminal
fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
