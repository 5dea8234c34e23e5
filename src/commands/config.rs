use crate::cli::{ConfigCommands, PlatformFlags};
use crate::config::{Config, LOCATION_VAR, MODEL_VAR, PROJECT_VAR, STAGING_BUCKET_VAR};
use crate::console::Printer;
use crate::error::Result;
use std::io::Write;
use std::path::Path;

pub fn execute<W: Write>(
    command: &ConfigCommands,
    env_file: &Path,
    flags: &PlatformFlags,
    printer: &mut Printer<W>,
) -> Result<()> {
    match command {
        ConfigCommands::Validate => validate(env_file, flags, printer),
        ConfigCommands::Show => show(env_file, flags, printer),
    }
}

fn load(env_file: &Path, flags: &PlatformFlags) -> Result<Config> {
    Config::load(env_file)?.with_overrides(flags)
}

fn validate<W: Write>(env_file: &Path, flags: &PlatformFlags, printer: &mut Printer<W>) -> Result<()> {
    printer.line("Validating configuration...")?;
    printer.blank()?;

    if env_file.exists() {
        printer.line(&format!("  Env file: {}", env_file.display()))?;
    } else {
        printer.line(&format!(
            "  Env file: {} - not found (optional)",
            env_file.display()
        ))?;
    }

    printer.blank()?;
    match load(env_file, flags) {
        Ok(config) => {
            printer.success("Configuration is valid!")?;
            if config.staging_bucket.is_none() {
                printer.info(&format!(
                    "{} is not set; deploy will not be available",
                    STAGING_BUCKET_VAR
                ))?;
            }
            Ok(())
        }
        Err(e) => {
            printer.line("✗ Configuration is invalid!")?;
            printer.error(&e.to_string())?;
            Err(e)
        }
    }
}

fn show<W: Write>(env_file: &Path, flags: &PlatformFlags, printer: &mut Printer<W>) -> Result<()> {
    let config = load(env_file, flags)?;

    printer.line("Effective Configuration:")?;
    printer.line("(CLI > Environment > Env file > Defaults)")?;
    printer.blank()?;

    printer.line(&format!("  project ({}): {}", PROJECT_VAR, config.project_id))?;
    printer.line(&format!("  location ({}): {}", LOCATION_VAR, config.location))?;
    printer.line(&format!("  model ({}): {}", MODEL_VAR, config.model_name))?;
    printer.line(&format!(
        "  staging bucket ({}): {}",
        STAGING_BUCKET_VAR,
        config.staging_bucket.as_deref().unwrap_or("(not set)")
    ))?;

    Ok(())
}
