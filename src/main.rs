#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use agent_playtime::cli::{Cli, Commands};
use agent_playtime::commands;
use agent_playtime::commands::query::QueryOptions;
use agent_playtime::config::{self, Config};
use agent_playtime::console::Printer;
use agent_playtime::platform::{auth, AgentEngineClient};
use agent_playtime::tools::ToolRegistry;
use agent_playtime::utils::env::apply_env_file;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut printer = Printer::stdout();

    match &cli.command {
        Commands::Tools { command } => {
            commands::tools::execute(command, &ToolRegistry::builtin(), &mut printer)?;
        }
        Commands::Describe { agent } => {
            apply_env_file(&cli.env_file)?;
            let model = config::model_name(&cli.platform, |key| std::env::var(key).ok());
            commands::describe::execute(agent, &model, &mut printer)?;
        }
        Commands::Config { command } => {
            commands::config::execute(command, &cli.env_file, &cli.platform, &mut printer)?;
        }
        Commands::Deploy { name, description } => {
            let config = load_config(&cli)?;
            // Bucket and agent are checked before any credentials are needed
            let request = commands::deploy::prepare(&config, name, description, &mut printer)?;
            let engine = connect(&config)?;
            commands::deploy::execute(&engine, &request, &mut printer).await?;
        }
        Commands::List => {
            let engine = connect(&load_config(&cli)?)?;
            commands::list::execute(&engine, &mut printer).await?;
        }
        Commands::Delete { name } => match commands::delete::requested_name(name.as_deref()) {
            None => commands::delete::report_missing_name(&mut printer)?,
            Some(name) => {
                let engine = connect(&load_config(&cli)?)?;
                commands::delete::execute(&engine, name, &mut printer).await?;
            }
        },
        Commands::Query {
            resource_name,
            query,
            user_id,
        } => {
            let engine = connect(&load_config(&cli)?)?;
            let options = QueryOptions {
                resource_name,
                user_id,
                query: query.as_deref(),
            };
            let stdin = std::io::stdin();
            commands::query::execute(&engine, &options, stdin.lock(), &mut printer).await?;
        }
    }

    Ok(())
}

/// Resolve configuration for platform commands; configuration problems end
/// the process before any platform call
fn load_config(cli: &Cli) -> Result<Config> {
    match Config::load(&cli.env_file).and_then(|c| c.with_overrides(&cli.platform)) {
        Ok(config) => {
            tracing::debug!(project = %config.project_id, location = %config.location, "configuration resolved");
            Ok(config)
        }
        Err(e) if e.is_config_error() => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

fn connect(config: &Config) -> Result<AgentEngineClient> {
    let token = auth::access_token()?;
    Ok(AgentEngineClient::new(config, token))
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
